//! Extracts Qt translation calls from C++ source code using Tree-sitter.

use tree_sitter::{
    Language,
    Node,
    Parser,
    Query,
    QueryCursor,
    StreamingIteratorMut,
};

use crate::ir::tr_call::TrCall;
use crate::syntax::analyzer::literal::{
    decode_raw_string_literal,
    decode_string_literal,
};
use crate::syntax::analyzer::scope::enclosing_context;
use crate::syntax::analyzer::types::{
    AnalyzerError,
    CaptureName,
    TrFunction,
};
use crate::types::SourceLocation;

/// Value of a string literal argument, including adjacent-literal concatenation.
///
/// Anything that is not a literal (variables, `nullptr`, macros) is `None`.
fn literal_value(node: Node<'_>, source_bytes: &[u8]) -> Option<String> {
    match node.kind() {
        "string_literal" => decode_string_literal(node.utf8_text(source_bytes).ok()?),
        "raw_string_literal" => decode_raw_string_literal(node.utf8_text(source_bytes).ok()?),
        "concatenated_string" => {
            let mut cursor = node.walk();
            let parts = node
                .named_children(&mut cursor)
                .filter(|child| child.kind() != "comment")
                .map(|child| literal_value(child, source_bytes))
                .collect::<Option<Vec<String>>>()?;
            Some(parts.concat())
        }
        "parenthesized_expression" => literal_value(node.named_child(0)?, source_bytes),
        _ => None,
    }
}

/// Arguments of a call, skipping comments.
fn arguments<'a>(args_node: Node<'a>) -> Vec<Node<'a>> {
    let mut cursor = args_node.walk();
    args_node.named_children(&mut cursor).filter(|child| child.kind() != "comment").collect()
}

/// 1-based line of a node.
fn line_of(node: Node<'_>) -> Option<u32> {
    u32::try_from(node.start_position().row + 1).ok()
}

/// Builds a [`TrCall`] from one matched call expression.
fn build_call(
    function: TrFunction,
    qualifier: Option<&str>,
    call_node: Node<'_>,
    args: &[Node<'_>],
    source_bytes: &[u8],
    file_name: &str,
) -> Option<TrCall> {
    let literal = |index: usize| args.get(index).and_then(|n| literal_value(*n, source_bytes));

    let (context, source, comment, numerus) = match function {
        TrFunction::Tr { explicit_context } => {
            let context = match qualifier {
                Some(class) if explicit_context => class.to_string(),
                _ => enclosing_context(call_node, source_bytes),
            };
            (context, literal(0)?, literal(1), args.len() >= 3)
        }
        TrFunction::Translate => (literal(0)?, literal(1)?, literal(2), args.len() >= 4),
        TrFunction::TrNoop { numerus } => {
            (enclosing_context(call_node, source_bytes), literal(0)?, None, numerus)
        }
        TrFunction::TranslateNoop { with_comment, numerus } => {
            let comment = if with_comment { literal(2) } else { None };
            (literal(0)?, literal(1)?, comment, numerus)
        }
    };

    Some(TrCall {
        context,
        source,
        comment: comment.filter(|c| !c.is_empty()),
        numerus,
        location: SourceLocation::new(file_name, line_of(call_node)),
    })
}

/// Extracts translation calls from a Tree-sitter syntax tree.
///
/// Calls whose source text is not a string literal are skipped.
///
/// # Errors
/// Returns `AnalyzerError` if:
/// - Language setup fails
/// - Source code parsing fails
pub fn analyze_tr_calls(
    source: &str,
    file_name: &str,
    language: &Language,
    queries: &[Query],
) -> Result<Vec<TrCall>, AnalyzerError> {
    let mut parser = Parser::new();
    parser.set_language(language)?;
    let tree = parser.parse(source, None).ok_or(AnalyzerError::ParseFailed)?;

    let source_bytes = source.as_bytes();
    let root_node = tree.root_node();
    let mut calls = Vec::new();

    for query in queries {
        let cap_names = query.capture_names();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(query, root_node, source_bytes);

        while let Some(match_) = matches.next_mut() {
            let mut call_node = None;
            let mut function_node = None;
            let mut args_node = None;

            for capture in match_.captures.iter() {
                let Some(cap_name) = cap_names.get(capture.index as usize) else {
                    continue;
                };
                match cap_name.parse::<CaptureName>() {
                    Ok(CaptureName::Call) => call_node = Some(capture.node),
                    Ok(CaptureName::Function) => function_node = Some(capture.node),
                    Ok(CaptureName::Args) => args_node = Some(capture.node),
                    Err(_) => {}
                }
            }

            let (Some(call_node), Some(function_node), Some(args_node)) =
                (call_node, function_node, args_node)
            else {
                continue;
            };

            let Ok(callee_text) = function_node.utf8_text(source_bytes) else {
                continue;
            };
            let callee: String = callee_text.split_whitespace().collect();
            let Some((function, qualifier)) = TrFunction::from_callee(&callee) else {
                continue;
            };

            let args = arguments(args_node);
            match build_call(function, qualifier, call_node, &args, source_bytes, file_name) {
                Some(call) => calls.push(call),
                None => tracing::debug!(
                    file_name,
                    line = ?line_of(call_node),
                    callee = %callee,
                    "Skipping translation call without literal arguments"
                ),
            }
        }
    }

    calls.sort_by_key(|call| call.location.line);
    Ok(calls)
}
