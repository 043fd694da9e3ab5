//! 翻訳コンテキスト（クラス名）の解決
//!
//! `tr()` のコンテキストは呼び出しを囲むクラスの完全修飾名になる。
//! 以下から組み立てる:
//! - 関数定義の修飾子 (`void DialogManager::showErrorDialog()` → `DialogManager`)
//! - インラインメンバー関数を囲む `class` / `struct`
//! - 外側の `namespace`

use tree_sitter::Node;

/// Text of a node with all whitespace removed.
fn compact_text(node: Node<'_>, source_bytes: &[u8]) -> Option<String> {
    let text = node.utf8_text(source_bytes).ok()?;
    Some(text.split_whitespace().collect())
}

/// Drops template argument lists: `Holder<T>::Inner<int>` → `Holder::Inner`.
fn strip_template_args(name: &str) -> String {
    let mut depth = 0usize;
    name.chars()
        .filter(|&c| match c {
            '<' => {
                depth += 1;
                false
            }
            '>' => {
                depth = depth.saturating_sub(1);
                false
            }
            _ => depth == 0,
        })
        .collect()
}

/// Finds the `function_declarator` under a definition's declarator chain
/// (pointer and reference return types wrap it).
fn function_declarator(definition: Node<'_>) -> Option<Node<'_>> {
    let mut current = definition.child_by_field_name("declarator")?;
    loop {
        if current.kind() == "function_declarator" {
            return Some(current);
        }
        current = match current.child_by_field_name("declarator") {
            Some(next) => next,
            None if current.kind() == "reference_declarator" => current.named_child(0)?,
            None => return None,
        };
    }
}

/// Class qualifier of an out-of-line member definition, e.g. `dfmbase::DialogManager`.
fn definition_scope(definition: Node<'_>, source_bytes: &[u8]) -> Option<String> {
    let declarator = function_declarator(definition)?.child_by_field_name("declarator")?;
    if declarator.kind() != "qualified_identifier" {
        return None;
    }
    let name = strip_template_args(&compact_text(declarator, source_bytes)?);
    let (scope, _) = name.rsplit_once("::")?;
    let scope = scope.trim_start_matches("::");
    (!scope.is_empty()).then(|| scope.to_string())
}

/// Returns the context `tr()` at `node` translates in.
///
/// Empty when no enclosing class can be determined (a free function).
#[must_use]
pub fn enclosing_context(node: Node<'_>, source_bytes: &[u8]) -> String {
    // 内側から外側の順
    let mut parts: Vec<String> = Vec::new();
    let mut has_class = false;
    let mut seen_function = false;
    let mut current = node;

    while let Some(parent) = current.parent() {
        match parent.kind() {
            "function_definition" if !seen_function => {
                seen_function = true;
                if let Some(scope) = definition_scope(parent, source_bytes) {
                    parts.push(scope);
                    has_class = true;
                }
            }
            "class_specifier" | "struct_specifier" => {
                if let Some(name) =
                    parent.child_by_field_name("name").and_then(|n| compact_text(n, source_bytes))
                {
                    parts.push(strip_template_args(&name));
                    has_class = true;
                }
            }
            "namespace_definition" if has_class => {
                if let Some(name) =
                    parent.child_by_field_name("name").and_then(|n| compact_text(n, source_bytes))
                {
                    parts.push(name);
                }
            }
            _ => {}
        }
        current = parent;
    }

    if !has_class {
        return String::new();
    }
    parts.reverse();
    parts.join("::")
}
