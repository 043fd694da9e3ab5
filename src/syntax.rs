//! Translation call extraction from application sources.

pub mod analyzer;

use crate::ir::tr_call::TrCall;

/// Extracts every translation call of a C++ file.
///
/// Parse failures are logged and yield no calls.
#[must_use]
pub fn analyze_source(text: &str, file_name: &str) -> Vec<TrCall> {
    let language = analyzer::query_loader::cpp_language();
    let queries = analyzer::query_loader::load_queries();

    analyzer::extractor::analyze_tr_calls(text, file_name, &language, queries).unwrap_or_else(
        |error| {
            tracing::warn!(file_name, %error, "Failed to analyze source file");
            Vec::new()
        },
    )
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn test_analyze_source_keys() {
        let code = r#"
void TrashManager::refresh()
{
    setTitle(tr("Trash"));
}
"#;

        let keys: Vec<_> = analyze_source(code, "trashmanager.cpp").iter().map(TrCall::key).collect();

        expect_that!(
            keys,
            elements_are![eq(&crate::ir::message::MessageKey::new("TrashManager", "Trash", None))]
        );
    }
}
