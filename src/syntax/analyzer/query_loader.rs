//! Load Tree-sitter queries from files.

use std::sync::OnceLock;

use tree_sitter::{
    Language,
    Query,
};

/// クエリファイル
struct QueryFile {
    /// ファイル内容
    content: &'static str,
    /// ログ用の名前
    name: &'static str,
}

/// C++ 向けクエリ
const CPP_QUERIES: &[QueryFile] =
    &[QueryFile { content: include_str!("../../../queries/cpp/qt-tr.scm"), name: "qt-tr" }];

/// パース済みクエリのキャッシュ
static CPP_QUERY_CACHE: OnceLock<Vec<Query>> = OnceLock::new();

/// Tree-sitter C++ grammar.
#[must_use]
pub fn cpp_language() -> Language {
    tree_sitter_cpp::LANGUAGE.into()
}

/// クエリファイルをパースする。失敗したクエリはログに出して除外する
fn parse_queries() -> Vec<Query> {
    let language = cpp_language();

    CPP_QUERIES
        .iter()
        .filter_map(|qf| {
            Query::new(&language, qf.content)
                .map_err(|e| tracing::error!("Failed to parse {} query: {e:?}", qf.name))
                .ok()
        })
        .collect()
}

/// Loads cached C++ queries. Queries are parsed once per process.
#[must_use]
pub fn load_queries() -> &'static [Query] {
    CPP_QUERY_CACHE.get_or_init(parse_queries)
}
