//! ワークスペースの走査とカタログの構築
use std::collections::BTreeMap;
use std::path::{
    Path,
    PathBuf,
};
use std::sync::Arc;

use ignore::WalkBuilder;
use tokio::sync::Semaphore;

use crate::catalog::{
    Catalog,
    CatalogBuilder,
    CatalogSet,
};
use crate::config::{
    CatalogSettings,
    ConfigManager,
    FileKind,
    FileMatcher,
};
use crate::indexer::types::{
    IndexerError,
    WorkspaceIndex,
};
use crate::input::language::normalize_language_code;
use crate::input::{
    TsDocument,
    load_ts_file,
};
use crate::ir::tr_call::TrCall;
use crate::syntax::analyze_source;

/// 走査で見つかったファイル
#[derive(Debug, Default)]
struct DiscoveredFiles {
    /// 翻訳ファイル
    translations: Vec<PathBuf>,
    /// ソースファイル
    sources: Vec<PathBuf>,
}

/// ワークスペースから翻訳ファイルとソースファイルを読み込む
#[derive(Clone, Copy, Debug, Default)]
pub struct WorkspaceIndexer;

impl WorkspaceIndexer {
    /// 新しいインデクサーを作成
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// ワークスペースをインデックス
    ///
    /// 読み込めないファイルは警告を出してスキップする。
    ///
    /// # Errors
    /// - ワークスペースのルートがディレクトリでない
    /// - 設定の glob パターンが不正
    pub async fn index_workspace(
        &self,
        workspace_path: &Path,
        config_manager: &ConfigManager,
    ) -> Result<WorkspaceIndex, IndexerError> {
        if !workspace_path.is_dir() {
            return Err(IndexerError::InvalidPath(workspace_path.to_path_buf()));
        }
        let settings = config_manager.get_settings();
        let matcher = config_manager.file_matcher(workspace_path.to_path_buf())?;
        let files = Self::find_files(&matcher);

        let num_threads = settings.indexing.effective_threads();
        tracing::debug!(
            workspace_path = %workspace_path.display(),
            translations = files.translations.len(),
            sources = files.sources.len(),
            num_threads,
            "Indexing workspace"
        );
        // 翻訳ファイルとソースファイルで同じ上限を共有する
        let semaphore = Arc::new(Semaphore::new(num_threads));

        let root = workspace_path.to_path_buf();
        let (documents, scanned) = tokio::join!(
            run_bounded(&files.translations, &semaphore, |path: &Path| {
                load_ts_file(path)
                    .map_err(|error| {
                        tracing::warn!(path = %path.display(), %error, "Skipping translation file");
                    })
                    .ok()
            }),
            run_bounded(&files.sources, &semaphore, move |path: &Path| scan_source(&root, path)),
        );

        let mut index = WorkspaceIndex::default();
        let mut by_language: BTreeMap<Option<String>, Vec<TsDocument>> = BTreeMap::new();
        for (path, document) in documents {
            let Some(document) = document else {
                index.skipped_files.push(path);
                continue;
            };
            by_language
                .entry(document.language.as_deref().map(normalize_language_code))
                .or_default()
                .push(document);
            index.translation_files.push(path);
        }
        for (path, calls) in scanned {
            let Some(calls) = calls else {
                index.skipped_files.push(path);
                continue;
            };
            index.usages.extend(calls);
            index.source_files.push(path);
        }

        index.catalogs = CatalogSet::new().with_fallback_languages(&settings.fallback_languages);
        for (language, documents) in by_language {
            if language.is_none() {
                tracing::warn!(
                    files = documents.len(),
                    "Translation files without a language are registered under the empty code"
                );
            }
            index.catalogs.insert(build_catalog(settings, documents));
        }

        tracing::debug!(
            languages = index.catalogs.len(),
            usages = index.usages.len(),
            skipped = index.skipped_files.len(),
            "Workspace indexed"
        );
        Ok(index)
    }

    /// 翻訳ファイルとソースファイルを検索
    fn find_files(matcher: &FileMatcher) -> DiscoveredFiles {
        let workspace_path = matcher.workspace_root();
        let mut found = DiscoveredFiles::default();

        // ignore クレートでファイルを走査
        for result in WalkBuilder::new(workspace_path)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            // ファイルのみを対象
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            match matcher.classify(entry.path()) {
                Some(FileKind::Translation) => found.translations.push(entry.into_path()),
                Some(FileKind::Source) => found.sources.push(entry.into_path()),
                None => {}
            }
        }

        // 重複キーの解決順を安定させる
        found.translations.sort();
        found.sources.sort();
        found
    }
}

/// 同じ言語のドキュメントから設定に従ってカタログを構築する
///
/// どのドキュメントにも `sourcelanguage` がなければ設定の `sourceLanguage` を使う。
#[must_use]
pub fn build_catalog(
    settings: &CatalogSettings,
    documents: impl IntoIterator<Item = TsDocument>,
) -> Catalog {
    let mut builder = CatalogBuilder::from_settings(settings);
    let mut has_source_language = false;
    for document in documents {
        has_source_language |= document.source_language.is_some();
        builder.add_document(document);
    }
    if !has_source_language {
        builder = builder.source_language(settings.source_language.clone());
    }
    builder.build()
}

/// ソースファイルを読み込んで `tr()` 呼び出しを抽出する
fn scan_source(workspace_path: &Path, path: &Path) -> Option<Vec<TrCall>> {
    let text = std::fs::read_to_string(path)
        .map_err(|error| {
            tracing::warn!(path = %path.display(), %error, "Skipping source file");
        })
        .ok()?;
    // location はワークスペースからの相対パスで記録する
    let relative = path.strip_prefix(workspace_path).unwrap_or(path);
    let file_name = relative.to_string_lossy().replace('\\', "/");
    Some(analyze_source(&text, &file_name))
}

/// `work` をブロッキングスレッドで並列実行する。同時実行数は `semaphore` で制限する
///
/// 結果は `paths` と同じ順序で返す。パニックしたタスクは `None` になる。
async fn run_bounded<T, F>(
    paths: &[PathBuf],
    semaphore: &Arc<Semaphore>,
    work: F,
) -> Vec<(PathBuf, Option<T>)>
where
    T: Send + 'static,
    F: Fn(&Path) -> Option<T> + Clone + Send + 'static,
{
    let tasks = paths.iter().cloned().map(|path| {
        let semaphore = Arc::clone(semaphore);
        let work = work.clone();
        async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (path, None);
            };
            let task_path = path.clone();
            match tokio::task::spawn_blocking(move || work(&task_path)).await {
                Ok(result) => (path, result),
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "Indexing task failed");
                    (path, None)
                }
            }
        }
    });

    futures::future::join_all(tasks).await
}
