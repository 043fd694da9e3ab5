//! `ts-catalog` command line entry point.
#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{
    Path,
    PathBuf,
};
use std::process::ExitCode;

use anyhow::{
    Context,
    Result,
};
use clap::{
    Parser,
    Subcommand,
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use ts_catalog::catalog::{
    Catalog,
    CatalogSet,
};
use ts_catalog::config::{
    ConfigManager,
    Severity,
};
use ts_catalog::diagnostics::generate_diagnostics;
use ts_catalog::export::{
    ExportOptions,
    to_json_string,
};
use ts_catalog::indexer::{
    WorkspaceIndex,
    WorkspaceIndexer,
    build_catalog,
};
use ts_catalog::input::load_ts_file;
use ts_catalog::ir::message::TranslationStatus;

/// Qt Linguist translation catalog tool
#[derive(Debug, Parser)]
#[command(name = "ts-catalog", version, about)]
struct Cli {
    /// Log filter used when `RUST_LOG` is not set
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Settings file (default: `.ts-catalog.json` in the workspace)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// サブコマンド
    #[command(subcommand)]
    command: Command,
}

/// サブコマンド
#[derive(Debug, Subcommand)]
enum Command {
    /// Audit every catalog of a workspace
    Check {
        /// Workspace root
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Print diagnostics as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Resolve one string from a translation file
    Lookup {
        /// `.ts` file
        file: PathBuf,
        /// Context name, e.g. `QObject`
        #[arg(long)]
        context: String,
        /// Source text
        #[arg(long)]
        source: String,
        /// Disambiguation comment
        #[arg(long)]
        comment: Option<String>,
        /// Count for plural messages
        #[arg(long, allow_negative_numbers = true)]
        count: Option<i64>,
        /// Replacement for `%1`, `%2`, ... (repeatable)
        #[arg(long = "arg")]
        args: Vec<String>,
    },
    /// Convert a translation file to JSON
    Export {
        /// `.ts` file
        file: PathBuf,
        /// Output file (default: stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,
        /// Drop `<location>` references
        #[arg(long)]
        no_locations: bool,
    },
    /// Per-language translation coverage of a workspace
    Stats {
        /// Workspace root
        #[arg(default_value = ".")]
        path: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// ログ出力を初期化する
///
/// ファイル出力の場合はプロセス終了までガードを保持する必要がある。
fn init_logging(level: &str, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .with_context(|| format!("Invalid log level '{level}'"))?;

    let Some(path) = log_file else {
        tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
        return Ok(None);
    };

    let directory = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("--log-file must name a file: {}", path.display()))?;
    let appender = tracing_appender::rolling::never(directory, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
    Ok(Some(guard))
}

/// 設定を読み込む。`--config` が優先される
fn load_config(config: Option<&Path>, workspace_root: &Path) -> Result<ConfigManager> {
    let mut manager = ConfigManager::new();
    let root = Some(workspace_root.to_path_buf());
    match config {
        Some(path) => manager
            .load_settings_from_file(path, root)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => manager
            .load_settings(root)
            .with_context(|| format!("Failed to load settings for {}", workspace_root.display()))?,
    }
    tracing::info!(origin = ?manager.origin(), "Settings loaded");
    Ok(manager)
}

/// 単一の `.ts` ファイルからカタログを構築する
fn load_catalog(file: &Path, config: Option<&Path>) -> Result<Catalog> {
    let working_dir = std::env::current_dir().context("Failed to read the current directory")?;
    let manager = load_config(config, &working_dir)?;
    let document = load_ts_file(file)?;
    Ok(build_catalog(manager.get_settings(), [document]))
}

/// ワークスペースを読み込む
async fn load_workspace(
    path: &Path,
    config: Option<&Path>,
) -> Result<(ConfigManager, WorkspaceIndex)> {
    let manager = load_config(config, path)?;
    let index = WorkspaceIndexer::new()
        .index_workspace(path, &manager)
        .await
        .with_context(|| format!("Failed to index {}", path.display()))?;
    Ok((manager, index))
}

/// `check`: 診断を出力し、エラーがあれば失敗を返す
async fn check(path: &Path, json: bool, config: Option<&Path>) -> Result<ExitCode> {
    let (manager, index) = load_workspace(path, config).await?;
    let settings = manager.get_settings();

    let mut errors = 0usize;
    let mut total = 0usize;
    for (_, catalog) in index.catalogs.iter() {
        for diagnostic in generate_diagnostics(catalog, index.usages(), &settings.diagnostics) {
            total += 1;
            if diagnostic.severity == Severity::Error {
                errors += 1;
            }
            if json {
                println!("{}", serde_json::to_string(&diagnostic)?);
            } else {
                println!("{diagnostic}");
            }
        }
    }

    eprintln!(
        "{} catalog(s), {} source file(s), {total} diagnostic(s), {errors} error(s)",
        index.catalogs.len(),
        index.source_files.len()
    );
    Ok(if errors > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

/// `stats`: 言語ごとのカバレッジを出力する
fn print_stats(catalogs: &CatalogSet, json: bool) -> Result<()> {
    let report = catalogs.coverage();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} key(s) across {} language(s)", report.total_keys, report.languages.len());
    for language in &report.languages {
        let unfinished = catalogs.get(&language.language).map_or(0, |catalog| {
            catalog
                .entries()
                .iter()
                .filter(|m| m.status == TranslationStatus::Unfinished)
                .count()
        });
        println!(
            "{:<8} {:>5}/{} translated ({}%), {unfinished} unfinished",
            language.language, language.translated, report.total_keys, language.percent
        );
    }
    Ok(())
}

/// サブコマンドを実行する
async fn run(cli: Cli) -> Result<ExitCode> {
    let config = cli.config.as_deref();
    match cli.command {
        Command::Check { path, json } => check(&path, json, config).await,
        Command::Lookup { file, context, source, comment, count, args } => {
            let catalog = load_catalog(&file, config)?;
            let args: Vec<&str> = args.iter().map(String::as_str).collect();
            let comment = comment.as_deref();
            let text = match count {
                Some(count) => catalog.format_plural(&context, &source, comment, count, &args),
                None => catalog.format(&context, &source, comment, &args),
            };
            println!("{text}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Export { file, output, no_locations } => {
            let catalog = load_catalog(&file, config)?;
            let json = to_json_string(&catalog, ExportOptions { include_locations: !no_locations })?;
            match output {
                Some(output) => std::fs::write(&output, json + "\n")
                    .with_context(|| format!("Failed to write {}", output.display()))?,
                None => println!("{json}"),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Stats { path, json } => {
            let (_, index) = load_workspace(&path, config).await?;
            print_stats(&index.catalogs, json)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match init_logging(&cli.log_level, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(error) => {
            eprintln!("error: {error:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(code) => code,
        Err(error) => {
            tracing::error!("{error:#}");
            eprintln!("error: {error:#}");
            ExitCode::FAILURE
        }
    }
}
