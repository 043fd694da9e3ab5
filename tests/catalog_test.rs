//! ポーランド語カタログを使った読み込みと翻訳解決のテスト

#![allow(clippy::unwrap_used)]
#![allow(clippy::indexing_slicing)]
#![allow(missing_docs)]

use std::path::Path;

use pretty_assertions::assert_eq;
use ts_catalog::catalog::{
    Catalog,
    CatalogSet,
};
use ts_catalog::config::DiagnosticsConfig;
use ts_catalog::diagnostics::{
    DiagnosticKind,
    generate_diagnostics,
};
use ts_catalog::format::{
    PlaceholderIssue,
    PlaceholderKind,
    check_placeholders,
};
use ts_catalog::input::load_ts_file;
use ts_catalog::ir::message::TranslationStatus;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/dde-file-manager_pl.ts");

fn polish() -> Catalog {
    Catalog::builder().document(load_ts_file(Path::new(FIXTURE)).unwrap()).build()
}

#[test]
fn test_fixture_loads_with_metadata() {
    let document = load_ts_file(Path::new(FIXTURE)).unwrap();

    assert_eq!(document.language.as_deref(), Some("pl"));
    assert_eq!(document.source_language.as_deref(), Some("en"));
    assert_eq!(document.contexts.len(), 2);
    assert_eq!(document.message_count(), 13);
    assert!(document.issues.is_empty());
}

#[test]
fn test_every_finished_entry_resolves_to_its_translation() {
    let catalog = polish();

    let finished: Vec<_> = catalog
        .entries()
        .iter()
        .filter(|m| m.status == TranslationStatus::Finished)
        .collect();
    assert_eq!(finished.len(), 9);

    for entry in finished {
        let key = &entry.key;
        assert_eq!(catalog.get(key), Some(entry));
        assert_eq!(
            catalog.translate(&key.context, &key.source, key.comment.as_deref()),
            entry.translation.primary()
        );
    }
}

#[test]
fn test_unknown_key_returns_source_text() {
    let catalog = polish();

    assert_eq!(catalog.translate("QObject", "Recent", None), "Recent");
    assert_eq!(catalog.translate("dfmbase::NoSuchClass", "Trash", None), "Trash");
    assert_eq!(
        catalog.translate(
            "dfmbase::DialogManager",
            "This file is not executable, do you want to add the execute permission and run?",
            None
        ),
        "This file is not executable, do you want to add the execute permission and run?"
    );
    // 廃止されたエントリは使われない
    assert_eq!(catalog.translate("dfmbase::DialogManager", "Burn", None), "Burn");
}

#[test]
fn test_format_substitutes_arguments() {
    let catalog = polish();

    assert_eq!(catalog.format("QObject", "%1 Volume", None, &["USB"]), "Wolumin USB");
    assert_eq!(catalog.format("QObject", "%1 of %2", None, &["3", "10"]), "3 z 10");
    assert_eq!(catalog.format("QObject", "Blank %1 Disc", None, &["DVD"]), "Pusty dysk DVD");
}

#[test]
fn test_comment_disambiguates() {
    let catalog = polish();
    let context = "dfmbase::DialogManager";

    assert_eq!(catalog.translate(context, "Cancel", Some("button")), "Anuluj");
    assert_eq!(catalog.translate(context, "Cancel", None), "Anulowanie");
    // コメントが一致しなければコメントなしのエントリを使う
    assert_eq!(catalog.translate(context, "Cancel", Some("menu")), "Anulowanie");
    // コメントなしのエントリがなければ原文
    assert_eq!(catalog.translate(context, "Confirm", None), "Confirm");
}

#[test]
fn test_plural_forms() {
    let catalog = polish();
    let plural = |count| {
        catalog.translate_plural(
            "dfmbase::DialogManager",
            "Permanently delete %n file(s)?",
            None,
            count,
        )
    };

    assert_eq!(plural(1), "Trwale usunąć 1 plik?");
    assert_eq!(plural(3), "Trwale usunąć 3 pliki?");
    assert_eq!(plural(12), "Trwale usunąć 12 plików?");
    assert_eq!(plural(22), "Trwale usunąć 22 pliki?");
    assert_eq!(plural(25), "Trwale usunąć 25 plików?");
}

#[test]
fn test_unfinished_translations_follow_builder_flag() {
    let source = "Do you want to run %1 or display its content?";
    let shown = polish();
    let hidden = Catalog::builder()
        .use_unfinished(false)
        .document(load_ts_file(Path::new(FIXTURE)).unwrap())
        .build();

    assert_eq!(
        shown.format("dfmbase::DialogManager", source, None, &["run.sh"]),
        "Czy chcesz uruchomić run.sh lub wyświetlić jego zawartość?"
    );
    assert_eq!(
        hidden.format("dfmbase::DialogManager", source, None, &["run.sh"]),
        "Do you want to run run.sh or display its content?"
    );
}

#[test]
fn test_missing_placeholder_is_flagged() {
    assert_eq!(
        check_placeholders("%1 Volume", "Wolumin"),
        vec![PlaceholderIssue::Missing(PlaceholderKind::Arg(1))]
    );
    assert!(check_placeholders("%1 Volume", "Wolumin %1").is_empty());
}

#[test]
fn test_fixture_diagnostics() {
    let diagnostics = generate_diagnostics(&polish(), None, &DiagnosticsConfig::default());

    let kinds: Vec<(&DiagnosticKind, &str)> = diagnostics
        .iter()
        .map(|d| (&d.kind, d.key.as_ref().map_or("", |k| k.source.as_str())))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (&DiagnosticKind::Unfinished, "Do you want to run %1 or display its content?"),
            (
                &DiagnosticKind::Unfinished,
                "This file is not executable, do you want to add the execute permission and run?"
            ),
        ]
    );
    assert_eq!(
        diagnostics[0].location.as_ref().map(ToString::to_string).as_deref(),
        Some("../src/dfm-base/dialogs/dialogmanager.cpp:402")
    );
}

#[test]
fn test_catalog_set_falls_back_to_base_language() {
    let mut set = CatalogSet::new();
    set.insert(polish());

    assert_eq!(set.translate("pl_PL", "QObject", "Trash", None), "Kosz");
    assert_eq!(set.translate("de", "QObject", "Trash", None), "Trash");

    let report = set.coverage();
    assert_eq!(report.total_keys, 11);
    assert_eq!(report.languages[0].translated, 10);
}
