//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use crate::catalog::Catalog;
use crate::input::parse_ts;
use crate::ir::message::{
    Message,
    MessageKey,
    Translation,
};

/// ファイルマネージャーのポーランド語カタログの抜粋
///
/// 相対 location、コメントによる曖昧性解消、numerus、未完了、vanished を含む。
pub(crate) const POLISH_TS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!DOCTYPE TS>
<TS version="2.1" language="pl" sourcelanguage="en">
<context>
    <name>QObject</name>
    <message>
        <location filename="../../src/dfm-base/base/device/deviceutils.cpp" line="120"/>
        <source>%1 Volume</source>
        <translation>Wolumin %1</translation>
    </message>
    <message>
        <location filename="../../src/plugins/filemanager/dfmplugin-trash/utils/trashmanager.cpp" line="151"/>
        <location line="+10"/>
        <source>Trash</source>
        <translation>Kosz</translation>
    </message>
</context>
<context>
    <name>dfmbase::DialogManager</name>
    <message>
        <source>Cancel</source>
        <comment>button</comment>
        <translation>Anuluj</translation>
    </message>
    <message>
        <source>Cancel</source>
        <translation>Anulowanie</translation>
    </message>
    <message numerus="yes">
        <source>%n file(s) selected</source>
        <extracomment>status bar</extracomment>
        <translation>
            <numerusform>%n plik zaznaczony</numerusform>
            <numerusform>%n pliki zaznaczone</numerusform>
            <numerusform>%n plików zaznaczonych</numerusform>
        </translation>
    </message>
    <message>
        <source>Delete &quot;%1&quot;?</source>
        <translatorcomment>keep quotes</translatorcomment>
        <translation type="unfinished"></translation>
    </message>
    <message>
        <source>Removed feature</source>
        <translation type="vanished">Usunięta funkcja</translation>
    </message>
</context>
</TS>
"#;

/// テスト用の単数形メッセージを作成する
///
/// # Arguments
/// * `context` - コンテキスト名（例: "QObject"）
/// * `source` - 原文
/// * `comment` - 曖昧性解消コメント
/// * `translation` - 訳文
pub(crate) fn message(
    context: &str,
    source: &str,
    comment: Option<&str>,
    translation: &str,
) -> Message {
    Message::new(
        MessageKey::new(context, source, comment),
        Translation::Single(translation.to_string()),
    )
}

/// [`POLISH_TS`] から構築したカタログ
pub(crate) fn polish_catalog() -> Catalog {
    Catalog::builder().document(parse_ts(POLISH_TS).unwrap()).build()
}
