//! Types for the analyzer module

use std::str::FromStr;

use thiserror::Error;

/// Tree-sitter クエリで使用するキャプチャ名
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureName {
    /// 関数呼び出し全体 (e.g., `tr("Trash")`)
    Call,
    /// 呼び出し先の式 (e.g., `tr`, `QObject::tr`, `qApp->translate`)
    Function,
    /// 引数リスト全体
    Args,
}

impl CaptureName {
    /// Tree-sitter クエリで使用する文字列表現を取得
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Call => "qt.call",
            Self::Function => "qt.function",
            Self::Args => "qt.args",
        }
    }
}

/// 文字列から `CaptureName` への変換エラー
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseCaptureNameError;

impl FromStr for CaptureName {
    type Err = ParseCaptureNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "qt.call" => Ok(Self::Call),
            "qt.function" => Ok(Self::Function),
            "qt.args" => Ok(Self::Args),
            _ => Err(ParseCaptureNameError),
        }
    }
}

/// Qt の翻訳関数・マクロの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrFunction {
    /// `tr(source, comment, n)`
    Tr {
        /// `Class::tr` のように明示されたクラス名を使うか
        explicit_context: bool,
    },
    /// `QCoreApplication::translate(context, source, comment, n)`
    Translate,
    /// `QT_TR_NOOP(source)` / `QT_TR_N_NOOP(source)`
    TrNoop {
        /// 複数形マクロか
        numerus: bool,
    },
    /// `QT_TRANSLATE_NOOP(context, source)` and its `3` / `_N_` variants
    TranslateNoop {
        /// 第 3 引数がコメントか
        with_comment: bool,
        /// 複数形マクロか
        numerus: bool,
    },
}

/// Receivers on which `translate` is Qt's translation function.
const TRANSLATE_RECEIVERS: &[&str] = &["QCoreApplication", "QApplication", "QGuiApplication", "qApp"];

impl TrFunction {
    /// Classifies a callee such as `tr`, `dfmbase::DialogManager::tr` or `qApp->translate`.
    ///
    /// Returns the function kind and the class qualifier written before `::`.
    #[must_use]
    pub fn from_callee(callee: &str) -> Option<(Self, Option<&str>)> {
        let (qualifier, separator, name) = split_callee(callee);
        let static_qualifier = qualifier.filter(|_| separator == "::");

        let function = match name {
            "tr" | "trUtf8" => Self::Tr { explicit_context: static_qualifier.is_some() },
            "translate" => {
                let receiver = qualifier?.rsplit("::").next()?;
                if !TRANSLATE_RECEIVERS.contains(&receiver) {
                    return None;
                }
                Self::Translate
            }
            "QT_TR_NOOP" | "QT_TR_NOOP_UTF8" if qualifier.is_none() => {
                Self::TrNoop { numerus: false }
            }
            "QT_TR_N_NOOP" if qualifier.is_none() => Self::TrNoop { numerus: true },
            "QT_TRANSLATE_NOOP" | "QT_TRANSLATE_NOOP_UTF8" if qualifier.is_none() => {
                Self::TranslateNoop { with_comment: false, numerus: false }
            }
            "QT_TRANSLATE_NOOP3" | "QT_TRANSLATE_NOOP3_UTF8" if qualifier.is_none() => {
                Self::TranslateNoop { with_comment: true, numerus: false }
            }
            "QT_TRANSLATE_N_NOOP" if qualifier.is_none() => {
                Self::TranslateNoop { with_comment: false, numerus: true }
            }
            "QT_TRANSLATE_N_NOOP3" if qualifier.is_none() => {
                Self::TranslateNoop { with_comment: true, numerus: true }
            }
            _ => return None,
        };
        Some((function, static_qualifier.map(|q| q.trim_start_matches("::"))))
    }
}

/// Splits at the last `::`, `->` or `.`: `(qualifier, separator, name)`.
fn split_callee(callee: &str) -> (Option<&str>, &'static str, &str) {
    ["::", "->", "."]
        .into_iter()
        .filter_map(|separator| callee.rfind(separator).map(|index| (index, separator)))
        .max_by_key(|(index, _)| *index)
        .and_then(|(index, separator)| {
            let qualifier = callee.get(..index)?;
            let name = callee.get(index + separator.len()..)?;
            Some((Some(qualifier), separator, name))
        })
        .unwrap_or((None, "", callee))
}

/// Defines errors that may occur during the analysis process
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Error when failing to set the language for the parser
    #[error("Failed to set language for parser: {0}")]
    LanguageSetup(#[from] tree_sitter::LanguageError),
    /// Error when failing to parse source code
    #[error("Failed to parse source code")]
    ParseFailed,
}
