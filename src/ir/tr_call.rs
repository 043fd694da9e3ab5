//! ソースコード内の翻訳呼び出し箇所

use serde::{
    Deserialize,
    Serialize,
};

use crate::ir::message::MessageKey;
use crate::types::SourceLocation;

/// A `tr()`-style call found in application code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrCall {
    /// Context name; empty when the enclosing class could not be determined.
    pub context: String,
    pub source: String,
    pub comment: Option<String>,
    /// True when the call passes a count argument.
    pub numerus: bool,
    pub location: SourceLocation,
}

impl TrCall {
    /// The catalog key this call resolves against.
    #[must_use]
    pub fn key(&self) -> MessageKey {
        MessageKey::new(self.context.clone(), self.source.clone(), self.comment.as_deref())
    }
}
