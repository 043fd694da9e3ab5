//! Intermediate representation of catalog entries and source usages.

pub mod message;
pub mod tr_call;
