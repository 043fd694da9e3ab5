pub mod extractor;
pub mod literal;
pub mod query_loader;
pub mod scope;
pub mod types;
