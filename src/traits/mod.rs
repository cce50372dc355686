//! Core trait abstractions: fetching, model invocation, and storage.

pub mod fetcher;
pub mod model;
pub mod store;

pub use fetcher::Fetcher;
pub use model::Model;
pub use store::{DocumentStore, TextCache};
