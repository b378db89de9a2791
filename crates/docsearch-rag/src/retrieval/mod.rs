//! Retrieval over the vector index

mod store;

pub use store::DocumentStore;
