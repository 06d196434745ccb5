//! Persistence layer (JSON document on disk).

pub mod json_store;

pub use json_store::ActivityStore;
