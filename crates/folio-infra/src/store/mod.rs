//! Post record storage.

mod json_file;

pub use json_file::{JsonPostStore, LoadPolicy, StoreOptions};
