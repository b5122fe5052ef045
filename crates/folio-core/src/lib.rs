//! # Folio Core
//!
//! The domain layer of the Folio post store.
//! Posts, the persisted collection and its id counter, and the ports the
//! infrastructure crate implements. No I/O happens here.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{AssetError, StoreError};
