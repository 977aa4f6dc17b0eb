//! Shared types for the fieldloom workspace: error enum, request
//! configuration, the retry helper, and the output row handed to the store.

pub mod config;
pub mod error;
pub mod retry;
pub mod row;

pub use config::{EmbedRequest, StoreTarget};
pub use error::{Error, Result};
pub use row::OutputRow;
