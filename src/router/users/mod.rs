//! Users-related HTTP API.

pub mod create;
pub mod delete;
pub mod get;
pub mod update;
