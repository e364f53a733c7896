//! Uploader for Oversecured mobile app scans
//!
//! Validates a locally built Android or iOS artifact, uploads it through a
//! one-time signed URL and registers it as a new version of an integration.

pub mod api;
pub mod app;
pub mod error;
pub mod models;
pub mod storage;
pub mod validate;

pub use error::{Error, Result};
