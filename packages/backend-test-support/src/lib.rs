//! Shared helpers for the backend's unit and integration tests.

pub mod error_body;
pub mod logging;
pub mod unique_helpers;
