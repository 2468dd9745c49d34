//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`batches`] — Batch export (file upload and JSON array)
//! - [`system`] — Health and OpenAPI

mod batches;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use batches::*;
pub use system::*;

/// Header carrying the number of image columns in an exported CSV
pub const IMAGE_COLUMNS_HEADER: &str = "x-image-columns";
