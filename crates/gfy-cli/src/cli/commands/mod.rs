//! CLI command handlers, one per file.

mod cache;
mod check;
mod download;
mod extract;

pub use cache::run_cache_clear;
pub use check::run_check;
pub use download::run_download;
pub use extract::run_extract;
