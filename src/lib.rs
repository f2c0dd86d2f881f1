//! Static web report combiner.
//!
//! Bundles a multi-file static report (HTML, JS, CSS, images, data files)
//! into one self-contained HTML file that opens straight from a file:// URL.

pub mod cli;
pub mod combiner;
pub mod errors;
pub mod inliner;
pub mod models;
pub mod scanner;
pub mod server;
pub mod utils;

pub use combiner::ReportCombiner;
pub use errors::{FuseError, FuseResult};
