//! Remote content: the application source and the bootstrap script.
//!
//! - [`git`] - Clean shallow clone of the application repository
//! - [`http`] - HTTP downloads

pub mod git;
pub mod http;

pub use git::SourceFetcher;
pub use http::{Downloader, HttpFetcher};
