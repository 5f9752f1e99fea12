//! Listfetch engine: fetch capability, HTTP collaborator and effect execution.
mod controller;
mod decode;
mod fetch;
mod types;

pub use controller::ListController;
pub use decode::decode_results;
pub use fetch::{FetchSettings, PageEndpoint, PageFetcher, ReqwestPageFetcher};
pub use types::{FailureKind, FetchError};
