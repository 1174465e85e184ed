//! Querypad client: search endpoint access and debounced dispatch.

pub mod dispatch;
pub mod error;
pub mod http;
pub mod source;

pub use dispatch::{Dispatcher, SearchOutcome};
pub use error::{ClientError, Result};
pub use http::HttpClient;
pub use source::{SearchClient, SearchResponse, SuggestionSource};
