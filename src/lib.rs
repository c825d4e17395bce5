pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod scroll;
pub mod transport;

pub use client::{EsClient, EsCmd, EsResult};
pub use config::{EsConfig, ScrollConfig, DEFAULT_SCROLL_TTL};
pub use error::{Error, Result};
pub use request::SearchRequest;
pub use response::{CatIndicesResponse, Hit, HitsTotal, HitsWrapper, SearchResponse};
pub use scroll::{ScrollProgress, ScrollSession, ScrollStream};
pub use transport::{EsTransport, RawResponse, Transport};
