//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Key-value storage (LocalStorage on web, in-memory elsewhere)
//! - HTTP transport (fetch on web)

pub mod http;
pub mod storage;

pub use http::{HttpRequest, HttpResponse, Method, Transport, TransportError};
pub use storage::{KeyValueStore, MemoryStore, StorageError};

#[cfg(target_arch = "wasm32")]
pub use http::FetchTransport;
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStore;
