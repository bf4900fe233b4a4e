// Backend access: REST client, the store seam the workflows depend on,
// and the shared query cache

pub mod cache;
pub mod client;
pub mod errors;
pub mod http_store;
pub mod store;

pub use cache::{QueryCache, QueryKey};
pub use client::{endpoint_url, parse_base_url, ApiClient};
pub use errors::{extract_server_message, ApiError};
pub use http_store::HttpStore;
pub use store::RequestStore;

#[cfg(test)]
pub use store::MockRequestStore;
