//! Browser adapters for the session core: `localStorage` and `fetch`.
pub mod http;
pub mod storage;
