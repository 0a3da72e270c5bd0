//! Scenario persistence
//!
//! Scenarios travel inside a URL query parameter:
//! - Compact JSON with one/two-letter field names
//! - Punctuation swapped for letters so the code survives URL encoding
//! - Non-finite values rejected on both ends

pub mod link;
pub mod scenario;

pub use link::{QUERY_PARAM, code_from_query, decode, encode, share_url};
pub use scenario::{MovilSpec, Scenario};
