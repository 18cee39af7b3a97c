//! Response cache for outbound requests.
//!
//! Every external call is identified by a canonical key built from its
//! endpoint and query parameters. Responses are kept in a JSON file that is
//! rewritten after every miss and never expires:
//!
//! - [`build_key`] / [`RequestSignature`] derive the key
//! - [`CacheStore`] loads and saves the backing file

pub mod key;
pub mod store;

pub use key::{RequestSignature, build_key};
pub use store::{CacheMap, CacheStore};
