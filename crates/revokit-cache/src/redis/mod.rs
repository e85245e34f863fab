//! Redis revocation store.

pub mod store;

pub use store::RedisRevocationStore;
