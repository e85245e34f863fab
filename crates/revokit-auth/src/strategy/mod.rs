//! Request context, token extraction and lifecycle hooks.

pub mod context;
pub mod extract;
pub mod hooks;

pub use context::AuthContext;
pub use extract::{BearerExtractor, CookieExtractor, FormExtractor, TokenExtractor};
pub use hooks::{ClaimsHook, RefreshCheck, UpdateHook};
