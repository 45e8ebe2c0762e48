//! API key handling and tenant-token signing.

pub mod api_key;
pub mod tenant_token;

pub use api_key::*;
pub use tenant_token::*;
