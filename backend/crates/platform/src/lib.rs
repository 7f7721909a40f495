//! Platform Crate - Technical Infrastructure
//!
//! Building blocks with no business rules of their own:
//! - Password policy and bcrypt hashing (`password`)
//! - HS256 signed, expiring tokens (`token`)
//! - Injectable time source (`clock`)
//! - Cookie and client-address helpers for HTTP handlers
//! - Fixed-window rate limiting

pub mod client;
pub mod clock;
pub mod cookie;
pub mod password;
pub mod rate_limit;
pub mod token;
