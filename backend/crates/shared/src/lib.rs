//! Shared Kernel
//!
//! Vocabulary shared by every backend crate:
//! - [`error::app_error::AppError`], the HTTP-facing error value
//! - [`error::kind::ErrorKind`], its status classification
//! - [`id::Id`], UUID identifiers tagged by entity type
//!
//! Keep this crate small. Anything domain-specific belongs to the
//! crate that owns the domain.

pub mod error {
    pub mod app_error;
    pub mod kind;
    #[cfg(feature = "axum")]
    pub mod response;
}
pub mod id;
