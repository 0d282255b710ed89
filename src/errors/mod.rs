// Errors layer - Error type definitions

pub mod api;
pub mod internal;

pub use api::ErreurApi;
pub use internal::InternalError;
