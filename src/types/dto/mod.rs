// Request/response shapes. JSON field names are the client contract.

pub mod auth;
pub mod common;
pub mod enquetes;
pub mod notifications;
pub mod stats;

pub use common::{Enveloppe, EnveloppeVide, PaginationDto};
