// Services layer - stateless domain logic

pub mod credentials;
pub mod export;
pub mod password_rules;
pub mod permissions;
pub mod token_service;

pub use permissions::{Permission, Role};
pub use token_service::TokenService;
