// Row models for the hand-written SQL layer.

pub mod enquete;
pub mod notification;
pub mod service;
pub mod session;
pub mod stats;
pub mod utilisateur;
