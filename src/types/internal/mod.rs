mod principal;

pub use principal::{Claims, IdentiteUtilisateur, Principal};
