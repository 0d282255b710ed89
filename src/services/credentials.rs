use argon2::password_hash::{rand_core::OsRng, Error as HashError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{Duration, NaiveDateTime, Utc};
use rand::prelude::*;

use crate::errors::InternalError;

/// Hash a password with Argon2id. Deliberately slow.
pub fn hacher_mot_de_passe(mot_de_passe: &str) -> Result<String, InternalError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(mot_de_passe.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| InternalError::crypto("hacher_mot_de_passe", e.to_string()))
}

/// Verify a password against a stored hash.
///
/// Returns `Ok(false)` on a simple mismatch; errors only when the stored
/// hash is malformed or the verifier itself fails.
pub fn verifier_mot_de_passe(mot_de_passe: &str, hash: &str) -> Result<bool, InternalError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| InternalError::crypto("verifier_mot_de_passe", e.to_string()))?;

    match Argon2::default().verify_password(mot_de_passe.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(HashError::Password) => Ok(false),
        Err(e) => Err(InternalError::crypto("verifier_mot_de_passe", e.to_string())),
    }
}

/// Opaque session id: 32 cryptographically random bytes, URL-safe base64.
pub fn generer_id_session() -> String {
    let mut rng = rand::rng();
    let octets: [u8; 32] = rng.random();
    format!("session_{}", URL_SAFE_NO_PAD.encode(octets))
}

/// Expiry for a session created now.
pub fn expiration_session(duree_heures: i64) -> NaiveDateTime {
    (Utc::now() + Duration::hours(duree_heures)).naive_utc()
}

/// A session whose expiry is in the past is treated as absent even if the
/// row has not been purged yet.
pub fn session_expiree(date_expiration: NaiveDateTime) -> bool {
    date_expiration < Utc::now().naive_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hachage_et_verification() {
        let hash = hacher_mot_de_passe("Gbodolou28@").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verifier_mot_de_passe("Gbodolou28@", &hash).unwrap());
        assert!(!verifier_mot_de_passe("mauvais", &hash).unwrap());
    }

    #[test]
    fn hash_malforme_est_une_erreur_pas_un_refus() {
        let err = verifier_mot_de_passe("x", "pas-un-hash").unwrap_err();
        assert!(matches!(err, InternalError::Crypto { .. }));
    }

    #[test]
    fn ids_de_session_sont_uniques_et_opaques() {
        let a = generer_id_session();
        let b = generer_id_session();
        assert_ne!(a, b);
        assert!(a.starts_with("session_"));
        // 32 bytes of entropy, not a timestamp.
        assert!(a.len() > 40);
    }

    #[test]
    fn expiration_dans_le_futur() {
        let expiration = expiration_session(24);
        assert!(!session_expiree(expiration));
        assert!(session_expiree(Utc::now().naive_utc() - Duration::hours(1)));
    }
}
