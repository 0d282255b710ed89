use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::errors::InternalError;
use crate::services::Role;
use crate::types::internal::{Claims, IdentiteUtilisateur, Principal};

/// Subject claim of the virtual SuperAdmin principal.
pub const SUJET_SUPERADMIN: &str = "superadmin";

/// Issues and validates the signed HS256 tokens carried by the back office.
pub struct TokenService {
    secret: String,
    duree_heures: i64,
}

impl TokenService {
    pub fn new(secret: String, duree_heures: i64) -> Self {
        Self { secret, duree_heures }
    }

    /// Issue a token for an authenticated principal.
    pub fn generer(&self, principal: &Principal) -> Result<String, InternalError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: principal
                .id_utilisateur()
                .map(|id| id.to_string())
                .unwrap_or_else(|| SUJET_SUPERADMIN.to_string()),
            nom_utilisateur: principal.nom_utilisateur().to_string(),
            role: principal.role().as_str().to_string(),
            nom: match principal {
                Principal::Utilisateur(identite) => identite.nom.clone(),
                Principal::SuperAdmin { .. } => "Super".to_string(),
            },
            prenom: match principal {
                Principal::Utilisateur(identite) => identite.prenom.clone(),
                Principal::SuperAdmin { .. } => Some("Admin".to_string()),
            },
            exp: now + self.duree_heures * 3600,
            iat: now,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| InternalError::crypto("generer_token", e.to_string()))
    }

    /// Verify signature and expiry.
    ///
    /// Expiry is reported as [`InternalError::TokenExpire`], distinct from
    /// every other failure, so callers can prompt a silent re-login instead
    /// of a hard error.
    pub fn valider(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => InternalError::TokenExpire,
            _ => InternalError::TokenInvalide,
        })
    }

    /// Rebuild the request principal from validated claims.
    pub fn principal_depuis_claims(&self, claims: &Claims) -> Result<Principal, InternalError> {
        let role = Role::depuis_contrat(&claims.role).ok_or(InternalError::TokenInvalide)?;

        if claims.sub == SUJET_SUPERADMIN {
            return Ok(Principal::SuperAdmin {
                nom_utilisateur: claims.nom_utilisateur.clone(),
                role,
            });
        }

        let id_utilisateur: i64 = claims.sub.parse().map_err(|_| InternalError::TokenInvalide)?;
        Ok(Principal::Utilisateur(IdentiteUtilisateur {
            id_utilisateur,
            nom_utilisateur: claims.nom_utilisateur.clone(),
            nom: claims.nom.clone(),
            prenom: claims.prenom.clone(),
            email: None,
            role,
        }))
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("secret", &"<redacted>")
            .field("duree_heures", &self.duree_heures)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("secret-de-test-au-moins-32-caracteres".to_string(), 24)
    }

    fn identite() -> Principal {
        Principal::Utilisateur(IdentiteUtilisateur {
            id_utilisateur: 7,
            nom_utilisateur: "zadjehi".to_string(),
            nom: "Zadjehi".to_string(),
            prenom: Some("Eric".to_string()),
            email: None,
            role: Role::Administrateur,
        })
    }

    #[test]
    fn aller_retour_conserve_identite_et_role() {
        let service = service();
        let token = service.generer(&identite()).unwrap();
        let claims = service.valider(&token).unwrap();

        assert_eq!(claims.sub, "7");
        assert_eq!(claims.nom_utilisateur, "zadjehi");
        assert_eq!(claims.role, "Administrateur");
        assert_eq!(claims.exp - claims.iat, 24 * 3600);

        let principal = service.principal_depuis_claims(&claims).unwrap();
        assert_eq!(principal.id_utilisateur(), Some(7));
        assert_eq!(principal.role(), Role::Administrateur);
    }

    #[test]
    fn token_superadmin_redevient_principal_virtuel() {
        let service = service();
        let principal = Principal::SuperAdmin {
            nom_utilisateur: "root.admin".to_string(),
            role: Role::SuperAdmin,
        };
        let token = service.generer(&principal).unwrap();
        let claims = service.valider(&token).unwrap();
        assert_eq!(claims.sub, SUJET_SUPERADMIN);

        let relu = service.principal_depuis_claims(&claims).unwrap();
        assert!(relu.est_superadmin());
        assert_eq!(relu.id_utilisateur(), None);
    }

    #[test]
    fn expiration_est_distinguee_de_l_invalide() {
        let service = TokenService::new("secret-de-test-au-moins-32-caracteres".to_string(), -1);
        let token = service.generer(&identite()).unwrap();
        assert!(matches!(
            service.valider(&token).unwrap_err(),
            InternalError::TokenExpire
        ));

        let autre = TokenService::new("un-autre-secret-completement-different".to_string(), 24);
        let token_valide = TokenService::new(
            "secret-de-test-au-moins-32-caracteres".to_string(),
            24,
        )
        .generer(&identite())
        .unwrap();
        assert!(matches!(
            autre.valider(&token_valide).unwrap_err(),
            InternalError::TokenInvalide
        ));
    }

    #[test]
    fn role_inconnu_dans_les_claims_est_invalide() {
        let service = service();
        let token = service.generer(&identite()).unwrap();
        let mut claims = service.valider(&token).unwrap();
        claims.role = "Stagiaire".to_string();
        assert!(matches!(
            service.principal_depuis_claims(&claims).unwrap_err(),
            InternalError::TokenInvalide
        ));
    }
}
