use serde::{Deserialize, Serialize};

use crate::services::Role;

/// JWT claims. Field names are part of the token contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id as a string, or the literal `"superadmin"` for the virtual
    /// account.
    pub sub: String,
    #[serde(rename = "nomUtilisateur")]
    pub nom_utilisateur: String,
    pub role: String,
    pub nom: String,
    pub prenom: Option<String>,
    pub exp: i64,
    pub iat: i64,
}

/// A database-backed back-office user.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentiteUtilisateur {
    pub id_utilisateur: i64,
    pub nom_utilisateur: String,
    pub nom: String,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub role: Role,
}

/// The authenticated caller attached to a request.
///
/// SuperAdmin is a configuration-defined principal with no database row; a
/// distinct variant keeps it out of foreign-key joins by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum Principal {
    Utilisateur(IdentiteUtilisateur),
    SuperAdmin { nom_utilisateur: String, role: Role },
}

impl Principal {
    pub fn role(&self) -> Role {
        match self {
            Principal::Utilisateur(identite) => identite.role,
            Principal::SuperAdmin { role, .. } => *role,
        }
    }

    pub fn nom_utilisateur(&self) -> &str {
        match self {
            Principal::Utilisateur(identite) => &identite.nom_utilisateur,
            Principal::SuperAdmin { nom_utilisateur, .. } => nom_utilisateur,
        }
    }

    /// Id usable for audit rows and notification targeting; `None` for the
    /// virtual SuperAdmin account.
    pub fn id_utilisateur(&self) -> Option<i64> {
        match self {
            Principal::Utilisateur(identite) => Some(identite.id_utilisateur),
            Principal::SuperAdmin { .. } => None,
        }
    }

    pub fn est_superadmin(&self) -> bool {
        matches!(self, Principal::SuperAdmin { .. })
    }
}
