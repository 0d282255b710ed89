use chrono::NaiveDateTime;
use poem_openapi::Object;

use crate::types::internal::Principal;

/// Authenticated user as exposed to clients. The password hash never
/// crosses this boundary.
#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct UtilisateurDto {
    /// Numeric id rendered as text so the environment-defined account can
    /// use the literal `superadmin`.
    pub id: String,
    pub nom_utilisateur: String,
    pub nom: String,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub role: String,
}

impl From<&Principal> for UtilisateurDto {
    fn from(principal: &Principal) -> Self {
        match principal {
            Principal::Utilisateur(identite) => Self {
                id: identite.id_utilisateur.to_string(),
                nom_utilisateur: identite.nom_utilisateur.clone(),
                nom: identite.nom.clone(),
                prenom: identite.prenom.clone(),
                email: identite.email.clone(),
                role: identite.role.as_str().to_owned(),
            },
            Principal::SuperAdmin { nom_utilisateur, role } => Self {
                id: "superadmin".to_owned(),
                nom_utilisateur: nom_utilisateur.clone(),
                nom: "Super".to_owned(),
                prenom: Some("Admin".to_owned()),
                email: None,
                role: role.as_str().to_owned(),
            },
        }
    }
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct ConnexionRequete {
    pub nom_utilisateur: String,
    pub mot_de_passe: String,
}

#[derive(Object, Debug)]
pub struct ConnexionData {
    pub utilisateur: UtilisateurDto,
    pub token: String,
    /// Opaque session id, absent for the environment-defined account.
    pub session: Option<String>,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct StatutData {
    pub utilisateur: UtilisateurDto,
    pub derniere_connexion: Option<NaiveDateTime>,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct ChangerMotDePasseRequete {
    pub ancien_mot_de_passe: String,
    pub nouveau_mot_de_passe: String,
    pub confirmer_mot_de_passe: String,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct CreerUtilisateurRequete {
    pub nom_utilisateur: String,
    pub mot_de_passe: String,
    pub nom: String,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub role: String,
}

#[derive(Object, Debug, Default)]
#[oai(rename_all = "camelCase")]
pub struct MajUtilisateurRequete {
    pub nom: Option<String>,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub actif: Option<bool>,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct CreationUtilisateurData {
    pub id_utilisateur: i64,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct NettoyageSessionsData {
    pub sessions_supprimees: u64,
}
