use chrono::NaiveDateTime;
use poem_openapi::Object;
use sea_orm::FromQueryResult;

/// A back-office user without the password hash; safe to return to clients.
#[derive(FromQueryResult, Object, Debug, Clone)]
pub struct UtilisateurRow {
    pub id_utilisateur: i64,
    pub nom_utilisateur: String,
    pub nom: String,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub role: String,
    pub actif: bool,
    pub derniere_connexion: Option<NaiveDateTime>,
    pub date_creation: NaiveDateTime,
}

/// Columns needed to verify credentials. Never serialized.
#[derive(FromQueryResult, Debug)]
pub struct UtilisateurAuthRow {
    pub id_utilisateur: i64,
    pub nom_utilisateur: String,
    pub mot_de_passe: String,
    pub nom: String,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub role: String,
}
