use chrono::NaiveDateTime;
use sea_orm::FromQueryResult;

/// A session row joined with its owning user, as loaded on every
/// authenticated request carrying `x-session-id`.
#[derive(FromQueryResult, Debug)]
pub struct SessionUtilisateurRow {
    pub id_session: String,
    pub donnees_session: Option<String>,
    pub date_expiration: NaiveDateTime,
    pub id_utilisateur: i64,
    pub nom_utilisateur: String,
    pub nom: String,
    pub prenom: Option<String>,
    pub email: Option<String>,
    pub role: String,
    pub actif: bool,
}
