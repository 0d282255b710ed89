use chrono::NaiveDateTime;
use sea_orm::FromQueryResult;

/// A notification row joined with its survey and service, when linked.
#[derive(FromQueryResult, Debug, Clone)]
pub struct NotificationRow {
    pub id_notification: i64,
    pub type_notification: String,
    pub titre: String,
    pub message: String,
    pub id_enquete: Option<i64>,
    pub id_utilisateur_destinataire: Option<i64>,
    pub lu: bool,
    pub date_lecture: Option<NaiveDateTime>,
    pub donnees_supplementaires: Option<String>,
    pub date_creation: NaiveDateTime,
    pub nom_visiteur: Option<String>,
    pub prenom_visiteur: Option<String>,
    pub niveau_satisfaction: Option<String>,
    pub nom_service: Option<String>,
}
