use chrono::NaiveDateTime;
use poem_openapi::Object;
use sea_orm::FromQueryResult;

/// A survey row with its service name joined in. Column names follow the
/// persisted schema; they are the read-side contract of the API.
#[derive(FromQueryResult, Object, Debug, Clone)]
pub struct EnqueteRow {
    pub id_enquete: i64,
    pub date_heure_visite: NaiveDateTime,
    pub nom_visiteur: String,
    pub prenom_visiteur: Option<String>,
    pub telephone: String,
    pub email: Option<String>,
    pub raison_presence: String,
    pub niveau_satisfaction: String,
    pub id_service: i64,
    pub commentaires: Option<String>,
    pub recommandations: Option<String>,
    pub date_soumission: NaiveDateTime,
    pub nom_service: Option<String>,
    pub description_service: Option<String>,
}

/// Flat export row, including submission metadata.
#[derive(FromQueryResult, Debug, Clone)]
pub struct EnqueteExportRow {
    pub id_enquete: i64,
    pub date_heure_visite: NaiveDateTime,
    pub nom_visiteur: String,
    pub prenom_visiteur: Option<String>,
    pub telephone: String,
    pub email: Option<String>,
    pub raison_presence: String,
    pub niveau_satisfaction: String,
    pub commentaires: Option<String>,
    pub recommandations: Option<String>,
    pub date_soumission: NaiveDateTime,
    pub adresse_ip: Option<String>,
    pub nom_service: Option<String>,
}
