use chrono::NaiveDateTime;
use poem_openapi::Object;

use crate::types::db::notification::NotificationRow;
use crate::types::dto::common::PaginationDto;

/// Notification as served to the back office. The stored JSON side
/// channel is parsed here so clients never see a raw string.
#[derive(Object, Debug, Clone)]
pub struct NotificationDto {
    pub id_notification: i64,
    pub type_notification: String,
    pub titre: String,
    pub message: String,
    pub id_enquete: Option<i64>,
    pub id_utilisateur_destinataire: Option<i64>,
    pub lu: bool,
    pub date_lecture: Option<NaiveDateTime>,
    pub donnees_supplementaires: Option<serde_json::Value>,
    pub date_creation: NaiveDateTime,
    pub nom_visiteur: Option<String>,
    pub prenom_visiteur: Option<String>,
    pub niveau_satisfaction: Option<String>,
    pub nom_service: Option<String>,
}

impl From<NotificationRow> for NotificationDto {
    fn from(row: NotificationRow) -> Self {
        let donnees_supplementaires = row
            .donnees_supplementaires
            .as_deref()
            .and_then(|brut| serde_json::from_str(brut).ok());
        Self {
            id_notification: row.id_notification,
            type_notification: row.type_notification,
            titre: row.titre,
            message: row.message,
            id_enquete: row.id_enquete,
            id_utilisateur_destinataire: row.id_utilisateur_destinataire,
            lu: row.lu,
            date_lecture: row.date_lecture,
            donnees_supplementaires,
            date_creation: row.date_creation,
            nom_visiteur: row.nom_visiteur,
            prenom_visiteur: row.prenom_visiteur,
            niveau_satisfaction: row.niveau_satisfaction,
            nom_service: row.nom_service,
        }
    }
}

#[derive(Object, Debug)]
pub struct ListeNotifications {
    pub notifications: Vec<NotificationDto>,
}

#[derive(Object, Debug)]
pub struct HistoriqueNotifications {
    pub notifications: Vec<NotificationDto>,
    pub pagination: PaginationDto,
}

#[derive(Object, Debug)]
pub struct CompteurNonLues {
    pub total: i64,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct MarquageData {
    pub nombre_marquees: u64,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct CreerNotificationRequete {
    #[oai(rename = "type")]
    pub type_notification: Option<String>,
    pub titre: String,
    pub message: String,
    pub id_utilisateur_destinataire: Option<i64>,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct CreationNotificationData {
    pub id_notification: i64,
}

/// Incremental poll payload: everything newer than the client's cursor.
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct MisesAJourData {
    pub notifications: Vec<NotificationDto>,
    pub dernier_id: i64,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct PurgeNotificationsData {
    pub notifications_supprimees: u64,
}
