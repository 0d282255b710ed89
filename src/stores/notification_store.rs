//! Back-office notifications, fed mostly by survey submissions.

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use serde_json::json;

use crate::db;
use crate::errors::InternalError;
use crate::types::db::enquete::EnqueteRow;
use crate::types::db::notification::NotificationRow;
use crate::types::dto::PaginationDto;

/// Notifications are capped per fetch so a backlog cannot flood the client.
const LIMITE_NON_LUES: i64 = 50;

/// Accepted `type_notification` values, shared with the API contract.
pub const TYPES_NOTIFICATION: [&str; 4] = [
    "nouvelle_enquete",
    "enquete_mecontent",
    "manuelle",
    "alerte_systeme",
];

const COLONNES_JOINTES: &str =
    "n.id_notification, n.type_notification, n.titre, n.message, n.id_enquete, \
     n.id_utilisateur_destinataire, n.lu, n.date_lecture, n.donnees_supplementaires, \
     n.date_creation, e.nom_visiteur, e.prenom_visiteur, e.niveau_satisfaction, s.nom_service";

const JOINTURE: &str = "FROM notifications n \
     LEFT JOIN enquetes e ON e.id_enquete = n.id_enquete \
     LEFT JOIN services s ON s.id_service = e.id_service";

pub struct NotificationStore {
    db: DatabaseConnection,
}

impl NotificationStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn creer(
        &self,
        type_notification: &str,
        titre: &str,
        message: &str,
        id_enquete: Option<i64>,
        id_utilisateur_destinataire: Option<i64>,
        donnees_supplementaires: Option<serde_json::Value>,
    ) -> Result<i64, InternalError> {
        if !TYPES_NOTIFICATION.contains(&type_notification) {
            return Err(InternalError::Conflit(
                "Type de notification invalide".to_owned(),
            ));
        }
        let donnees = donnees_supplementaires.map(|v| v.to_string());
        let resultat = db::executer_maj(
            &self.db,
            "INSERT INTO notifications \
             (type_notification, titre, message, id_enquete, id_utilisateur_destinataire, \
              lu, donnees_supplementaires, actif, date_creation) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
            vec![
                type_notification.into(),
                titre.into(),
                message.into(),
                id_enquete.into(),
                id_utilisateur_destinataire.into(),
                false.into(),
                donnees.into(),
                true.into(),
                Utc::now().naive_utc().into(),
            ],
        )
        .await?;
        Ok(resultat.last_insert_id() as i64)
    }

    /// Broadcast notification for a freshly submitted survey.
    ///
    /// An unhappy answer gets its own type and wording so the back office
    /// can surface it more aggressively.
    pub async fn creer_pour_enquete(&self, enquete: &EnqueteRow) -> Result<i64, InternalError> {
        let nom_complet = match &enquete.prenom_visiteur {
            Some(prenom) => format!("{} {}", enquete.nom_visiteur, prenom),
            None => enquete.nom_visiteur.clone(),
        };

        let (type_notification, message) = if enquete.niveau_satisfaction == "Mécontent" {
            (
                "enquete_mecontent",
                format!("⚠️ Une enquête MÉCONTENTE a été soumise par {nom_complet}"),
            )
        } else {
            (
                "nouvelle_enquete",
                format!("✅ Une nouvelle enquête de satisfaction a été soumise par {nom_complet}"),
            )
        };

        let commentaires = enquete
            .commentaires
            .as_deref()
            .map(|c| c.chars().take(100).collect::<String>());
        let donnees = json!({
            "nom_visiteur": enquete.nom_visiteur,
            "prenom_visiteur": enquete.prenom_visiteur,
            "satisfaction": enquete.niveau_satisfaction,
            "service": enquete.nom_service,
            "raison_presence": enquete.raison_presence,
            "date_visite": enquete.date_heure_visite.format("%Y-%m-%d %H:%M:%S").to_string(),
            "commentaires": commentaires,
        });

        self.creer(
            type_notification,
            "Nouvelle enquête reçue",
            &message,
            Some(enquete.id_enquete),
            None,
            Some(donnees),
        )
        .await
    }

    /// Unread notifications visible to a user: broadcasts plus the ones
    /// addressed to them. Newest first, capped at 50.
    pub async fn non_lues(
        &self,
        id_utilisateur: Option<i64>,
    ) -> Result<Vec<NotificationRow>, InternalError> {
        let (filtre, valeurs) = Self::filtre_destinataire(id_utilisateur);
        let sql = format!(
            "SELECT {COLONNES_JOINTES} {JOINTURE} \
             WHERE n.lu = ? AND n.actif = ? AND {filtre} \
             ORDER BY n.date_creation DESC LIMIT {LIMITE_NON_LUES}"
        );
        let mut parametres: Vec<sea_orm::Value> = vec![false.into(), true.into()];
        parametres.extend(valeurs);
        let rows = db::executer(&self.db, &sql, parametres).await?;
        db::en_modeles(rows, "notifications_non_lues")
    }

    pub async fn compter_non_lues(
        &self,
        id_utilisateur: Option<i64>,
    ) -> Result<i64, InternalError> {
        let (filtre, valeurs) = Self::filtre_destinataire(id_utilisateur);
        let sql = format!(
            "SELECT CAST(COUNT(*) AS SIGNED) AS total FROM notifications n \
             WHERE n.lu = ? AND n.actif = ? AND {filtre}"
        );
        let mut parametres: Vec<sea_orm::Value> = vec![false.into(), true.into()];
        parametres.extend(valeurs);
        let rows = db::executer(&self.db, &sql, parametres).await?;
        rows.first()
            .map(|row| row.try_get("", "total"))
            .transpose()
            .map_err(|e| InternalError::database("compter_non_lues", e))
            .map(|total| total.unwrap_or(0))
    }

    fn filtre_destinataire(id_utilisateur: Option<i64>) -> (&'static str, Vec<sea_orm::Value>) {
        match id_utilisateur {
            Some(id) => (
                "(n.id_utilisateur_destinataire IS NULL OR n.id_utilisateur_destinataire = ?)",
                vec![id.into()],
            ),
            None => ("n.id_utilisateur_destinataire IS NULL", vec![]),
        }
    }

    // UPDATE statements reuse the recipient filter with bare column names;
    // sqlite rejects table aliases there.
    fn filtre_destinataire_maj(id_utilisateur: Option<i64>) -> (&'static str, Vec<sea_orm::Value>) {
        match id_utilisateur {
            Some(id) => (
                "(id_utilisateur_destinataire IS NULL OR id_utilisateur_destinataire = ?)",
                vec![id.into()],
            ),
            None => ("id_utilisateur_destinataire IS NULL", vec![]),
        }
    }

    /// Mark one notification as read, within the reader's scope: broadcasts
    /// plus the ones addressed to them. Returns `false` when nothing matches.
    pub async fn marquer_lue(
        &self,
        id_notification: i64,
        id_utilisateur: Option<i64>,
    ) -> Result<bool, InternalError> {
        let (filtre, valeurs) = Self::filtre_destinataire_maj(id_utilisateur);
        let sql = format!(
            "UPDATE notifications SET lu = ?, date_lecture = ? \
             WHERE id_notification = ? AND actif = ? AND {filtre}"
        );
        let mut parametres: Vec<sea_orm::Value> = vec![
            true.into(),
            Utc::now().naive_utc().into(),
            id_notification.into(),
            true.into(),
        ];
        parametres.extend(valeurs);
        let resultat = db::executer_maj(&self.db, &sql, parametres).await?;
        Ok(resultat.rows_affected() > 0)
    }

    pub async fn marquer_toutes_lues(
        &self,
        id_utilisateur: Option<i64>,
    ) -> Result<u64, InternalError> {
        let (filtre, valeurs) = Self::filtre_destinataire_maj(id_utilisateur);
        let sql = format!(
            "UPDATE notifications SET lu = ?, date_lecture = ? \
             WHERE lu = ? AND actif = ? AND {filtre}"
        );
        let mut parametres: Vec<sea_orm::Value> = vec![
            true.into(),
            Utc::now().naive_utc().into(),
            false.into(),
            true.into(),
        ];
        parametres.extend(valeurs);
        let resultat = db::executer_maj(&self.db, &sql, parametres).await?;
        Ok(resultat.rows_affected())
    }

    /// Full history, read or not, newest first.
    pub async fn historique(
        &self,
        page: i64,
        limite: i64,
    ) -> Result<(Vec<NotificationRow>, PaginationDto), InternalError> {
        let rows = db::executer(
            &self.db,
            "SELECT CAST(COUNT(*) AS SIGNED) AS total FROM notifications WHERE actif = ?",
            vec![true.into()],
        )
        .await?;
        let total: i64 = rows
            .first()
            .map(|row| row.try_get("", "total"))
            .transpose()
            .map_err(|e| InternalError::database("compter_notifications", e))?
            .unwrap_or(0);
        let total = total.max(0) as u64;

        let (page, limite, _) = db::borner_pagination(page, limite);
        let rows = db::executer_pagine(
            &self.db,
            &format!(
                "SELECT {COLONNES_JOINTES} {JOINTURE} \
                 WHERE n.actif = ? ORDER BY n.date_creation DESC"
            ),
            vec![true.into()],
            page as i64,
            limite as i64,
        )
        .await?;
        let notifications = db::en_modeles(rows, "historique_notifications")?;

        Ok((
            notifications,
            PaginationDto {
                page,
                limite,
                total,
                total_pages: db::total_pages(total, limite),
            },
        ))
    }

    /// Everything newer than the client's cursor, for incremental polling.
    pub async fn mises_a_jour(
        &self,
        depuis_id: i64,
        id_utilisateur: Option<i64>,
    ) -> Result<Vec<NotificationRow>, InternalError> {
        let (filtre, valeurs) = Self::filtre_destinataire(id_utilisateur);
        let sql = format!(
            "SELECT {COLONNES_JOINTES} {JOINTURE} \
             WHERE n.id_notification > ? AND n.actif = ? AND {filtre} \
             ORDER BY n.id_notification ASC LIMIT {LIMITE_NON_LUES}"
        );
        let mut parametres: Vec<sea_orm::Value> = vec![depuis_id.into(), true.into()];
        parametres.extend(valeurs);
        let rows = db::executer(&self.db, &sql, parametres).await?;
        db::en_modeles(rows, "mises_a_jour_notifications")
    }

    /// Delete read notifications older than `jours` days.
    pub async fn purger(&self, jours: i64) -> Result<u64, InternalError> {
        let seuil = Utc::now().naive_utc() - Duration::days(jours);
        let resultat = db::executer_maj(
            &self.db,
            "DELETE FROM notifications WHERE lu = ? AND date_creation < ?",
            vec![true.into(), seuil.into()],
        )
        .await?;
        Ok(resultat.rows_affected())
    }
}
