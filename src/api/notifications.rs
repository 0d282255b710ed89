//! Back-office notification feed.

use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};

use crate::api::{Api, GardeAuth};
use crate::errors::ErreurApi;
use crate::services::Role;
use crate::types::internal::Principal;
use crate::types::dto::notifications::{
    CompteurNonLues, CreationNotificationData, CreerNotificationRequete, HistoriqueNotifications,
    ListeNotifications, MarquageData, MisesAJourData, NotificationDto, PurgeNotificationsData,
};
use crate::types::dto::{Enveloppe, EnveloppeVide};
use crate::AppData;

/// Default retention, in days, for the purge endpoint.
const RETENTION_JOURS: i64 = 30;

#[derive(Tags)]
enum NotificationTags {
    Notifications,
}

#[derive(ApiResponse)]
pub enum CreationNotificationReponse {
    #[oai(status = 201)]
    Creee(Json<Enveloppe<CreationNotificationData>>),
}

pub struct NotificationApi {
    app_data: Arc<AppData>,
    garde: GardeAuth,
}

impl NotificationApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        let garde = GardeAuth::new(
            app_data.token_service.clone(),
            app_data.sessions.clone(),
        );
        Self { app_data, garde }
    }

    async fn journaliser(
        &self,
        req: &Request,
        principal: &Principal,
        action: &str,
        description: &str,
    ) {
        self.app_data
            .journal
            .enregistrer(
                principal.id_utilisateur(),
                action,
                Some(description),
                self.extraire_ip(req).as_deref(),
                self.extraire_user_agent(req).as_deref(),
            )
            .await;
    }
}

impl Api for NotificationApi {}

#[OpenApi(prefix_path = "/notifications")]
impl NotificationApi {
    /// Unread notifications visible to the caller: broadcasts plus the ones
    /// addressed to them.
    #[oai(path = "/non-lues", method = "get", tag = "NotificationTags::Notifications")]
    async fn non_lues(
        &self,
        req: &Request,
    ) -> Result<Json<Enveloppe<ListeNotifications>>, ErreurApi> {
        let principal = self.garde.authentifier(req).await?;
        let notifications = self
            .app_data
            .notifications
            .non_lues(principal.id_utilisateur())
            .await?
            .into_iter()
            .map(NotificationDto::from)
            .collect();
        Ok(Enveloppe::ok(
            "Notifications récupérées",
            ListeNotifications { notifications },
        ))
    }

    #[oai(path = "/compter", method = "get", tag = "NotificationTags::Notifications")]
    async fn compter(
        &self,
        req: &Request,
    ) -> Result<Json<Enveloppe<CompteurNonLues>>, ErreurApi> {
        let principal = self.garde.authentifier(req).await?;
        let total = self
            .app_data
            .notifications
            .compter_non_lues(principal.id_utilisateur())
            .await?;
        Ok(Enveloppe::ok("Compteur récupéré", CompteurNonLues { total }))
    }

    #[oai(
        path = "/:id/marquer-lue",
        method = "put",
        tag = "NotificationTags::Notifications"
    )]
    async fn marquer_lue(
        &self,
        req: &Request,
        id: Path<i64>,
    ) -> Result<Json<EnveloppeVide>, ErreurApi> {
        let principal = self.garde.authentifier(req).await?;
        if !self
            .app_data
            .notifications
            .marquer_lue(id.0, principal.id_utilisateur())
            .await?
        {
            return Err(ErreurApi::introuvable("Notification non trouvée"));
        }
        Ok(EnveloppeVide::ok("Notification marquée comme lue"))
    }

    #[oai(
        path = "/marquer-toutes-lues",
        method = "put",
        tag = "NotificationTags::Notifications"
    )]
    async fn marquer_toutes_lues(
        &self,
        req: &Request,
    ) -> Result<Json<Enveloppe<MarquageData>>, ErreurApi> {
        let principal = self.garde.authentifier(req).await?;
        let nombre_marquees = self
            .app_data
            .notifications
            .marquer_toutes_lues(principal.id_utilisateur())
            .await?;
        Ok(Enveloppe::ok(
            "Notifications marquées comme lues",
            MarquageData { nombre_marquees },
        ))
    }

    /// Full history, read or not, paginated.
    #[oai(path = "/historique", method = "get", tag = "NotificationTags::Notifications")]
    async fn historique(
        &self,
        req: &Request,
        page: Query<Option<i64>>,
        limite: Query<Option<i64>>,
    ) -> Result<Json<Enveloppe<HistoriqueNotifications>>, ErreurApi> {
        self.garde.authentifier(req).await?;
        let (notifications, pagination) = self
            .app_data
            .notifications
            .historique(page.0.unwrap_or(1), limite.0.unwrap_or(20))
            .await?;
        Ok(Enveloppe::ok(
            "Historique récupéré",
            HistoriqueNotifications {
                notifications: notifications.into_iter().map(NotificationDto::from).collect(),
                pagination,
            },
        ))
    }

    /// Incremental poll: everything newer than the client's cursor.
    #[oai(
        path = "/mises-a-jour",
        method = "get",
        tag = "NotificationTags::Notifications"
    )]
    async fn mises_a_jour(
        &self,
        req: &Request,
        depuis: Query<Option<i64>>,
    ) -> Result<Json<Enveloppe<MisesAJourData>>, ErreurApi> {
        let principal = self.garde.authentifier(req).await?;
        let depuis = depuis.0.unwrap_or(0);
        let notifications: Vec<NotificationDto> = self
            .app_data
            .notifications
            .mises_a_jour(depuis, principal.id_utilisateur())
            .await?
            .into_iter()
            .map(NotificationDto::from)
            .collect();
        let dernier_id = notifications
            .iter()
            .map(|n| n.id_notification)
            .max()
            .unwrap_or(depuis);
        Ok(Enveloppe::ok(
            "Mises à jour récupérées",
            MisesAJourData {
                notifications,
                dernier_id,
            },
        ))
    }

    /// Delete read notifications older than `jours` days (default 30).
    /// Reserved to administrators.
    #[oai(path = "/nettoyer", method = "delete", tag = "NotificationTags::Notifications")]
    async fn nettoyer(
        &self,
        req: &Request,
        jours: Query<Option<i64>>,
    ) -> Result<Json<Enveloppe<PurgeNotificationsData>>, ErreurApi> {
        let principal = self.garde.authentifier(req).await?;
        if !matches!(principal.role(), Role::SuperAdmin | Role::Administrateur) {
            return Err(ErreurApi::acces_refuse(
                "Seul un administrateur peut nettoyer les notifications",
            ));
        }
        let jours = jours.0.unwrap_or(RETENTION_JOURS);
        if jours < 1 {
            return Err(ErreurApi::validation("Nombre de jours invalide"));
        }
        let notifications_supprimees = self.app_data.notifications.purger(jours).await?;
        self.journaliser(
            req,
            &principal,
            "purge_notifications",
            &format!("Suppression de {notifications_supprimees} notifications lues de plus de {jours} jours"),
        )
        .await;
        Ok(Enveloppe::ok(
            "Anciennes notifications supprimées",
            PurgeNotificationsData {
                notifications_supprimees,
            },
        ))
    }

    /// Manually send a notification, broadcast or targeted. Reserved to
    /// administrators.
    #[oai(path = "/", method = "post", tag = "NotificationTags::Notifications")]
    async fn creer(
        &self,
        req: &Request,
        body: Json<CreerNotificationRequete>,
    ) -> Result<CreationNotificationReponse, ErreurApi> {
        let principal = self.garde.authentifier(req).await?;
        if !matches!(principal.role(), Role::SuperAdmin | Role::Administrateur) {
            return Err(ErreurApi::acces_refuse(
                "Seul un administrateur peut créer une notification",
            ));
        }
        if body.titre.trim().is_empty() || body.message.trim().is_empty() {
            return Err(ErreurApi::validation("Titre et message requis"));
        }

        let id_notification = self
            .app_data
            .notifications
            .creer(
                body.type_notification.as_deref().unwrap_or("manuelle"),
                body.titre.trim(),
                body.message.trim(),
                None,
                body.id_utilisateur_destinataire,
                None,
            )
            .await?;
        self.journaliser(
            req,
            &principal,
            "creation_notification",
            &format!("Notification manuelle {id_notification} créée"),
        )
        .await;
        Ok(CreationNotificationReponse::Creee(Enveloppe::ok(
            "Notification créée",
            CreationNotificationData { id_notification },
        )))
    }
}
