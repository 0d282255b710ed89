use std::sync::Arc;

use chrono::Utc;
use poem::Request;
use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::api::GardeAuth;
use crate::errors::ErreurApi;
use crate::services::Permission;
use crate::types::dto::stats::{
    dashboard_depuis_recentes, DashboardLiveDto, DashboardStatsDto, StatMensuelleDto,
    StatServiceDto,
};
use crate::types::dto::Enveloppe;
use crate::AppData;

#[derive(Tags)]
enum DashboardTags {
    Dashboard,
}

pub struct DashboardApi {
    app_data: Arc<AppData>,
    garde: GardeAuth,
}

impl DashboardApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        let garde = GardeAuth::new(
            app_data.token_service.clone(),
            app_data.sessions.clone(),
        );
        Self { app_data, garde }
    }
}

#[OpenApi(prefix_path = "/dashboard")]
impl DashboardApi {
    /// Same payload as the statistics dashboard, kept at this path for the
    /// front end's landing page.
    #[oai(path = "/stats", method = "get", tag = "DashboardTags::Dashboard")]
    async fn stats(
        &self,
        req: &Request,
    ) -> Result<Json<Enveloppe<DashboardStatsDto>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::VoirStatistiques)
            .await?;

        let recentes = self.app_data.enquetes.stats_recentes().await?;
        let mensuelles: Vec<StatMensuelleDto> = self
            .app_data
            .enquetes
            .stats_mensuelles()
            .await?
            .into_iter()
            .map(StatMensuelleDto::from)
            .collect();
        let services: Vec<StatServiceDto> = self
            .app_data
            .enquetes
            .stats_par_service(None)
            .await?
            .into_iter()
            .map(StatServiceDto::from)
            .collect();

        Ok(Enveloppe::ok(
            "Statistiques récupérées",
            dashboard_depuis_recentes(
                recentes,
                mensuelles,
                services,
                Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            ),
        ))
    }

    /// Lightweight counters for the polling header: survey total and unread
    /// notifications.
    #[oai(path = "/live", method = "get", tag = "DashboardTags::Dashboard")]
    async fn live(&self, req: &Request) -> Result<Json<Enveloppe<DashboardLiveDto>>, ErreurApi> {
        let principal = self.garde.authentifier(req).await?;
        let total_enquetes = self.app_data.enquetes.compter().await?;
        let notifications_non_lues = self
            .app_data
            .notifications
            .compter_non_lues(principal.id_utilisateur())
            .await?;
        Ok(Enveloppe::ok(
            "Données en direct",
            DashboardLiveDto {
                total_enquetes,
                notifications_non_lues,
                horodatage: Utc::now().to_rfc3339(),
            },
        ))
    }
}
