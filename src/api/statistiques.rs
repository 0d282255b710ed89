//! Aggregated reporting and file export.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use poem::Request;
use poem_openapi::param::Query;
use poem_openapi::payload::{Attachment, AttachmentType, Json};
use poem_openapi::{OpenApi, Tags};

use crate::api::GardeAuth;
use crate::errors::ErreurApi;
use crate::services::export::{
    self, classeur_xlsx, nom_fichier, texte_csv, Feuille, SEPARATEUR_CSV,
};
use crate::services::Permission;
use crate::types::dto::stats::{
    dashboard_depuis_recentes, repartition_satisfaction, ApercuExportDto, DashboardStatsDto,
    ListeLogs, PeriodeRequete, ResumeDto, StatMensuelleDto, StatRaisonDto, StatSatisfactionDto,
    StatServiceDto, StatistiquesPeriode,
};
use crate::types::dto::Enveloppe;
use crate::types::internal::Principal;
use crate::AppData;

#[derive(Tags)]
enum StatistiqueTags {
    Statistiques,
}

pub struct StatistiqueApi {
    app_data: Arc<AppData>,
    garde: GardeAuth,
}

impl StatistiqueApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        let garde = GardeAuth::new(
            app_data.token_service.clone(),
            app_data.sessions.clone(),
        );
        Self { app_data, garde }
    }

    fn analyser_periode(periode: &PeriodeRequete) -> Result<(NaiveDateTime, NaiveDateTime), ErreurApi> {
        let debut = NaiveDate::parse_from_str(periode.date_debut.trim(), "%Y-%m-%d")
            .map_err(|_| ErreurApi::validation("Format de date invalide (AAAA-MM-JJ attendu)"))?;
        let fin = NaiveDate::parse_from_str(periode.date_fin.trim(), "%Y-%m-%d")
            .map_err(|_| ErreurApi::validation("Format de date invalide (AAAA-MM-JJ attendu)"))?;
        if fin < debut {
            return Err(ErreurApi::validation(
                "La date de fin doit être postérieure à la date de début",
            ));
        }
        Ok((
            debut.and_hms_opt(0, 0, 0).unwrap_or_default(),
            fin.and_hms_opt(23, 59, 59).unwrap_or_default(),
        ))
    }

    async fn tableau_de_bord(&self) -> Result<DashboardStatsDto, ErreurApi> {
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
        Ok(dashboard_depuis_recentes(
            recentes,
            mensuelles,
            services,
            Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        ))
    }

    async fn feuilles_statistiques(&self) -> Result<Vec<Feuille>, ErreurApi> {
        let satisfaction =
            repartition_satisfaction(self.app_data.enquetes.stats_satisfaction(None).await?);
        let services: Vec<StatServiceDto> = self
            .app_data
            .enquetes
            .stats_par_service(None)
            .await?
            .into_iter()
            .map(StatServiceDto::from)
            .collect();
        let raisons: Vec<StatRaisonDto> = self
            .app_data
            .enquetes
            .stats_par_raison(None)
            .await?
            .into_iter()
            .map(StatRaisonDto::from)
            .collect();
        let mensuelles: Vec<StatMensuelleDto> = self
            .app_data
            .enquetes
            .stats_mensuelles()
            .await?
            .into_iter()
            .map(StatMensuelleDto::from)
            .collect();

        let mut feuilles = Vec::new();
        if !satisfaction.is_empty() {
            feuilles.push(export::feuille_satisfaction(&satisfaction));
        }
        if !services.is_empty() {
            feuilles.push(export::feuille_services(&services));
        }
        if !raisons.is_empty() {
            feuilles.push(export::feuille_raisons(&raisons));
        }
        if !mensuelles.is_empty() {
            feuilles.push(export::feuille_mensuelles(&mensuelles));
        }
        if !feuilles.is_empty() {
            let recentes = self.app_data.enquetes.stats_recentes().await?;
            let resume = ResumeDto::from(recentes.clone());
            feuilles.push(export::feuille_recapitulatif(&recentes, resume.taux_satisfaction));
        }
        Ok(feuilles)
    }
}

#[OpenApi(prefix_path = "/statistiques")]
impl StatistiqueApi {
    /// Everything the dashboard needs in one call: totals, trends, monthly
    /// and per-service breakdowns.
    #[oai(path = "/dashboard", method = "get", tag = "StatistiqueTags::Statistiques")]
    async fn dashboard(
        &self,
        req: &Request,
    ) -> Result<Json<Enveloppe<DashboardStatsDto>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::VoirStatistiques)
            .await?;
        let dashboard = self.tableau_de_bord().await?;
        Ok(Enveloppe::ok("Statistiques récupérées", dashboard))
    }

    #[oai(path = "/resume", method = "get", tag = "StatistiqueTags::Statistiques")]
    async fn resume(&self, req: &Request) -> Result<Json<Enveloppe<ResumeDto>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::VoirStatistiques)
            .await?;
        let recentes = self.app_data.enquetes.stats_recentes().await?;
        Ok(Enveloppe::ok("Résumé récupéré", ResumeDto::from(recentes)))
    }

    #[oai(path = "/satisfaction", method = "get", tag = "StatistiqueTags::Statistiques")]
    async fn satisfaction(
        &self,
        req: &Request,
    ) -> Result<Json<Enveloppe<Vec<StatSatisfactionDto>>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::VoirStatistiques)
            .await?;
        let stats =
            repartition_satisfaction(self.app_data.enquetes.stats_satisfaction(None).await?);
        Ok(Enveloppe::ok("Répartition récupérée", stats))
    }

    #[oai(path = "/services", method = "get", tag = "StatistiqueTags::Statistiques")]
    async fn services(
        &self,
        req: &Request,
    ) -> Result<Json<Enveloppe<Vec<StatServiceDto>>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::VoirStatistiques)
            .await?;
        let stats = self
            .app_data
            .enquetes
            .stats_par_service(None)
            .await?
            .into_iter()
            .map(StatServiceDto::from)
            .collect();
        Ok(Enveloppe::ok("Statistiques par service récupérées", stats))
    }

    #[oai(path = "/raisons", method = "get", tag = "StatistiqueTags::Statistiques")]
    async fn raisons(
        &self,
        req: &Request,
    ) -> Result<Json<Enveloppe<Vec<StatRaisonDto>>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::VoirStatistiques)
            .await?;
        let stats = self
            .app_data
            .enquetes
            .stats_par_raison(None)
            .await?
            .into_iter()
            .map(StatRaisonDto::from)
            .collect();
        Ok(Enveloppe::ok("Statistiques par raison récupérées", stats))
    }

    #[oai(path = "/mensuelles", method = "get", tag = "StatistiqueTags::Statistiques")]
    async fn mensuelles(
        &self,
        req: &Request,
    ) -> Result<Json<Enveloppe<Vec<StatMensuelleDto>>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::VoirStatistiques)
            .await?;
        let stats = self
            .app_data
            .enquetes
            .stats_mensuelles()
            .await?
            .into_iter()
            .map(StatMensuelleDto::from)
            .collect();
        Ok(Enveloppe::ok("Statistiques mensuelles récupérées", stats))
    }

    /// Breakdown over an arbitrary date range.
    #[oai(path = "/periode", method = "post", tag = "StatistiqueTags::Statistiques")]
    async fn periode(
        &self,
        req: &Request,
        body: Json<PeriodeRequete>,
    ) -> Result<Json<Enveloppe<StatistiquesPeriode>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::VoirStatistiques)
            .await?;
        let periode = Self::analyser_periode(&body)?;

        let satisfaction = repartition_satisfaction(
            self.app_data
                .enquetes
                .stats_satisfaction(Some(periode))
                .await?,
        );
        let services = self
            .app_data
            .enquetes
            .stats_par_service(Some(periode))
            .await?
            .into_iter()
            .map(StatServiceDto::from)
            .collect();
        let raisons = self
            .app_data
            .enquetes
            .stats_par_raison(Some(periode))
            .await?
            .into_iter()
            .map(StatRaisonDto::from)
            .collect();

        Ok(Enveloppe::ok(
            "Statistiques de la période récupérées",
            StatistiquesPeriode {
                satisfaction,
                services,
                raisons,
            },
        ))
    }

    /// Download surveys and statistics as a spreadsheet or CSV.
    ///
    /// All-or-nothing: empty data or an unknown format/type is a 400 and no
    /// file is produced.
    #[oai(path = "/export", method = "get", tag = "StatistiqueTags::Statistiques")]
    async fn export(
        &self,
        req: &Request,
        format: Query<Option<String>>,
        #[oai(name = "type")] type_export: Query<Option<String>>,
        nom: Query<Option<String>>,
    ) -> Result<Attachment<Vec<u8>>, ErreurApi> {
        let principal = self
            .garde
            .exiger_permission(req, Permission::ExporterDonnees)
            .await?;

        let format = format.0.unwrap_or_else(|| "excel".to_owned()).to_lowercase();
        let type_export = type_export.0.unwrap_or_else(|| "enquetes".to_owned()).to_lowercase();
        if !matches!(format.as_str(), "excel" | "xlsx" | "csv") {
            return Err(ErreurApi::validation(format!("Format '{format}' non supporté")));
        }

        let mut feuilles: Vec<Feuille> = Vec::new();
        let mut nombre_enquetes = 0usize;
        let mut avec_statistiques = false;

        match type_export.as_str() {
            "enquetes" => {
                let lignes = self.app_data.enquetes.lignes_export().await?;
                nombre_enquetes = lignes.len();
                feuilles.push(export::feuille_enquetes(&lignes));
            }
            "statistiques" => {
                feuilles.extend(self.feuilles_statistiques().await?);
                avec_statistiques = !feuilles.is_empty();
            }
            "complet" => {
                let lignes = self.app_data.enquetes.lignes_export().await?;
                nombre_enquetes = lignes.len();
                feuilles.push(export::feuille_enquetes(&lignes));
                let stats = self.feuilles_statistiques().await?;
                avec_statistiques = !stats.is_empty();
                feuilles.extend(stats);
            }
            autre => {
                return Err(ErreurApi::validation(format!("Type d'export '{autre}' non supporté")));
            }
        }

        let vide = nombre_enquetes == 0 && !avec_statistiques;
        if vide {
            return Err(ErreurApi::validation("Aucune donnée à exporter"));
        }

        let maintenant = Utc::now().naive_utc();
        let exporte_par = match &principal {
            Principal::Utilisateur(identite) => match &identite.prenom {
                Some(prenom) => format!("{} {prenom}", identite.nom),
                None => identite.nom.clone(),
            },
            Principal::SuperAdmin { nom_utilisateur, .. } => nom_utilisateur.clone(),
        };

        let (octets, nom_defaut) = if format == "csv" {
            let texte = feuilles
                .iter()
                .map(|f| texte_csv(f, SEPARATEUR_CSV))
                .collect::<Vec<_>>()
                .join("\n\n");
            (
                texte.into_bytes(),
                nom_fichier("enquetes_satisfaction", ".csv", maintenant),
            )
        } else {
            feuilles.push(export::feuille_metadonnees(
                &exporte_par,
                nombre_enquetes,
                avec_statistiques,
                maintenant,
            ));
            (
                classeur_xlsx(&feuilles)?,
                nom_fichier("enquetes_satisfaction", ".xlsx", maintenant),
            )
        };

        Ok(Attachment::new(octets)
            .attachment_type(AttachmentType::Attachment)
            .filename(nom.0.unwrap_or(nom_defaut)))
    }

    /// Row count and first lines of what the export would contain.
    #[oai(
        path = "/export-preview",
        method = "get",
        tag = "StatistiqueTags::Statistiques"
    )]
    async fn export_preview(
        &self,
        req: &Request,
    ) -> Result<Json<Enveloppe<ApercuExportDto>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::ExporterDonnees)
            .await?;
        let lignes = self.app_data.enquetes.lignes_export().await?;
        let feuille = export::feuille_enquetes(&lignes);
        Ok(Enveloppe::ok(
            "Aperçu de l'export",
            ApercuExportDto {
                nombre_lignes: feuille.lignes.len() as u64,
                colonnes: feuille.en_tetes.clone(),
                extrait: feuille.lignes.into_iter().take(5).collect(),
            },
        ))
    }

    /// Audit trail, newest first.
    #[oai(path = "/logs", method = "get", tag = "StatistiqueTags::Statistiques")]
    async fn logs(
        &self,
        req: &Request,
        page: Query<Option<i64>>,
        limite: Query<Option<i64>>,
    ) -> Result<Json<Enveloppe<ListeLogs>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::VoirLogs)
            .await?;
        let (logs, pagination) = self
            .app_data
            .journal
            .lister(page.0.unwrap_or(1), limite.0.unwrap_or(20))
            .await?;
        Ok(Enveloppe::ok(
            "Journal d'activité récupéré",
            ListeLogs { logs, pagination },
        ))
    }
}
