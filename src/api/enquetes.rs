//! Public survey submission and back-office consultation.

use std::sync::Arc;

use poem::Request;
use poem_openapi::param::{Path, Query};
use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};

use crate::api::{Api, GardeAuth};
use crate::errors::ErreurApi;
use crate::services::{Permission, Role};
use crate::stores::survey_store::valider_enquete;
use crate::types::db::enquete::EnqueteRow;
use crate::types::db::service::ServiceRow;
use crate::types::dto::enquetes::{
    CreationEnqueteData, CreerEnqueteRequete, FiltreEnquetesRequete, ListeEnquetes,
    TotalEnquetesData, ValidationData,
};
use crate::types::dto::{Enveloppe, EnveloppeVide};
use crate::AppData;

#[derive(Tags)]
enum EnqueteTags {
    Enquetes,
}

#[derive(ApiResponse)]
pub enum CreationEnqueteReponse {
    #[oai(status = 201)]
    Creee(Json<Enveloppe<CreationEnqueteData>>),
}

pub struct EnqueteApi {
    app_data: Arc<AppData>,
    garde: GardeAuth,
}

impl EnqueteApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        let garde = GardeAuth::new(
            app_data.token_service.clone(),
            app_data.sessions.clone(),
        );
        Self { app_data, garde }
    }
}

impl Api for EnqueteApi {}

#[OpenApi(prefix_path = "/enquetes")]
impl EnqueteApi {
    /// Submit a survey. Public, no authentication; every failed validation
    /// rule is returned at once.
    #[oai(path = "/", method = "post", tag = "EnqueteTags::Enquetes")]
    async fn creer(
        &self,
        req: &Request,
        body: Json<CreerEnqueteRequete>,
    ) -> Result<CreationEnqueteReponse, ErreurApi> {
        let erreurs = valider_enquete(&body);
        if !erreurs.is_empty() {
            return Err(ErreurApi::validation_detaillee(
                "Données d'enquête invalides",
                erreurs,
            ));
        }
        let service_connu = self
            .app_data
            .services
            .obtenir(body.id_service)
            .await?
            .is_some_and(|s| s.actif);
        if !service_connu {
            return Err(ErreurApi::validation_detaillee(
                "Données d'enquête invalides",
                vec!["Service obligatoire".to_owned()],
            ));
        }

        let id_enquete = self
            .app_data
            .enquetes
            .creer(
                &body,
                self.extraire_ip(req).as_deref(),
                self.extraire_user_agent(req).as_deref(),
            )
            .await?;

        Ok(CreationEnqueteReponse::Creee(Enveloppe::ok(
            "Enquête enregistrée avec succès",
            CreationEnqueteData { id_enquete },
        )))
    }

    /// Dry-run validation for the form, without persisting anything.
    #[oai(path = "/valider", method = "post", tag = "EnqueteTags::Enquetes")]
    async fn valider(
        &self,
        body: Json<CreerEnqueteRequete>,
    ) -> Result<Json<Enveloppe<ValidationData>>, ErreurApi> {
        let erreurs = valider_enquete(&body);
        let valide = erreurs.is_empty();
        let message = if valide {
            "Données valides"
        } else {
            "Données invalides"
        };
        Ok(Enveloppe::ok(message, ValidationData { valide, erreurs }))
    }

    /// Services selectable on the public form.
    #[oai(path = "/services", method = "get", tag = "EnqueteTags::Enquetes")]
    async fn services(&self) -> Result<Json<Enveloppe<Vec<ServiceRow>>>, ErreurApi> {
        let services = self.app_data.services.lister_actifs().await?;
        Ok(Enveloppe::ok("Services récupérés avec succès", services))
    }

    /// Paginated list, newest submissions first.
    #[oai(path = "/", method = "get", tag = "EnqueteTags::Enquetes")]
    async fn lister(
        &self,
        req: &Request,
        page: Query<Option<i64>>,
        limite: Query<Option<i64>>,
    ) -> Result<Json<Enveloppe<ListeEnquetes>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::VoirEnquetes)
            .await?;
        let (enquetes, pagination) = self
            .app_data
            .enquetes
            .lister(page.0.unwrap_or(1), limite.0.unwrap_or(20))
            .await?;
        Ok(Enveloppe::ok(
            "Enquêtes récupérées avec succès",
            ListeEnquetes { enquetes, pagination },
        ))
    }

    #[oai(path = "/total", method = "get", tag = "EnqueteTags::Enquetes")]
    async fn total(
        &self,
        req: &Request,
    ) -> Result<Json<Enveloppe<TotalEnquetesData>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::VoirEnquetes)
            .await?;
        let total = self.app_data.enquetes.compter().await?;
        Ok(Enveloppe::ok("Total récupéré", TotalEnquetesData { total }))
    }

    #[oai(path = "/:id", method = "get", tag = "EnqueteTags::Enquetes")]
    async fn obtenir(
        &self,
        req: &Request,
        id: Path<i64>,
    ) -> Result<Json<Enveloppe<EnqueteRow>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::VoirEnquetes)
            .await?;
        match self.app_data.enquetes.obtenir_par_id(id.0).await? {
            Some(enquete) => Ok(Enveloppe::ok("Enquête récupérée", enquete)),
            None => Err(ErreurApi::introuvable("Enquête non trouvée")),
        }
    }

    /// Combined filter form; absent criteria do not constrain.
    #[oai(path = "/filtrer", method = "post", tag = "EnqueteTags::Enquetes")]
    async fn filtrer(
        &self,
        req: &Request,
        body: Json<FiltreEnquetesRequete>,
    ) -> Result<Json<Enveloppe<ListeEnquetes>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::VoirEnquetes)
            .await?;
        let (enquetes, pagination) = self.app_data.enquetes.filtrer(&body).await?;
        Ok(Enveloppe::ok(
            "Enquêtes filtrées avec succès",
            ListeEnquetes { enquetes, pagination },
        ))
    }

    /// Remove a submission and its linked notifications. Administrators only.
    #[oai(path = "/:id", method = "delete", tag = "EnqueteTags::Enquetes")]
    async fn supprimer(
        &self,
        req: &Request,
        id: Path<i64>,
    ) -> Result<Json<EnveloppeVide>, ErreurApi> {
        let principal = self.garde.authentifier(req).await?;
        if !matches!(principal.role(), Role::SuperAdmin | Role::Administrateur) {
            return Err(ErreurApi::acces_refuse(
                "Seul un administrateur peut supprimer une enquête",
            ));
        }

        if !self.app_data.enquetes.supprimer(id.0).await? {
            return Err(ErreurApi::introuvable("Enquête non trouvée"));
        }

        self.app_data
            .journal
            .enregistrer(
                principal.id_utilisateur(),
                "suppression_enquete",
                Some(&format!("Suppression de l'enquête {}", id.0)),
                self.extraire_ip(req).as_deref(),
                self.extraire_user_agent(req).as_deref(),
            )
            .await;
        Ok(EnveloppeVide::ok("Enquête supprimée avec succès"))
    }
}
