use std::sync::Arc;

use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::errors::ErreurApi;
use crate::types::db::service::ServiceRow;
use crate::types::dto::Enveloppe;
use crate::AppData;

#[derive(Tags)]
enum ServiceTags {
    Services,
}

pub struct ServiceApi {
    app_data: Arc<AppData>,
}

impl ServiceApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self { app_data }
    }
}

#[OpenApi(prefix_path = "/services")]
impl ServiceApi {
    /// Active services, as offered on the public form. No authentication.
    #[oai(path = "/", method = "get", tag = "ServiceTags::Services")]
    async fn lister(&self) -> Result<Json<Enveloppe<Vec<ServiceRow>>>, ErreurApi> {
        let services = self.app_data.services.lister_actifs().await?;
        Ok(Enveloppe::ok("Services récupérés avec succès", services))
    }
}
