use poem_openapi::{payload::Json, OpenApi, Tags};

use crate::types::dto::EnveloppeVide;

#[derive(Tags)]
enum HealthTags {
    Sante,
}

pub struct HealthApi;

#[OpenApi(prefix_path = "/")]
impl HealthApi {
    /// Liveness probe; no database access.
    #[oai(path = "/health", method = "get", tag = "HealthTags::Sante")]
    async fn health(&self) -> Json<EnveloppeVide> {
        EnveloppeVide::ok("API opérationnelle")
    }
}
