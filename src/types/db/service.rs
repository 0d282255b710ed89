use poem_openapi::Object;
use sea_orm::FromQueryResult;

#[derive(FromQueryResult, Object, Debug, Clone)]
pub struct ServiceRow {
    pub id_service: i64,
    pub nom_service: String,
    pub description_service: Option<String>,
    pub actif: bool,
}
