use poem_openapi::Object;

use crate::types::db::enquete::EnqueteRow;
use crate::types::dto::common::PaginationDto;

/// Public submission payload. Validated field by field before anything
/// touches the database.
#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct CreerEnqueteRequete {
    pub date_heure_visite: String,
    pub nom_visiteur: String,
    pub prenom_visiteur: Option<String>,
    pub telephone: String,
    pub email: Option<String>,
    pub raison_presence: String,
    pub niveau_satisfaction: String,
    pub id_service: i64,
    pub commentaires: Option<String>,
    pub recommandations: Option<String>,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct CreationEnqueteData {
    pub id_enquete: i64,
}

#[derive(Object, Debug)]
pub struct ListeEnquetes {
    pub enquetes: Vec<EnqueteRow>,
    pub pagination: PaginationDto,
}

#[derive(Object, Debug)]
pub struct ValidationData {
    pub valide: bool,
    pub erreurs: Vec<String>,
}

#[derive(Object, Debug)]
pub struct TotalEnquetesData {
    pub total: i64,
}

/// Back-office filter form. Every criterion is optional and they compose
/// with AND semantics.
#[derive(Object, Debug, Default)]
#[oai(rename_all = "camelCase")]
pub struct FiltreEnquetesRequete {
    pub date_debut: Option<String>,
    pub date_fin: Option<String>,
    pub niveau_satisfaction: Option<String>,
    pub id_service: Option<i64>,
    pub raison_presence: Option<String>,
    pub page: Option<i64>,
    pub limite: Option<i64>,
}
