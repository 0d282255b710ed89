use chrono::NaiveDateTime;
use poem_openapi::Object;
use sea_orm::FromQueryResult;

// Aggregate counts come back as raw integers; satisfaction rates are
// computed in Rust rather than in SQL so the queries stay portable across
// MySQL and the SQLite test databases.

#[derive(FromQueryResult, Debug, Clone)]
pub struct StatSatisfactionRow {
    pub niveau_satisfaction: String,
    pub nombre_reponses: i64,
}

#[derive(FromQueryResult, Debug, Clone)]
pub struct StatServiceRow {
    pub nom_service: String,
    pub nombre_enquetes: i64,
    pub satisfaits: i64,
    pub mecontents: i64,
}

#[derive(FromQueryResult, Debug, Clone)]
pub struct StatRaisonRow {
    pub raison_presence: String,
    pub nombre_visites: i64,
    pub satisfaits: i64,
    pub mecontents: i64,
}

#[derive(FromQueryResult, Debug, Clone)]
pub struct StatMensuelleRow {
    pub annee: i64,
    pub mois: i64,
    pub nombre_enquetes: i64,
    pub satisfaits: i64,
    pub mecontents: i64,
}

#[derive(FromQueryResult, Debug, Clone, Default)]
pub struct StatRecentesRow {
    pub total_enquetes: i64,
    pub satisfaits: i64,
    pub mecontents: i64,
    pub aujourd_hui: i64,
    pub cette_semaine: i64,
    pub ce_mois: i64,
}

/// Audit trail row joined with the acting user.
#[derive(FromQueryResult, Object, Debug, Clone)]
pub struct LogActiviteRow {
    pub id_log: i64,
    pub id_utilisateur: i64,
    pub action: String,
    pub description: Option<String>,
    pub adresse_ip: Option<String>,
    pub user_agent: Option<String>,
    pub date_action: NaiveDateTime,
    pub nom_utilisateur: Option<String>,
}
