use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use enquete_backend::stores::{NotificationStore, SurveyStore};
use enquete_backend::types::dto::enquetes::CreerEnqueteRequete;

/// Fresh in-memory database with the full schema and the seeded services.
pub async fn base_de_test() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connexion sqlite en mémoire");
    Migrator::up(&db, None).await.expect("migrations");
    db
}

pub fn magasin_enquetes(db: &DatabaseConnection) -> SurveyStore {
    SurveyStore::new(db.clone(), Arc::new(NotificationStore::new(db.clone())))
}

pub fn requete_enquete() -> CreerEnqueteRequete {
    CreerEnqueteRequete {
        date_heure_visite: "2026-03-14T09:30".to_owned(),
        nom_visiteur: "Kouassi".to_owned(),
        prenom_visiteur: Some("Awa".to_owned()),
        telephone: "0102030405".to_owned(),
        email: Some("awa.kouassi@example.ci".to_owned()),
        raison_presence: "Information".to_owned(),
        niveau_satisfaction: "Satisfait".to_owned(),
        id_service: 1,
        commentaires: None,
        recommandations: None,
    }
}
