use sea_orm::DatabaseConnection;

use crate::db;
use crate::errors::InternalError;
use crate::types::db::service::ServiceRow;

pub struct ServiceStore {
    db: DatabaseConnection,
}

impl ServiceStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Services offered on the public form, alphabetically.
    pub async fn lister_actifs(&self) -> Result<Vec<ServiceRow>, InternalError> {
        let rows = db::executer(
            &self.db,
            "SELECT id_service, nom_service, description_service, actif \
             FROM services WHERE actif = ? ORDER BY nom_service",
            vec![true.into()],
        )
        .await?;
        db::en_modeles(rows, "lister_services")
    }

    pub async fn obtenir(&self, id: i64) -> Result<Option<ServiceRow>, InternalError> {
        let rows = db::executer(
            &self.db,
            "SELECT id_service, nom_service, description_service, actif \
             FROM services WHERE id_service = ?",
            vec![id.into()],
        )
        .await?;
        db::en_modele_optionnel(rows, "obtenir_service")
    }
}
