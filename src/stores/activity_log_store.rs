//! Audit trail of back-office actions.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::db;
use crate::errors::InternalError;
use crate::types::db::stats::LogActiviteRow;
use crate::types::dto::PaginationDto;

pub struct ActivityLogStore {
    db: DatabaseConnection,
}

impl ActivityLogStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Record an action. Best effort: a failed write is logged and swallowed
    /// so auditing never breaks the operation being audited.
    ///
    /// The environment-defined account has no row in `utilisateurs`; its
    /// actions are traced to the server log only.
    pub async fn enregistrer(
        &self,
        id_utilisateur: Option<i64>,
        action: &str,
        description: Option<&str>,
        adresse_ip: Option<&str>,
        user_agent: Option<&str>,
    ) {
        let Some(id_utilisateur) = id_utilisateur else {
            tracing::info!(action, "action du compte d'administration");
            return;
        };

        let resultat = db::executer_maj(
            &self.db,
            "INSERT INTO logs_activite \
             (id_utilisateur, action, description, adresse_ip, user_agent, date_action) \
             VALUES (?, ?, ?, ?, ?, ?)",
            vec![
                id_utilisateur.into(),
                action.into(),
                description.map(str::to_owned).into(),
                adresse_ip.map(str::to_owned).into(),
                user_agent.map(str::to_owned).into(),
                Utc::now().naive_utc().into(),
            ],
        )
        .await;
        if let Err(e) = resultat {
            tracing::warn!(erreur = %e, action, "écriture du journal d'activité échouée");
        }
    }

    pub async fn lister(
        &self,
        page: i64,
        limite: i64,
    ) -> Result<(Vec<LogActiviteRow>, PaginationDto), InternalError> {
        let total = self.compter().await?;
        let (page, limite, _) = db::borner_pagination(page, limite);

        let rows = db::executer_pagine(
            &self.db,
            "SELECT l.id_log, l.id_utilisateur, l.action, l.description, l.adresse_ip, \
                    l.user_agent, l.date_action, u.nom_utilisateur \
             FROM logs_activite l \
             LEFT JOIN utilisateurs u ON u.id_utilisateur = l.id_utilisateur \
             ORDER BY l.date_action DESC",
            vec![],
            page as i64,
            limite as i64,
        )
        .await?;
        let logs = db::en_modeles(rows, "lister_logs")?;

        Ok((
            logs,
            PaginationDto {
                page,
                limite,
                total,
                total_pages: db::total_pages(total, limite),
            },
        ))
    }

    async fn compter(&self) -> Result<u64, InternalError> {
        let rows = db::executer(
            &self.db,
            "SELECT CAST(COUNT(*) AS SIGNED) AS total FROM logs_activite",
            vec![],
        )
        .await?;
        let total: i64 = rows
            .first()
            .map(|row| row.try_get("", "total"))
            .transpose()
            .map_err(|e| InternalError::database("compter_logs", e))?
            .unwrap_or(0);
        Ok(total.max(0) as u64)
    }
}
