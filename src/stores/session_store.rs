//! Opaque server-side sessions, the second authentication channel next to
//! the signed token.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::db;
use crate::errors::InternalError;
use crate::services::{credentials, Role};
use crate::types::db::session::SessionUtilisateurRow;
use crate::types::internal::IdentiteUtilisateur;

pub struct SessionStore {
    db: DatabaseConnection,
    duree_heures: i64,
}

impl SessionStore {
    pub fn new(db: DatabaseConnection, duree_heures: i64) -> Self {
        Self { db, duree_heures }
    }

    /// Open a session for a user and return its opaque id.
    pub async fn creer(
        &self,
        id_utilisateur: i64,
        donnees: Option<String>,
    ) -> Result<String, InternalError> {
        let id_session = credentials::generer_id_session();
        let maintenant = Utc::now().naive_utc();
        let expiration = credentials::expiration_session(self.duree_heures);

        db::executer_maj(
            &self.db,
            "INSERT INTO sessions_utilisateurs \
             (id_session, id_utilisateur, donnees_session, date_expiration, date_creation, actif) \
             VALUES (?, ?, ?, ?, ?, ?)",
            vec![
                id_session.as_str().into(),
                id_utilisateur.into(),
                donnees.into(),
                expiration.into(),
                maintenant.into(),
                true.into(),
            ],
        )
        .await?;
        Ok(id_session)
    }

    /// Resolve a session id into its owning identity.
    ///
    /// An expired row is deleted on the spot and reported as absent, so a
    /// stale id behaves exactly like an unknown one.
    pub async fn verifier(
        &self,
        id_session: &str,
    ) -> Result<Option<IdentiteUtilisateur>, InternalError> {
        let rows = db::executer(
            &self.db,
            "SELECT s.id_session, s.donnees_session, s.date_expiration, \
                    u.id_utilisateur, u.nom_utilisateur, u.nom, u.prenom, u.email, u.role, u.actif \
             FROM sessions_utilisateurs s \
             JOIN utilisateurs u ON u.id_utilisateur = s.id_utilisateur \
             WHERE s.id_session = ? AND s.actif = ?",
            vec![id_session.into(), true.into()],
        )
        .await?;
        let Some(session) =
            db::en_modele_optionnel::<SessionUtilisateurRow>(rows, "verifier_session")?
        else {
            return Ok(None);
        };

        if credentials::session_expiree(session.date_expiration) {
            self.supprimer(id_session).await?;
            return Ok(None);
        }
        if !session.actif {
            return Ok(None);
        }

        let role = Role::depuis_contrat(&session.role).ok_or_else(|| {
            InternalError::Configuration(format!("rôle inconnu en base: {}", session.role))
        })?;
        Ok(Some(IdentiteUtilisateur {
            id_utilisateur: session.id_utilisateur,
            nom_utilisateur: session.nom_utilisateur,
            nom: session.nom,
            prenom: session.prenom,
            email: session.email,
            role,
        }))
    }

    pub async fn supprimer(&self, id_session: &str) -> Result<(), InternalError> {
        db::executer_maj(
            &self.db,
            "DELETE FROM sessions_utilisateurs WHERE id_session = ?",
            vec![id_session.into()],
        )
        .await?;
        Ok(())
    }

    /// Delete every expired session row. Returns how many were removed.
    pub async fn purger_expirees(&self) -> Result<u64, InternalError> {
        let resultat = db::executer_maj(
            &self.db,
            "DELETE FROM sessions_utilisateurs WHERE date_expiration < ?",
            vec![Utc::now().naive_utc().into()],
        )
        .await?;
        Ok(resultat.rows_affected())
    }
}
