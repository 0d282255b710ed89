//! Back-office accounts.

use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::db;
use crate::errors::InternalError;
use crate::services::{credentials, Role};
use crate::types::db::utilisateur::{UtilisateurAuthRow, UtilisateurRow};
use crate::types::dto::auth::MajUtilisateurRequete;
use crate::types::internal::IdentiteUtilisateur;

const COLONNES_SURES: &str = "id_utilisateur, nom_utilisateur, nom, prenom, email, role, \
                              actif, derniere_connexion, date_creation";

pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    fn role_en_base(role: &str) -> Result<Role, InternalError> {
        Role::depuis_contrat(role)
            .ok_or_else(|| InternalError::Configuration(format!("rôle inconnu en base: {role}")))
    }

    /// Check credentials against an active account.
    ///
    /// Returns `Ok(None)` for an unknown or disabled account as well as for
    /// a wrong password; callers must not tell the two apart in their
    /// response.
    pub async fn authentifier(
        &self,
        nom_utilisateur: &str,
        mot_de_passe: &str,
    ) -> Result<Option<IdentiteUtilisateur>, InternalError> {
        let rows = db::executer(
            &self.db,
            "SELECT id_utilisateur, nom_utilisateur, mot_de_passe, nom, prenom, email, role \
             FROM utilisateurs WHERE nom_utilisateur = ? AND actif = ?",
            vec![nom_utilisateur.into(), true.into()],
        )
        .await?;
        let Some(compte) = db::en_modele_optionnel::<UtilisateurAuthRow>(rows, "authentifier")?
        else {
            return Ok(None);
        };

        if !credentials::verifier_mot_de_passe(mot_de_passe, &compte.mot_de_passe)? {
            return Ok(None);
        }

        // The last-login trace must never block the login itself.
        if let Err(e) = db::executer_maj(
            &self.db,
            "UPDATE utilisateurs SET derniere_connexion = ? WHERE id_utilisateur = ?",
            vec![Utc::now().naive_utc().into(), compte.id_utilisateur.into()],
        )
        .await
        {
            tracing::warn!(erreur = %e, "mise à jour de derniere_connexion échouée");
        }

        Ok(Some(IdentiteUtilisateur {
            id_utilisateur: compte.id_utilisateur,
            nom_utilisateur: compte.nom_utilisateur,
            nom: compte.nom,
            prenom: compte.prenom,
            email: compte.email,
            role: Self::role_en_base(&compte.role)?,
        }))
    }

    pub async fn lister(&self) -> Result<Vec<UtilisateurRow>, InternalError> {
        let rows = db::executer(
            &self.db,
            &format!("SELECT {COLONNES_SURES} FROM utilisateurs ORDER BY date_creation DESC"),
            vec![],
        )
        .await?;
        db::en_modeles(rows, "lister_utilisateurs")
    }

    pub async fn obtenir_par_id(&self, id: i64) -> Result<Option<UtilisateurRow>, InternalError> {
        let rows = db::executer(
            &self.db,
            &format!("SELECT {COLONNES_SURES} FROM utilisateurs WHERE id_utilisateur = ?"),
            vec![id.into()],
        )
        .await?;
        db::en_modele_optionnel(rows, "obtenir_utilisateur")
    }

    pub async fn obtenir_derniere_connexion(
        &self,
        id: i64,
    ) -> Result<Option<chrono::NaiveDateTime>, InternalError> {
        Ok(self
            .obtenir_par_id(id)
            .await?
            .and_then(|u| u.derniere_connexion))
    }

    /// Create an account. Username uniqueness is checked inside the same
    /// transaction as the insert.
    pub async fn creer(
        &self,
        nom_utilisateur: &str,
        mot_de_passe: &str,
        nom: &str,
        prenom: Option<&str>,
        email: Option<&str>,
        role: Role,
    ) -> Result<i64, InternalError> {
        let hash = credentials::hacher_mot_de_passe(mot_de_passe)?;
        let nom_utilisateur = nom_utilisateur.to_owned();
        let nom = nom.to_owned();
        let prenom = prenom.map(str::to_owned);
        let email = email.map(str::to_owned);

        db::executer_transaction(&self.db, move |txn| {
            Box::pin(async move {
                let existant = db::executer(
                    txn,
                    "SELECT id_utilisateur FROM utilisateurs WHERE nom_utilisateur = ?",
                    vec![nom_utilisateur.as_str().into()],
                )
                .await?;
                if !existant.is_empty() {
                    return Err(InternalError::Conflit(
                        "Ce nom d'utilisateur existe déjà".to_owned(),
                    ));
                }

                let resultat = db::executer_maj(
                    txn,
                    "INSERT INTO utilisateurs \
                     (nom_utilisateur, mot_de_passe, nom, prenom, email, role, actif, date_creation) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                    vec![
                        nom_utilisateur.as_str().into(),
                        hash.as_str().into(),
                        nom.as_str().into(),
                        prenom.into(),
                        email.into(),
                        role.as_str().into(),
                        true.into(),
                        Utc::now().naive_utc().into(),
                    ],
                )
                .await?;
                Ok(resultat.last_insert_id() as i64)
            })
        })
        .await
    }

    /// Partial update; only the provided fields are touched.
    pub async fn mettre_a_jour(
        &self,
        id: i64,
        modifications: &MajUtilisateurRequete,
    ) -> Result<(), InternalError> {
        if self.obtenir_par_id(id).await?.is_none() {
            return Err(InternalError::Introuvable("Utilisateur non trouvé".to_owned()));
        }

        let mut colonnes: Vec<&str> = Vec::new();
        let mut valeurs: Vec<sea_orm::Value> = Vec::new();

        if let Some(nom) = &modifications.nom {
            colonnes.push("nom = ?");
            valeurs.push(nom.as_str().into());
        }
        if let Some(prenom) = &modifications.prenom {
            colonnes.push("prenom = ?");
            valeurs.push(prenom.as_str().into());
        }
        if let Some(email) = &modifications.email {
            colonnes.push("email = ?");
            valeurs.push(email.as_str().into());
        }
        if let Some(role) = &modifications.role {
            let role = Role::depuis_contrat(role)
                .ok_or_else(|| InternalError::Conflit("Rôle invalide".to_owned()))?;
            colonnes.push("role = ?");
            valeurs.push(role.as_str().into());
        }
        if let Some(actif) = modifications.actif {
            colonnes.push("actif = ?");
            valeurs.push(actif.into());
        }

        if colonnes.is_empty() {
            return Ok(());
        }

        valeurs.push(id.into());
        let sql = format!(
            "UPDATE utilisateurs SET {} WHERE id_utilisateur = ?",
            colonnes.join(", ")
        );
        db::executer_maj(&self.db, &sql, valeurs).await?;
        Ok(())
    }

    /// Replace the password after verifying the current one.
    ///
    /// Returns `Ok(false)` when the current password does not match. Other
    /// sessions of the account stay valid.
    pub async fn changer_mot_de_passe(
        &self,
        id: i64,
        ancien: &str,
        nouveau: &str,
    ) -> Result<bool, InternalError> {
        let rows = db::executer(
            &self.db,
            "SELECT id_utilisateur, nom_utilisateur, mot_de_passe, nom, prenom, email, role \
             FROM utilisateurs WHERE id_utilisateur = ? AND actif = ?",
            vec![id.into(), true.into()],
        )
        .await?;
        let Some(compte) =
            db::en_modele_optionnel::<UtilisateurAuthRow>(rows, "changer_mot_de_passe")?
        else {
            return Err(InternalError::Introuvable("Utilisateur non trouvé".to_owned()));
        };

        if !credentials::verifier_mot_de_passe(ancien, &compte.mot_de_passe)? {
            return Ok(false);
        }

        let hash = credentials::hacher_mot_de_passe(nouveau)?;
        db::executer_maj(
            &self.db,
            "UPDATE utilisateurs SET mot_de_passe = ? WHERE id_utilisateur = ?",
            vec![hash.as_str().into(), id.into()],
        )
        .await?;
        Ok(true)
    }
}
