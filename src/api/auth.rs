//! Authentication and account management.

use std::sync::Arc;

use poem::Request;
use poem_openapi::param::Path;
use poem_openapi::{payload::Json, ApiResponse, OpenApi, Tags};

use crate::api::{Api, GardeAuth};
use crate::errors::ErreurApi;
use crate::services::password_rules::evaluer_mot_de_passe;
use crate::services::{Permission, Role};
use crate::types::db::utilisateur::UtilisateurRow;
use crate::types::dto::auth::{
    ChangerMotDePasseRequete, ConnexionData, ConnexionRequete, CreationUtilisateurData,
    CreerUtilisateurRequete, MajUtilisateurRequete, NettoyageSessionsData, StatutData,
    UtilisateurDto,
};
use crate::types::dto::{Enveloppe, EnveloppeVide};
use crate::types::internal::Principal;
use crate::AppData;

#[derive(Tags)]
enum AuthTags {
    Authentification,
}

#[derive(ApiResponse)]
pub enum CreationUtilisateurReponse {
    #[oai(status = 201)]
    Cree(Json<Enveloppe<CreationUtilisateurData>>),
}

pub struct AuthApi {
    app_data: Arc<AppData>,
    garde: GardeAuth,
}

impl AuthApi {
    pub fn new(app_data: Arc<AppData>) -> Self {
        let garde = GardeAuth::new(
            app_data.token_service.clone(),
            app_data.sessions.clone(),
        );
        Self { app_data, garde }
    }

    fn role_superadmin(&self) -> Role {
        Role::depuis_contrat(&self.app_data.settings.superadmin_role).unwrap_or(Role::SuperAdmin)
    }

    async fn journaliser(
        &self,
        req: &Request,
        principal: &Principal,
        action: &str,
        description: String,
    ) {
        self.app_data
            .journal
            .enregistrer(
                principal.id_utilisateur(),
                action,
                Some(&description),
                self.extraire_ip(req).as_deref(),
                self.extraire_user_agent(req).as_deref(),
            )
            .await;
    }
}

impl Api for AuthApi {}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Log in with either the configured administration account or a
    /// database user. Returns a signed token and, for database users, a
    /// server-side session id.
    #[oai(path = "/connexion", method = "post", tag = "AuthTags::Authentification")]
    async fn connexion(
        &self,
        req: &Request,
        body: Json<ConnexionRequete>,
    ) -> Result<Json<Enveloppe<ConnexionData>>, ErreurApi> {
        let nom_utilisateur = body.nom_utilisateur.trim();
        if nom_utilisateur.is_empty() || body.mot_de_passe.is_empty() {
            return Err(ErreurApi::validation(
                "Nom d'utilisateur et mot de passe requis",
            ));
        }

        let settings = &self.app_data.settings;

        // The administration account lives in configuration, not in the
        // database, and never gets a session row.
        if nom_utilisateur == settings.superadmin_username
            && body.mot_de_passe == settings.superadmin_password
        {
            let principal = Principal::SuperAdmin {
                nom_utilisateur: nom_utilisateur.to_owned(),
                role: self.role_superadmin(),
            };
            let token = self.app_data.token_service.generer(&principal)?;
            tracing::info!(nom_utilisateur, "connexion du compte d'administration");

            return Ok(Enveloppe::ok(
                "Connexion réussie",
                ConnexionData {
                    utilisateur: UtilisateurDto::from(&principal),
                    token,
                    session: None,
                },
            ));
        }

        let Some(identite) = self
            .app_data
            .utilisateurs
            .authentifier(nom_utilisateur, &body.mot_de_passe)
            .await?
        else {
            return Err(ErreurApi::non_authentifie(
                "Nom d'utilisateur ou mot de passe incorrect",
            ));
        };

        let id_session = self
            .app_data
            .sessions
            .creer(identite.id_utilisateur, None)
            .await?;
        let principal = Principal::Utilisateur(identite);
        let token = self.app_data.token_service.generer(&principal)?;

        self.journaliser(req, &principal, "connexion", "Connexion réussie".to_owned())
            .await;

        Ok(Enveloppe::ok(
            "Connexion réussie",
            ConnexionData {
                utilisateur: UtilisateurDto::from(&principal),
                token,
                session: Some(id_session),
            },
        ))
    }

    /// Close the session named by `x-session-id`, when there is one. Always
    /// succeeds so the client can forget its credentials unconditionally.
    #[oai(path = "/deconnexion", method = "post", tag = "AuthTags::Authentification")]
    async fn deconnexion(&self, req: &Request) -> Result<Json<EnveloppeVide>, ErreurApi> {
        if let Some(id_session) = req.header("x-session-id") {
            self.app_data.sessions.supprimer(id_session.trim()).await?;
        }
        if let Ok(principal) = self.garde.authentifier(req).await {
            self.journaliser(req, &principal, "deconnexion", "Déconnexion".to_owned())
                .await;
        }
        Ok(EnveloppeVide::ok("Déconnexion réussie"))
    }

    /// Identity behind the presented credentials.
    #[oai(path = "/statut", method = "get", tag = "AuthTags::Authentification")]
    async fn statut(&self, req: &Request) -> Result<Json<Enveloppe<StatutData>>, ErreurApi> {
        let principal = self.garde.authentifier(req).await?;
        let derniere_connexion = match principal.id_utilisateur() {
            Some(id) => {
                self.app_data
                    .utilisateurs
                    .obtenir_derniere_connexion(id)
                    .await?
            }
            None => None,
        };
        Ok(Enveloppe::ok(
            "Authentifié",
            StatutData {
                utilisateur: UtilisateurDto::from(&principal),
                derniere_connexion,
            },
        ))
    }

    /// Change the caller's own password. The new password must satisfy at
    /// least four of the five strength rules; other sessions stay open.
    #[oai(
        path = "/changer-mot-de-passe",
        method = "post",
        tag = "AuthTags::Authentification"
    )]
    async fn changer_mot_de_passe(
        &self,
        req: &Request,
        body: Json<ChangerMotDePasseRequete>,
    ) -> Result<Json<EnveloppeVide>, ErreurApi> {
        let principal = self.garde.authentifier(req).await?;
        let Some(id_utilisateur) = principal.id_utilisateur() else {
            return Err(ErreurApi::validation(
                "Le mot de passe du compte d'administration se gère par la configuration",
            ));
        };

        if body.nouveau_mot_de_passe != body.confirmer_mot_de_passe {
            return Err(ErreurApi::validation("Les mots de passe ne correspondent pas"));
        }
        let evaluation = evaluer_mot_de_passe(&body.nouveau_mot_de_passe);
        if !evaluation.valide {
            return Err(ErreurApi::validation(evaluation.message));
        }

        let change = self
            .app_data
            .utilisateurs
            .changer_mot_de_passe(
                id_utilisateur,
                &body.ancien_mot_de_passe,
                &body.nouveau_mot_de_passe,
            )
            .await?;
        if !change {
            return Err(ErreurApi::validation("Ancien mot de passe incorrect"));
        }

        self.journaliser(
            req,
            &principal,
            "changement_mot_de_passe",
            "Mot de passe modifié".to_owned(),
        )
        .await;
        Ok(EnveloppeVide::ok("Mot de passe modifié avec succès"))
    }

    /// Create a back-office account.
    #[oai(
        path = "/creer-utilisateur",
        method = "post",
        tag = "AuthTags::Authentification"
    )]
    async fn creer_utilisateur(
        &self,
        req: &Request,
        body: Json<CreerUtilisateurRequete>,
    ) -> Result<CreationUtilisateurReponse, ErreurApi> {
        let principal = self
            .garde
            .exiger_permission(req, Permission::GererUtilisateurs)
            .await?;

        let nom_utilisateur = body.nom_utilisateur.trim();
        if nom_utilisateur.is_empty() || body.nom.trim().is_empty() {
            return Err(ErreurApi::validation("Nom d'utilisateur et nom requis"));
        }
        let Some(role) = Role::depuis_contrat(&body.role) else {
            return Err(ErreurApi::validation("Rôle invalide"));
        };
        let evaluation = evaluer_mot_de_passe(&body.mot_de_passe);
        if !evaluation.valide {
            return Err(ErreurApi::validation(evaluation.message));
        }

        let id_utilisateur = self
            .app_data
            .utilisateurs
            .creer(
                nom_utilisateur,
                &body.mot_de_passe,
                body.nom.trim(),
                body.prenom.as_deref(),
                body.email.as_deref(),
                role,
            )
            .await?;

        self.journaliser(
            req,
            &principal,
            "creation_utilisateur",
            format!("Création de l'utilisateur {nom_utilisateur}"),
        )
        .await;

        Ok(CreationUtilisateurReponse::Cree(Enveloppe::ok(
            "Utilisateur créé avec succès",
            CreationUtilisateurData { id_utilisateur },
        )))
    }

    #[oai(path = "/utilisateurs", method = "get", tag = "AuthTags::Authentification")]
    async fn lister_utilisateurs(
        &self,
        req: &Request,
    ) -> Result<Json<Enveloppe<Vec<UtilisateurRow>>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::GererUtilisateurs)
            .await?;
        let utilisateurs = self.app_data.utilisateurs.lister().await?;
        Ok(Enveloppe::ok(
            "Utilisateurs récupérés avec succès",
            utilisateurs,
        ))
    }

    /// Partial update of an account: name, email, role, active flag.
    #[oai(
        path = "/utilisateurs/:id",
        method = "put",
        tag = "AuthTags::Authentification"
    )]
    async fn maj_utilisateur(
        &self,
        req: &Request,
        id: Path<i64>,
        body: Json<MajUtilisateurRequete>,
    ) -> Result<Json<EnveloppeVide>, ErreurApi> {
        let principal = self
            .garde
            .exiger_permission(req, Permission::GererUtilisateurs)
            .await?;

        self.app_data.utilisateurs.mettre_a_jour(id.0, &body).await?;

        self.journaliser(
            req,
            &principal,
            "modification_utilisateur",
            format!("Modification de l'utilisateur {}", id.0),
        )
        .await;
        Ok(EnveloppeVide::ok("Utilisateur mis à jour avec succès"))
    }

    /// Delete expired session rows immediately instead of waiting for the
    /// hourly sweep.
    #[oai(
        path = "/nettoyer-sessions",
        method = "post",
        tag = "AuthTags::Authentification"
    )]
    async fn nettoyer_sessions(
        &self,
        req: &Request,
    ) -> Result<Json<Enveloppe<NettoyageSessionsData>>, ErreurApi> {
        self.garde
            .exiger_permission(req, Permission::GererUtilisateurs)
            .await?;
        let sessions_supprimees = self.app_data.sessions.purger_expirees().await?;
        Ok(Enveloppe::ok(
            "Sessions expirées nettoyées",
            NettoyageSessionsData { sessions_supprimees },
        ))
    }
}
