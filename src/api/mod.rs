// API layer - HTTP endpoints

pub mod auth;
pub mod dashboard;
pub mod enquetes;
pub mod health;
pub mod notifications;
pub mod services;
pub mod statistiques;

use std::sync::Arc;

pub use auth::AuthApi;
pub use dashboard::DashboardApi;
pub use enquetes::EnqueteApi;
pub use health::HealthApi;
pub use notifications::NotificationApi;
pub use services::ServiceApi;
pub use statistiques::StatistiqueApi;

use poem::Request;

use crate::errors::ErreurApi;
use crate::services::{permissions, Permission, TokenService};
use crate::stores::SessionStore;
use crate::types::internal::Principal;

pub trait Api {
    fn extraire_ip(&self, req: &Request) -> Option<String> {
        // Proxy / load balancer first.
        if let Some(transmis) = req.header("X-Forwarded-For") {
            if let Some(ip) = transmis.split(',').next() {
                let ip = ip.trim();
                if !ip.is_empty() {
                    return Some(ip.to_owned());
                }
            }
        }

        if let Some(ip_reelle) = req.header("X-Real-IP") {
            return Some(ip_reelle.trim().to_owned());
        }

        req.remote_addr()
            .as_socket_addr()
            .map(|addr| addr.ip().to_string())
    }

    fn extraire_user_agent(&self, req: &Request) -> Option<String> {
        req.header("User-Agent").map(str::to_owned)
    }
}

/// Resolves the request principal from either credential channel.
///
/// Bearer token wins when both headers are present; `x-session-id` is the
/// fallback used by the browser front end.
pub struct GardeAuth {
    token_service: Arc<TokenService>,
    sessions: Arc<SessionStore>,
}

impl GardeAuth {
    pub fn new(token_service: Arc<TokenService>, sessions: Arc<SessionStore>) -> Self {
        Self {
            token_service,
            sessions,
        }
    }

    pub async fn authentifier(&self, req: &Request) -> Result<Principal, ErreurApi> {
        if let Some(entete) = req.header("Authorization") {
            if let Some(token) = entete.strip_prefix("Bearer ") {
                let claims = self.token_service.valider(token.trim())?;
                return Ok(self.token_service.principal_depuis_claims(&claims)?);
            }
        }

        if let Some(id_session) = req.header("x-session-id") {
            return match self.sessions.verifier(id_session.trim()).await? {
                Some(identite) => Ok(Principal::Utilisateur(identite)),
                None => Err(ErreurApi::non_authentifie("Session invalide ou expirée")),
            };
        }

        Err(ErreurApi::non_authentifie("Authentification requise"))
    }

    pub async fn exiger_permission(
        &self,
        req: &Request,
        permission: Permission,
    ) -> Result<Principal, ErreurApi> {
        let principal = self.authentifier(req).await?;
        if !permissions::a_permission(principal.role(), permission) {
            return Err(ErreurApi::acces_refuse(
                "Vous n'avez pas la permission d'effectuer cette action",
            ));
        }
        Ok(principal)
    }
}
