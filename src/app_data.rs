use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Settings;
use crate::services::TokenService;
use crate::stores::{
    ActivityLogStore, NotificationStore, ServiceStore, SessionStore, SurveyStore, UserStore,
};

/// Everything the request handlers share: the connection pool, the domain
/// stores and the token service. Created once in `main`, wrapped in an
/// `Arc`, read-only afterwards.
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: Settings,
    pub token_service: Arc<TokenService>,
    pub utilisateurs: Arc<UserStore>,
    pub sessions: Arc<SessionStore>,
    pub services: Arc<ServiceStore>,
    pub notifications: Arc<NotificationStore>,
    pub enquetes: Arc<SurveyStore>,
    pub journal: Arc<ActivityLogStore>,
}

impl AppData {
    /// Wire the stores. The database must already be connected and migrated.
    pub fn init(db: DatabaseConnection, settings: Settings) -> Arc<Self> {
        let token_service = Arc::new(TokenService::new(
            settings.jwt_secret.clone(),
            settings.jwt_expires_hours,
        ));

        let notifications = Arc::new(NotificationStore::new(db.clone()));
        // SurveyStore owns its notification side channel so a submission can
        // raise the alert in the same call.
        let enquetes = Arc::new(SurveyStore::new(db.clone(), notifications.clone()));

        Arc::new(Self {
            utilisateurs: Arc::new(UserStore::new(db.clone())),
            sessions: Arc::new(SessionStore::new(db.clone(), settings.session_hours)),
            services: Arc::new(ServiceStore::new(db.clone())),
            journal: Arc::new(ActivityLogStore::new(db.clone())),
            notifications,
            enquetes,
            token_service,
            db,
            settings,
        })
    }
}
