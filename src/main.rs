use std::time::Duration;

use migration::{Migrator, MigratorTrait};
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use sea_orm::{ConnectOptions, Database};

use enquete_backend::api::{
    AuthApi, DashboardApi, EnqueteApi, HealthApi, NotificationApi, ServiceApi, StatistiqueApi,
};
use enquete_backend::config::{init_logging, Settings, SystemEnvironment};
use enquete_backend::AppData;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    dotenv::dotenv().ok();

    // The guard flushes the file appender on drop; keep it for the whole run.
    let _guard_journal = match init_logging() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Initialisation des journaux impossible: {e}");
            std::process::exit(1);
        }
    };

    let settings = match Settings::load(&SystemEnvironment) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!(erreur = %e, "configuration incomplète, arrêt");
            std::process::exit(1);
        }
    };

    let mut options = ConnectOptions::new(settings.database_url());
    options
        .max_connections(settings.db_pool_size)
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    let db = match Database::connect(options).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(erreur = %e, "connexion à la base de données impossible");
            std::process::exit(1);
        }
    };
    tracing::info!("connexion à la base de données établie");

    if let Err(e) = Migrator::up(&db, None).await {
        tracing::error!(erreur = %e, "échec des migrations");
        std::process::exit(1);
    }
    tracing::info!("migrations appliquées");

    let app_data = AppData::init(db.clone(), settings.clone());

    // Expired sessions are swept at startup, then hourly.
    match app_data.sessions.purger_expirees().await {
        Ok(n) if n > 0 => tracing::info!(sessions = n, "sessions expirées purgées au démarrage"),
        Ok(_) => {}
        Err(e) => tracing::warn!(erreur = %e, "purge des sessions au démarrage échouée"),
    }
    let sessions_fond = app_data.sessions.clone();
    tokio::spawn(async move {
        let mut tic = tokio::time::interval(Duration::from_secs(3600));
        tic.tick().await;
        loop {
            tic.tick().await;
            match sessions_fond.purger_expirees().await {
                Ok(n) if n > 0 => tracing::info!(sessions = n, "sessions expirées purgées"),
                Ok(_) => {}
                Err(e) => tracing::warn!(erreur = %e, "purge périodique des sessions échouée"),
            }
        }
    });

    let api_service = OpenApiService::new(
        (
            HealthApi,
            AuthApi::new(app_data.clone()),
            EnqueteApi::new(app_data.clone()),
            ServiceApi::new(app_data.clone()),
            StatistiqueApi::new(app_data.clone()),
            NotificationApi::new(app_data.clone()),
            DashboardApi::new(app_data.clone()),
        ),
        "Enquête de Satisfaction",
        "1.0.0",
    )
    .server(format!("http://{}/api", settings.adresse_ecoute()));

    let ui = api_service.swagger_ui();
    let app = Route::new().nest("/api", api_service).nest("/swagger", ui);

    let adresse = settings.adresse_ecoute();
    tracing::info!(adresse = %adresse, "démarrage du serveur");

    let resultat = Server::new(TcpListener::bind(adresse))
        .run_with_graceful_shutdown(
            app,
            async {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("signal d'arrêt reçu");
            },
            Some(Duration::from_secs(10)),
        )
        .await;

    if let Err(e) = db.close().await {
        tracing::warn!(erreur = %e, "fermeture de la connexion base de données échouée");
    }

    resultat
}
