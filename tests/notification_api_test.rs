mod common;

use std::sync::Arc;

use poem::http::StatusCode;
use poem::test::TestClient;
use poem::Route;
use poem_openapi::OpenApiService;
use serde_json::json;

use common::base_de_test;
use enquete_backend::api::NotificationApi;
use enquete_backend::config::Settings;
use enquete_backend::services::Role;
use enquete_backend::AppData;

fn parametres_de_test() -> Settings {
    Settings {
        db_host: "localhost".to_owned(),
        db_user: "test".to_owned(),
        db_password: String::new(),
        db_name: "test".to_owned(),
        db_port: 3306,
        db_pool_size: 1,
        database_url: Some("sqlite::memory:".to_owned()),
        http_host: "127.0.0.1".to_owned(),
        http_port: 0,
        jwt_secret: "secret-de-test-pour-les-notifications".to_owned(),
        jwt_expires_hours: 24,
        session_hours: 24,
        superadmin_username: "root.admin".to_owned(),
        superadmin_password: "MotDePasse1!".to_owned(),
        superadmin_role: "SuperAdmin".to_owned(),
    }
}

async fn application() -> (Arc<AppData>, TestClient<Route>) {
    let db = base_de_test().await;
    let app_data = AppData::init(db, parametres_de_test());
    let service = OpenApiService::new(
        NotificationApi::new(app_data.clone()),
        "notifications",
        "1.0.0",
    );
    let client = TestClient::new(Route::new().nest("/", service));
    (app_data, client)
}

async fn session_pour(app_data: &AppData, nom: &str, role: Role) -> String {
    let id = app_data
        .utilisateurs
        .creer(nom, "MotDePasse1!", "Test", None, None, role)
        .await
        .unwrap();
    app_data.sessions.creer(id, None).await.unwrap()
}

#[tokio::test]
async fn la_creation_manuelle_est_reservee_aux_administrateurs() {
    let (app_data, client) = application().await;
    let session_rq = session_pour(&app_data, "yao", Role::ResponsableQualite).await;
    let session_admin = session_pour(&app_data, "adjoua", Role::Administrateur).await;
    let corps = json!({"titre": "Maintenance", "message": "Coupure prévue à 18h"});

    let reponse = client.post("/notifications").body_json(&corps).send().await;
    reponse.assert_status(StatusCode::UNAUTHORIZED);

    let reponse = client
        .post("/notifications")
        .header("x-session-id", &session_rq)
        .body_json(&corps)
        .send()
        .await;
    reponse.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(app_data.notifications.compter_non_lues(None).await.unwrap(), 0);

    let reponse = client
        .post("/notifications")
        .header("x-session-id", &session_admin)
        .body_json(&corps)
        .send()
        .await;
    reponse.assert_status(StatusCode::CREATED);
    assert_eq!(app_data.notifications.compter_non_lues(None).await.unwrap(), 1);

    // The creation left a trace in the activity log.
    let (logs, _) = app_data.journal.lister(1, 20).await.unwrap();
    assert!(logs.iter().any(|log| log.action == "creation_notification"));
}

#[tokio::test]
async fn le_nettoyage_est_reserve_aux_administrateurs() {
    let (app_data, client) = application().await;
    let session_rq = session_pour(&app_data, "yao", Role::ResponsableQualite).await;
    let session_admin = session_pour(&app_data, "adjoua", Role::Administrateur).await;

    let reponse = client
        .delete("/notifications/nettoyer")
        .header("x-session-id", &session_rq)
        .send()
        .await;
    reponse.assert_status(StatusCode::FORBIDDEN);

    let reponse = client
        .delete("/notifications/nettoyer")
        .header("x-session-id", &session_admin)
        .send()
        .await;
    reponse.assert_status(StatusCode::OK);

    let (logs, _) = app_data.journal.lister(1, 20).await.unwrap();
    assert!(logs.iter().any(|log| log.action == "purge_notifications"));
}

#[tokio::test]
async fn un_utilisateur_ne_marque_pas_la_notification_d_un_autre() {
    let (app_data, client) = application().await;
    let session_yao = session_pour(&app_data, "yao", Role::ResponsableQualite).await;
    let id_adjoua = app_data
        .utilisateurs
        .creer("adjoua", "MotDePasse1!", "Test", None, None, Role::Administrateur)
        .await
        .unwrap();

    let ciblee = app_data
        .notifications
        .creer("manuelle", "Privé", "Pour Adjoua", None, Some(id_adjoua), None)
        .await
        .unwrap();

    let reponse = client
        .put(format!("/notifications/{ciblee}/marquer-lue"))
        .header("x-session-id", &session_yao)
        .send()
        .await;
    reponse.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        app_data.notifications.compter_non_lues(Some(id_adjoua)).await.unwrap(),
        1
    );
}
