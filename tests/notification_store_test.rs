mod common;

use common::base_de_test;
use enquete_backend::db;
use enquete_backend::errors::InternalError;
use enquete_backend::services::Role;
use enquete_backend::stores::{NotificationStore, UserStore};

async fn utilisateur_de_test(db: &sea_orm::DatabaseConnection, nom: &str) -> i64 {
    UserStore::new(db.clone())
        .creer(nom, "MotDePasse1!", "Test", None, None, Role::Administrateur)
        .await
        .unwrap()
}

#[tokio::test]
async fn une_notification_ciblee_reste_invisible_aux_autres() {
    let db = base_de_test().await;
    let notifications = NotificationStore::new(db.clone());
    let id_awa = utilisateur_de_test(&db, "awa").await;
    let id_koffi = utilisateur_de_test(&db, "koffi").await;

    notifications
        .creer("alerte_systeme", "Diffusion", "Pour tout le monde", None, None, None)
        .await
        .unwrap();
    notifications
        .creer("alerte_systeme", "Privé", "Pour Awa seulement", None, Some(id_awa), None)
        .await
        .unwrap();

    assert_eq!(notifications.non_lues(Some(id_awa)).await.unwrap().len(), 2);
    assert_eq!(notifications.non_lues(Some(id_koffi)).await.unwrap().len(), 1);
    // Anonymous consumers only see broadcasts.
    assert_eq!(notifications.non_lues(None).await.unwrap().len(), 1);
    assert_eq!(notifications.compter_non_lues(Some(id_awa)).await.unwrap(), 2);
    assert_eq!(notifications.compter_non_lues(None).await.unwrap(), 1);
}

#[tokio::test]
async fn marquer_lue_retire_la_notification_du_flux() {
    let db = base_de_test().await;
    let notifications = NotificationStore::new(db);

    let id = notifications
        .creer("alerte_systeme", "Titre", "Message", None, None, None)
        .await
        .unwrap();

    assert!(notifications.marquer_lue(id, None).await.unwrap());
    assert_eq!(notifications.compter_non_lues(None).await.unwrap(), 0);
    assert!(!notifications.marquer_lue(999, None).await.unwrap());

    // Read rows still appear in the history.
    let (historique, pagination) = notifications.historique(1, 20).await.unwrap();
    assert_eq!(historique.len(), 1);
    assert!(historique[0].lu);
    assert_eq!(pagination.total, 1);
}

#[tokio::test]
async fn marquer_lue_respecte_le_destinataire() {
    let db = base_de_test().await;
    let notifications = NotificationStore::new(db.clone());
    let id_awa = utilisateur_de_test(&db, "awa").await;
    let id_koffi = utilisateur_de_test(&db, "koffi").await;

    let ciblee = notifications
        .creer("manuelle", "Privé", "Pour Awa seulement", None, Some(id_awa), None)
        .await
        .unwrap();

    // Neither another user nor an anonymous reader can mark it read.
    assert!(!notifications.marquer_lue(ciblee, Some(id_koffi)).await.unwrap());
    assert!(!notifications.marquer_lue(ciblee, None).await.unwrap());
    assert_eq!(notifications.compter_non_lues(Some(id_awa)).await.unwrap(), 1);

    assert!(notifications.marquer_lue(ciblee, Some(id_awa)).await.unwrap());
    assert_eq!(notifications.compter_non_lues(Some(id_awa)).await.unwrap(), 0);
}

#[tokio::test]
async fn un_type_de_notification_inconnu_est_refuse() {
    let db = base_de_test().await;
    let notifications = NotificationStore::new(db);

    let erreur = notifications
        .creer("bulletin", "Titre", "Message", None, None, None)
        .await
        .unwrap_err();
    assert!(matches!(erreur, InternalError::Conflit(_)));

    // The four contract values all pass.
    for type_notification in enquete_backend::stores::notification_store::TYPES_NOTIFICATION {
        notifications
            .creer(type_notification, "Titre", "Message", None, None, None)
            .await
            .unwrap();
    }
}

#[tokio::test]
async fn marquer_toutes_lues_ne_touche_que_le_perimetre_du_lecteur() {
    let db = base_de_test().await;
    let notifications = NotificationStore::new(db.clone());
    let id_awa = utilisateur_de_test(&db, "awa").await;
    let id_koffi = utilisateur_de_test(&db, "koffi").await;

    notifications
        .creer("alerte_systeme", "Diffusion", "Pour tout le monde", None, None, None)
        .await
        .unwrap();
    notifications
        .creer("alerte_systeme", "Privé", "Pour Awa", None, Some(id_awa), None)
        .await
        .unwrap();
    notifications
        .creer("alerte_systeme", "Privé", "Pour Koffi", None, Some(id_koffi), None)
        .await
        .unwrap();

    assert_eq!(notifications.marquer_toutes_lues(Some(id_awa)).await.unwrap(), 2);
    assert_eq!(notifications.compter_non_lues(Some(id_awa)).await.unwrap(), 0);
    // Koffi's targeted notification was outside Awa's scope.
    assert_eq!(notifications.compter_non_lues(Some(id_koffi)).await.unwrap(), 1);
}

#[tokio::test]
async fn les_mises_a_jour_suivent_le_curseur_du_client() {
    let db = base_de_test().await;
    let notifications = NotificationStore::new(db);

    let premier = notifications
        .creer("alerte_systeme", "Un", "Premier", None, None, None)
        .await
        .unwrap();
    let deuxieme = notifications
        .creer("alerte_systeme", "Deux", "Deuxième", None, None, None)
        .await
        .unwrap();
    let troisieme = notifications
        .creer("alerte_systeme", "Trois", "Troisième", None, None, None)
        .await
        .unwrap();

    let nouvelles = notifications.mises_a_jour(premier, None).await.unwrap();
    assert_eq!(nouvelles.len(), 2);
    // Oldest first so the client can advance its cursor in order.
    assert_eq!(nouvelles[0].id_notification, deuxieme);
    assert_eq!(nouvelles[1].id_notification, troisieme);

    assert!(notifications.mises_a_jour(troisieme, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn la_purge_ne_supprime_que_les_lues_anciennes() {
    let db = base_de_test().await;
    let notifications = NotificationStore::new(db.clone());

    let ancienne_lue = notifications
        .creer("alerte_systeme", "Vieille", "Lue depuis longtemps", None, None, None)
        .await
        .unwrap();
    let ancienne_non_lue = notifications
        .creer("alerte_systeme", "Vieille", "Jamais lue", None, None, None)
        .await
        .unwrap();
    let recente_lue = notifications
        .creer("alerte_systeme", "Récente", "Lue hier", None, None, None)
        .await
        .unwrap();

    assert!(notifications.marquer_lue(ancienne_lue, None).await.unwrap());
    assert!(notifications.marquer_lue(recente_lue, None).await.unwrap());

    // Backdate the two old rows past the retention window.
    let seuil = chrono::Utc::now().naive_utc() - chrono::Duration::days(40);
    db::executer_maj(
        &db,
        "UPDATE notifications SET date_creation = ? WHERE id_notification IN (?, ?)",
        vec![seuil.into(), ancienne_lue.into(), ancienne_non_lue.into()],
    )
    .await
    .unwrap();

    assert_eq!(notifications.purger(30).await.unwrap(), 1);

    let (restantes, _) = notifications.historique(1, 20).await.unwrap();
    let ids: Vec<i64> = restantes.iter().map(|n| n.id_notification).collect();
    assert!(!ids.contains(&ancienne_lue));
    assert!(ids.contains(&ancienne_non_lue));
    assert!(ids.contains(&recente_lue));
}

#[tokio::test]
async fn les_donnees_supplementaires_survivent_a_l_aller_retour_json() {
    let db = base_de_test().await;
    let notifications = NotificationStore::new(db);

    let donnees = serde_json::json!({"satisfaction": "Satisfait", "service": "Laboratoire"});
    notifications
        .creer("alerte_systeme", "Titre", "Message", None, None, Some(donnees.clone()))
        .await
        .unwrap();

    let non_lues = notifications.non_lues(None).await.unwrap();
    assert_eq!(non_lues.len(), 1);
    let stockees: serde_json::Value =
        serde_json::from_str(non_lues[0].donnees_supplementaires.as_deref().unwrap()).unwrap();
    assert_eq!(stockees, donnees);
}
