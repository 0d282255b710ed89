mod common;

use std::sync::Arc;

use sea_orm::Database;

use common::{base_de_test, magasin_enquetes, requete_enquete};
use enquete_backend::stores::{NotificationStore, SurveyStore};
use enquete_backend::types::dto::enquetes::{CreerEnqueteRequete, FiltreEnquetesRequete};

#[tokio::test]
async fn une_soumission_cree_l_enquete_et_sa_notification() {
    let db = base_de_test().await;
    let notifications = Arc::new(NotificationStore::new(db.clone()));
    let enquetes = SurveyStore::new(db.clone(), notifications.clone());

    let id = enquetes
        .creer(&requete_enquete(), Some("10.0.0.4"), Some("test-agent"))
        .await
        .unwrap();
    assert!(id > 0);

    let enquete = enquetes.obtenir_par_id(id).await.unwrap().unwrap();
    assert_eq!(enquete.nom_visiteur, "Kouassi");
    assert!(enquete.nom_service.is_some());

    let non_lues = notifications.non_lues(None).await.unwrap();
    assert_eq!(non_lues.len(), 1);
    assert_eq!(non_lues[0].type_notification, "nouvelle_enquete");
    assert_eq!(non_lues[0].id_enquete, Some(id));
}

#[tokio::test]
async fn une_enquete_mecontente_produit_exactement_une_alerte_dediee() {
    let db = base_de_test().await;
    let notifications = Arc::new(NotificationStore::new(db.clone()));
    let enquetes = SurveyStore::new(db.clone(), notifications.clone());

    let requete = CreerEnqueteRequete {
        niveau_satisfaction: "Mécontent".to_owned(),
        commentaires: Some("Attente trop longue".to_owned()),
        ..requete_enquete()
    };
    enquetes.creer(&requete, None, None).await.unwrap();

    assert_eq!(enquetes.compter().await.unwrap(), 1);
    let non_lues = notifications.non_lues(None).await.unwrap();
    assert_eq!(non_lues.len(), 1);
    assert_eq!(non_lues[0].type_notification, "enquete_mecontent");
    assert!(non_lues[0].message.contains("MÉCONTENTE"));
    assert!(non_lues[0].message.contains("Kouassi Awa"));
}

#[tokio::test]
async fn la_notification_en_echec_ne_perd_pas_l_enquete() {
    let db = base_de_test().await;
    // Notification store wired to an empty database: its insert fails.
    let base_sans_schema = Database::connect("sqlite::memory:").await.unwrap();
    let notifications_cassees = Arc::new(NotificationStore::new(base_sans_schema));
    let enquetes = SurveyStore::new(db.clone(), notifications_cassees);

    let id = enquetes.creer(&requete_enquete(), None, None).await.unwrap();

    assert_eq!(enquetes.compter().await.unwrap(), 1);
    assert!(enquetes.obtenir_par_id(id).await.unwrap().is_some());

    let notifications = NotificationStore::new(db);
    assert_eq!(notifications.compter_non_lues(None).await.unwrap(), 0);
}

#[tokio::test]
async fn supprimer_une_enquete_inconnue_ne_touche_pas_la_table() {
    let db = base_de_test().await;
    let notifications = Arc::new(NotificationStore::new(db.clone()));
    let enquetes = SurveyStore::new(db.clone(), notifications.clone());

    enquetes.creer(&requete_enquete(), None, None).await.unwrap();
    assert!(!enquetes.supprimer(999).await.unwrap());
    assert_eq!(enquetes.compter().await.unwrap(), 1);
    // The surviving submission keeps its notification.
    assert_eq!(notifications.compter_non_lues(None).await.unwrap(), 1);
}

#[tokio::test]
async fn supprimer_retire_l_enquete_et_ses_notifications() {
    let db = base_de_test().await;
    let notifications = Arc::new(NotificationStore::new(db.clone()));
    let enquetes = SurveyStore::new(db.clone(), notifications.clone());

    let id = enquetes.creer(&requete_enquete(), None, None).await.unwrap();
    let autre = enquetes.creer(&requete_enquete(), None, None).await.unwrap();
    assert!(enquetes.supprimer(id).await.unwrap());

    // Only the deleted submission and its notification are gone.
    assert_eq!(enquetes.compter().await.unwrap(), 1);
    let restantes = notifications.non_lues(None).await.unwrap();
    assert_eq!(restantes.len(), 1);
    assert_eq!(restantes[0].id_enquete, Some(autre));
}

#[tokio::test]
async fn la_pagination_decoupe_25_lignes_en_3_pages() {
    let db = base_de_test().await;
    let enquetes = magasin_enquetes(&db);

    for i in 0..25 {
        let requete = CreerEnqueteRequete {
            nom_visiteur: format!("Visiteur{i}"),
            ..requete_enquete()
        };
        enquetes.creer(&requete, None, None).await.unwrap();
    }

    let (page2, pagination) = enquetes.lister(2, 10).await.unwrap();
    assert_eq!(page2.len(), 10);
    assert_eq!(pagination.page, 2);
    assert_eq!(pagination.limite, 10);
    assert_eq!(pagination.total, 25);
    assert_eq!(pagination.total_pages, 3);

    let (page3, _) = enquetes.lister(3, 10).await.unwrap();
    assert_eq!(page3.len(), 5);
}

#[tokio::test]
async fn le_filtre_compose_niveau_et_service() {
    let db = base_de_test().await;
    let enquetes = magasin_enquetes(&db);

    for (niveau, service) in [
        ("Satisfait", 1),
        ("Mécontent", 1),
        ("Mécontent", 2),
        ("Satisfait", 2),
    ] {
        let requete = CreerEnqueteRequete {
            niveau_satisfaction: niveau.to_owned(),
            id_service: service,
            ..requete_enquete()
        };
        enquetes.creer(&requete, None, None).await.unwrap();
    }

    let filtre = FiltreEnquetesRequete {
        niveau_satisfaction: Some("Mécontent".to_owned()),
        id_service: Some(1),
        ..FiltreEnquetesRequete::default()
    };
    let (lignes, pagination) = enquetes.filtrer(&filtre).await.unwrap();
    assert_eq!(lignes.len(), 1);
    assert_eq!(pagination.total, 1);
    assert_eq!(lignes[0].niveau_satisfaction, "Mécontent");
    assert_eq!(lignes[0].id_service, 1);
}

#[tokio::test]
async fn les_stats_de_satisfaction_comptent_par_niveau() {
    let db = base_de_test().await;
    let enquetes = magasin_enquetes(&db);

    for niveau in ["Satisfait", "Satisfait", "Satisfait", "Mécontent"] {
        let requete = CreerEnqueteRequete {
            niveau_satisfaction: niveau.to_owned(),
            ..requete_enquete()
        };
        enquetes.creer(&requete, None, None).await.unwrap();
    }

    let stats = enquetes.stats_satisfaction(None).await.unwrap();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].niveau_satisfaction, "Satisfait");
    assert_eq!(stats[0].nombre_reponses, 3);
    assert_eq!(stats[1].nombre_reponses, 1);

    let par_service = enquetes.stats_par_service(None).await.unwrap();
    assert_eq!(par_service.len(), 1);
    assert_eq!(par_service[0].nombre_enquetes, 4);
    assert_eq!(par_service[0].satisfaits, 3);
    assert_eq!(par_service[0].mecontents, 1);
}

#[tokio::test]
async fn les_lignes_d_export_portent_le_service_et_l_adresse_ip() {
    let db = base_de_test().await;
    let enquetes = magasin_enquetes(&db);

    enquetes
        .creer(&requete_enquete(), Some("10.1.2.3"), None)
        .await
        .unwrap();

    let lignes = enquetes.lignes_export().await.unwrap();
    assert_eq!(lignes.len(), 1);
    assert_eq!(lignes[0].adresse_ip.as_deref(), Some("10.1.2.3"));
    assert!(lignes[0].nom_service.is_some());
}
