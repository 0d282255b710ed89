mod common;

use common::base_de_test;
use enquete_backend::errors::InternalError;
use enquete_backend::services::Role;
use enquete_backend::stores::{SessionStore, UserStore};
use enquete_backend::types::dto::auth::MajUtilisateurRequete;

#[tokio::test]
async fn creation_puis_authentification() {
    let db = base_de_test().await;
    let utilisateurs = UserStore::new(db);

    let id = utilisateurs
        .creer(
            "zadjehi",
            "MotDePasse1!",
            "Zadjehi",
            Some("Eric"),
            Some("eric@clinique.ci"),
            Role::Administrateur,
        )
        .await
        .unwrap();
    assert!(id > 0);

    let identite = utilisateurs
        .authentifier("zadjehi", "MotDePasse1!")
        .await
        .unwrap()
        .expect("identifiants valides");
    assert_eq!(identite.id_utilisateur, id);
    assert_eq!(identite.role, Role::Administrateur);

    assert!(utilisateurs
        .authentifier("zadjehi", "mauvais")
        .await
        .unwrap()
        .is_none());
    assert!(utilisateurs
        .authentifier("inconnu", "MotDePasse1!")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn le_nom_d_utilisateur_est_unique() {
    let db = base_de_test().await;
    let utilisateurs = UserStore::new(db);

    utilisateurs
        .creer("zadjehi", "MotDePasse1!", "Zadjehi", None, None, Role::Administrateur)
        .await
        .unwrap();
    let err = utilisateurs
        .creer("zadjehi", "AutreMotDePasse1!", "Autre", None, None, Role::ResponsableQualite)
        .await
        .unwrap_err();
    assert!(matches!(err, InternalError::Conflit(_)));

    assert_eq!(utilisateurs.lister().await.unwrap().len(), 1);
}

#[tokio::test]
async fn un_compte_desactive_ne_se_connecte_plus() {
    let db = base_de_test().await;
    let utilisateurs = UserStore::new(db);

    let id = utilisateurs
        .creer("zadjehi", "MotDePasse1!", "Zadjehi", None, None, Role::Administrateur)
        .await
        .unwrap();

    let modifications = MajUtilisateurRequete {
        actif: Some(false),
        ..Default::default()
    };
    utilisateurs.mettre_a_jour(id, &modifications).await.unwrap();

    assert!(utilisateurs
        .authentifier("zadjehi", "MotDePasse1!")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn un_role_inconnu_est_refuse_a_la_mise_a_jour() {
    let db = base_de_test().await;
    let utilisateurs = UserStore::new(db);

    let id = utilisateurs
        .creer("zadjehi", "MotDePasse1!", "Zadjehi", None, None, Role::Administrateur)
        .await
        .unwrap();

    let modifications = MajUtilisateurRequete {
        role: Some("Stagiaire".to_owned()),
        ..Default::default()
    };
    let err = utilisateurs.mettre_a_jour(id, &modifications).await.unwrap_err();
    assert!(matches!(err, InternalError::Conflit(_)));

    let err = utilisateurs
        .mettre_a_jour(999, &MajUtilisateurRequete::default())
        .await
        .unwrap_err();
    assert!(matches!(err, InternalError::Introuvable(_)));
}

#[tokio::test]
async fn cycle_de_vie_d_une_session() {
    let db = base_de_test().await;
    let utilisateurs = UserStore::new(db.clone());
    let sessions = SessionStore::new(db, 24);

    let id = utilisateurs
        .creer("zadjehi", "MotDePasse1!", "Zadjehi", None, None, Role::Administrateur)
        .await
        .unwrap();

    let id_session = sessions.creer(id, None).await.unwrap();
    assert!(id_session.starts_with("session_"));

    let identite = sessions
        .verifier(&id_session)
        .await
        .unwrap()
        .expect("session valide");
    assert_eq!(identite.id_utilisateur, id);

    sessions.supprimer(&id_session).await.unwrap();
    assert!(sessions.verifier(&id_session).await.unwrap().is_none());
    assert!(sessions.verifier("session_inconnue").await.unwrap().is_none());
}

#[tokio::test]
async fn une_session_expiree_est_purgee_a_la_lecture() {
    let db = base_de_test().await;
    let utilisateurs = UserStore::new(db.clone());
    // Negative lifetime: every session is born expired.
    let sessions_expirantes = SessionStore::new(db.clone(), -1);
    let sessions = SessionStore::new(db, 24);

    let id = utilisateurs
        .creer("zadjehi", "MotDePasse1!", "Zadjehi", None, None, Role::Administrateur)
        .await
        .unwrap();

    let id_session = sessions_expirantes.creer(id, None).await.unwrap();
    assert!(sessions.verifier(&id_session).await.unwrap().is_none());
    // The row was lazily deleted; the sweep has nothing left to do.
    assert_eq!(sessions.purger_expirees().await.unwrap(), 0);

    sessions_expirantes.creer(id, None).await.unwrap();
    sessions.creer(id, None).await.unwrap();
    assert_eq!(sessions.purger_expirees().await.unwrap(), 1);
}

#[tokio::test]
async fn changement_de_mot_de_passe_verifie_l_ancien() {
    let db = base_de_test().await;
    let utilisateurs = UserStore::new(db);

    let id = utilisateurs
        .creer("zadjehi", "MotDePasse1!", "Zadjehi", None, None, Role::Administrateur)
        .await
        .unwrap();

    assert!(!utilisateurs
        .changer_mot_de_passe(id, "mauvais", "NouveauMotDePasse1!")
        .await
        .unwrap());
    assert!(utilisateurs
        .changer_mot_de_passe(id, "MotDePasse1!", "NouveauMotDePasse1!")
        .await
        .unwrap());

    assert!(utilisateurs
        .authentifier("zadjehi", "NouveauMotDePasse1!")
        .await
        .unwrap()
        .is_some());
    assert!(utilisateurs
        .authentifier("zadjehi", "MotDePasse1!")
        .await
        .unwrap()
        .is_none());
}
