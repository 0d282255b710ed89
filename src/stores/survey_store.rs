//! Survey submissions, the public write path and the back-office read path.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, Utc};
use sea_orm::DatabaseConnection;

use crate::db;
use crate::errors::InternalError;
use crate::stores::NotificationStore;
use crate::types::db::enquete::{EnqueteExportRow, EnqueteRow};
use crate::types::db::stats::{
    StatMensuelleRow, StatRaisonRow, StatRecentesRow, StatSatisfactionRow, StatServiceRow,
};
use crate::types::dto::enquetes::{CreerEnqueteRequete, FiltreEnquetesRequete};
use crate::types::dto::PaginationDto;

pub const RAISONS_VALIDES: [&str; 3] =
    ["Information", "Prise de sang (Bilan)", "Retrait de résultat"];
pub const NIVEAUX_SATISFACTION: [&str; 2] = ["Satisfait", "Mécontent"];

const LONGUEUR_MAX_TEXTE: usize = 1000;

const COLONNES_JOINTES: &str =
    "e.id_enquete, e.date_heure_visite, e.nom_visiteur, e.prenom_visiteur, e.telephone, \
     e.email, e.raison_presence, e.niveau_satisfaction, e.id_service, e.commentaires, \
     e.recommandations, e.date_soumission, s.nom_service, s.description_service";

const JOINTURE: &str =
    "FROM enquetes e LEFT JOIN services s ON s.id_service = e.id_service";

/// Visit timestamps come from an HTML form; both the `T`-separated and the
/// space-separated spellings are accepted, with or without seconds.
pub fn analyser_date_visite(brut: &str) -> Option<NaiveDateTime> {
    let brut = brut.trim();
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(brut, format) {
            return Some(date);
        }
    }
    NaiveDate::parse_from_str(brut, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Ivorian phone number: 8 to 10 digits, optional `+225` prefix.
fn telephone_valide(telephone: &str) -> bool {
    let chiffres = match telephone.strip_prefix("+225") {
        Some(reste) => reste.strip_prefix(|c: char| c.is_whitespace()).unwrap_or(reste),
        None => telephone,
    };
    (8..=10).contains(&chiffres.len()) && chiffres.chars().all(|c| c.is_ascii_digit())
}

fn email_valide(email: &str) -> bool {
    let Some((local, domaine)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.chars().any(|c| c.is_whitespace() || c == '@') {
        return false;
    }
    if domaine.chars().any(|c| c.is_whitespace() || c == '@') {
        return false;
    }
    match domaine.rsplit_once('.') {
        Some((avant, apres)) => !avant.is_empty() && !apres.is_empty(),
        None => false,
    }
}

/// Validate a submission. Returns every failed rule at once so the form can
/// show them all; an empty list means the payload is acceptable.
pub fn valider_enquete(requete: &CreerEnqueteRequete) -> Vec<String> {
    let mut erreurs = Vec::new();

    if analyser_date_visite(&requete.date_heure_visite).is_none() {
        erreurs.push("Date et heure de visite obligatoires".to_owned());
    }
    if requete.nom_visiteur.trim().chars().count() < 2 {
        erreurs.push("Nom visiteur obligatoire (minimum 2 caractères)".to_owned());
    }
    if !telephone_valide(requete.telephone.trim()) {
        erreurs.push("Numéro de téléphone valide obligatoire (format ivoirien)".to_owned());
    }
    if let Some(email) = requete.email.as_deref() {
        if !email.is_empty() && !email_valide(email) {
            erreurs.push("Format email invalide".to_owned());
        }
    }
    if !RAISONS_VALIDES.contains(&requete.raison_presence.as_str()) {
        erreurs.push("Raison de présence invalide".to_owned());
    }
    if !NIVEAUX_SATISFACTION.contains(&requete.niveau_satisfaction.as_str()) {
        erreurs.push("Niveau de satisfaction invalide".to_owned());
    }
    if requete.id_service < 1 {
        erreurs.push("Service obligatoire".to_owned());
    }
    if requete
        .commentaires
        .as_deref()
        .is_some_and(|c| c.chars().count() > LONGUEUR_MAX_TEXTE)
    {
        erreurs.push("Commentaires trop longs (maximum 1000 caractères)".to_owned());
    }
    if requete
        .recommandations
        .as_deref()
        .is_some_and(|r| r.chars().count() > LONGUEUR_MAX_TEXTE)
    {
        erreurs.push("Recommandations trop longues (maximum 1000 caractères)".to_owned());
    }

    erreurs
}

pub struct SurveyStore {
    db: DatabaseConnection,
    notifications: Arc<NotificationStore>,
}

impl SurveyStore {
    pub fn new(db: DatabaseConnection, notifications: Arc<NotificationStore>) -> Self {
        Self { db, notifications }
    }

    /// Persist a validated submission and return its id.
    ///
    /// The follow-up notification is best effort: a failure there is logged
    /// and the survey stays committed, since losing a visitor's answer is
    /// worse than losing a banner in the back office.
    pub async fn creer(
        &self,
        requete: &CreerEnqueteRequete,
        adresse_ip: Option<&str>,
        user_agent: Option<&str>,
    ) -> Result<i64, InternalError> {
        let date_visite = analyser_date_visite(&requete.date_heure_visite)
            .ok_or_else(|| InternalError::Conflit("Date et heure de visite obligatoires".to_owned()))?;

        let resultat = db::executer_maj(
            &self.db,
            "INSERT INTO enquetes \
             (date_heure_visite, nom_visiteur, prenom_visiteur, telephone, email, \
              raison_presence, niveau_satisfaction, id_service, commentaires, \
              recommandations, date_soumission, adresse_ip, user_agent) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            vec![
                date_visite.into(),
                requete.nom_visiteur.trim().into(),
                requete.prenom_visiteur.as_deref().map(str::trim).map(str::to_owned).into(),
                requete.telephone.trim().into(),
                requete.email.as_deref().map(str::trim).map(str::to_owned).into(),
                requete.raison_presence.as_str().into(),
                requete.niveau_satisfaction.as_str().into(),
                requete.id_service.into(),
                requete.commentaires.clone().into(),
                requete.recommandations.clone().into(),
                Utc::now().naive_utc().into(),
                adresse_ip.map(str::to_owned).into(),
                user_agent.map(str::to_owned).into(),
            ],
        )
        .await?;
        let id_enquete = resultat.last_insert_id() as i64;

        match self.obtenir_par_id(id_enquete).await {
            Ok(Some(enquete)) => {
                if let Err(e) = self.notifications.creer_pour_enquete(&enquete).await {
                    tracing::warn!(erreur = %e, id_enquete, "notification d'enquête non créée");
                }
            }
            Ok(None) => {
                tracing::warn!(id_enquete, "enquête introuvable juste après insertion");
            }
            Err(e) => {
                tracing::warn!(erreur = %e, id_enquete, "relecture de l'enquête échouée");
            }
        }

        Ok(id_enquete)
    }

    pub async fn obtenir_par_id(&self, id: i64) -> Result<Option<EnqueteRow>, InternalError> {
        let rows = db::executer(
            &self.db,
            &format!("SELECT {COLONNES_JOINTES} {JOINTURE} WHERE e.id_enquete = ?"),
            vec![id.into()],
        )
        .await?;
        db::en_modele_optionnel(rows, "obtenir_enquete")
    }

    pub async fn lister(
        &self,
        page: i64,
        limite: i64,
    ) -> Result<(Vec<EnqueteRow>, PaginationDto), InternalError> {
        self.lister_filtre("", vec![], page, limite).await
    }

    /// Apply the back-office filter form. Criteria compose with AND; absent
    /// criteria do not constrain.
    pub async fn filtrer(
        &self,
        filtre: &FiltreEnquetesRequete,
    ) -> Result<(Vec<EnqueteRow>, PaginationDto), InternalError> {
        let mut clauses: Vec<String> = Vec::new();
        let mut valeurs: Vec<sea_orm::Value> = Vec::new();

        if let Some(debut) = filtre.date_debut.as_deref().filter(|d| !d.is_empty()) {
            let date = NaiveDate::parse_from_str(debut, "%Y-%m-%d")
                .map_err(|_| InternalError::Conflit("Format de date invalide".to_owned()))?;
            clauses.push("e.date_soumission >= ?".to_owned());
            valeurs.push(date.and_hms_opt(0, 0, 0).unwrap_or_default().into());
        }
        if let Some(fin) = filtre.date_fin.as_deref().filter(|d| !d.is_empty()) {
            let date = NaiveDate::parse_from_str(fin, "%Y-%m-%d")
                .map_err(|_| InternalError::Conflit("Format de date invalide".to_owned()))?;
            clauses.push("e.date_soumission <= ?".to_owned());
            valeurs.push(date.and_hms_opt(23, 59, 59).unwrap_or_default().into());
        }
        if let Some(niveau) = filtre.niveau_satisfaction.as_deref().filter(|n| !n.is_empty()) {
            clauses.push("e.niveau_satisfaction = ?".to_owned());
            valeurs.push(niveau.into());
        }
        if let Some(id_service) = filtre.id_service {
            clauses.push("e.id_service = ?".to_owned());
            valeurs.push(id_service.into());
        }
        if let Some(raison) = filtre.raison_presence.as_deref().filter(|r| !r.is_empty()) {
            clauses.push("e.raison_presence = ?".to_owned());
            valeurs.push(raison.into());
        }

        let condition = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        self.lister_filtre(
            &condition,
            valeurs,
            filtre.page.unwrap_or(1),
            filtre.limite.unwrap_or(20),
        )
        .await
    }

    async fn lister_filtre(
        &self,
        condition: &str,
        valeurs: Vec<sea_orm::Value>,
        page: i64,
        limite: i64,
    ) -> Result<(Vec<EnqueteRow>, PaginationDto), InternalError> {
        let total = self.compter_filtre(condition, valeurs.clone()).await?;
        let (page, limite, _) = db::borner_pagination(page, limite);

        let rows = db::executer_pagine(
            &self.db,
            &format!(
                "SELECT {COLONNES_JOINTES} {JOINTURE} {condition} \
                 ORDER BY e.date_soumission DESC"
            ),
            valeurs,
            page as i64,
            limite as i64,
        )
        .await?;
        let enquetes = db::en_modeles(rows, "lister_enquetes")?;

        Ok((
            enquetes,
            PaginationDto {
                page,
                limite,
                total,
                total_pages: db::total_pages(total, limite),
            },
        ))
    }

    async fn compter_filtre(
        &self,
        condition: &str,
        valeurs: Vec<sea_orm::Value>,
    ) -> Result<u64, InternalError> {
        let rows = db::executer(
            &self.db,
            &format!("SELECT CAST(COUNT(*) AS SIGNED) AS total {JOINTURE} {condition}"),
            valeurs,
        )
        .await?;
        let total: i64 = rows
            .first()
            .map(|row| row.try_get("", "total"))
            .transpose()
            .map_err(|e| InternalError::database("compter_enquetes", e))?
            .unwrap_or(0);
        Ok(total.max(0) as u64)
    }

    pub async fn compter(&self) -> Result<i64, InternalError> {
        Ok(self.compter_filtre("", vec![]).await? as i64)
    }

    /// Delete a submission and its linked notifications in one transaction.
    /// Returns `false` when the id matches nothing.
    pub async fn supprimer(&self, id: i64) -> Result<bool, InternalError> {
        db::executer_transaction(&self.db, move |txn| {
            Box::pin(async move {
                db::executer_maj(
                    txn,
                    "DELETE FROM notifications WHERE id_enquete = ?",
                    vec![id.into()],
                )
                .await?;
                let resultat = db::executer_maj(
                    txn,
                    "DELETE FROM enquetes WHERE id_enquete = ?",
                    vec![id.into()],
                )
                .await?;
                Ok(resultat.rows_affected() > 0)
            })
        })
        .await
    }

    fn condition_periode(periode: Option<(NaiveDateTime, NaiveDateTime)>) -> (String, Vec<sea_orm::Value>) {
        match periode {
            Some((debut, fin)) => (
                "WHERE e.date_soumission BETWEEN ? AND ?".to_owned(),
                vec![debut.into(), fin.into()],
            ),
            None => (String::new(), vec![]),
        }
    }

    pub async fn stats_satisfaction(
        &self,
        periode: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> Result<Vec<StatSatisfactionRow>, InternalError> {
        let (condition, valeurs) = Self::condition_periode(periode);
        let rows = db::executer(
            &self.db,
            &format!(
                "SELECT e.niveau_satisfaction, CAST(COUNT(*) AS SIGNED) AS nombre_reponses \
                 FROM enquetes e {condition} \
                 GROUP BY e.niveau_satisfaction ORDER BY nombre_reponses DESC"
            ),
            valeurs,
        )
        .await?;
        db::en_modeles(rows, "stats_satisfaction")
    }

    pub async fn stats_par_service(
        &self,
        periode: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> Result<Vec<StatServiceRow>, InternalError> {
        let (condition, valeurs) = Self::condition_periode(periode);
        let rows = db::executer(
            &self.db,
            &format!(
                "SELECT s.nom_service, CAST(COUNT(*) AS SIGNED) AS nombre_enquetes, \
                 COALESCE(CAST(SUM(CASE WHEN e.niveau_satisfaction = 'Satisfait' THEN 1 ELSE 0 END) AS SIGNED), 0) AS satisfaits, \
                 COALESCE(CAST(SUM(CASE WHEN e.niveau_satisfaction = 'Mécontent' THEN 1 ELSE 0 END) AS SIGNED), 0) AS mecontents \
                 FROM enquetes e JOIN services s ON s.id_service = e.id_service {condition} \
                 GROUP BY s.nom_service ORDER BY nombre_enquetes DESC"
            ),
            valeurs,
        )
        .await?;
        db::en_modeles(rows, "stats_par_service")
    }

    pub async fn stats_par_raison(
        &self,
        periode: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> Result<Vec<StatRaisonRow>, InternalError> {
        let (condition, valeurs) = Self::condition_periode(periode);
        let rows = db::executer(
            &self.db,
            &format!(
                "SELECT e.raison_presence, CAST(COUNT(*) AS SIGNED) AS nombre_visites, \
                 COALESCE(CAST(SUM(CASE WHEN e.niveau_satisfaction = 'Satisfait' THEN 1 ELSE 0 END) AS SIGNED), 0) AS satisfaits, \
                 COALESCE(CAST(SUM(CASE WHEN e.niveau_satisfaction = 'Mécontent' THEN 1 ELSE 0 END) AS SIGNED), 0) AS mecontents \
                 FROM enquetes e {condition} \
                 GROUP BY e.raison_presence ORDER BY nombre_visites DESC"
            ),
            valeurs,
        )
        .await?;
        db::en_modeles(rows, "stats_par_raison")
    }

    /// Monthly breakdown over the last six months of visits.
    ///
    /// Uses MySQL date functions; not available on other backends.
    pub async fn stats_mensuelles(&self) -> Result<Vec<StatMensuelleRow>, InternalError> {
        let rows = db::executer(
            &self.db,
            "SELECT CAST(YEAR(date_heure_visite) AS SIGNED) AS annee, \
                    CAST(MONTH(date_heure_visite) AS SIGNED) AS mois, \
                    CAST(COUNT(*) AS SIGNED) AS nombre_enquetes, \
                    COALESCE(CAST(SUM(CASE WHEN niveau_satisfaction = 'Satisfait' THEN 1 ELSE 0 END) AS SIGNED), 0) AS satisfaits, \
                    COALESCE(CAST(SUM(CASE WHEN niveau_satisfaction = 'Mécontent' THEN 1 ELSE 0 END) AS SIGNED), 0) AS mecontents \
             FROM enquetes \
             WHERE date_heure_visite >= DATE_SUB(NOW(), INTERVAL 6 MONTH) \
             GROUP BY annee, mois ORDER BY annee DESC, mois DESC LIMIT 6",
            vec![],
        )
        .await?;
        db::en_modeles(rows, "stats_mensuelles")
    }

    /// Rolling counters for the dashboard: today, this week, this month.
    ///
    /// Uses MySQL date functions; not available on other backends.
    pub async fn stats_recentes(&self) -> Result<StatRecentesRow, InternalError> {
        let rows = db::executer(
            &self.db,
            "SELECT CAST(COUNT(*) AS SIGNED) AS total_enquetes, \
                    COALESCE(CAST(SUM(CASE WHEN niveau_satisfaction = 'Satisfait' THEN 1 ELSE 0 END) AS SIGNED), 0) AS satisfaits, \
                    COALESCE(CAST(SUM(CASE WHEN niveau_satisfaction = 'Mécontent' THEN 1 ELSE 0 END) AS SIGNED), 0) AS mecontents, \
                    COALESCE(CAST(SUM(CASE WHEN DATE(date_soumission) = CURDATE() THEN 1 ELSE 0 END) AS SIGNED), 0) AS aujourd_hui, \
                    COALESCE(CAST(SUM(CASE WHEN YEARWEEK(date_soumission, 1) = YEARWEEK(CURDATE(), 1) THEN 1 ELSE 0 END) AS SIGNED), 0) AS cette_semaine, \
                    COALESCE(CAST(SUM(CASE WHEN YEAR(date_soumission) = YEAR(CURDATE()) AND MONTH(date_soumission) = MONTH(CURDATE()) THEN 1 ELSE 0 END) AS SIGNED), 0) AS ce_mois \
             FROM enquetes",
            vec![],
        )
        .await?;
        Ok(db::en_modele_optionnel(rows, "stats_recentes")?.unwrap_or_default())
    }

    /// Flat rows for the export pipeline, newest submissions first.
    pub async fn lignes_export(&self) -> Result<Vec<EnqueteExportRow>, InternalError> {
        let rows = db::executer(
            &self.db,
            "SELECT e.id_enquete, e.date_heure_visite, e.nom_visiteur, e.prenom_visiteur, \
                    e.telephone, e.email, e.raison_presence, e.niveau_satisfaction, \
                    e.commentaires, e.recommandations, e.date_soumission, e.adresse_ip, \
                    s.nom_service \
             FROM enquetes e LEFT JOIN services s ON s.id_service = e.id_service \
             ORDER BY e.date_soumission DESC",
            vec![],
        )
        .await?;
        db::en_modeles(rows, "lignes_export")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requete_valide() -> CreerEnqueteRequete {
        CreerEnqueteRequete {
            date_heure_visite: "2026-03-14T09:30".to_owned(),
            nom_visiteur: "Kouassi".to_owned(),
            prenom_visiteur: Some("Awa".to_owned()),
            telephone: "0102030405".to_owned(),
            email: Some("awa.kouassi@example.ci".to_owned()),
            raison_presence: "Information".to_owned(),
            niveau_satisfaction: "Satisfait".to_owned(),
            id_service: 1,
            commentaires: None,
            recommandations: None,
        }
    }

    #[test]
    fn une_requete_complete_passe_la_validation() {
        assert!(valider_enquete(&requete_valide()).is_empty());
    }

    #[test]
    fn chaque_regle_echouee_produit_son_message() {
        let requete = CreerEnqueteRequete {
            date_heure_visite: "pas-une-date".to_owned(),
            nom_visiteur: "K".to_owned(),
            telephone: "abc".to_owned(),
            email: Some("pas-un-email".to_owned()),
            raison_presence: "Visite".to_owned(),
            niveau_satisfaction: "Moyen".to_owned(),
            id_service: 0,
            ..requete_valide()
        };
        let erreurs = valider_enquete(&requete);
        assert_eq!(erreurs.len(), 7);
        assert!(erreurs.contains(&"Date et heure de visite obligatoires".to_owned()));
        assert!(erreurs.contains(&"Niveau de satisfaction invalide".to_owned()));
        assert!(erreurs.contains(&"Service obligatoire".to_owned()));
    }

    #[test]
    fn telephone_accepte_le_prefixe_ivoirien() {
        assert!(telephone_valide("0102030405"));
        assert!(telephone_valide("+225 0102030405"));
        assert!(telephone_valide("+2250102030405"));
        assert!(telephone_valide("12345678"));
        assert!(!telephone_valide("1234567"));
        assert!(!telephone_valide("12345678901"));
        assert!(!telephone_valide("01 02 03 04 05"));
        assert!(!telephone_valide("+33102030405"));
    }

    #[test]
    fn email_suit_la_forme_minimale() {
        assert!(email_valide("a@b.cd"));
        assert!(email_valide("prenom.nom@clinique.ci"));
        assert!(!email_valide("sans-arobase"));
        assert!(!email_valide("a@b"));
        assert!(!email_valide("a@.cd"));
        assert!(!email_valide("a b@c.de"));
        assert!(!email_valide("a@b@c.de"));
    }

    #[test]
    fn commentaires_limites_a_mille_caracteres() {
        let requete = CreerEnqueteRequete {
            commentaires: Some("x".repeat(1001)),
            ..requete_valide()
        };
        let erreurs = valider_enquete(&requete);
        assert_eq!(
            erreurs,
            vec!["Commentaires trop longs (maximum 1000 caractères)".to_owned()]
        );

        let requete = CreerEnqueteRequete {
            commentaires: Some("x".repeat(1000)),
            ..requete_valide()
        };
        assert!(valider_enquete(&requete).is_empty());
    }

    #[test]
    fn la_date_de_visite_accepte_plusieurs_formats() {
        assert!(analyser_date_visite("2026-03-14T09:30").is_some());
        assert!(analyser_date_visite("2026-03-14 09:30:00").is_some());
        assert!(analyser_date_visite("2026-03-14").is_some());
        assert!(analyser_date_visite("14/03/2026").is_none());
        assert!(analyser_date_visite("").is_none());
    }
}
