//! Survey and statistics export as an Excel workbook or CSV text.
//!
//! Sheets are first built as plain string tables, then serialized to the
//! requested format. The same intermediate shape feeds the preview returned
//! before a download.

use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

use crate::errors::internal::InternalError;
use crate::types::db::enquete::EnqueteExportRow;
use crate::types::db::stats::StatRecentesRow;
use crate::types::dto::stats::{
    StatMensuelleDto, StatRaisonDto, StatSatisfactionDto, StatServiceDto,
};

pub const SEPARATEUR_CSV: char = ';';

const NOMS_MOIS: [&str; 12] = [
    "Janvier",
    "Février",
    "Mars",
    "Avril",
    "Mai",
    "Juin",
    "Juillet",
    "Août",
    "Septembre",
    "Octobre",
    "Novembre",
    "Décembre",
];

/// One workbook sheet, ready to serialize.
#[derive(Debug, Clone)]
pub struct Feuille {
    pub nom: String,
    pub en_tetes: Vec<String>,
    pub lignes: Vec<Vec<String>>,
}

impl Feuille {
    fn nouvelle(nom: &str, en_tetes: &[&str]) -> Self {
        Self {
            nom: nom.to_owned(),
            en_tetes: en_tetes.iter().map(|e| (*e).to_owned()).collect(),
            lignes: Vec::new(),
        }
    }
}

fn date_francaise(date: &NaiveDateTime) -> String {
    date.format("%d/%m/%Y %H:%M").to_string()
}

fn nom_mois(mois: i64) -> String {
    NOMS_MOIS
        .get((mois as usize).wrapping_sub(1))
        .map(|n| (*n).to_owned())
        .unwrap_or_else(|| mois.to_string())
}

pub fn feuille_enquetes(enquetes: &[EnqueteExportRow]) -> Feuille {
    let mut feuille = Feuille::nouvelle(
        "Enquêtes",
        &[
            "N°",
            "Date/Heure Visite",
            "Nom",
            "Prénom",
            "Téléphone",
            "Email",
            "Raison Présence",
            "Satisfaction",
            "Service",
            "Commentaires",
            "Recommandations",
            "Date Soumission",
            "Adresse IP",
        ],
    );
    for (index, enquete) in enquetes.iter().enumerate() {
        feuille.lignes.push(vec![
            (index + 1).to_string(),
            date_francaise(&enquete.date_heure_visite),
            enquete.nom_visiteur.clone(),
            enquete.prenom_visiteur.clone().unwrap_or_default(),
            enquete.telephone.clone(),
            enquete.email.clone().unwrap_or_default(),
            enquete.raison_presence.clone(),
            enquete.niveau_satisfaction.clone(),
            enquete
                .nom_service
                .clone()
                .unwrap_or_else(|| "Service non défini".to_owned()),
            enquete.commentaires.clone().unwrap_or_default(),
            enquete.recommandations.clone().unwrap_or_default(),
            date_francaise(&enquete.date_soumission),
            enquete.adresse_ip.clone().unwrap_or_default(),
        ]);
    }
    feuille
}

pub fn feuille_satisfaction(stats: &[StatSatisfactionDto]) -> Feuille {
    let mut feuille = Feuille::nouvelle(
        "Stats Satisfaction",
        &["Niveau de Satisfaction", "Nombre de Réponses", "Pourcentage"],
    );
    for stat in stats {
        feuille.lignes.push(vec![
            stat.niveau_satisfaction.clone(),
            stat.nombre_reponses.to_string(),
            format!("{}%", stat.pourcentage),
        ]);
    }
    feuille
}

pub fn feuille_services(stats: &[StatServiceDto]) -> Feuille {
    let mut feuille = Feuille::nouvelle(
        "Stats Services",
        &[
            "Service",
            "Nombre d'Enquêtes",
            "Satisfaits",
            "Mécontents",
            "Taux de Satisfaction",
        ],
    );
    for stat in stats {
        feuille.lignes.push(vec![
            stat.nom_service.clone(),
            stat.nombre_enquetes.to_string(),
            stat.satisfaits.to_string(),
            stat.mecontents.to_string(),
            format!("{}%", stat.taux_satisfaction),
        ]);
    }
    feuille
}

pub fn feuille_raisons(stats: &[StatRaisonDto]) -> Feuille {
    let mut feuille = Feuille::nouvelle(
        "Stats Raisons",
        &[
            "Raison de Présence",
            "Nombre de Visites",
            "Satisfaits",
            "Mécontents",
            "Taux de Satisfaction",
        ],
    );
    for stat in stats {
        feuille.lignes.push(vec![
            stat.raison_presence.clone(),
            stat.nombre_visites.to_string(),
            stat.satisfaits.to_string(),
            stat.mecontents.to_string(),
            format!("{}%", stat.taux_satisfaction),
        ]);
    }
    feuille
}

pub fn feuille_mensuelles(stats: &[StatMensuelleDto]) -> Feuille {
    let mut feuille = Feuille::nouvelle(
        "Stats Mensuelles",
        &[
            "Année",
            "Mois",
            "Nom du Mois",
            "Nombre d'Enquêtes",
            "Satisfaits",
            "Mécontents",
            "Taux de Satisfaction",
        ],
    );
    for stat in stats {
        feuille.lignes.push(vec![
            stat.annee.to_string(),
            stat.mois.to_string(),
            nom_mois(stat.mois),
            stat.nombre_enquetes.to_string(),
            stat.satisfaits.to_string(),
            stat.mecontents.to_string(),
            format!("{}%", stat.taux_satisfaction),
        ]);
    }
    feuille
}

pub fn feuille_recapitulatif(recentes: &StatRecentesRow, taux_satisfaction: f64) -> Feuille {
    let mut feuille = Feuille::nouvelle("Récapitulatif", &["Indicateur", "Valeur"]);
    let indicateurs = [
        ("Total Enquêtes", recentes.total_enquetes.to_string()),
        ("Total Satisfaits", recentes.satisfaits.to_string()),
        ("Total Mécontents", recentes.mecontents.to_string()),
        (
            "Taux Satisfaction Global",
            format!("{taux_satisfaction}%"),
        ),
        ("Enquêtes Aujourd'hui", recentes.aujourd_hui.to_string()),
        ("Enquêtes Cette Semaine", recentes.cette_semaine.to_string()),
        ("Enquêtes Ce Mois", recentes.ce_mois.to_string()),
    ];
    for (indicateur, valeur) in indicateurs {
        feuille.lignes.push(vec![indicateur.to_owned(), valeur]);
    }
    feuille
}

pub fn feuille_metadonnees(
    exporte_par: &str,
    nombre_enquetes: usize,
    avec_statistiques: bool,
    date_export: NaiveDateTime,
) -> Feuille {
    let mut feuille = Feuille::nouvelle("Métadonnées", &["Propriété", "Valeur"]);
    let proprietes = [
        ("Date d'Export", date_francaise(&date_export)),
        ("Format", "EXCEL".to_owned()),
        ("Nombre d'Enquêtes", nombre_enquetes.to_string()),
        (
            "Contient Statistiques",
            if avec_statistiques { "Oui" } else { "Non" }.to_owned(),
        ),
        ("Exporté par", exporte_par.to_owned()),
        ("Application", "Enquête de Satisfaction v1.0".to_owned()),
    ];
    for (propriete, valeur) in proprietes {
        feuille.lignes.push(vec![propriete.to_owned(), valeur]);
    }
    feuille
}

/// Serialize the sheets into an `.xlsx` workbook, headers in bold.
pub fn classeur_xlsx(feuilles: &[Feuille]) -> Result<Vec<u8>, InternalError> {
    let construire = |feuilles: &[Feuille]| -> Result<Vec<u8>, XlsxError> {
        let mut classeur = Workbook::new();
        let gras = Format::new().set_bold();
        for feuille in feuilles {
            let onglet = classeur.add_worksheet();
            onglet.set_name(&feuille.nom)?;
            for (colonne, en_tete) in feuille.en_tetes.iter().enumerate() {
                onglet.write_string_with_format(0, colonne as u16, en_tete, &gras)?;
            }
            for (index, ligne) in feuille.lignes.iter().enumerate() {
                for (colonne, valeur) in ligne.iter().enumerate() {
                    onglet.write_string((index + 1) as u32, colonne as u16, valeur)?;
                }
            }
        }
        classeur.save_to_buffer()
    };
    construire(feuilles).map_err(|e| InternalError::Export(e.to_string()))
}

fn champ_csv(valeur: &str, separateur: char) -> String {
    if valeur.contains(separateur) || valeur.contains('"') || valeur.contains('\n') {
        format!("\"{}\"", valeur.replace('"', "\"\""))
    } else {
        valeur.to_owned()
    }
}

/// Serialize one sheet as CSV text.
pub fn texte_csv(feuille: &Feuille, separateur: char) -> String {
    let mut lignes = Vec::with_capacity(feuille.lignes.len() + 1);
    lignes.push(
        feuille
            .en_tetes
            .iter()
            .map(|e| champ_csv(e, separateur))
            .collect::<Vec<_>>()
            .join(&separateur.to_string()),
    );
    for ligne in &feuille.lignes {
        lignes.push(
            ligne
                .iter()
                .map(|v| champ_csv(v, separateur))
                .collect::<Vec<_>>()
                .join(&separateur.to_string()),
        );
    }
    lignes.join("\n")
}

/// Timestamped file name such as `enquetes_satisfaction_29-08-2026_14-05-00.xlsx`.
pub fn nom_fichier(prefixe: &str, extension: &str, maintenant: NaiveDateTime) -> String {
    format!(
        "{prefixe}_{}{extension}",
        maintenant.format("%d-%m-%Y_%H-%M-%S")
    )
}
