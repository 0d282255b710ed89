use poem_openapi::Object;

use crate::types::db::stats::{
    LogActiviteRow, StatMensuelleRow, StatRaisonRow, StatRecentesRow, StatSatisfactionRow,
    StatServiceRow,
};
use crate::types::dto::common::PaginationDto;

/// Rates are derived from raw counts at the edge, rounded to one decimal.
fn taux(part: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / total as f64).round() / 10.0
}

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct StatSatisfactionDto {
    pub niveau_satisfaction: String,
    pub nombre_reponses: i64,
    pub pourcentage: f64,
}

pub fn repartition_satisfaction(lignes: Vec<StatSatisfactionRow>) -> Vec<StatSatisfactionDto> {
    let total: i64 = lignes.iter().map(|l| l.nombre_reponses).sum();
    lignes
        .into_iter()
        .map(|l| StatSatisfactionDto {
            pourcentage: taux(l.nombre_reponses, total),
            niveau_satisfaction: l.niveau_satisfaction,
            nombre_reponses: l.nombre_reponses,
        })
        .collect()
}

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct StatServiceDto {
    pub nom_service: String,
    pub nombre_enquetes: i64,
    pub satisfaits: i64,
    pub mecontents: i64,
    pub taux_satisfaction: f64,
}

impl From<StatServiceRow> for StatServiceDto {
    fn from(l: StatServiceRow) -> Self {
        Self {
            taux_satisfaction: taux(l.satisfaits, l.nombre_enquetes),
            nom_service: l.nom_service,
            nombre_enquetes: l.nombre_enquetes,
            satisfaits: l.satisfaits,
            mecontents: l.mecontents,
        }
    }
}

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct StatRaisonDto {
    pub raison_presence: String,
    pub nombre_visites: i64,
    pub satisfaits: i64,
    pub mecontents: i64,
    pub taux_satisfaction: f64,
}

impl From<StatRaisonRow> for StatRaisonDto {
    fn from(l: StatRaisonRow) -> Self {
        Self {
            taux_satisfaction: taux(l.satisfaits, l.nombre_visites),
            raison_presence: l.raison_presence,
            nombre_visites: l.nombre_visites,
            satisfaits: l.satisfaits,
            mecontents: l.mecontents,
        }
    }
}

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct StatMensuelleDto {
    pub annee: i64,
    pub mois: i64,
    pub nombre_enquetes: i64,
    pub satisfaits: i64,
    pub mecontents: i64,
    pub taux_satisfaction: f64,
}

impl From<StatMensuelleRow> for StatMensuelleDto {
    fn from(l: StatMensuelleRow) -> Self {
        Self {
            taux_satisfaction: taux(l.satisfaits, l.nombre_enquetes),
            annee: l.annee,
            mois: l.mois,
            nombre_enquetes: l.nombre_enquetes,
            satisfaits: l.satisfaits,
            mecontents: l.mecontents,
        }
    }
}

#[derive(Object, Debug, Clone)]
#[oai(rename_all = "camelCase")]
pub struct TendancesDto {
    pub satisfaits: i64,
    pub mecontents: i64,
    pub aujourdhui: i64,
    pub cette_semaine: i64,
    pub ce_mois: i64,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct DashboardStatsDto {
    pub total_enquetes: i64,
    pub satisfaction_moyenne: f64,
    pub insatisfaction_moyenne: f64,
    pub mensuelles: Vec<StatMensuelleDto>,
    pub services: Vec<StatServiceDto>,
    pub tendances: TendancesDto,
    pub derniere_maj: String,
}

pub fn dashboard_depuis_recentes(
    recentes: StatRecentesRow,
    mensuelles: Vec<StatMensuelleDto>,
    services: Vec<StatServiceDto>,
    derniere_maj: String,
) -> DashboardStatsDto {
    DashboardStatsDto {
        total_enquetes: recentes.total_enquetes,
        satisfaction_moyenne: taux(recentes.satisfaits, recentes.total_enquetes),
        insatisfaction_moyenne: taux(recentes.mecontents, recentes.total_enquetes),
        mensuelles,
        services,
        tendances: TendancesDto {
            satisfaits: recentes.satisfaits,
            mecontents: recentes.mecontents,
            aujourdhui: recentes.aujourd_hui,
            cette_semaine: recentes.cette_semaine,
            ce_mois: recentes.ce_mois,
        },
        derniere_maj,
    }
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct ResumeDto {
    pub total_enquetes: i64,
    pub satisfaits: i64,
    pub mecontents: i64,
    pub taux_satisfaction: f64,
    pub aujourdhui: i64,
    pub cette_semaine: i64,
    pub ce_mois: i64,
}

impl From<StatRecentesRow> for ResumeDto {
    fn from(l: StatRecentesRow) -> Self {
        Self {
            taux_satisfaction: taux(l.satisfaits, l.total_enquetes),
            total_enquetes: l.total_enquetes,
            satisfaits: l.satisfaits,
            mecontents: l.mecontents,
            aujourdhui: l.aujourd_hui,
            cette_semaine: l.cette_semaine,
            ce_mois: l.ce_mois,
        }
    }
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct PeriodeRequete {
    pub date_debut: String,
    pub date_fin: String,
}

#[derive(Object, Debug)]
pub struct StatistiquesPeriode {
    pub satisfaction: Vec<StatSatisfactionDto>,
    pub services: Vec<StatServiceDto>,
    pub raisons: Vec<StatRaisonDto>,
}

#[derive(Object, Debug)]
pub struct ListeLogs {
    pub logs: Vec<LogActiviteRow>,
    pub pagination: PaginationDto,
}

/// Dry-run of an export: row count and the first lines, so the client can
/// confirm before downloading the full file.
#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct ApercuExportDto {
    pub nombre_lignes: u64,
    pub colonnes: Vec<String>,
    pub extrait: Vec<Vec<String>>,
}

#[derive(Object, Debug)]
#[oai(rename_all = "camelCase")]
pub struct DashboardLiveDto {
    pub total_enquetes: i64,
    pub notifications_non_lues: i64,
    pub horodatage: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taux_arrondi_une_decimale() {
        assert_eq!(taux(1, 3), 33.3);
        assert_eq!(taux(2, 3), 66.7);
        assert_eq!(taux(0, 0), 0.0);
        assert_eq!(taux(5, 5), 100.0);
    }

    #[test]
    fn repartition_calcule_les_pourcentages_sur_le_total() {
        let lignes = vec![
            StatSatisfactionRow {
                niveau_satisfaction: "Satisfait".into(),
                nombre_reponses: 3,
            },
            StatSatisfactionRow {
                niveau_satisfaction: "Mécontent".into(),
                nombre_reponses: 1,
            },
        ];
        let dtos = repartition_satisfaction(lignes);
        assert_eq!(dtos[0].pourcentage, 75.0);
        assert_eq!(dtos[1].pourcentage, 25.0);
    }
}
