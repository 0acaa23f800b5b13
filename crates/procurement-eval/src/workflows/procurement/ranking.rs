use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{ProcessDefinition, ProcessId, Proponent, ProponentId};
use super::evaluation::scoring::maximum_total;

/// One line of the final ranking handed to the export layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingEntry {
    pub rank: usize,
    pub proponent_id: ProponentId,
    pub name: String,
    pub is_plural: bool,
    pub total_score: f64,
    pub needs_subsanation: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsanation_details: Vec<String>,
}

/// Compliance and ranking data for a whole process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessReport {
    pub process_id: ProcessId,
    pub process_name: String,
    pub closing_date: Option<NaiveDate>,
    pub maximum_total: f64,
    pub proponents_evaluated: usize,
    pub requiring_subsanation: usize,
    pub ranking: Vec<RankingEntry>,
}

impl ProcessReport {
    pub fn leader(&self) -> Option<&RankingEntry> {
        self.ranking.first()
    }

    pub fn summary(&self) -> String {
        match self.leader() {
            Some(leader) => format!(
                "{} proponent(s) evaluated, {} requiring subsanación; leader {} with {:.2}/{:.2}",
                self.proponents_evaluated,
                self.requiring_subsanation,
                leader.name,
                leader.total_score,
                self.maximum_total
            ),
            None => "no proponents registered".to_string(),
        }
    }
}

/// Rank proponents by total score, highest first. Ties keep registration order.
///
/// Proponents are expected to carry freshly computed derived fields.
pub fn build_report(process: &ProcessDefinition, proponents: &[Proponent]) -> ProcessReport {
    let mut ordered: Vec<&Proponent> = proponents.iter().collect();
    ordered.sort_by(|left, right| right.total_score.total_cmp(&left.total_score));

    let ranking = ordered
        .into_iter()
        .enumerate()
        .map(|(index, proponent)| RankingEntry {
            rank: index + 1,
            proponent_id: proponent.id.clone(),
            name: proponent.name.clone(),
            is_plural: proponent.is_plural,
            total_score: proponent.total_score,
            needs_subsanation: proponent.needs_subsanation,
            subsanation_details: proponent.subsanation_details.clone(),
        })
        .collect();

    ProcessReport {
        process_id: process.id.clone(),
        process_name: process.name.clone(),
        closing_date: process.closing_date,
        maximum_total: maximum_total(&process.scoring_maxima),
        proponents_evaluated: proponents.len(),
        requiring_subsanation: proponents
            .iter()
            .filter(|proponent| proponent.needs_subsanation)
            .count(),
        ranking,
    }
}
