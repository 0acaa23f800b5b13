pub mod apportionment;
pub mod classifier;
mod config;
pub mod contracts;
pub mod dates;
pub mod eligibility;
pub mod scoring;

pub use config::{
    EmptyClassifierPolicy, EvaluationConfig, DEFAULT_DISABILITY_THRESHOLD,
    DEFAULT_RUP_WINDOW_DAYS,
};
pub use eligibility::EligibilityVerdict;
pub use scoring::ScoringWarning;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{ProcessDefinition, Proponent, ProponentId};
use super::ranking::{build_report, ProcessReport};

/// Stateless evaluator that applies the process rules to a proponent.
///
/// Nothing is cached between calls: callers pass the current process and proponent every time and
/// re-run [`EvaluationEngine::refresh`] after each edit.
#[derive(Debug, Clone, Default)]
pub struct EvaluationEngine {
    config: EvaluationConfig,
}

impl EvaluationEngine {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    /// Recompute every derived field of the proponent from its source data.
    pub fn refresh(&self, proponent: &mut Proponent, process: &ProcessDefinition) {
        for contract in &mut proponent.contractors {
            contracts::apply(contract);
            contract.classifier_codes_match = classifier::matches(
                &contract.selected_classifier_codes,
                &process.classifier_codes,
                self.config.empty_classifier_policy,
            );
        }

        proponent.rup.complies =
            dates::rup_complies(proponent, process.closing_date, self.config.rup_window_days);
        proponent.requirements.additional_specific =
            eligibility::additional_compliance(proponent, process);
        proponent.total_score = scoring::total_score(&proponent.scoring);

        let verdict = eligibility::evaluate(proponent, process);
        proponent.needs_subsanation = verdict.needs_subsanation;
        proponent.subsanation_details = verdict.reasons;
    }

    /// Full evaluation trail for one proponent, leaving the input untouched.
    pub fn evaluate(&self, proponent: &Proponent, process: &ProcessDefinition) -> EvaluationOutcome {
        let mut current = proponent.clone();
        self.refresh(&mut current, process);

        let verdict = eligibility::evaluate(&current, process);
        let partner_shares = apportionment::compute_partner_shares(&current);
        let disability_credit = self.disability_credit(&current, &partner_shares);

        EvaluationOutcome {
            proponent_id: current.id.clone(),
            total_score: current.total_score,
            maximum_total: scoring::maximum_total(&process.scoring_maxima),
            rup_complies: current.rup.complies,
            verdict,
            partner_shares,
            disability_credit,
            warnings: scoring::validate(&current.scoring, &process.scoring_maxima),
        }
    }

    /// Ranking of refreshed copies of the given proponents.
    pub fn report(&self, process: &ProcessDefinition, proponents: &[Proponent]) -> ProcessReport {
        let refreshed: Vec<Proponent> = proponents
            .iter()
            .cloned()
            .map(|mut proponent| {
                self.refresh(&mut proponent, process);
                proponent
            })
            .collect();

        build_report(process, &refreshed)
    }

    fn disability_credit(
        &self,
        proponent: &Proponent,
        partner_shares: &BTreeMap<String, f64>,
    ) -> Option<DisabilityCredit> {
        if !proponent.is_plural || proponent.scoring.disabled <= 0.0 {
            return None;
        }

        let partner = proponent.scoring.disability_partner.clone();
        let share = partner
            .as_deref()
            .and_then(|name| partner_shares.get(name).copied())
            .unwrap_or(0.0);

        Some(DisabilityCredit {
            partner,
            share,
            threshold: self.config.disability_threshold,
            meets_threshold: share >= self.config.disability_threshold,
        })
    }
}

/// Whether the partner credited with disability points holds enough of the experience.
///
/// Reported for the caller to act on; it never adds a remediation reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisabilityCredit {
    pub partner: Option<String>,
    pub share: f64,
    pub threshold: f64,
    pub meets_threshold: bool,
}

/// Evaluation output describing the score, the remediation verdict and advisory findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationOutcome {
    pub proponent_id: ProponentId,
    pub total_score: f64,
    pub maximum_total: f64,
    pub rup_complies: bool,
    pub verdict: EligibilityVerdict,
    pub partner_shares: BTreeMap<String, f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disability_credit: Option<DisabilityCredit>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<ScoringWarning>,
}
