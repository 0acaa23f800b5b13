use std::collections::BTreeSet;

use tracing::warn;

use super::domain::{
    Contract, Partner, ProcessDefinition, Proponent, ScoringCriterion,
};

/// Validation errors raised when a record enters the evaluation workflow.
#[derive(Debug, thiserror::Error)]
pub enum IntakeViolation {
    #[error("scoring maximum for {criterion:?} must be a non-negative number (found {found})")]
    InvalidMaximum {
        criterion: ScoringCriterion,
        found: f64,
    },
    #[error("process declares {found} additional criteria, at most {max} are allowed")]
    TooManyAdditionalCriteria { found: usize, max: usize },
    #[error("additional criterion '{name}' requires a non-negative value (found {found})")]
    InvalidCriterionValue { name: String, found: f64 },
    #[error("proponent name is required")]
    MissingProponentName,
    #[error("partner '{name}' percentage must be within 0..=100 (found {found})")]
    PartnerPercentageOutOfRange { name: String, found: f64 },
    #[error("contract #{position} participation must be within 0..=100 (found {found})")]
    ParticipationOutOfRange { position: usize, found: f64 },
    #[error("contract #{position} declares a negative value (found {found})")]
    NegativeContractValue { position: usize, found: f64 },
}

pub const MAX_ADDITIONAL_CRITERIA: usize = 5;

fn within_percentage(value: f64) -> bool {
    (0.0..=100.0).contains(&value)
}

/// Guard that checks record invariants before they reach storage or evaluation.
#[derive(Debug, Clone, Default)]
pub struct IntakeGuard;

impl IntakeGuard {
    /// Validate a process definition and normalize its classifier codes.
    pub fn process(&self, mut process: ProcessDefinition) -> Result<ProcessDefinition, IntakeViolation> {
        for criterion in ScoringCriterion::ALL {
            let maximum = process.scoring_maxima.get(criterion);
            if !maximum.is_finite() || maximum < 0.0 {
                return Err(IntakeViolation::InvalidMaximum {
                    criterion,
                    found: maximum,
                });
            }
        }

        let criteria = process.additional_criteria();
        if criteria.len() > MAX_ADDITIONAL_CRITERIA {
            return Err(IntakeViolation::TooManyAdditionalCriteria {
                found: criteria.len(),
                max: MAX_ADDITIONAL_CRITERIA,
            });
        }

        if let Some(criterion) = criteria
            .iter()
            .find(|criterion| !criterion.value.is_finite() || criterion.value < 0.0)
        {
            return Err(IntakeViolation::InvalidCriterionValue {
                name: criterion.name.clone(),
                found: criterion.value,
            });
        }

        for criterion in process.scoring_maxima.outside_domain() {
            warn!(
                process = %process.id.0,
                ?criterion,
                maximum = process.scoring_maxima.get(criterion),
                "scoring maximum outside the criterion's usual values"
            );
        }

        let mut seen = BTreeSet::new();
        process.classifier_codes = process
            .classifier_codes
            .iter()
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty() && seen.insert(code.clone()))
            .collect();

        Ok(process)
    }

    pub fn partners(&self, partners: &[Partner]) -> Result<(), IntakeViolation> {
        match partners
            .iter()
            .find(|partner| !within_percentage(partner.percentage))
        {
            Some(partner) => Err(IntakeViolation::PartnerPercentageOutOfRange {
                name: partner.name.clone(),
                found: partner.percentage,
            }),
            None => Ok(()),
        }
    }

    pub fn contracts(&self, contracts: &[Contract]) -> Result<(), IntakeViolation> {
        for (index, contract) in contracts.iter().enumerate() {
            let position = index + 1;

            if !within_percentage(contract.participation_percentage) {
                return Err(IntakeViolation::ParticipationOutOfRange {
                    position,
                    found: contract.participation_percentage,
                });
            }

            let negative = std::iter::once(contract.total_value_smmlv)
                .chain(
                    contract
                        .additional_specific_experience_contribution
                        .iter()
                        .copied(),
                )
                .find(|value| *value < 0.0);
            if let Some(found) = negative {
                return Err(IntakeViolation::NegativeContractValue { position, found });
            }
        }

        Ok(())
    }

    /// Validate a whole proponent record, e.g. one loaded from an evaluation bundle.
    pub fn proponent(&self, proponent: &Proponent) -> Result<(), IntakeViolation> {
        if proponent.name.trim().is_empty() {
            return Err(IntakeViolation::MissingProponentName);
        }
        self.partners(&proponent.partners)?;
        self.contracts(&proponent.contractors)
    }
}
