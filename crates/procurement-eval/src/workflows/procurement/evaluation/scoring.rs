use serde::{Deserialize, Serialize};

use super::super::domain::{Scoring, ScoringCriterion, ScoringMaxima};

const SCORE_TOLERANCE: f64 = 1e-9;

/// Sum of the six criterion values. Values above the process maxima are not clamped.
pub fn total_score(scoring: &Scoring) -> f64 {
    ScoringCriterion::ALL
        .into_iter()
        .map(|criterion| scoring.value(criterion))
        .sum()
}

/// Best total a process allows; used for display ratios only.
pub fn maximum_total(maxima: &ScoringMaxima) -> f64 {
    ScoringCriterion::ALL
        .into_iter()
        .map(|criterion| maxima.get(criterion))
        .sum()
}

/// A criterion left at zero must be justified with a comment.
pub fn needs_comment(_criterion: ScoringCriterion, value: f64) -> bool {
    value == 0.0
}

/// Advisory findings about a scoring record; never blocks evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScoringWarning {
    PartialCredit {
        criterion: ScoringCriterion,
        value: f64,
        maximum: f64,
    },
    MissingComment {
        criterion: ScoringCriterion,
    },
}

impl ScoringWarning {
    pub fn summary(&self) -> String {
        match self {
            ScoringWarning::PartialCredit {
                criterion,
                value,
                maximum,
            } => format!(
                "{}: puntaje {} debe ser 0 o {}",
                criterion.label(),
                value,
                maximum
            ),
            ScoringWarning::MissingComment { criterion } => {
                format!("{}: se requiere comentario para puntaje 0", criterion.label())
            }
        }
    }
}

/// Check every criterion is either zero or exactly the process maximum, and that zeros carry a
/// comment. Findings are reported in criterion order.
pub fn validate(scoring: &Scoring, maxima: &ScoringMaxima) -> Vec<ScoringWarning> {
    let mut warnings = Vec::new();

    for criterion in ScoringCriterion::ALL {
        let value = scoring.value(criterion);
        let maximum = maxima.get(criterion);

        let is_zero = value.abs() < SCORE_TOLERANCE;
        let is_maximum = (value - maximum).abs() < SCORE_TOLERANCE;
        if !is_zero && !is_maximum {
            warnings.push(ScoringWarning::PartialCredit {
                criterion,
                value,
                maximum,
            });
        }

        if needs_comment(criterion, value) && scoring.comment(criterion).is_none() {
            warnings.push(ScoringWarning::MissingComment { criterion });
        }
    }

    warnings
}
