use serde::{Deserialize, Serialize};

pub const DEFAULT_RUP_WINDOW_DAYS: u32 = 30;
pub const DEFAULT_DISABILITY_THRESHOLD: f64 = 40.0;

/// How contracts are judged when the process declares no classifier codes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyClassifierPolicy {
    /// No constraint declared, every contract is eligible.
    #[default]
    Eligible,
    /// No evidence of a match, every contract is ineligible.
    Ineligible,
}

impl EmptyClassifierPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "eligible" | "vacuous" => Some(Self::Eligible),
            "ineligible" | "strict" => Some(Self::Ineligible),
            _ => None,
        }
    }
}

/// Tunable rules applied by the evaluation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub rup_window_days: u32,
    pub disability_threshold: f64,
    pub empty_classifier_policy: EmptyClassifierPolicy,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            rup_window_days: DEFAULT_RUP_WINDOW_DAYS,
            disability_threshold: DEFAULT_DISABILITY_THRESHOLD,
            empty_classifier_policy: EmptyClassifierPolicy::default(),
        }
    }
}
