use serde::{Deserialize, Serialize};

use super::super::domain::Contract;

/// Experience a contract contributes once scaled by the declarant's participation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustedContractValues {
    pub adjusted_value: f64,
    pub adjusted_additional_specific: Vec<f64>,
}

fn scale(amount: f64, participation_percentage: f64) -> f64 {
    amount * (participation_percentage / 100.0)
}

pub fn adjust(contract: &Contract) -> AdjustedContractValues {
    let participation = contract.participation_percentage;

    AdjustedContractValues {
        adjusted_value: scale(contract.total_value_smmlv, participation),
        adjusted_additional_specific: contract
            .additional_specific_experience_contribution
            .iter()
            .map(|contribution| scale(*contribution, participation))
            .collect(),
    }
}

/// Write the adjusted values back onto the contract.
pub fn apply(contract: &mut Contract) {
    let adjusted = adjust(contract);
    contract.adjusted_value = adjusted.adjusted_value;
    contract.adjusted_additional_specific_value = adjusted.adjusted_additional_specific;
}

pub fn total_adjusted_value(contracts: &[Contract]) -> f64 {
    contracts
        .iter()
        .map(|contract| adjust(contract).adjusted_value)
        .sum()
}

/// Adjusted contribution per additional-criterion position, summed across contracts.
///
/// Contracts that declare fewer contributions than there are criteria count as zero for the
/// missing positions; extra contributions are ignored.
pub fn additional_totals(contracts: &[Contract], criteria_count: usize) -> Vec<f64> {
    let mut totals = vec![0.0; criteria_count];

    for contract in contracts {
        let adjusted = adjust(contract);
        for (total, amount) in totals
            .iter_mut()
            .zip(adjusted.adjusted_additional_specific.iter())
        {
            *total += amount;
        }
    }

    totals
}
