use serde::{Deserialize, Serialize};

use super::super::domain::{
    AdditionalComplianceResult, Contract, ContractType, ProcessDefinition, Proponent,
};
use super::contracts::additional_totals;

pub const GENERAL_EXPERIENCE_REASON: &str = "No cumple experiencia general";
pub const SPECIFIC_EXPERIENCE_REASON: &str = "No cumple experiencia específica";
pub const PROFESSIONAL_CARD_REASON: &str = "No aporta tarjeta profesional";
pub const RUP_REASON: &str = "RUP no vigente";

/// Remediation decision with the itemized reasons behind it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityVerdict {
    pub needs_subsanation: bool,
    pub reasons: Vec<String>,
    /// 1-based positions of contracts missing mandatory data.
    pub incomplete_contracts: Vec<usize>,
    /// 1-based positions of contracts marked as not complying.
    pub non_compliant_contracts: Vec<usize>,
}

impl EligibilityVerdict {
    pub fn summary(&self) -> String {
        if self.reasons.is_empty() {
            "cumple".to_string()
        } else {
            format!("requiere subsanación: {}", self.reasons.join("; "))
        }
    }
}

fn missing(text: &str) -> bool {
    text.trim().is_empty()
}

/// A contract is incomplete when any mandatory field is blank or it is not marked as complying.
pub fn is_incomplete(contract: &Contract) -> bool {
    missing(&contract.contracting_entity)
        || missing(&contract.contract_number)
        || missing(&contract.object)
        || missing(&contract.services_code)
        || !contract.contract_complies
        || (contract.contract_type == ContractType::Private
            && contract.private_documents_complete != Some(true))
}

/// Compliance of each additional criterion, computed from the proponent's contracts.
///
/// Comments already recorded on the proponent are kept by position.
pub fn additional_compliance(
    proponent: &Proponent,
    process: &ProcessDefinition,
) -> Vec<AdditionalComplianceResult> {
    let criteria = process.additional_criteria();
    let totals = additional_totals(&proponent.contractors, criteria.len());
    let previous = &proponent.requirements.additional_specific;

    criteria
        .iter()
        .zip(totals)
        .enumerate()
        .map(|(position, (criterion, amount))| AdditionalComplianceResult {
            name: criterion.name.clone(),
            amount,
            complies: amount >= criterion.value,
            comment: previous
                .get(position)
                .map(|result| result.comment.clone())
                .unwrap_or_default(),
        })
        .collect()
}

/// Run every eligibility check and collect the reasons in a fixed order: requirement flags, RUP,
/// additional criteria in declaration order, then contracts in declaration order.
///
/// The RUP verdict is read from `proponent.rup.complies`; callers refresh it beforehand.
pub fn evaluate(proponent: &Proponent, process: &ProcessDefinition) -> EligibilityVerdict {
    let requirements = &proponent.requirements;
    let mut reasons = Vec::new();

    if !requirements.general_experience {
        reasons.push(GENERAL_EXPERIENCE_REASON.to_string());
    }
    if !requirements.specific_experience {
        reasons.push(SPECIFIC_EXPERIENCE_REASON.to_string());
    }
    if !requirements.professional_card {
        reasons.push(PROFESSIONAL_CARD_REASON.to_string());
    }
    if !proponent.rup.complies {
        reasons.push(RUP_REASON.to_string());
    }

    for result in additional_compliance(proponent, process) {
        if !result.complies {
            reasons.push(format!("No cumple {}", result.name));
        }
    }

    let mut incomplete_contracts = Vec::new();
    let mut non_compliant_contracts = Vec::new();
    for (index, contract) in proponent.contractors.iter().enumerate() {
        let position = index + 1;

        if !contract.contract_complies {
            non_compliant_contracts.push(position);
            if let Some(reason) = contract
                .non_compliance_reason
                .as_deref()
                .map(str::trim)
                .filter(|reason| !reason.is_empty())
            {
                reasons.push(format!("Contrato #{position}: {reason}"));
            }
        }

        if is_incomplete(contract) {
            incomplete_contracts.push(position);
        }
    }

    EligibilityVerdict {
        needs_subsanation: !reasons.is_empty(),
        reasons,
        incomplete_contracts,
        non_compliant_contracts,
    }
}
