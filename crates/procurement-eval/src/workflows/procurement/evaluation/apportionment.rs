use std::collections::BTreeMap;

use super::super::domain::Proponent;
use super::contracts::{adjust, total_adjusted_value};

/// Percentage of the consortium's adjusted experience credited to each partner.
///
/// Empty for single proponents and whenever the proponent has no positive experience to split.
pub fn compute_partner_shares(proponent: &Proponent) -> BTreeMap<String, f64> {
    let mut shares = BTreeMap::new();
    if !proponent.is_plural {
        return shares;
    }

    let total = total_adjusted_value(&proponent.contractors);
    if total <= 0.0 {
        return shares;
    }

    for partner in &proponent.partners {
        let contributed: f64 = proponent
            .contractors
            .iter()
            .filter(|contract| contract.experience_contributor == partner.name)
            .map(|contract| adjust(contract).adjusted_value)
            .sum();
        shares.insert(partner.name.clone(), contributed / total * 100.0);
    }

    shares
}

pub fn partner_share(proponent: &Proponent, partner_name: &str) -> Option<f64> {
    compute_partner_shares(proponent).get(partner_name).copied()
}

/// Whether the partner carrying the disability credit holds enough of the experience.
pub fn meets_disability_threshold(proponent: &Proponent, partner_name: &str, threshold: f64) -> bool {
    partner_share(proponent, partner_name)
        .map(|share| share >= threshold)
        .unwrap_or(false)
}
