use super::common::*;
use crate::workflows::procurement::domain::Partner;
use crate::workflows::procurement::evaluation::apportionment::{
    compute_partner_shares, meets_disability_threshold, partner_share,
};
use crate::workflows::procurement::evaluation::DEFAULT_DISABILITY_THRESHOLD;

#[test]
fn partner_without_contracts_gets_zero_share() {
    let proponent = plural_proponent();

    let shares = compute_partner_shares(&proponent);

    assert_eq!(shares.len(), 2);
    assert_eq!(shares.get("A"), Some(&0.0));
    assert_eq!(shares.get("B"), Some(&100.0));
    assert!(meets_disability_threshold(&proponent, "B", DEFAULT_DISABILITY_THRESHOLD));
    assert!(!meets_disability_threshold(&proponent, "A", DEFAULT_DISABILITY_THRESHOLD));
}

#[test]
fn shares_split_adjusted_value_and_sum_to_one_hundred() {
    let mut proponent = plural_proponent();
    proponent.partners.push(Partner {
        name: "C".to_string(),
        percentage: 0.0,
        rup_renewal_date: Some(date(2024, 2, 1)),
    });
    proponent.contractors = vec![
        contract("A", 300.0, 50.0),
        contract("B", 200.0, 100.0),
        contract("A", 150.0, 100.0),
    ];

    let shares = compute_partner_shares(&proponent);

    let a = shares["A"];
    let b = shares["B"];
    assert!((a - 60.0).abs() < 1e-9, "A share was {a}");
    assert!((b - 40.0).abs() < 1e-9, "B share was {b}");
    assert_eq!(shares["C"], 0.0);
    assert!((shares.values().sum::<f64>() - 100.0).abs() < 1e-9);
    assert!(meets_disability_threshold(&proponent, "B", 40.0));
}

#[test]
fn no_contracts_yields_empty_shares() {
    let mut proponent = plural_proponent();
    proponent.contractors.clear();

    assert!(compute_partner_shares(&proponent).is_empty());
    assert_eq!(partner_share(&proponent, "A"), None);
    assert!(!meets_disability_threshold(&proponent, "A", 40.0));
}

#[test]
fn zero_total_experience_yields_empty_shares() {
    let mut proponent = plural_proponent();
    proponent.contractors = vec![contract("A", 500.0, 0.0)];

    assert!(compute_partner_shares(&proponent).is_empty());
}

#[test]
fn single_proponents_have_no_shares() {
    assert!(compute_partner_shares(&single_proponent()).is_empty());
}

#[test]
fn contributor_names_match_exactly() {
    let mut proponent = plural_proponent();
    proponent.contractors = vec![contract("b", 80.0, 100.0), contract("B", 20.0, 100.0)];

    let shares = compute_partner_shares(&proponent);

    assert!((shares["B"] - 20.0).abs() < 1e-9);
    assert_eq!(shares["A"], 0.0);
}

#[test]
fn disability_credit_is_reported_without_blocking_eligibility() {
    let mut proponent = plural_proponent();
    proponent.scoring.disability_partner = Some("A".to_string());

    let outcome = engine().evaluate(&proponent, &process());

    let credit = outcome.disability_credit.expect("plural disability credit");
    assert_eq!(credit.partner.as_deref(), Some("A"));
    assert_eq!(credit.share, 0.0);
    assert!(!credit.meets_threshold);
    assert!(!outcome.verdict.needs_subsanation);
    assert_eq!(outcome.total_score, 51.5);
}
