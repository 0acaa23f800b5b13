use chrono::NaiveDate;

use super::super::domain::Proponent;
use super::super::lenient::parse_calendar_date;

/// Whole days between two calendar dates, regardless of order.
pub fn day_distance(first: NaiveDate, second: NaiveDate) -> i64 {
    (first - second).num_days().abs()
}

/// True when both dates are known and lie at most `window_days` apart.
pub fn is_within_window(
    reference: Option<NaiveDate>,
    candidate: Option<NaiveDate>,
    window_days: u32,
) -> bool {
    match (reference, candidate) {
        (Some(reference), Some(candidate)) => {
            day_distance(reference, candidate) <= i64::from(window_days)
        }
        _ => false,
    }
}

/// String flavour of [`is_within_window`]; blank or unparseable input never complies.
pub fn is_within_window_str(reference: &str, candidate: &str, window_days: u32) -> bool {
    is_within_window(
        parse_calendar_date(reference),
        parse_calendar_date(candidate),
        window_days,
    )
}

/// RUP currency of a proponent against the process closing date.
///
/// Plural proponents comply only when every partner's registry is current; a consortium with no
/// partners has nothing to check and does not comply.
pub fn rup_complies(
    proponent: &Proponent,
    closing_date: Option<NaiveDate>,
    window_days: u32,
) -> bool {
    if proponent.is_plural {
        return !proponent.partners.is_empty()
            && proponent.partners.iter().all(|partner| {
                is_within_window(closing_date, partner.rup_renewal_date, window_days)
            });
    }

    is_within_window(closing_date, proponent.rup.renewal_date, window_days)
}
