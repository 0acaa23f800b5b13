use std::collections::BTreeSet;

use super::config::EmptyClassifierPolicy;

fn normalized(codes: &[String]) -> BTreeSet<&str> {
    codes
        .iter()
        .map(|code| code.trim())
        .filter(|code| !code.is_empty())
        .collect()
}

/// True when the contract claims at least one of the process classifier codes.
pub fn matches(
    selected_codes: &[String],
    process_codes: &[String],
    policy: EmptyClassifierPolicy,
) -> bool {
    let required = normalized(process_codes);
    if required.is_empty() {
        return policy == EmptyClassifierPolicy::Eligible;
    }

    normalized(selected_codes)
        .intersection(&required)
        .next()
        .is_some()
}
