//! Key extractors.
//!
//! Pure functions deriving a bucketing key from a record. Shared helpers
//! work on plain strings; the per-entity functions match [`KeyFn`] so they
//! can be plugged straight into a definition.
//!
//! [`KeyFn`]: super::definition::KeyFn

use crate::models::{Account, Asset, Risk, Seed, SeedState};
use chrono::NaiveDate;

const MAX_DOMAIN_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Date portion of an ISO-8601 timestamp (everything before `T`).
///
/// Returns `None` unless that portion is a valid calendar date. The key is
/// always zero-padded `YYYY-MM-DD`, so keys sort chronologically.
pub fn date_from_iso(timestamp: &str) -> Option<String> {
    let date = timestamp.split('T').next()?.trim();
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    Some(date.format("%Y-%m-%d").to_string())
}

/// Domain portion of an email address, or an empty string if it is not a valid FQDN.
pub fn domain_from_email(email: &str) -> String {
    match email.split('@').nth(1) {
        Some(domain) if is_fqdn(domain) => domain.to_string(),
        _ => String::new(),
    }
}

/// Whether `domain` is a syntactically valid fully-qualified domain name.
pub fn is_fqdn(domain: &str) -> bool {
    if domain.is_empty() || domain.len() > MAX_DOMAIN_LEN {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let valid_labels = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LEN
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });

    let tld = labels[labels.len() - 1];
    valid_labels && tld.len() >= 2 && !tld.chars().all(|c| c.is_ascii_digit())
}

fn non_empty(key: String) -> Option<String> {
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

pub fn account_domain(account: &Account) -> Option<String> {
    non_empty(domain_from_email(&account.member))
}

pub fn account_date(account: &Account) -> Option<String> {
    date_from_iso(&account.updated)
}

pub fn asset_class(asset: &Asset) -> Option<String> {
    Some(asset.class.clone())
}

pub fn asset_date(asset: &Asset) -> Option<String> {
    date_from_iso(&asset.created)
}

pub fn risk_date(risk: &Risk) -> Option<String> {
    date_from_iso(&risk.updated)
}

pub fn risk_status(risk: &Risk) -> Option<String> {
    Some(risk.state().to_string())
}

pub fn risk_severity(risk: &Risk) -> Option<String> {
    Some(risk.severity().to_string())
}

pub fn seed_status(seed: &Seed) -> Option<String> {
    Some(SeedState::from_code(seed.status.chars().next()).to_string())
}

pub fn seed_class(seed: &Seed) -> Option<String> {
    Some(seed.class.clone().unwrap_or_default())
}

pub fn seed_date(seed: &Seed) -> Option<String> {
    date_from_iso(&seed.created)
}
