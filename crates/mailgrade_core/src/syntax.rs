//! Structural address validation and local-part/domain splitting
//!
//! The syntax gate runs before anything else: input that fails here
//! short-circuits the whole pipeline and no network calls are made.

use email_address::EmailAddress;
use std::str::FromStr;
use tracing::debug;

/// Parsed address parts used by all downstream checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEmail {
    /// Local part as written (case preserved)
    pub local: String,
    /// Domain, lowercased for lookups
    pub domain: String,
}

/// Split and validate an address. Returns `None` when the input fails the
/// structural contract: exactly one `@`, non-empty local part and domain, a
/// dotted domain, no whitespace, and an RFC-5322 parse.
pub fn parse(email: &str) -> Option<ParsedEmail> {
    if email.is_empty() || email.len() > 320 {
        return None;
    }

    if email.chars().any(char::is_whitespace) {
        return None;
    }

    if email.chars().filter(|&c| c == '@').count() != 1 {
        return None;
    }

    let (local, domain) = email.split_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }

    // Domain must be dotted and structurally sound
    if !is_valid_domain_format(domain) {
        return None;
    }

    // RFC 5322 compliance for the local part and overall shape
    if EmailAddress::from_str(email).is_err() {
        debug!("address rejected by RFC 5322 parse: {}", email);
        return None;
    }

    Some(ParsedEmail {
        local: local.to_string(),
        domain: domain.to_lowercase(),
    })
}

/// Basic domain format validation
pub fn is_valid_domain_format(domain: &str) -> bool {
    if domain.len() > 253 || domain.is_empty() {
        return false;
    }

    // Must contain at least one dot
    if !domain.contains('.') {
        return false;
    }

    // Cannot start or end with dot or hyphen
    if domain.starts_with('.')
        || domain.ends_with('.')
        || domain.starts_with('-')
        || domain.ends_with('-')
    {
        return false;
    }

    // Check each label
    for label in domain.split('.') {
        if label.is_empty() || label.len() > 63 {
            return false;
        }

        if label.starts_with('-') || label.ends_with('-') {
            return false;
        }

        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return false;
        }
    }

    true
}
