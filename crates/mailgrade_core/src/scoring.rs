//! Composite scoring: fixed-weight aggregation of all checks into a single
//! 0-100 integer and a categorical status.
//!
//! The thresholds and rounding here are a compatibility contract with stored
//! history: score >= 80 is valid, 50..=79 is risky, below 50 is invalid, and
//! the only fractional term (reputation) rounds half up.

use crate::{CheckReport, Status};

/// Penalty when the domain has no address records
const PENALTY_NO_DNS: u32 = 40;
/// Penalty when the domain has no mail-exchanger records
const PENALTY_NO_MX: u32 = 25;
/// Penalty for disposable-provider domains
const PENALTY_DISPOSABLE: u32 = 30;
/// Penalty for role-based local parts
const PENALTY_ROLE_BASED: u32 = 15;
/// Penalty for machine-generated-looking local parts
const PENALTY_BOT_PATTERN: u32 = 20;
/// Penalty when the domain looks like a provider typo
const PENALTY_TYPO: u32 = 10;
/// Penalty for catch-all domains (acceptance cannot be trusted)
const PENALTY_CATCH_ALL: u32 = 10;
/// Weight of the 0-100 reputation signal
const REPUTATION_WEIGHT: u32 = 30;

/// Lower threshold of the `valid` band
pub const VALID_THRESHOLD: u8 = 80;
/// Lower threshold of the `risky` band
pub const RISKY_THRESHOLD: u8 = 50;

/// Combine all checks into `(score, status)`.
///
/// Format failure is disqualifying: the caller records every check at its
/// failed value and this function returns `(0, Invalid)` for such a report.
/// Free-provider membership is informational and carries no penalty.
pub fn score_checks(checks: &CheckReport) -> (u8, Status) {
    if !checks.format {
        return (0, Status::Invalid);
    }

    let mut penalty: u32 = 0;

    if !checks.dns {
        penalty += PENALTY_NO_DNS;
    }
    if !checks.mx_records {
        penalty += PENALTY_NO_MX;
    }
    if !checks.disposable {
        penalty += PENALTY_DISPOSABLE;
    }
    if !checks.role_based {
        penalty += PENALTY_ROLE_BASED;
    }
    if !checks.bot_pattern {
        penalty += PENALTY_BOT_PATTERN;
    }
    if checks.typo {
        penalty += PENALTY_TYPO;
    }
    if checks.catch_all {
        penalty += PENALTY_CATCH_ALL;
    }

    // Reputation contributes proportionally to its own 0-100 scale,
    // round half up
    let rep = u32::from(checks.domain_reputation.min(100));
    penalty += ((100 - rep) * REPUTATION_WEIGHT + 50) / 100;

    let score = 100u32.saturating_sub(penalty) as u8;
    (score, classify(score))
}

/// Map a score onto the status bands
pub fn classify(score: u8) -> Status {
    if score >= VALID_THRESHOLD {
        Status::Valid
    } else if score >= RISKY_THRESHOLD {
        Status::Risky
    } else {
        Status::Invalid
    }
}
