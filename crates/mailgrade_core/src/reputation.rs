//! Domain reputation signal
//!
//! The source of truth is external and pluggable. In absence of a signal the
//! engine uses a neutral mid-range value rather than zero, so a missing
//! source does not unfairly tank the composite score.

use std::collections::HashSet;
use tracing::debug;

/// Neutral value used when no reputation signal is available
pub const NEUTRAL_REPUTATION: u8 = 50;

/// Pluggable trust signal for a domain
pub trait ReputationSource: Send + Sync {
    /// Aggregate trust in the domain, 0-100. `None` means no signal; the
    /// caller substitutes [`NEUTRAL_REPUTATION`].
    fn domain_reputation(&self, domain: &str) -> Option<u8>;
}

/// Built-in source backed by static trusted/blocked lists
pub struct StaticReputation {
    trusted: HashSet<String>,
    blocked: HashSet<String>,
}

impl StaticReputation {
    pub fn new<I, J>(trusted: I, blocked: J) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
    {
        Self {
            trusted: trusted.into_iter().map(|d| d.to_lowercase()).collect(),
            blocked: blocked.into_iter().map(|d| d.to_lowercase()).collect(),
        }
    }

    /// Seed list: the major providers are trusted, a handful of known abuse
    /// domains are blocked
    pub fn builtin() -> Self {
        let trusted = [
            "gmail.com",
            "googlemail.com",
            "yahoo.com",
            "hotmail.com",
            "outlook.com",
            "live.com",
            "icloud.com",
            "aol.com",
            "protonmail.com",
            "fastmail.com",
        ];
        let blocked = ["spambot.xyz", "bulkblast.click", "inboxflood.top"];

        Self::new(
            trusted.iter().map(|s| s.to_string()),
            blocked.iter().map(|s| s.to_string()),
        )
    }
}

impl ReputationSource for StaticReputation {
    fn domain_reputation(&self, domain: &str) -> Option<u8> {
        let domain = domain.to_lowercase();
        if self.blocked.contains(&domain) {
            debug!("domain {} is on the block list", domain);
            return Some(5);
        }
        if self.trusted.contains(&domain) {
            return Some(90);
        }
        None
    }
}

/// Source that never has a signal; every domain scores neutral
pub struct NoReputation;

impl ReputationSource for NoReputation {
    fn domain_reputation(&self, _domain: &str) -> Option<u8> {
        None
    }
}
