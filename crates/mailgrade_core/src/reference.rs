//! Reference set lookups: disposable domains, free providers, role keywords
//!
//! The sets are owned and refreshed externally (seed/import); the engine
//! reads an immutable snapshot injected at construction time so tests can
//! substitute fixtures. All lookups are case-insensitive exact matches
//! (role keywords additionally match as a local-part prefix).

use std::collections::HashSet;
use tracing::info;

/// Immutable-during-a-run lookup tables
#[derive(Debug, Clone)]
pub struct ReferenceSets {
    disposable_domains: HashSet<String>,
    free_providers: HashSet<String>,
    role_keywords: HashSet<String>,
}

impl ReferenceSets {
    /// Build a snapshot from externally maintained lists. Entries are
    /// lowercased; empty entries are dropped.
    pub fn from_lists<I, J, K>(disposable: I, free: J, role: K) -> Self
    where
        I: IntoIterator<Item = String>,
        J: IntoIterator<Item = String>,
        K: IntoIterator<Item = String>,
    {
        let normalize = |iter: Box<dyn Iterator<Item = String>>| -> HashSet<String> {
            iter.map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };

        let sets = Self {
            disposable_domains: normalize(Box::new(disposable.into_iter())),
            free_providers: normalize(Box::new(free.into_iter())),
            role_keywords: normalize(Box::new(role.into_iter())),
        };

        info!(
            "reference sets loaded - {} disposable, {} free, {} role keywords",
            sets.disposable_domains.len(),
            sets.free_providers.len(),
            sets.role_keywords.len()
        );

        sets
    }

    /// Built-in seed data, used when no external import is wired up
    pub fn builtin() -> Self {
        let disposable = [
            "10minutemail.com",
            "guerrillamail.com",
            "mailinator.com",
            "tempmail.org",
            "temp-mail.org",
            "throwawaymail.com",
            "yopmail.com",
            "getnada.com",
            "trashmail.com",
            "sharklasers.com",
            "dispostable.com",
            "maildrop.cc",
            "fakeinbox.com",
            "spamgourmet.com",
            "mytemp.email",
        ];
        let free = [
            "gmail.com",
            "googlemail.com",
            "yahoo.com",
            "hotmail.com",
            "outlook.com",
            "live.com",
            "msn.com",
            "aol.com",
            "icloud.com",
            "me.com",
            "protonmail.com",
            "proton.me",
            "zoho.com",
            "gmx.com",
            "gmx.de",
            "web.de",
            "yandex.com",
            "mail.com",
            "fastmail.com",
        ];
        let role = [
            "admin", "support", "info", "sales", "contact", "help", "office", "billing",
            "marketing", "team", "hello", "noreply", "no-reply", "postmaster", "webmaster",
            "abuse", "security", "hr", "careers", "jobs",
        ];

        Self::from_lists(
            disposable.iter().map(|s| s.to_string()),
            free.iter().map(|s| s.to_string()),
            role.iter().map(|s| s.to_string()),
        )
    }

    /// Domain is on the disposable-provider list
    pub fn is_disposable(&self, domain: &str) -> bool {
        self.disposable_domains.contains(&domain.to_lowercase())
    }

    /// Domain is a free mail provider
    pub fn is_free_provider(&self, domain: &str) -> bool {
        self.free_providers.contains(&domain.to_lowercase())
    }

    /// Local part matches a role keyword, exactly or as a prefix followed by
    /// a non-letter (so "admin", "admin.team" and "admin2" match, "administrator"
    /// does not)
    pub fn is_role_based(&self, local: &str) -> bool {
        let local = local.to_lowercase();
        if self.role_keywords.contains(&local) {
            return true;
        }
        self.role_keywords.iter().any(|kw| {
            local.starts_with(kw.as_str())
                && local[kw.len()..]
                    .chars()
                    .next()
                    .is_some_and(|c| !c.is_ascii_alphabetic())
        })
    }

    pub fn disposable_count(&self) -> usize {
        self.disposable_domains.len()
    }

    pub fn free_provider_count(&self) -> usize {
        self.free_providers.len()
    }

    pub fn role_keyword_count(&self) -> usize {
        self.role_keywords.len()
    }
}

/// Small fixture shared by tests across the crate
#[cfg(test)]
pub(crate) fn fixture() -> ReferenceSets {
    ReferenceSets::from_lists(
        vec!["tempmail.org".to_string(), "10minutemail.com".to_string()],
        vec!["gmail.com".to_string(), "yahoo.com".to_string()],
        vec!["admin".to_string(), "support".to_string()],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposable_lookup_is_case_insensitive() {
        let sets = fixture();
        assert!(sets.is_disposable("tempmail.org"));
        assert!(sets.is_disposable("TempMail.ORG"));
        assert!(!sets.is_disposable("gmail.com"));
    }

    #[test]
    fn free_provider_lookup() {
        let sets = fixture();
        assert!(sets.is_free_provider("gmail.com"));
        assert!(sets.is_free_provider("GMAIL.com"));
        assert!(!sets.is_free_provider("example.com"));
    }

    #[test]
    fn role_keyword_exact_and_prefix() {
        let sets = fixture();
        assert!(sets.is_role_based("admin"));
        assert!(sets.is_role_based("Admin"));
        assert!(sets.is_role_based("admin.team"));
        assert!(sets.is_role_based("admin2"));
        assert!(sets.is_role_based("support-desk"));

        // A keyword embedded in a longer word is not role-based
        assert!(!sets.is_role_based("administrator"));
        assert!(!sets.is_role_based("jane.doe"));
    }

    #[test]
    fn builtin_seed_is_populated() {
        let sets = ReferenceSets::builtin();
        assert!(sets.disposable_count() > 0);
        assert!(sets.free_provider_count() > 0);
        assert!(sets.role_keyword_count() > 0);
        assert!(sets.is_disposable("mailinator.com"));
        assert!(sets.is_free_provider("gmail.com"));
        assert!(sets.is_role_based("postmaster"));
    }
}
