//! Single-address validation pipeline
//!
//! Coordinates the full battery of checks for one address: syntax gate,
//! cached domain resolution, reference-set classification, typo and bot
//! heuristics, catch-all probing, and reputation, then hands the check map to
//! the composite scorer.

use crate::{
    catch_all::{CatchAllProbe, CatchAllVerdict, DisabledProbe, SmtpCatchAllProbe},
    dns::{DomainResolver, ResolveDomain},
    heuristics::{BotPatternDetector, TypoDetector},
    reference::ReferenceSets,
    reputation::{NoReputation, ReputationSource, StaticReputation, NEUTRAL_REPUTATION},
    scoring, syntax, CheckReport, EngineConfig, Status, ValidationError, ValidationResult,
};

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument};
use uuid::Uuid;

/// Validator holding every check's dependencies. All collaborators sit behind
/// interfaces so tests can substitute fixtures and doubles.
pub struct EmailValidator {
    reference: Arc<ReferenceSets>,
    resolver: Arc<dyn ResolveDomain>,
    typo_detector: TypoDetector,
    prober: Arc<dyn CatchAllProbe>,
    reputation: Arc<dyn ReputationSource>,
}

impl EmailValidator {
    /// Validator with the production wiring: hickory-backed resolver,
    /// built-in reference sets and reputation seed, and the SMTP probe when
    /// enabled in the config (a disabled probe reports `Unknown`).
    pub fn new(config: EngineConfig) -> Self {
        let prober: Arc<dyn CatchAllProbe> = if config.enable_catch_all_probe {
            Arc::new(SmtpCatchAllProbe::new(
                config.probe_timeout_ms,
                config.probe_min_interval_ms,
            ))
        } else {
            Arc::new(DisabledProbe)
        };

        Self {
            reference: Arc::new(ReferenceSets::builtin()),
            resolver: Arc::new(DomainResolver::new(
                config.dns_timeout_ms,
                config.dns_attempts,
                config.dns_cache_ttl_ms,
            )),
            typo_detector: TypoDetector::new(),
            prober,
            reputation: Arc::new(StaticReputation::builtin()),
        }
    }

    /// Fully custom wiring, used by tests and by embedders that bring their
    /// own reference snapshots or reputation source
    pub fn with_parts(
        reference: Arc<ReferenceSets>,
        resolver: Arc<dyn ResolveDomain>,
        prober: Arc<dyn CatchAllProbe>,
        reputation: Arc<dyn ReputationSource>,
    ) -> Self {
        Self {
            reference,
            resolver,
            typo_detector: TypoDetector::new(),
            prober,
            reputation,
        }
    }

    /// Validator that never touches the network; DNS reports false and the
    /// probe reports `Unknown`
    pub fn offline(reference: Arc<ReferenceSets>) -> Self {
        Self::with_parts(
            reference,
            Arc::new(OfflineResolver),
            Arc::new(DisabledProbe),
            Arc::new(NoReputation),
        )
    }

    /// Run the full pipeline for one address.
    ///
    /// Returns `Err` only for input that cannot be attempted at all (empty or
    /// absurdly long). Everything else produces a complete result: a
    /// malformed address yields `format = false`, every other check at its
    /// failed value, score 0 and status `invalid`, with no network calls.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn validate(&self, email: &str) -> Result<ValidationResult, ValidationError> {
        if email.trim().is_empty() {
            return Err(ValidationError::InvalidEmail(
                "email must not be empty".to_string(),
            ));
        }
        if email.len() > 320 {
            return Err(ValidationError::InvalidEmail(
                "email exceeds maximum length".to_string(),
            ));
        }

        let parsed = match syntax::parse(email) {
            Some(parsed) => parsed,
            None => {
                debug!("syntax gate rejected {}", email);
                return Ok(self.rejected(email));
            }
        };

        // Cached per-domain resolution; failures record false, never abort
        let records = self.resolver.lookup(&parsed.domain).await;

        let is_disposable = self.reference.is_disposable(&parsed.domain);
        let is_free = self.reference.is_free_provider(&parsed.domain);
        let is_role = self.reference.is_role_based(&parsed.local);
        let is_bot = BotPatternDetector::is_suspicious(&parsed.local);

        let typo_domain = self.typo_detector.check(&parsed.domain);
        let suggestion = typo_domain
            .as_ref()
            .map(|domain| format!("{}@{}", parsed.local, domain));

        // Only probe servers that can actually receive mail
        let catch_all = if records.mx_records {
            self.prober.probe(&parsed.domain).await == CatchAllVerdict::CatchAll
        } else {
            false
        };

        let reputation = self
            .reputation
            .domain_reputation(&parsed.domain)
            .unwrap_or(NEUTRAL_REPUTATION);

        let checks = CheckReport {
            format: true,
            dns: records.dns,
            mx_records: records.mx_records,
            disposable: !is_disposable,
            role_based: !is_role,
            bot_pattern: !is_bot,
            typo: typo_domain.is_some(),
            free_provider: is_free,
            catch_all,
            domain_reputation: reputation,
        };

        let (score, status) = scoring::score_checks(&checks);

        debug!(
            "validated {} - score {}, status {}",
            email,
            score,
            status.as_str()
        );

        Ok(ValidationResult {
            id: Uuid::new_v4(),
            email: email.to_string(),
            is_valid: status == Status::Valid,
            score,
            checks,
            status,
            suggestion,
            list_id: None,
            created_at: Utc::now(),
        })
    }

    /// Result for input that failed the syntax gate
    fn rejected(&self, email: &str) -> ValidationResult {
        ValidationResult {
            id: Uuid::new_v4(),
            email: email.to_string(),
            is_valid: false,
            score: 0,
            checks: CheckReport::all_failed(),
            status: Status::Invalid,
            suggestion: None,
            list_id: None,
            created_at: Utc::now(),
        }
    }
}

/// Resolver double used by the offline wiring
struct OfflineResolver;

#[async_trait::async_trait]
impl ResolveDomain for OfflineResolver {
    async fn lookup(&self, _domain: &str) -> crate::dns::DomainRecords {
        crate::dns::DomainRecords::none()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{StubProbe, StubResolver};
    use super::*;
    use crate::catch_all::CatchAllVerdict;
    use crate::reference;
    use pretty_assertions::assert_eq;

    fn validator(probe_verdict: CatchAllVerdict) -> EmailValidator {
        EmailValidator::with_parts(
            Arc::new(reference::fixture()),
            Arc::new(StubResolver::new(&[
                ("gmail.com", true, true),
                ("yahoo.com", true, true),
                ("tempmail.org", true, true),
                ("corp.example.com", true, true),
                ("dead.example.com", false, false),
            ])),
            Arc::new(StubProbe(probe_verdict)),
            Arc::new(StaticReputation::builtin()),
        )
    }

    #[tokio::test]
    async fn clean_address_is_valid_with_full_check_map() {
        let v = validator(CatchAllVerdict::NotCatchAll);
        let result = v.validate("jane.doe@gmail.com").await.unwrap();

        assert!(result.checks.format);
        assert!(result.checks.dns);
        assert!(result.checks.mx_records);
        assert!(result.checks.disposable);
        assert!(result.checks.role_based);
        assert!(result.checks.bot_pattern);
        assert!(!result.checks.typo);
        assert!(result.checks.free_provider);
        assert!(!result.checks.catch_all);
        assert_eq!(result.checks.domain_reputation, 90);
        assert_eq!(result.status, Status::Valid);
        assert!(result.is_valid);
        assert_eq!(result.email, "jane.doe@gmail.com");
        assert_eq!(result.suggestion, None);
        assert_eq!(result.list_id, None);
    }

    #[tokio::test]
    async fn malformed_address_short_circuits_every_check() {
        let v = validator(CatchAllVerdict::Unknown);

        for input in ["not-an-email", "user@@x.com", "user@nodot"] {
            let result = v.validate(input).await.unwrap();
            assert_eq!(result.checks, CheckReport::all_failed());
            assert_eq!(result.score, 0);
            assert_eq!(result.status, Status::Invalid);
            assert!(!result.is_valid);
            assert_eq!(result.suggestion, None);
        }
    }

    #[tokio::test]
    async fn empty_input_is_rejected_outright() {
        let v = validator(CatchAllVerdict::Unknown);
        assert!(matches!(
            v.validate("").await,
            Err(ValidationError::InvalidEmail(_))
        ));
        assert!(matches!(
            v.validate("   ").await,
            Err(ValidationError::InvalidEmail(_))
        ));
    }

    #[tokio::test]
    async fn disposable_domain_fails_the_disposable_check() {
        let v = validator(CatchAllVerdict::Unknown);
        let result = v.validate("someone@tempmail.org").await.unwrap();
        assert!(!result.checks.disposable);
        assert_ne!(result.status, Status::Valid);
    }

    #[tokio::test]
    async fn typo_domain_yields_suggestion() {
        let v = validator(CatchAllVerdict::Unknown);
        let result = v.validate("user@gmial.com").await.unwrap();
        assert!(result.checks.typo);
        assert_eq!(result.suggestion, Some("user@gmail.com".to_string()));
    }

    #[tokio::test]
    async fn exact_provider_domain_is_not_a_typo() {
        let v = validator(CatchAllVerdict::Unknown);
        let result = v.validate("user@gmail.com").await.unwrap();
        assert!(!result.checks.typo);
        assert_eq!(result.suggestion, None);
    }

    #[tokio::test]
    async fn role_based_local_part_fails_the_role_check() {
        let v = validator(CatchAllVerdict::Unknown);
        let result = v.validate("admin@corp.example.com").await.unwrap();
        assert!(!result.checks.role_based);
    }

    #[tokio::test]
    async fn unresolvable_domain_records_false_and_continues() {
        let v = validator(CatchAllVerdict::Unknown);
        let result = v.validate("user@dead.example.com").await.unwrap();
        assert!(result.checks.format);
        assert!(!result.checks.dns);
        assert!(!result.checks.mx_records);
        assert_eq!(result.status, Status::Invalid);
    }

    #[tokio::test]
    async fn catch_all_verdict_flags_the_check() {
        let v = validator(CatchAllVerdict::CatchAll);
        let result = v.validate("user@corp.example.com").await.unwrap();
        assert!(result.checks.catch_all);

        // Unknown is never penalized
        let v = validator(CatchAllVerdict::Unknown);
        let result = v.validate("user@corp.example.com").await.unwrap();
        assert!(!result.checks.catch_all);
    }

    #[tokio::test]
    async fn validation_is_idempotent() {
        let v = validator(CatchAllVerdict::NotCatchAll);
        let first = v.validate("jane.doe@gmail.com").await.unwrap();
        let second = v.validate("jane.doe@gmail.com").await.unwrap();

        assert_eq!(first.checks, second.checks);
        assert_eq!(first.score, second.score);
        assert_eq!(first.status, second.status);
    }

    #[tokio::test]
    async fn offline_validator_never_needs_the_network() {
        let v = EmailValidator::offline(Arc::new(reference::fixture()));
        let result = v.validate("user@example.com").await.unwrap();
        assert!(result.checks.format);
        assert!(!result.checks.dns);
        assert_eq!(result.checks.domain_reputation, NEUTRAL_REPUTATION);
    }
}
