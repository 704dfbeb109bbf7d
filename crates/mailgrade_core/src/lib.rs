//! # mailgrade_core
//!
//! Email address validation and scoring engine: given an arbitrary address,
//! run a battery of independent checks (syntax, DNS, mailbox-acceptance
//! heuristics, reference lists, typo detection), combine them into a single
//! deterministic 0-100 score and a categorical status, and process bulk
//! batches asynchronously with live progress and per-item failure isolation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use mailgrade_core::{EmailValidator, EngineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let validator = EmailValidator::new(EngineConfig::default());
//!
//!     let result = validator.validate("user@example.com").await?;
//!     println!("score={} status={:?}", result.score, result.status);
//!
//!     Ok(())
//! }
//! ```

pub mod bulk;
pub mod catch_all;
pub mod dns;
pub mod export;
pub mod heuristics;
pub mod reference;
pub mod reputation;
pub mod scoring;
pub mod store;
pub mod syntax;
pub mod validation_pipeline;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Configuration for the validation engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Per-lookup DNS timeout in milliseconds
    pub dns_timeout_ms: u64,
    /// DNS lookup attempts (single attempt by default; failures are recorded
    /// as a failed check, never retried within a run)
    pub dns_attempts: usize,
    /// How long a cached domain-record outcome stays valid, in milliseconds.
    /// Stale entries are re-resolved, so a transient failure never pins a
    /// domain
    pub dns_cache_ttl_ms: u64,
    /// Concurrent workers per bulk batch
    pub worker_concurrency: usize,
    /// Catch-all probe timeout in milliseconds
    pub probe_timeout_ms: u64,
    /// Minimum interval between probes of the same domain, in milliseconds
    pub probe_min_interval_ms: u64,
    /// Enable the live SMTP catch-all probe (off by default; when off the
    /// probe reports `Unknown` and the check is not penalized)
    pub enable_catch_all_probe: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dns_timeout_ms: 3_000,
            dns_attempts: 1,
            dns_cache_ttl_ms: 60_000,
            worker_concurrency: 10,
            probe_timeout_ms: 2_000,
            probe_min_interval_ms: 1_000,
            enable_catch_all_probe: false,
        }
    }
}

/// Categorical classification derived from the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Valid,
    Risky,
    Invalid,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Valid => "valid",
            Status::Risky => "risky",
            Status::Invalid => "invalid",
        }
    }
}

/// Every independent check signal for one address.
///
/// Field order is the stable key order consumers rely on; serializing the
/// struct yields the ordered `checks` map. Every key is always present: a
/// check that could not run is recorded as `false` (or 0 for the reputation
/// score), never omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    /// Structural validity of the address (true = passed)
    pub format: bool,
    /// Domain resolves to an address record (true = passed)
    pub dns: bool,
    /// Domain publishes mail-exchanger records (true = passed)
    pub mx_records: bool,
    /// true = NOT on the disposable-domain list (passed)
    pub disposable: bool,
    /// true = local-part is NOT role-based (passed)
    pub role_based: bool,
    /// true = local-part does NOT look machine-generated (passed)
    pub bot_pattern: bool,
    /// true = domain looks like a typo of a major provider (flagged)
    pub typo: bool,
    /// true = domain IS a free mail provider (informational, not penalized)
    pub free_provider: bool,
    /// true = mail server accepts mail for any address (flagged)
    pub catch_all: bool,
    /// Aggregate domain trust signal, 0-100
    pub domain_reputation: u8,
}

impl CheckReport {
    /// Report for input that failed the syntax gate: every check recorded
    /// at its failed/lowest value, no sub-check was run.
    pub fn all_failed() -> Self {
        Self {
            format: false,
            dns: false,
            mx_records: false,
            disposable: false,
            role_based: false,
            bot_pattern: false,
            typo: false,
            free_provider: false,
            catch_all: false,
            domain_reputation: 0,
        }
    }
}

/// One evaluated address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Row identifier
    pub id: Uuid,
    /// The exact input, case preserved
    pub email: String,
    /// Mirrors `status == Status::Valid`
    pub is_valid: bool,
    /// Composite score, 0-100
    pub score: u8,
    /// Ordered map of check-name to signal; keys are stable across calls
    pub checks: CheckReport,
    pub status: Status,
    /// Corrected address when a near-match typo was detected
    pub suggestion: Option<String>,
    /// Owning batch, absent for single lookups
    pub list_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

/// Lifecycle state of a bulk batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStatus {
    Processing,
    Completed,
    Failed,
}

/// One bulk-validation batch. Holds only aggregate counters; the individual
/// results live in `ValidationResult` rows keyed to `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedList {
    pub id: Uuid,
    pub name: String,
    pub tags: String,
    /// Fixed at creation, after dedup and syntax prefilter
    pub total_emails: u32,
    /// Monotonically increasing as results land
    pub valid_emails: u32,
    pub invalid_emails: u32,
    /// Risky results get their own counter rather than being folded into
    /// `invalid_emails`
    pub risky_emails: u32,
    pub status: ListStatus,
    pub created_at: DateTime<Utc>,
}

impl SavedList {
    pub fn new(name: &str, tags: &str, total_emails: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            tags: tags.to_string(),
            total_emails,
            valid_emails: 0,
            invalid_emails: 0,
            risky_emails: 0,
            status: ListStatus::Processing,
            created_at: Utc::now(),
        }
    }

    /// Results recorded so far
    pub fn processed(&self) -> u32 {
        self.valid_emails + self.invalid_emails + self.risky_emails
    }
}

/// Errors surfaced to callers of the engine
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid email input: {0}")]
    InvalidEmail(String),
    #[error("Batch contains no usable candidates after dedup and filtering")]
    EmptyBatch,
    #[error("No such list: {0}")]
    ListNotFound(Uuid),
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ValidationError>;

// Re-export main types
pub use bulk::{BatchProgress, BulkValidator};
pub use reference::ReferenceSets;
pub use store::MemoryStore;
pub use validation_pipeline::EmailValidator;
