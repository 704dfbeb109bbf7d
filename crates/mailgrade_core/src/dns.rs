//! Domain resolution with TTL-bounded caching, built on hickory-resolver
//!
//! Two independent lookups per domain: existence (A/AAAA) and mail-exchanger
//! records. Each lookup is bounded by a timeout; a timeout or resolution
//! failure records the corresponding check as `false` and is never treated as
//! fatal. Results are cached per lowercased domain with a short TTL so bulk
//! batches sharing a domain do one round-trip; stale entries are re-resolved
//! and pruned so a transient failure never pins a domain to `false`.

use async_trait::async_trait;
use hickory_resolver::{
    config::{ResolverConfig, ResolverOpts},
    TokioAsyncResolver,
};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Cached lookup outcome for one domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainRecords {
    /// Domain has at least one A or AAAA record
    pub dns: bool,
    /// Domain has at least one MX record
    pub mx_records: bool,
}

impl DomainRecords {
    pub fn none() -> Self {
        Self {
            dns: false,
            mx_records: false,
        }
    }
}

/// Capability seam for domain lookups so tests can substitute a double
#[async_trait]
pub trait ResolveDomain: Send + Sync {
    /// Look up address and MX records for a domain. Infallible by contract:
    /// resolution problems surface as `false` record flags.
    async fn lookup(&self, domain: &str) -> DomainRecords;
}

/// One cached lookup with its resolution time
struct CacheEntry {
    records: DomainRecords,
    resolved_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.resolved_at.elapsed() < ttl
    }
}

/// Production resolver backed by hickory with a TTL-bounded cache
pub struct DomainResolver {
    resolver: TokioAsyncResolver,
    timeout: Duration,
    cache_ttl: Duration,
    cache: Mutex<HashMap<String, CacheEntry>>,
}

impl DomainResolver {
    /// # Arguments
    /// * `timeout_ms` - per-lookup timeout in milliseconds
    /// * `attempts` - lookup attempts before giving up
    /// * `cache_ttl_ms` - how long a cached outcome stays valid; a stale
    ///   entry is re-resolved on the next lookup
    pub fn new(timeout_ms: u64, attempts: usize, cache_ttl_ms: u64) -> Self {
        let config = ResolverConfig::default();

        let mut opts = ResolverOpts::default();
        opts.timeout = Duration::from_millis(timeout_ms);
        opts.attempts = attempts;
        opts.negative_min_ttl = Some(Duration::from_secs(30));

        info!(
            "DNS resolver initialized - timeout: {}ms, attempts: {}, cache ttl: {}ms",
            timeout_ms, attempts, cache_ttl_ms
        );

        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
            timeout: Duration::from_millis(timeout_ms),
            cache_ttl: Duration::from_millis(cache_ttl_ms),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cached(&self, key: &str) -> Option<DomainRecords> {
        self.cache
            .lock()
            .unwrap()
            .get(key)
            .filter(|entry| entry.is_fresh(self.cache_ttl))
            .map(|entry| entry.records)
    }

    /// Record an outcome, dropping every expired entry so the map stays
    /// bounded by the set of recently seen domains
    fn store(&self, key: String, records: DomainRecords) {
        let mut cache = self.cache.lock().unwrap();
        cache.retain(|_, entry| entry.is_fresh(self.cache_ttl));
        cache.insert(
            key,
            CacheEntry {
                records,
                resolved_at: Instant::now(),
            },
        );
    }

    async fn has_address_records(&self, domain: &str) -> bool {
        match tokio::time::timeout(self.timeout, self.resolver.ipv4_lookup(domain)).await {
            Ok(Ok(response)) if response.iter().count() > 0 => return true,
            Ok(Err(e)) => debug!("A lookup failed for {}: {}", domain, e),
            Err(_) => {
                warn!("A lookup timed out for {}", domain);
                return false;
            }
            _ => {}
        }

        match tokio::time::timeout(self.timeout, self.resolver.ipv6_lookup(domain)).await {
            Ok(Ok(response)) => response.iter().count() > 0,
            Ok(Err(e)) => {
                debug!("AAAA lookup failed for {}: {}", domain, e);
                false
            }
            Err(_) => {
                warn!("AAAA lookup timed out for {}", domain);
                false
            }
        }
    }

    async fn has_mx_records(&self, domain: &str) -> bool {
        match tokio::time::timeout(self.timeout, self.resolver.mx_lookup(domain)).await {
            Ok(Ok(response)) => response.iter().count() > 0,
            Ok(Err(e)) => {
                debug!("MX lookup failed for {}: {}", domain, e);
                false
            }
            Err(_) => {
                warn!("MX lookup timed out for {}", domain);
                false
            }
        }
    }

    /// Drop all cached entries
    pub fn clear_cache(&self) {
        self.cache.lock().unwrap().clear();
        info!("domain record cache cleared");
    }

    /// Number of cached domains
    pub fn cache_len(&self) -> usize {
        self.cache.lock().unwrap().len()
    }
}

#[async_trait]
impl ResolveDomain for DomainResolver {
    async fn lookup(&self, domain: &str) -> DomainRecords {
        let key = domain.to_lowercase();

        if let Some(hit) = self.cached(&key) {
            debug!("cache hit for {}", key);
            return hit;
        }

        let (dns, mx_records) =
            tokio::join!(self.has_address_records(&key), self.has_mx_records(&key));
        let records = DomainRecords { dns, mx_records };

        debug!(
            "resolved {} - dns: {}, mx: {}",
            key, records.dns, records.mx_records
        );

        self.store(key, records);
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn cache_starts_empty_and_clears() {
        let resolver = DomainResolver::new(1000, 1, 60_000);
        assert_eq!(resolver.cache_len(), 0);
        resolver.clear_cache();
        assert_eq!(resolver.cache_len(), 0);
    }

    #[tokio::test]
    async fn cached_outcomes_expire_after_the_ttl() {
        let records = DomainRecords {
            dns: true,
            mx_records: true,
        };

        // Zero TTL: every entry is stale the moment it lands, so a failed
        // lookup cannot pin the domain
        let resolver = DomainResolver::new(1000, 1, 0);
        resolver.store("x.com".to_string(), records);
        assert_eq!(resolver.cached("x.com"), None);

        // A comfortable TTL keeps the entry servable
        let resolver = DomainResolver::new(1000, 1, 60_000);
        resolver.store("x.com".to_string(), records);
        assert_eq!(resolver.cached("x.com"), Some(records));
    }

    #[tokio::test]
    async fn stale_entries_are_pruned_on_insert() {
        let resolver = DomainResolver::new(1000, 1, 0);
        resolver.store("a.com".to_string(), DomainRecords::none());
        resolver.store("b.com".to_string(), DomainRecords::none());
        resolver.store("c.com".to_string(), DomainRecords::none());

        // Only the freshest insert survives; the map never accumulates
        // expired entries
        assert_eq!(resolver.cache_len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires live DNS"]
    async fn resolves_known_mail_domain() {
        let resolver = DomainResolver::new(3000, 1, 60_000);
        let records = resolver.lookup("gmail.com").await;
        assert!(records.dns);
        assert!(records.mx_records);

        // Second lookup is served from the cache
        assert_eq!(resolver.cache_len(), 1);
        let cached = resolver.lookup("GMAIL.COM").await;
        assert_eq!(cached, records);
        assert_eq!(resolver.cache_len(), 1);
    }

    #[tokio::test]
    #[ignore = "requires live DNS"]
    async fn nonexistent_domain_records_false_without_error() {
        let resolver = DomainResolver::new(3000, 1, 60_000);
        let records = resolver
            .lookup("this-domain-definitely-does-not-exist-12345.com")
            .await;
        assert!(!records.dns);
        assert!(!records.mx_records);
    }
}
