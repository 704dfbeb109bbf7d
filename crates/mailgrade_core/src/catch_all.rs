//! Best-effort catch-all mailbox-acceptance probe
//!
//! Determines whether a mail server accepts mail for *any* address at the
//! domain, which makes per-address acceptance checks unreliable. The probe is
//! a capability interface so tests can inject a stub; the live implementation
//! is rate-limited per domain and degrades to `Unknown` (not penalized) on
//! every failure mode rather than blocking the pipeline.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, warn};
use uuid::Uuid;

/// Outcome of a probe attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatchAllVerdict {
    /// Server accepted a recipient that cannot exist
    CatchAll,
    /// Server rejected the synthetic recipient
    NotCatchAll,
    /// Probe could not complete; never penalized
    Unknown,
}

/// Capability seam for mailbox-acceptance probing
#[async_trait]
pub trait CatchAllProbe: Send + Sync {
    async fn probe(&self, domain: &str) -> CatchAllVerdict;
}

/// Probe that never goes to the network (the default)
pub struct DisabledProbe;

#[async_trait]
impl CatchAllProbe for DisabledProbe {
    async fn probe(&self, _domain: &str) -> CatchAllVerdict {
        CatchAllVerdict::Unknown
    }
}

/// Live probe speaking a minimal SMTP dialogue.
///
/// Sends RCPT for a randomized local-part that cannot plausibly exist; a 2xx
/// reply means the server accepts anything. Probes of the same domain are
/// throttled to one per `min_interval`.
pub struct SmtpCatchAllProbe {
    timeout: Duration,
    min_interval: Duration,
    last_probe: Mutex<HashMap<String, Instant>>,
}

impl SmtpCatchAllProbe {
    pub fn new(timeout_ms: u64, min_interval_ms: u64) -> Self {
        Self {
            timeout: Duration::from_millis(timeout_ms),
            min_interval: Duration::from_millis(min_interval_ms),
            last_probe: Mutex::new(HashMap::new()),
        }
    }

    /// Rate limit gate. Returns false when the domain was probed too
    /// recently; the caller reports `Unknown` instead of hammering the host.
    /// Entries past the interval are dropped so the map only tracks domains
    /// still inside their cooldown.
    fn acquire_slot(&self, domain: &str) -> bool {
        let mut last = self.last_probe.lock().unwrap();
        let now = Instant::now();
        last.retain(|_, at| now.duration_since(*at) < self.min_interval);

        if last.contains_key(domain) {
            return false;
        }
        last.insert(domain.to_string(), now);
        true
    }

    async fn dialogue(&self, domain: &str) -> anyhow::Result<CatchAllVerdict> {
        let stream = TcpStream::connect((domain, 25)).await?;
        let (read_half, mut write_half) = stream.into_split();
        let mut reader = BufReader::new(read_half);

        // Greeting
        if read_reply(&mut reader).await? / 100 != 2 {
            return Ok(CatchAllVerdict::Unknown);
        }

        write_half.write_all(b"EHLO mailgrade.probe\r\n").await?;
        if read_reply(&mut reader).await? / 100 != 2 {
            return Ok(CatchAllVerdict::Unknown);
        }

        write_half.write_all(b"MAIL FROM:<>\r\n").await?;
        if read_reply(&mut reader).await? / 100 != 2 {
            return Ok(CatchAllVerdict::Unknown);
        }

        // A recipient that cannot plausibly exist
        let synthetic = format!(
            "RCPT TO:<{}@{}>\r\n",
            Uuid::new_v4().simple(),
            domain
        );
        write_half.write_all(synthetic.as_bytes()).await?;
        let rcpt_code = read_reply(&mut reader).await?;

        let _ = write_half.write_all(b"QUIT\r\n").await;

        Ok(match rcpt_code / 100 {
            2 => CatchAllVerdict::CatchAll,
            5 => CatchAllVerdict::NotCatchAll,
            _ => CatchAllVerdict::Unknown,
        })
    }
}

#[async_trait]
impl CatchAllProbe for SmtpCatchAllProbe {
    async fn probe(&self, domain: &str) -> CatchAllVerdict {
        if !self.acquire_slot(domain) {
            debug!("probe for {} throttled", domain);
            return CatchAllVerdict::Unknown;
        }

        match tokio::time::timeout(self.timeout, self.dialogue(domain)).await {
            Ok(Ok(verdict)) => {
                debug!("probe for {} -> {:?}", domain, verdict);
                verdict
            }
            Ok(Err(e)) => {
                debug!("probe for {} failed: {}", domain, e);
                CatchAllVerdict::Unknown
            }
            Err(_) => {
                warn!("probe for {} timed out", domain);
                CatchAllVerdict::Unknown
            }
        }
    }
}

/// Read one SMTP reply, skipping continuation lines, and return its code
async fn read_reply<R>(reader: &mut BufReader<R>) -> anyhow::Result<u16>
where
    R: tokio::io::AsyncRead + Unpin,
{
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).await?;
        if n == 0 {
            anyhow::bail!("connection closed mid-reply");
        }
        if line.len() >= 4 && line.as_bytes()[3] == b' ' {
            return line[..3]
                .parse::<u16>()
                .map_err(|_| anyhow::anyhow!("malformed reply: {}", line.trim()));
        }
        // "250-..." continuation, keep reading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn disabled_probe_is_always_unknown() {
        assert_eq!(
            DisabledProbe.probe("example.com").await,
            CatchAllVerdict::Unknown
        );
    }

    #[test]
    fn rate_limit_throttles_repeat_probes() {
        let probe = SmtpCatchAllProbe::new(1000, 60_000);
        assert!(probe.acquire_slot("example.com"));
        assert!(!probe.acquire_slot("example.com"));
        // Different domain has its own slot
        assert!(probe.acquire_slot("other.com"));
    }

    #[test]
    fn rate_limit_map_drops_expired_slots() {
        // Zero interval: every slot expires immediately, so repeat probes
        // are allowed and the map never accumulates old domains
        let probe = SmtpCatchAllProbe::new(1000, 0);
        assert!(probe.acquire_slot("a.com"));
        assert!(probe.acquire_slot("a.com"));
        assert!(probe.acquire_slot("b.com"));
        assert!(probe.acquire_slot("c.com"));
        assert_eq!(probe.last_probe.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn reply_parsing_handles_multiline() {
        let input: &[u8] = b"250-mail.example.com greets you\r\n250-SIZE 5000\r\n250 OK\r\n";
        let mut reader = BufReader::new(input);
        assert_eq!(read_reply(&mut reader).await.unwrap(), 250);
    }

    #[tokio::test]
    async fn reply_parsing_rejects_truncated_stream() {
        let input: &[u8] = b"250-partial\r\n";
        let mut reader = BufReader::new(input);
        assert!(read_reply(&mut reader).await.is_err());
    }
}
