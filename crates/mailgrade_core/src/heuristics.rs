//! Typo detection and bot-pattern heuristics
//!
//! Typo detection compares the domain against a small fixed corpus of common
//! provider domains using Levenshtein distance. The bot heuristic examines
//! the local part for structural suspicion signals.

use textdistance::str::levenshtein;
use tracing::debug;

/// Near-domain-match correction against common provider domains
pub struct TypoDetector {
    corpus: Vec<String>,
}

impl TypoDetector {
    pub fn new() -> Self {
        Self {
            corpus: Self::default_corpus(),
        }
    }

    /// Detector with a custom provider corpus
    pub fn with_corpus(corpus: Vec<String>) -> Self {
        Self {
            corpus: corpus.into_iter().map(|d| d.to_lowercase()).collect(),
        }
    }

    /// Check whether a domain is a near-miss of a known provider.
    ///
    /// Returns the corrected domain when the edit distance to a corpus entry
    /// is 1 or 2. A domain that exactly matches the corpus is never flagged
    /// as a typo of itself.
    pub fn check(&self, domain: &str) -> Option<String> {
        let domain = domain.to_lowercase();

        if self.corpus.iter().any(|p| *p == domain) {
            return None;
        }

        let mut best: Option<(usize, &str)> = None;
        for provider in &self.corpus {
            let distance = levenshtein(&domain, provider);
            if distance <= 2 && best.map_or(true, |(d, _)| distance < d) {
                best = Some((distance, provider));
            }
        }

        best.map(|(distance, provider)| {
            debug!(
                "potential typo: {} -> {} (distance {})",
                domain, provider, distance
            );
            provider.to_string()
        })
    }

    pub fn corpus_size(&self) -> usize {
        self.corpus.len()
    }

    fn default_corpus() -> Vec<String> {
        [
            "gmail.com",
            "googlemail.com",
            "yahoo.com",
            "hotmail.com",
            "outlook.com",
            "live.com",
            "msn.com",
            "icloud.com",
            "aol.com",
            "protonmail.com",
            "zoho.com",
            "gmx.com",
            "yandex.com",
            "fastmail.com",
            "mail.com",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}

impl Default for TypoDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Rows used for keyboard-walk detection
const KEYBOARD_ROWS: &[&str] = &["qwertyuiop", "asdfghjkl", "zxcvbnm", "1234567890"];

/// Structural suspicion signals in the local part
pub struct BotPatternDetector;

impl BotPatternDetector {
    /// True when the local part looks machine-generated: long identical or
    /// sequential character runs, keyboard walks, digit-heavy strings, or
    /// long separator-free random-looking alphanumerics.
    pub fn is_suspicious(local: &str) -> bool {
        let local = local.to_lowercase();
        let chars: Vec<char> = local.chars().collect();

        if Self::has_repeat_run(&chars, 4) {
            debug!("bot signal: identical-character run in {}", local);
            return true;
        }

        if Self::has_sequential_run(&chars, 5) {
            debug!("bot signal: sequential run in {}", local);
            return true;
        }

        if Self::has_keyboard_walk(&local, 5) {
            debug!("bot signal: keyboard walk in {}", local);
            return true;
        }

        let digits = chars.iter().filter(|c| c.is_ascii_digit()).count();
        if chars.len() >= 8 && digits * 10 > chars.len() * 6 {
            debug!("bot signal: digit-heavy local {}", local);
            return true;
        }

        // Long, separator-free mixed alphanumeric strings
        let alphanumeric_only = chars.iter().all(|c| c.is_ascii_alphanumeric());
        let has_letters = chars.iter().any(|c| c.is_ascii_alphabetic());
        if chars.len() >= 20 && alphanumeric_only && has_letters && digits > 0 {
            debug!("bot signal: random-looking local {}", local);
            return true;
        }

        false
    }

    fn has_repeat_run(chars: &[char], min_len: usize) -> bool {
        let mut run = 1;
        for pair in chars.windows(2) {
            if pair[0] == pair[1] {
                run += 1;
                if run >= min_len {
                    return true;
                }
            } else {
                run = 1;
            }
        }
        false
    }

    fn has_sequential_run(chars: &[char], min_len: usize) -> bool {
        let mut run = 1;
        for pair in chars.windows(2) {
            let (a, b) = (pair[0] as u32, pair[1] as u32);
            let consecutive = b == a + 1
                && ((pair[0].is_ascii_lowercase() && pair[1].is_ascii_lowercase())
                    || (pair[0].is_ascii_digit() && pair[1].is_ascii_digit()));
            if consecutive {
                run += 1;
                if run >= min_len {
                    return true;
                }
            } else {
                run = 1;
            }
        }
        false
    }

    fn has_keyboard_walk(local: &str, window: usize) -> bool {
        KEYBOARD_ROWS.iter().any(|row| {
            row.as_bytes()
                .windows(window)
                .any(|w| local.contains(std::str::from_utf8(w).unwrap_or_default()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flags_close_misspellings() {
        let detector = TypoDetector::new();

        assert_eq!(detector.check("gmial.com"), Some("gmail.com".to_string()));
        assert_eq!(detector.check("gmai.com"), Some("gmail.com".to_string()));
        assert_eq!(detector.check("yaho.com"), Some("yahoo.com".to_string()));
        assert_eq!(detector.check("hotmial.com"), Some("hotmail.com".to_string()));
    }

    #[test]
    fn exact_corpus_members_are_never_typos() {
        let detector = TypoDetector::new();

        assert_eq!(detector.check("gmail.com"), None);
        assert_eq!(detector.check("GMAIL.COM"), None);
        assert_eq!(detector.check("yahoo.com"), None);
        assert_eq!(detector.check("mail.com"), None);
    }

    #[test]
    fn distant_domains_are_not_flagged() {
        let detector = TypoDetector::new();

        assert_eq!(detector.check("example.com"), None);
        assert_eq!(detector.check("stackoverflow.com"), None);
        assert_eq!(detector.check("completely-different.org"), None);
    }

    #[test]
    fn custom_corpus() {
        let detector = TypoDetector::with_corpus(vec!["mycorp.com".to_string()]);
        assert_eq!(detector.check("mycorp.com"), None);
        assert_eq!(detector.check("mycrop.com"), Some("mycorp.com".to_string()));
    }

    #[test]
    fn bot_repeat_runs() {
        assert!(BotPatternDetector::is_suspicious("aaaa"));
        assert!(BotPatternDetector::is_suspicious("xaaaab"));
        assert!(!BotPatternDetector::is_suspicious("aab"));
    }

    #[test]
    fn bot_sequential_runs() {
        assert!(BotPatternDetector::is_suspicious("abcdefg"));
        assert!(BotPatternDetector::is_suspicious("user34567"));
        assert!(!BotPatternDetector::is_suspicious("abcd"));
    }

    #[test]
    fn bot_keyboard_walks() {
        assert!(BotPatternDetector::is_suspicious("qwerty"));
        assert!(BotPatternDetector::is_suspicious("xasdfgh"));
        assert!(!BotPatternDetector::is_suspicious("quest"));
    }

    #[test]
    fn bot_digit_heavy_and_random_locals() {
        assert!(BotPatternDetector::is_suspicious("98172465"));
        assert!(BotPatternDetector::is_suspicious("x9k2m4q8w1z5r7t3n6p0"));
        assert!(!BotPatternDetector::is_suspicious("user2024"));
    }

    #[test]
    fn ordinary_locals_pass() {
        assert!(!BotPatternDetector::is_suspicious("john.doe"));
        assert!(!BotPatternDetector::is_suspicious("jane_smith"));
        assert!(!BotPatternDetector::is_suspicious("news+tag"));
        assert!(!BotPatternDetector::is_suspicious("info"));
    }
}
