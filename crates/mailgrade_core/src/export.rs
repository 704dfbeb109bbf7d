//! Delimited-text export of validation results
//!
//! The field order and presence are a compatibility contract with existing
//! exports: `email,status,score,is_valid,suggestion,created_at`, one record
//! per result, RFC 4180-style quoting.

use crate::ValidationResult;

const HEADER: &str = "email,status,score,is_valid,suggestion,created_at";

/// Render results as delimited text, header first, oldest-first order
/// preserved from the input slice
pub fn to_delimited(results: &[ValidationResult]) -> String {
    let mut out = String::with_capacity(64 * (results.len() + 1));
    out.push_str(HEADER);
    out.push('\n');

    for result in results {
        out.push_str(&quote(&result.email));
        out.push(',');
        out.push_str(result.status.as_str());
        out.push(',');
        out.push_str(&result.score.to_string());
        out.push(',');
        out.push_str(if result.is_valid { "true" } else { "false" });
        out.push(',');
        if let Some(suggestion) = &result.suggestion {
            out.push_str(&quote(suggestion));
        }
        out.push(',');
        out.push_str(&result.created_at.to_rfc3339());
        out.push('\n');
    }

    out
}

/// Quote a field when it contains a delimiter, quote, or newline
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CheckReport, Status};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn sample(email: &str, status: Status, score: u8, suggestion: Option<&str>) -> ValidationResult {
        ValidationResult {
            id: Uuid::new_v4(),
            email: email.to_string(),
            is_valid: status == Status::Valid,
            score,
            checks: CheckReport::all_failed(),
            status,
            suggestion: suggestion.map(|s| s.to_string()),
            list_id: None,
            created_at: Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn header_and_field_order_are_stable() {
        let out = to_delimited(&[]);
        assert_eq!(out, "email,status,score,is_valid,suggestion,created_at\n");
    }

    #[test]
    fn renders_one_row_per_result() {
        let results = vec![
            sample("a@x.com", Status::Valid, 92, None),
            sample("b@gmial.com", Status::Invalid, 30, Some("b@gmail.com")),
        ];
        let out = to_delimited(&results);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "a@x.com,valid,92,true,,2026-08-25T12:00:00+00:00");
        assert_eq!(
            lines[2],
            "b@gmial.com,invalid,30,false,b@gmail.com,2026-08-25T12:00:00+00:00"
        );
    }

    #[test]
    fn fields_with_delimiters_are_quoted() {
        let results = vec![sample("\"odd\"@x.com", Status::Risky, 60, None)];
        let out = to_delimited(&results);
        assert!(out.contains("\"\"\"odd\"\"@x.com\""));
    }
}
