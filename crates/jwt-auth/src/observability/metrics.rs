//! Metrics definitions
//!
//! All metrics follow Prometheus naming conventions:
//! - `jwt_auth_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded:
//! - `status`: 2 values (success, error)
//! - `error_category`: bounded by `TokenValidationError::category`
//! - `reason`: bounded by `TicketRejection::code`

use metrics::{counter, histogram};
use std::time::Duration;

/// Record token issuance duration and outcome
///
/// Metric: `jwt_auth_token_issuance_duration_seconds`, `jwt_auth_token_issuance_total`
/// Labels: `status`
pub fn record_token_issuance(status: &str, duration: Duration) {
    histogram!("jwt_auth_token_issuance_duration_seconds", "status" => status.to_string())
        .record(duration.as_secs_f64());

    counter!("jwt_auth_token_issuance_total", "status" => status.to_string()).increment(1);
}

/// Record token validation result
///
/// Metric: `jwt_auth_token_validations_total`
/// Labels: `status`, `error_category`
pub fn record_token_validation(status: &str, error_category: Option<&str>) {
    let category = error_category.unwrap_or("none");
    counter!("jwt_auth_token_validations_total", "status" => status.to_string(), "error_category" => category.to_string())
        .increment(1);
}

/// Record the outcome of decoding a cookie ticket
///
/// Metric: `jwt_auth_ticket_unprotect_total`
/// Labels: `status`, `reason`
///
/// The reason label is for operators only; callers of the codec never see it.
pub fn record_ticket_unprotect(status: &str, reason: Option<&str>) {
    let reason = reason.unwrap_or("none");
    counter!("jwt_auth_ticket_unprotect_total", "status" => status.to_string(), "reason" => reason.to_string())
        .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    // These execute the recording functions against the global no-op
    // recorder; asserting values would need a recorder from metrics-util.

    #[test]
    fn test_record_token_issuance() {
        record_token_issuance("success", Duration::from_micros(250));
        record_token_issuance("error", Duration::from_micros(40));
    }

    #[test]
    fn test_record_token_validation() {
        record_token_validation("success", None);
        record_token_validation("error", Some("signature"));
        record_token_validation("error", Some("lifetime"));
        record_token_validation("error", Some("algorithm"));
    }

    #[test]
    fn test_record_ticket_unprotect() {
        record_ticket_unprotect("success", None);
        record_ticket_unprotect("error", Some("decrypt"));
        record_ticket_unprotect("error", Some("missing_token"));
    }
}
