//! Helpers for the federation's stringly-typed numeric fields.

use crate::error::{H4aError, Result};

/// Placeholder the federation sends in score fields of unplayed games.
pub const DEFAULT_NULL_SENTINELS: &[&str] = &[" "];

/// Parse `input` as an integer unless it is one of the `sentinels`.
///
/// Sentinels are matched verbatim and after trimming both sides, so the
/// default `" "` also covers `""` and runs of blanks. Anything else that is
/// not an integer is a mapping error, never a silent zero.
pub fn int_or_null(input: &str, sentinels: &[&str]) -> Result<Option<i64>> {
    let trimmed = input.trim();
    if sentinels
        .iter()
        .any(|s| *s == input || s.trim() == trimmed)
    {
        return Ok(None);
    }

    trimmed.parse::<i64>().map(Some).map_err(|e| {
        H4aError::malformed(format!("expected an integer or blank, got '{}': {}", input, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sentinel() {
        assert_eq!(int_or_null(" ", DEFAULT_NULL_SENTINELS).unwrap(), None);
        assert_eq!(int_or_null(" ", &[" "]).unwrap(), None);
    }

    #[test]
    fn test_plain_integer() {
        assert_eq!(int_or_null("27", DEFAULT_NULL_SENTINELS).unwrap(), Some(27));
        assert_eq!(int_or_null(" 0 ", DEFAULT_NULL_SENTINELS).unwrap(), Some(0));
        assert_eq!(int_or_null("-3", DEFAULT_NULL_SENTINELS).unwrap(), Some(-3));
    }

    #[test]
    fn test_custom_sentinels() {
        assert_eq!(int_or_null("", &["", " "]).unwrap(), None);
        assert_eq!(int_or_null("-", &["-"]).unwrap(), None);
    }

    #[test]
    fn test_sentinel_result_is_stable() {
        let first = int_or_null(" ", DEFAULT_NULL_SENTINELS).unwrap();
        let second = int_or_null(" ", DEFAULT_NULL_SENTINELS).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_garbage_is_an_error_not_zero() {
        let result = int_or_null("n/a", DEFAULT_NULL_SENTINELS);
        match result {
            Err(H4aError::MalformedResponse { message }) => assert!(message.contains("n/a")),
            other => panic!("Expected MalformedResponse, got {:?}", other),
        }
    }

    #[test]
    fn test_no_sentinels_means_blank_is_an_error() {
        assert!(int_or_null(" ", &[]).is_err());
    }
}
