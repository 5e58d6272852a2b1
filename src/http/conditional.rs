//! Conditional request evaluation module
//!
//! Decides whether a client-supplied validator (`If-None-Match`) or timestamp
//! (`If-Modified-Since`) still covers the current resource, in which case the
//! response degenerates to 304. Malformed headers are treated as absent.

use chrono::{DateTime, Utc};
use std::time::SystemTime;

/// Evaluate both conditional headers against the resource state
///
/// Either condition alone is sufficient (logical OR): a parseable
/// `If-Modified-Since` at or after the modification time, or an
/// `If-None-Match` equal to the validator.
pub fn is_not_modified(
    if_modified_since: Option<&str>,
    if_none_match: Option<&str>,
    modified: SystemTime,
    validator: &str,
) -> bool {
    validator_matches(if_none_match, validator) || modified_since_covers(if_modified_since, modified)
}

/// Exact validator comparison against `If-None-Match`
fn validator_matches(if_none_match: Option<&str>, validator: &str) -> bool {
    if_none_match.is_some_and(|tag| tag.trim() == validator)
}

/// Check whether `If-Modified-Since` is at or after the modification time
///
/// The header carries second resolution, so the file mtime is truncated to
/// whole seconds before comparison.
fn modified_since_covers(header: Option<&str>, modified: SystemTime) -> bool {
    let Some(header) = header else {
        return false;
    };
    let Ok(since) = DateTime::parse_from_rfc2822(header) else {
        return false;
    };
    since.timestamp() >= DateTime::<Utc>::from(modified).timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    const VALIDATOR: &str = "\"1a-2b-3c\"";

    fn mtime() -> SystemTime {
        // 2016-08-25 10:33:16 UTC
        UNIX_EPOCH + Duration::from_secs(1_472_121_196)
    }

    #[test]
    fn test_validator_match_alone_is_sufficient() {
        assert!(is_not_modified(None, Some(VALIDATOR), mtime(), VALIDATOR));
        assert!(is_not_modified(
            None,
            Some("  \"1a-2b-3c\"  "),
            mtime(),
            VALIDATOR
        ));
    }

    #[test]
    fn test_validator_mismatch() {
        assert!(!is_not_modified(None, Some("\"other\""), mtime(), VALIDATOR));
    }

    #[test]
    fn test_modified_since_at_mtime() {
        // exactly the modification second still counts as fresh
        assert!(is_not_modified(
            Some("Thu, 25 Aug 2016 10:33:16 GMT"),
            None,
            mtime(),
            VALIDATOR
        ));
    }

    #[test]
    fn test_modified_since_after_mtime() {
        assert!(is_not_modified(
            Some("Fri, 26 Aug 2016 00:00:00 GMT"),
            None,
            mtime(),
            VALIDATOR
        ));
    }

    #[test]
    fn test_modified_since_before_mtime() {
        assert!(!is_not_modified(
            Some("Wed, 24 Aug 2016 00:00:00 GMT"),
            None,
            mtime(),
            VALIDATOR
        ));
    }

    #[test]
    fn test_unparseable_header_is_absent() {
        assert!(!is_not_modified(Some("not a date"), None, mtime(), VALIDATOR));
    }

    #[test]
    fn test_either_condition_suffices() {
        // stale timestamp but matching validator
        assert!(is_not_modified(
            Some("Wed, 24 Aug 2016 00:00:00 GMT"),
            Some(VALIDATOR),
            mtime(),
            VALIDATOR
        ));
        // wrong validator but fresh timestamp
        assert!(is_not_modified(
            Some("Fri, 26 Aug 2016 00:00:00 GMT"),
            Some("\"other\""),
            mtime(),
            VALIDATOR
        ));
    }

    #[test]
    fn test_no_headers() {
        assert!(!is_not_modified(None, None, mtime(), VALIDATOR));
    }
}
