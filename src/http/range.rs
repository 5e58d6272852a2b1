//! HTTP Range request parsing module
//!
//! Parses the single-range, byte-unit form of the Range header and validates
//! it against the resource size. A range that cannot be applied is simply
//! dropped and the full body is served; this server never answers 416.

/// Parsed Range header bounds, before validation against a file size
///
/// Either bound may be absent: `bytes=N-` leaves `end` unset, `bytes=-N`
/// leaves `start` unset (suffix form, `end` then holds the suffix length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSpec {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

/// A validated inclusive byte window into a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteWindow {
    pub start: u64,
    pub end: u64,
}

impl ByteWindow {
    /// Number of bytes covered by the window
    #[inline]
    pub const fn len(self) -> u64 {
        self.end - self.start + 1
    }
}

/// Parse a Range header value into raw bounds
///
/// Returns `None` for anything this server does not support: a missing
/// header, a non-`bytes` unit, or a multi-range (comma) list.
pub fn parse_range(header: Option<&str>) -> Option<RangeSpec> {
    let header = header?.strip_prefix("bytes=")?;
    if header.contains(',') {
        return None;
    }

    let (start_str, end_str) = header.split_once('-')?;
    if end_str.contains('-') {
        return None;
    }

    let start = parse_bound(start_str)?;
    let end = parse_bound(end_str)?;
    Some(RangeSpec { start, end })
}

/// Parse one bound: empty means absent, otherwise it must be an integer
fn parse_bound(bound: &str) -> Option<Option<u64>> {
    let bound = bound.trim();
    if bound.is_empty() {
        return Some(None);
    }
    bound.parse::<u64>().ok().map(Some)
}

/// Validate parsed bounds against the resource size
///
/// - `bytes=-N` serves the last `N` bytes; `N` larger than the file rejects.
/// - `bytes=N-` serves from `N` to the end.
/// - `bytes=N-M` serves exactly `[N, M]`.
///
/// The window is accepted only when `start < end` and `end < size`. A
/// single-byte range (`start == end`) is rejected by policy and falls back
/// to the full body.
pub fn byte_window(spec: RangeSpec, size: u64) -> Option<ByteWindow> {
    let (start, end) = match (spec.start, spec.end) {
        (None, Some(suffix)) => (size.checked_sub(suffix)?, size.checked_sub(1)?),
        (Some(start), None) => (start, size.checked_sub(1)?),
        (Some(start), Some(end)) => (start, end),
        (None, None) => return None,
    };

    (start < end && end < size).then_some(ByteWindow { start, end })
}

/// Parse and validate in one step
pub fn resolve_range(header: Option<&str>, size: u64) -> Option<ByteWindow> {
    parse_range(header).and_then(|spec| byte_window(spec, size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_header() {
        assert_eq!(resolve_range(None, 100), None);
    }

    #[test]
    fn test_explicit_range() {
        assert_eq!(
            resolve_range(Some("bytes=0-9"), 100),
            Some(ByteWindow { start: 0, end: 9 })
        );
    }

    #[test]
    fn test_open_range() {
        let window = resolve_range(Some("bytes=1-"), 10).unwrap();
        assert_eq!(window, ByteWindow { start: 1, end: 9 });
        assert_eq!(window.len(), 9);
    }

    #[test]
    fn test_suffix_range() {
        assert_eq!(
            resolve_range(Some("bytes=-2"), 10),
            Some(ByteWindow { start: 8, end: 9 })
        );
    }

    #[test]
    fn test_suffix_covering_whole_file() {
        // N == size: degenerates to the full window, still valid when size >= 2
        assert_eq!(
            resolve_range(Some("bytes=-10"), 10),
            Some(ByteWindow { start: 0, end: 9 })
        );
    }

    #[test]
    fn test_suffix_longer_than_file() {
        assert_eq!(resolve_range(Some("bytes=-20"), 10), None);
    }

    #[test]
    fn test_suffix_on_single_byte_file() {
        // start == end == 0 never satisfies start < end; must not underflow
        assert_eq!(resolve_range(Some("bytes=-1"), 1), None);
    }

    #[test]
    fn test_single_byte_range_rejected() {
        // deliberate policy: start == end falls back to the full body
        assert_eq!(resolve_range(Some("bytes=5-5"), 100), None);
    }

    #[test]
    fn test_end_beyond_size() {
        assert_eq!(resolve_range(Some("bytes=0-100"), 100), None);
        assert_eq!(resolve_range(Some("bytes=0-99"), 100).map(|w| w.end), Some(99));
    }

    #[test]
    fn test_start_beyond_size() {
        assert_eq!(resolve_range(Some("bytes=200-"), 100), None);
    }

    #[test]
    fn test_inverted_range() {
        assert_eq!(resolve_range(Some("bytes=9-1"), 100), None);
    }

    #[test]
    fn test_multi_range_ignored() {
        assert_eq!(resolve_range(Some("bytes=0-9,20-29"), 100), None);
    }

    #[test]
    fn test_malformed() {
        assert_eq!(resolve_range(Some("bytes=a-b"), 100), None);
        assert_eq!(resolve_range(Some("bytes=-"), 100), None);
        assert_eq!(resolve_range(Some("bytes=1-2-3"), 100), None);
        assert_eq!(resolve_range(Some("items=0-9"), 100), None);
    }

    #[test]
    fn test_empty_file() {
        assert_eq!(resolve_range(Some("bytes=0-"), 0), None);
        assert_eq!(resolve_range(Some("bytes=-1"), 0), None);
    }

    #[test]
    fn test_parse_keeps_bounds_optioned() {
        assert_eq!(
            parse_range(Some("bytes=5-")),
            Some(RangeSpec {
                start: Some(5),
                end: None
            })
        );
        assert_eq!(
            parse_range(Some("bytes=-5")),
            Some(RangeSpec {
                start: None,
                end: Some(5)
            })
        );
    }
}
