use std::sync::OnceLock;

use regex::Regex;

use super::types::HunkHeader;

fn header_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^@@ -(\d+)(?:,(\d+))? \+(\d+)(?:,(\d+))? @@").ok())
        .as_ref()
}

/// Parses one hunk header line.
///
/// Returns `None` for anything that is not a well-formed header; omitted
/// counts default to 1.
pub fn parse_hunk_header(line: &str) -> Option<HunkHeader> {
    let caps = header_re()?.captures(line)?;
    let num = |i: usize, default: u32| -> Option<u32> {
        match caps.get(i) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };

    Some(HunkHeader {
        old_start: num(1, 0)?,
        old_count: num(2, 1)?,
        new_start: num(3, 0)?,
        new_count: num(4, 1)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_header() {
        let h = parse_hunk_header("@@ -43,7 +43,7 @@ jobs:").unwrap();
        assert_eq!((h.old_start, h.old_count, h.new_start, h.new_count), (43, 7, 43, 7));
        assert_eq!((h.old_end(), h.new_end()), (49, 49));
    }

    #[test]
    fn omitted_counts_default_to_one() {
        let h = parse_hunk_header("@@ -3 +4 @@").unwrap();
        assert_eq!((h.old_count, h.new_count), (1, 1));
        assert_eq!((h.old_end(), h.new_end()), (3, 4));

        let h = parse_hunk_header("@@ -3,2 +4 @@ fn main()").unwrap();
        assert_eq!((h.old_end(), h.new_end()), (4, 4));
    }

    #[test]
    fn arithmetic_holds_across_samples() {
        for (a, b, c, d) in [(1u32, 0u32, 1u32, 5u32), (10, 8, 10, 9), (5, 6, 5, 7), (20, 7, 21, 7)] {
            let line = format!("@@ -{a},{b} +{c},{d} @@");
            let h = parse_hunk_header(&line).unwrap();
            assert_eq!(h.old_end(), (a + b).saturating_sub(1));
            assert_eq!(h.new_end(), (c + d).saturating_sub(1));
        }
    }

    #[test]
    fn non_headers_are_none() {
        assert!(parse_hunk_header("@@ garbage @@").is_none());
        assert!(parse_hunk_header(" @@ -1,2 +1,2 @@").is_none());
        assert!(parse_hunk_header("+@@ -1,2 +1,2 @@").is_none());
        assert!(parse_hunk_header("@@ -1,2 +1,2").is_none());
        assert!(parse_hunk_header("@@ -99999999999,1 +1,1 @@").is_none());
        assert!(parse_hunk_header("").is_none());
    }
}
