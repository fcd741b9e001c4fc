use super::{Direction, Metric};

/// Length of the longest `[A-Za-z0-9_]` run after a lossy UTF-8 decode.
///
/// Base64 and hex blobs, minified bundles, and machine-generated identifiers
/// produce tokens far longer than anything a human types.
#[derive(Debug, Default)]
pub struct LongestToken;

impl Metric for LongestToken {
    fn name(&self) -> &str {
        "longest-token"
    }

    fn direction(&self) -> Direction {
        Direction::HighIsBad
    }

    fn score(&self, data: &[u8]) -> f64 {
        let text = String::from_utf8_lossy(data);

        let mut longest = 0usize;
        let mut current = 0usize;
        for ch in text.chars() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                current += 1;
                longest = longest.max(current);
            } else {
                current = 0;
            }
        }

        longest as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_longest_run() {
        assert_eq!(LongestToken.score(b"a bb ccc dddd"), 4.0);
    }

    #[test]
    fn empty_input_scores_zero() {
        assert_eq!(LongestToken.score(&[]), 0.0);
    }

    #[test]
    fn punctuation_only_scores_zero() {
        assert_eq!(LongestToken.score(b"... !!! ??? ---"), 0.0);
    }

    #[test]
    fn invalid_utf8_is_not_fatal() {
        // The replacement character breaks the run instead of aborting.
        let data = [b'a', b'b', 0xff, b'c', b'd', b'e'];
        assert_eq!(LongestToken.score(&data), 3.0);
    }

    #[test]
    fn underscores_extend_tokens() {
        assert_eq!(LongestToken.score(b"foo_bar_9 x"), 9.0);
    }
}
