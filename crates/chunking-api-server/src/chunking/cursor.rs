//! Heuristic offset recovery for strategies that rebuild chunk content
//! instead of slicing it out of the input.
//!
//! Lookups are "first match at or after the cursor" over character slices.
//! A needle that repeats in the input can be mis-located when the cursor has
//! not yet advanced past an earlier occurrence; callers fall back to the
//! cursor position when no match is found at all.

/// First occurrence of `needle` in `haystack` at or after `from`,
/// as a character offset.
pub(crate) fn find_from(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if from + needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| haystack[i..i + needle.len()] == *needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn test_finds_first_match() {
        let haystack = chars("abcabc");
        assert_eq!(find_from(&haystack, &chars("abc"), 0), Some(0));
    }

    #[test]
    fn test_respects_cursor() {
        let haystack = chars("abcabc");
        assert_eq!(find_from(&haystack, &chars("abc"), 1), Some(3));
    }

    #[test]
    fn test_no_match_past_cursor() {
        let haystack = chars("abcabc");
        assert_eq!(find_from(&haystack, &chars("abc"), 4), None);
    }

    #[test]
    fn test_multibyte_offsets_are_char_based() {
        let haystack = chars("héllo wörld");
        assert_eq!(find_from(&haystack, &chars("wörld"), 0), Some(6));
    }

    #[test]
    fn test_empty_needle() {
        let haystack = chars("abc");
        assert_eq!(find_from(&haystack, &[], 2), Some(2));
        assert_eq!(find_from(&haystack, &[], 9), Some(3));
    }
}
