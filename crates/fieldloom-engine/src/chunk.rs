//! Deterministic text chunking with overlap.

use fieldloom_core::{Error, Result};

/// Split `text` into windows of up to `size` characters, each overlapping the
/// previous by `overlap` characters.
///
/// `size` must be positive (a negative overlap cannot be expressed). An
/// overlap at or above the window size would never advance, so it is clamped
/// to `size / 10`; the step `size - overlap` is therefore always positive and
/// the scan terminates. Whitespace-only windows are skipped, so the output is
/// empty iff the input is empty or entirely whitespace.
pub fn chunk_text(text: &str, size: usize, overlap: usize) -> Result<Vec<String>> {
    if size == 0 {
        return Err(Error::InvalidParameter("chunk_size must be > 0".into()));
    }
    let overlap = if overlap >= size { size / 10 } else { overlap };
    let step = size - overlap;

    let chars: Vec<char> = text.chars().collect();
    let total = chars.len();
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < total {
        let end = (start + size).min(total);
        let piece: String = chars[start..end].iter().collect();
        if !piece.trim().is_empty() {
            chunks.push(piece);
        }
        if end == total {
            break;
        }
        start += step;
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_text_with_exact_overlap() {
        let text: String = ('a'..='y').collect(); // 25 chars
        let chunks = chunk_text(&text, 10, 3).unwrap();
        assert_eq!(chunks, vec!["abcdefghij", "hijklmnopq", "opqrstuvwx", "vwxy"]);
        for pair in chunks.windows(2) {
            let prev_tail: String = pair[0].chars().rev().take(3).collect::<Vec<_>>()
                .into_iter().rev().collect();
            assert!(pair[1].starts_with(&prev_tail));
        }
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));
    }

    #[test]
    fn degenerate_overlap_is_clamped_and_terminates() {
        let text = "abcdefghijklmnopqrstuvwxy";
        let chunks = chunk_text(text, 10, 10).unwrap();
        // overlap clamped to 1, step 9
        assert_eq!(chunks, vec!["abcdefghij", "jklmnopqrs", "stuvwxy"]);
    }

    #[test]
    fn small_size_clamp_still_advances() {
        // size 3, overlap 5 → clamp to 3/10 = 0, step 3
        let chunks = chunk_text("abcdef", 3, 5).unwrap();
        assert_eq!(chunks, vec!["abc", "def"]);
    }

    #[test]
    fn zero_size_is_rejected() {
        assert!(chunk_text("abc", 0, 0).is_err());
    }

    #[test]
    fn whitespace_only_windows_are_skipped() {
        let chunks = chunk_text("ab        cd", 4, 0).unwrap();
        assert_eq!(chunks, vec!["ab  ", "  cd"]);
        assert!(chunk_text("      ", 4, 0).unwrap().is_empty());
        assert!(chunk_text("", 4, 0).unwrap().is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = chunk_text("hello", 500, 50).unwrap();
        assert_eq!(chunks, vec!["hello"]);
    }

    #[test]
    fn multibyte_text_counts_characters_not_bytes() {
        let text = "héllo wörld désu";
        let chunks = chunk_text(text, 6, 2).unwrap();
        assert!(chunks.iter().all(|c| c.chars().count() <= 6));
        assert!(chunks[0].starts_with("héllo"));
    }
}
