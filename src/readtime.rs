//! Converts word counts into human-readable reading-time estimates for the
//! homepage listing.

/// The assumed reading speed. Fixed rather than configurable; the estimate is
/// coarse enough that tuning it per-site isn't worth the knob.
pub const WORDS_PER_MINUTE: usize = 225;

/// Renders an estimated reading duration for a word count, e.g. `"2 minutes"`.
/// Minutes round up, so any nonempty post reads for at least a minute; a word
/// count of zero renders as `"0 minutes"`.
pub fn estimate(word_count: usize) -> String {
    let minutes = (word_count + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE;
    match minutes {
        1 => String::from("1 minute"),
        n => format!("{} minutes", n),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_estimate_rounds_up() {
        assert_eq!(estimate(1), "1 minute");
        assert_eq!(estimate(225), "1 minute");
        assert_eq!(estimate(226), "2 minutes");
        assert_eq!(estimate(450), "2 minutes");
        assert_eq!(estimate(451), "3 minutes");
    }

    #[test]
    fn test_estimate_zero_words() {
        assert_eq!(estimate(0), "0 minutes");
    }

    #[test]
    fn test_estimate_singular_only_at_one_minute() {
        for w in (0..=2000).step_by(25) {
            let rendered = estimate(w);
            let minutes = (w + WORDS_PER_MINUTE - 1) / WORDS_PER_MINUTE;
            if minutes == 1 {
                assert_eq!(rendered, "1 minute");
            } else {
                assert_eq!(rendered, format!("{} minutes", minutes));
            }
        }
    }
}
