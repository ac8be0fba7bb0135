//! Pinned text reveal for the about section.

use foundation::easing::{clamp01, ease_in_out_cubic};
use foundation::geometry::SectionBounds;

/// Fraction of the viewport height scrolled inside the section before the
/// reveal starts moving.
pub const REVEAL_START_BUFFER_VH: f64 = 0.4;
/// Minimum reveal duration as a fraction of the viewport height.
pub const REVEAL_MIN_DURATION_VH: f64 = 0.4;
/// Reveal duration as a fraction of the section height.
pub const REVEAL_DURATION_SECTION: f64 = 0.2;

/// Eased reveal progress in `[0, 1]` for the given scroll position.
///
/// - before the section top: 0
/// - at or past the section bottom: 1
/// - otherwise a cubic ease-in-out over the scroll distance remaining after
///   the start buffer.
pub fn reveal_progress(scroll_y: f64, section: SectionBounds, viewport_height: f64) -> f64 {
    if scroll_y < section.top {
        return 0.0;
    }
    if scroll_y >= section.bottom() {
        return 1.0;
    }

    let start_buffer = REVEAL_START_BUFFER_VH * viewport_height;
    let duration = (REVEAL_MIN_DURATION_VH * viewport_height)
        .max(REVEAL_DURATION_SECTION * section.height);
    if duration <= 0.0 {
        return 1.0;
    }

    let effective = (section.scrolled(scroll_y) - start_buffer).max(0.0);
    let linear = (effective / duration).min(1.0);
    ease_in_out_cubic(linear)
}

/// Number of characters coloured in for `progress` over `char_count` characters.
pub fn revealed_chars(progress: f64, char_count: usize) -> usize {
    ((clamp01(progress) * char_count as f64).floor() as usize).min(char_count)
}

/// One whitespace-delimited token of the reveal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealToken {
    pub text: String,
    /// Index of the token's first character in the whole text.
    pub start: usize,
    pub char_count: usize,
    pub is_space: bool,
}

/// How much of a token is coloured at a given reveal count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenReveal<'a> {
    pub token: &'a RevealToken,
    pub revealed: usize,
}

/// Text split into words and whitespace runs.
///
/// Rendering each word as an unbreakable group of character spans keeps a
/// word on one line whatever its reveal state; line breaks only fall on the
/// whitespace tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealText {
    tokens: Vec<RevealToken>,
    char_count: usize,
}

impl RevealText {
    pub fn new(text: &str) -> Self {
        let mut tokens: Vec<RevealToken> = Vec::new();
        let mut index = 0usize;
        for ch in text.chars() {
            let is_space = ch.is_whitespace();
            match tokens.last_mut() {
                Some(last) if last.is_space == is_space => {
                    last.text.push(ch);
                    last.char_count += 1;
                }
                _ => tokens.push(RevealToken {
                    text: ch.to_string(),
                    start: index,
                    char_count: 1,
                    is_space,
                }),
            }
            index += 1;
        }
        RevealText {
            tokens,
            char_count: index,
        }
    }

    pub fn char_count(&self) -> usize {
        self.char_count
    }

    pub fn tokens(&self) -> &[RevealToken] {
        &self.tokens
    }

    /// Per-token reveal state for `progress`.
    pub fn reveal(&self, progress: f64) -> Vec<TokenReveal<'_>> {
        let count = revealed_chars(progress, self.char_count);
        self.tokens
            .iter()
            .map(|token| TokenReveal {
                token,
                revealed: count.saturating_sub(token.start).min(token.char_count),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VH: f64 = 800.0;

    fn section() -> SectionBounds {
        SectionBounds::new(1000.0, 2400.0)
    }

    #[test]
    fn zero_before_section_and_one_after() {
        for y in [0.0, 500.0, 999.0, 1000.0] {
            assert_eq!(reveal_progress(y, section(), VH), 0.0, "y={y}");
        }
        for y in [3400.0, 3401.0, 10_000.0] {
            assert_eq!(reveal_progress(y, section(), VH), 1.0, "y={y}");
        }
    }

    #[test]
    fn start_buffer_holds_progress_at_zero() {
        // start buffer = 0.4 * 800 = 320
        assert_eq!(reveal_progress(1000.0 + 320.0, section(), VH), 0.0);
        assert!(reveal_progress(1000.0 + 321.0, section(), VH) > 0.0);
    }

    #[test]
    fn duration_uses_the_larger_of_viewport_and_section_terms() {
        // duration = max(320, 480) = 480; halfway through it the cubic is 0.5.
        let y = 1000.0 + 320.0 + 240.0;
        assert!((reveal_progress(y, section(), VH) - 0.5).abs() < 1e-12);
        // finished once the whole duration has been scrolled
        assert_eq!(reveal_progress(1000.0 + 320.0 + 480.0, section(), VH), 1.0);
    }

    #[test]
    fn monotonic_within_pinned_range() {
        let s = section();
        let mut prev = 0.0;
        let mut y = s.top;
        while y <= s.bottom() + 10.0 {
            let p = reveal_progress(y, s, VH);
            assert!(p >= prev, "progress dropped at y={y}");
            assert!((0.0..=1.0).contains(&p));
            prev = p;
            y += 7.0;
        }
    }

    #[test]
    fn zero_height_section_is_a_step() {
        let s = SectionBounds::new(200.0, 0.0);
        assert_eq!(reveal_progress(199.0, s, VH), 0.0);
        assert_eq!(reveal_progress(200.0, s, VH), 1.0);
    }

    #[test]
    fn revealed_chars_floors_and_clamps() {
        assert_eq!(revealed_chars(0.0, 10), 0);
        assert_eq!(revealed_chars(0.55, 10), 5);
        assert_eq!(revealed_chars(1.0, 10), 10);
        assert_eq!(revealed_chars(2.0, 10), 10);
        assert_eq!(revealed_chars(0.5, 0), 0);
    }

    #[test]
    fn text_splits_into_words_and_spaces() {
        let text = RevealText::new("I design  calm");
        let parts: Vec<(&str, usize, bool)> = text
            .tokens()
            .iter()
            .map(|t| (t.text.as_str(), t.start, t.is_space))
            .collect();
        assert_eq!(
            parts,
            vec![
                ("I", 0, false),
                (" ", 1, true),
                ("design", 2, false),
                ("  ", 8, true),
                ("calm", 10, false),
            ]
        );
        assert_eq!(text.char_count(), 14);
    }

    #[test]
    fn reveal_fills_tokens_in_order() {
        let text = RevealText::new("ab cd");
        // 5 chars, progress 0.6 -> 3 chars revealed: "ab" and the space.
        let state: Vec<usize> = text.reveal(0.6).iter().map(|r| r.revealed).collect();
        assert_eq!(state, vec![2, 1, 0]);
        let state: Vec<usize> = text.reveal(0.8).iter().map(|r| r.revealed).collect();
        assert_eq!(state, vec![2, 1, 1]);
    }

    #[test]
    fn multibyte_text_counts_chars() {
        let text = RevealText::new("café é");
        assert_eq!(text.char_count(), 6);
        assert_eq!(text.tokens()[2].start, 5);
    }
}
