//! One-shot reveal on first intersection, plus the lazy-image variant.

/// Observer root margin for reveals: the bottom 15% of the viewport does not count.
pub const REVEAL_ROOT_MARGIN: &str = "0px 0px -15% 0px";
pub const DEFAULT_REVEAL_THRESHOLD: f64 = 0.1;
/// Delay after entering view before a lazy image is forced visible.
pub const LAZY_IMAGE_FALLBACK_MS: u32 = 800;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RevealOptions {
    pub threshold: f64,
    /// Transition delay applied once the element appears.
    pub delay_ms: u32,
    /// Distance the element rises from while hidden.
    pub offset_px: f64,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_REVEAL_THRESHOLD,
            delay_ms: 0,
            offset_px: 24.0,
        }
    }
}

/// Reads an observer threshold from markup. Only fractions in `[0, 1]` are accepted.
pub fn parse_threshold(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    (0.0..=1.0).contains(&value).then_some(value)
}

/// Style values for the reveal transition.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RevealStyle {
    pub opacity: f64,
    pub translate_y_px: f64,
    pub delay_ms: u32,
}

/// What the observer owner must do after an intersection update.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RevealTransition {
    /// Keep observing.
    Pending,
    /// Just appeared: apply the visible style and stop observing.
    Appeared,
    /// Already appeared earlier; nothing to do.
    Done,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LazyReveal {
    options: RevealOptions,
    appeared: bool,
}

impl LazyReveal {
    pub fn new(options: RevealOptions) -> Self {
        Self {
            options,
            appeared: false,
        }
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    pub fn has_appeared(&self) -> bool {
        self.appeared
    }

    /// The reveal never re-hides, so there is nothing left to observe once it fired.
    pub fn should_observe(&self) -> bool {
        !self.appeared
    }

    pub fn on_intersection(&mut self, is_intersecting: bool) -> RevealTransition {
        if self.appeared {
            return RevealTransition::Done;
        }
        if !is_intersecting {
            return RevealTransition::Pending;
        }
        self.appeared = true;
        RevealTransition::Appeared
    }

    pub fn style(&self) -> RevealStyle {
        if self.appeared {
            RevealStyle {
                opacity: 1.0,
                translate_y_px: 0.0,
                delay_ms: self.options.delay_ms,
            }
        } else {
            RevealStyle {
                opacity: 0.0,
                translate_y_px: self.options.offset_px,
                delay_ms: self.options.delay_ms,
            }
        }
    }
}

impl Default for LazyReveal {
    fn default() -> Self {
        Self::new(RevealOptions::default())
    }
}

/// Follow-up the owner must schedule after a lazy-image event.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LazyImageAction {
    None,
    /// Start the `src` download and arm the fallback timer.
    LoadAndArmFallback { fallback_ms: u32 },
    /// Image became visible; cancel any pending fallback.
    Show,
}

/// Reveal wrapper for images whose native `load` signal may be delayed or
/// never delivered (served from cache before the listener was attached).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LazyImage {
    reveal: LazyReveal,
    loaded: bool,
    forced: bool,
}

impl LazyImage {
    pub fn new(options: RevealOptions) -> Self {
        Self {
            reveal: LazyReveal::new(options),
            loaded: false,
            forced: false,
        }
    }

    pub fn in_view(&self) -> bool {
        self.reveal.has_appeared()
    }

    pub fn is_visible(&self) -> bool {
        self.in_view() && (self.loaded || self.forced)
    }

    pub fn should_observe(&self) -> bool {
        self.reveal.should_observe()
    }

    pub fn on_intersection(&mut self, is_intersecting: bool) -> LazyImageAction {
        match self.reveal.on_intersection(is_intersecting) {
            RevealTransition::Appeared if self.loaded => LazyImageAction::Show,
            RevealTransition::Appeared => LazyImageAction::LoadAndArmFallback {
                fallback_ms: LAZY_IMAGE_FALLBACK_MS,
            },
            RevealTransition::Pending | RevealTransition::Done => LazyImageAction::None,
        }
    }

    pub fn on_load(&mut self) -> LazyImageAction {
        let was_visible = self.is_visible();
        self.loaded = true;
        if !was_visible && self.is_visible() {
            LazyImageAction::Show
        } else {
            LazyImageAction::None
        }
    }

    pub fn on_fallback_elapsed(&mut self) -> LazyImageAction {
        let was_visible = self.is_visible();
        self.forced = true;
        if !was_visible && self.is_visible() {
            LazyImageAction::Show
        } else {
            LazyImageAction::None
        }
    }

    pub fn style(&self) -> RevealStyle {
        let mut style = self.reveal.style();
        if !self.is_visible() {
            style.opacity = 0.0;
            style.translate_y_px = self.reveal.options().offset_px;
        }
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_outside_unit_range_are_rejected() {
        assert_eq!(parse_threshold("0.5"), Some(0.5));
        assert_eq!(parse_threshold(" 1 "), Some(1.0));
        assert_eq!(parse_threshold("0"), Some(0.0));
        assert_eq!(parse_threshold("1.5"), None);
        assert_eq!(parse_threshold("-0.1"), None);
        assert_eq!(parse_threshold("NaN"), None);
        assert_eq!(parse_threshold("half"), None);
    }

    #[test]
    fn appears_once_and_never_hides() {
        let mut r = LazyReveal::default();
        assert_eq!(r.on_intersection(false), RevealTransition::Pending);
        assert!(r.should_observe());
        assert_eq!(r.on_intersection(true), RevealTransition::Appeared);
        assert!(!r.should_observe());
        assert_eq!(r.on_intersection(false), RevealTransition::Done);
        assert!(r.has_appeared());
        assert_eq!(r.style().opacity, 1.0);
    }

    #[test]
    fn style_carries_configured_delay() {
        let mut r = LazyReveal::new(RevealOptions {
            delay_ms: 150,
            ..RevealOptions::default()
        });
        assert_eq!(
            r.style(),
            RevealStyle {
                opacity: 0.0,
                translate_y_px: 24.0,
                delay_ms: 150
            }
        );
        r.on_intersection(true);
        assert_eq!(r.style().translate_y_px, 0.0);
        assert_eq!(r.style().delay_ms, 150);
    }

    #[test]
    fn image_shows_on_load_after_entering_view() {
        let mut img = LazyImage::default();
        assert_eq!(
            img.on_intersection(true),
            LazyImageAction::LoadAndArmFallback { fallback_ms: 800 }
        );
        assert!(!img.is_visible());
        assert_eq!(img.on_load(), LazyImageAction::Show);
        assert!(img.is_visible());
        assert_eq!(img.on_fallback_elapsed(), LazyImageAction::None);
    }

    #[test]
    fn fallback_forces_visibility_without_load() {
        let mut img = LazyImage::default();
        img.on_intersection(true);
        assert_eq!(img.on_fallback_elapsed(), LazyImageAction::Show);
        assert!(img.is_visible());
        assert_eq!(img.on_load(), LazyImageAction::None);
    }

    #[test]
    fn cached_image_loaded_before_view_shows_on_entry() {
        let mut img = LazyImage::default();
        assert_eq!(img.on_load(), LazyImageAction::None);
        assert_eq!(img.on_intersection(true), LazyImageAction::Show);
        assert!(img.is_visible());
    }

    #[test]
    fn hidden_image_style_until_visible() {
        let mut img = LazyImage::default();
        img.on_intersection(true);
        assert_eq!(img.style().opacity, 0.0);
        img.on_load();
        assert_eq!(img.style().opacity, 1.0);
    }
}
