use std::collections::HashMap;

use crate::routes::{fragment, normalize_path};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Link click or programmatic navigation.
    Push,
    /// Back/forward.
    Pop,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScrollTarget {
    Offset(f64),
    Anchor(String),
}

/// Last scroll offset per path, restored on back/forward.
#[derive(Debug, Default, Clone)]
pub struct ScrollMemory {
    offsets: HashMap<String, f64>,
}

impl ScrollMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the offset of the page being left.
    pub fn remember(&mut self, url: &str, scroll_y: f64) {
        self.offsets
            .insert(normalize_path(url).to_string(), scroll_y.max(0.0));
    }

    pub fn offset(&self, url: &str) -> Option<f64> {
        self.offsets.get(normalize_path(url)).copied()
    }

    /// Where the page entered via `url` should be scrolled to.
    pub fn target(&self, url: &str, navigation: Navigation) -> ScrollTarget {
        match navigation {
            Navigation::Push => match fragment(url) {
                Some(anchor) => ScrollTarget::Anchor(anchor.to_string()),
                None => ScrollTarget::Offset(0.0),
            },
            Navigation::Pop => ScrollTarget::Offset(self.offset(url).unwrap_or(0.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_goes_to_top_or_anchor() {
        let mut memory = ScrollMemory::new();
        memory.remember("/blog", 900.0);
        assert_eq!(memory.target("/blog", Navigation::Push), ScrollTarget::Offset(0.0));
        assert_eq!(
            memory.target("/#contact", Navigation::Push),
            ScrollTarget::Anchor("contact".into())
        );
    }

    #[test]
    fn pop_restores_remembered_offset() {
        let mut memory = ScrollMemory::new();
        memory.remember("/portfolio/", 1200.0);
        memory.remember("/about?x=1", -5.0);
        assert_eq!(
            memory.target("/portfolio", Navigation::Pop),
            ScrollTarget::Offset(1200.0)
        );
        assert_eq!(memory.offset("/about"), Some(0.0));
        assert_eq!(memory.target("/contact", Navigation::Pop), ScrollTarget::Offset(0.0));
    }
}
