//! Scroll-spy resolution of the section currently "in view".

use foundation::ids::SectionId;

/// Observer root margin: the effective viewport loses its bottom 40%.
pub const SPY_ROOT_MARGIN: &str = "0px 0px -40% 0px";
/// Fraction of a section that must be visible to count as intersecting.
pub const SPY_THRESHOLD: f64 = 0.15;

/// One entry of an intersection batch.
#[derive(Debug, Clone, PartialEq)]
pub struct IntersectionSample {
    pub id: SectionId,
    pub is_intersecting: bool,
    pub ratio: f64,
}

impl IntersectionSample {
    pub fn new(id: impl Into<SectionId>, is_intersecting: bool, ratio: f64) -> Self {
        Self {
            id: id.into(),
            is_intersecting,
            ratio,
        }
    }
}

/// Highest-ratio intersecting entry of a batch.
///
/// Non-intersecting entries are ignored. Equal ratios keep the earliest entry
/// of the batch.
pub fn pick_active<'a>(
    batch: impl IntoIterator<Item = &'a IntersectionSample>,
) -> Option<&'a SectionId> {
    let mut best: Option<&IntersectionSample> = None;
    for sample in batch.into_iter().filter(|s| s.is_intersecting) {
        match best {
            Some(b) if sample.ratio <= b.ratio => {}
            _ => best = Some(sample),
        }
    }
    best.map(|s| &s.id)
}

#[derive(Debug, Clone, Default)]
pub struct ScrollSpy {
    ids: Vec<SectionId>,
    active: Option<SectionId>,
}

impl ScrollSpy {
    pub fn new(ids: Vec<SectionId>) -> Self {
        Self { ids, active: None }
    }

    pub fn active(&self) -> Option<&SectionId> {
        self.active.as_ref()
    }

    /// Apply a batch of intersection updates. Entries for ids outside the
    /// watched list are ignored. When nothing in the batch intersects the
    /// previous active id is retained.
    ///
    /// Returns `true` when the active id changed.
    pub fn apply(&mut self, batch: &[IntersectionSample]) -> bool {
        let Some(next) = pick_active(batch.iter().filter(|s| self.ids.contains(&s.id))) else {
            return false;
        };
        if self.active.as_ref() == Some(next) {
            return false;
        }
        self.active = Some(next.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> Vec<SectionId> {
        ["home", "about", "work"].into_iter().map(SectionId::from).collect()
    }

    #[test]
    fn highest_ratio_wins() {
        let mut spy = ScrollSpy::new(ids());
        let changed = spy.apply(&[
            IntersectionSample::new("home", true, 0.20),
            IntersectionSample::new("about", true, 0.45),
            IntersectionSample::new("work", true, 0.20),
        ]);
        assert!(changed);
        assert_eq!(spy.active().map(SectionId::as_str), Some("about"));
    }

    #[test]
    fn empty_batch_retains_previous() {
        let mut spy = ScrollSpy::new(ids());
        spy.apply(&[IntersectionSample::new("work", true, 0.3)]);
        assert!(!spy.apply(&[
            IntersectionSample::new("home", false, 0.0),
            IntersectionSample::new("work", false, 0.0),
        ]));
        assert!(!spy.apply(&[]));
        assert_eq!(spy.active().map(SectionId::as_str), Some("work"));
    }

    #[test]
    fn non_intersecting_entries_are_ignored_even_with_ratio() {
        let batch = [
            IntersectionSample::new("home", false, 0.9),
            IntersectionSample::new("about", true, 0.2),
        ];
        assert_eq!(pick_active(&batch).map(SectionId::as_str), Some("about"));
    }

    #[test]
    fn ties_keep_first_entry() {
        let batch = [
            IntersectionSample::new("work", true, 0.5),
            IntersectionSample::new("about", true, 0.5),
        ];
        assert_eq!(pick_active(&batch).map(SectionId::as_str), Some("work"));
    }

    #[test]
    fn same_winner_is_not_a_change() {
        let mut spy = ScrollSpy::new(ids());
        assert!(spy.apply(&[IntersectionSample::new("home", true, 0.5)]));
        assert!(!spy.apply(&[IntersectionSample::new("home", true, 0.9)]));
    }

    #[test]
    fn unwatched_sections_never_become_active() {
        let mut spy = ScrollSpy::new(ids());
        assert!(!spy.apply(&[IntersectionSample::new("footer", true, 1.0)]));
        assert_eq!(spy.active(), None);
        assert!(spy.apply(&[
            IntersectionSample::new("footer", true, 0.9),
            IntersectionSample::new("about", true, 0.3),
        ]));
        assert_eq!(spy.active().map(SectionId::as_str), Some("about"));
    }
}
