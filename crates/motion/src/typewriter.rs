//! Role cycler that types and deletes strings one character at a time.

use std::time::Duration;

pub const TYPE_INTERVAL: Duration = Duration::from_millis(10);
pub const PAUSE_INTERVAL: Duration = Duration::from_millis(1500);
pub const DELETE_INTERVAL: Duration = Duration::from_millis(5);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TypewriterPhase {
    Typing,
    Pausing,
    Deleting,
}

/// `RoleCycleState`: which role, how much of it is shown, and the direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Typewriter {
    roles: Vec<String>,
    role_index: usize,
    shown: usize,
    phase: TypewriterPhase,
}

impl Typewriter {
    /// `None` for an empty role list; there is nothing to cycle.
    pub fn new(roles: Vec<String>) -> Option<Self> {
        if roles.is_empty() {
            return None;
        }
        Some(Self {
            roles,
            role_index: 0,
            shown: 0,
            phase: TypewriterPhase::Typing,
        })
    }

    pub fn role_index(&self) -> usize {
        self.role_index
    }

    pub fn phase(&self) -> TypewriterPhase {
        self.phase
    }

    fn current(&self) -> &str {
        &self.roles[self.role_index]
    }

    /// The currently visible prefix of the current role.
    pub fn displayed(&self) -> &str {
        let role = self.current();
        match role.char_indices().nth(self.shown) {
            Some((end, _)) => &role[..end],
            None => role,
        }
    }

    /// Delay before the first tick.
    pub fn first_delay(&self) -> Duration {
        TYPE_INTERVAL
    }

    /// Advance one step and return the delay until the next tick.
    pub fn tick(&mut self) -> Duration {
        match self.phase {
            TypewriterPhase::Typing => {
                let full = self.current().chars().count();
                if self.shown < full {
                    self.shown += 1;
                }
                if self.shown >= full {
                    self.phase = TypewriterPhase::Pausing;
                    PAUSE_INTERVAL
                } else {
                    TYPE_INTERVAL
                }
            }
            TypewriterPhase::Pausing => {
                self.phase = TypewriterPhase::Deleting;
                DELETE_INTERVAL
            }
            TypewriterPhase::Deleting => {
                self.shown = self.shown.saturating_sub(1);
                if self.shown == 0 {
                    self.role_index = (self.role_index + 1) % self.roles.len();
                    self.phase = TypewriterPhase::Typing;
                    TYPE_INTERVAL
                } else {
                    DELETE_INTERVAL
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roles(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Tick until the role index changes, collecting what was displayed.
    fn run_cycle(tw: &mut Typewriter) -> Vec<String> {
        let start = tw.role_index();
        let mut seen = Vec::new();
        while tw.role_index() == start {
            tw.tick();
            seen.push(tw.displayed().to_string());
        }
        seen
    }

    #[test]
    fn empty_role_list_is_rejected() {
        assert!(Typewriter::new(Vec::new()).is_none());
    }

    #[test]
    fn types_first_role_in_one_tick() {
        let mut tw = Typewriter::new(roles(&["A", "BC"])).unwrap();
        assert_eq!(tw.displayed(), "");
        assert_eq!(tw.tick(), PAUSE_INTERVAL);
        assert_eq!(tw.displayed(), "A");
        assert_eq!(tw.phase(), TypewriterPhase::Pausing);
    }

    #[test]
    fn full_cycle_moves_to_next_role_and_wraps() {
        let mut tw = Typewriter::new(roles(&["A", "BC"])).unwrap();
        assert_eq!(run_cycle(&mut tw), vec!["A", "A", ""]);
        assert_eq!(tw.role_index(), 1);
        assert_eq!(run_cycle(&mut tw), vec!["B", "BC", "BC", "B", ""]);
        assert_eq!(tw.role_index(), 0);
        tw.tick();
        assert_eq!(tw.displayed(), "A");
    }

    #[test]
    fn delays_follow_phase() {
        let mut tw = Typewriter::new(roles(&["abc"])).unwrap();
        assert_eq!(tw.first_delay(), TYPE_INTERVAL);
        assert_eq!(tw.tick(), TYPE_INTERVAL);
        assert_eq!(tw.tick(), TYPE_INTERVAL);
        assert_eq!(tw.tick(), PAUSE_INTERVAL);
        assert_eq!(tw.tick(), DELETE_INTERVAL);
        assert_eq!(tw.phase(), TypewriterPhase::Deleting);
        assert_eq!(tw.tick(), DELETE_INTERVAL);
        assert_eq!(tw.displayed(), "ab");
        tw.tick();
        assert_eq!(tw.tick(), TYPE_INTERVAL);
        assert_eq!(tw.displayed(), "");
        // single role wraps onto itself
        assert_eq!(tw.role_index(), 0);
    }

    #[test]
    fn multibyte_roles_are_cut_on_char_boundaries() {
        let mut tw = Typewriter::new(roles(&["déco"])).unwrap();
        tw.tick();
        tw.tick();
        assert_eq!(tw.displayed(), "dé");
    }

    #[test]
    fn empty_role_string_pauses_immediately() {
        let mut tw = Typewriter::new(roles(&["", "x"])).unwrap();
        assert_eq!(tw.tick(), PAUSE_INTERVAL);
        assert_eq!(tw.tick(), DELETE_INTERVAL);
        assert_eq!(tw.tick(), TYPE_INTERVAL);
        assert_eq!(tw.role_index(), 1);
    }
}
