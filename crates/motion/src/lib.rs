//! Scroll- and time-driven animation controllers.
//!
//! Every controller here is DOM-free: it consumes measured geometry, scroll
//! offsets, intersection samples, pointer deltas and frame times, and
//! produces the presentation parameters (progress, translate offsets, active
//! indices, visibility flags) that the web bindings write into styles.

pub mod lazy;
pub mod marquee;
pub mod rail;
pub mod reveal;
pub mod scroll_spy;
pub mod services;
pub mod typewriter;

pub use lazy::*;
pub use marquee::*;
pub use rail::*;
pub use reveal::*;
pub use scroll_spy::*;
pub use services::*;
pub use typewriter::*;
