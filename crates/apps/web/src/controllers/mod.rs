//! DOM bindings for the scroll and time driven effects in `motion`.
//!
//! Each `attach` looks up its elements under a page root, wires listeners,
//! observers and timers, and returns `None` when the markup is missing.
//! Everything it registers is released by the returned [`runtime::Disposer`].

pub mod about_text;
pub mod lazy;
pub mod marquee;
mod observer;
pub mod scroll_spy;
pub mod services;
pub mod typewriter;
pub mod work_rail;
