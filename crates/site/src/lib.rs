//! Route table, admin gating and per-path scroll memory.

pub mod routes;
pub mod scroll;
pub mod sections;

pub use routes::*;
pub use scroll::*;
pub use sections::*;
