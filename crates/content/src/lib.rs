//! Site content: the record model, the store boundary, and the client-side
//! state container that page and admin views read from.

pub mod auth;
pub mod blob;
pub mod model;
pub mod state;
pub mod store;

pub use auth::AdminGate;
pub use blob::{decode_data_url, ensure_image, extension_for_mime, is_data_url, object_path};
pub use model::*;
pub use state::{ContentState, Subscription, VIEW_BUMP_PERIOD};
pub use store::{ContentError, ContentStore, InMemoryContentStore, Record};
