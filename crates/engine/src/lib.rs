//! `sheetquery-engine` — intent resolution and operation dispatch.
//!
//! Pure engine crate: receives loaded tables and model text, returns
//! normalized results. No network or file I/O dependencies; the language
//! model plugs in through the [`model::TextModel`] trait.

pub mod call;
pub mod dispatch;
pub mod error;
pub mod intent;
pub mod model;
pub mod normalize;
pub mod ops;
pub mod registry;
pub mod store;

pub use dispatch::dispatch;
pub use error::EngineError;
pub use intent::resolve_intent;
pub use model::{ModelError, TextModel};
pub use normalize::normalize;
pub use ops::OpOutput;
pub use store::{Slot, TableStore};
