//! File-backed documents embedded by the host page

mod loader;

pub use loader::{load, locate, Document, LoadError, Tier};
