//! Render pass and host page assembly
//!
//! A render pass picks the one document to embed (primary, else fallback)
//! and collects the notices shown to the user. The page module then wraps
//! the outcome in the configured chrome.

pub mod markdown;
pub mod page;
pub mod pass;

pub use markdown::MarkdownRenderer;
pub use page::render_page;
pub use pass::{Embedded, RenderOutcome};
