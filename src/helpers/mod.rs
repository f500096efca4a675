//! HTML helper functions used while assembling the host page

mod html;

pub use html::*;
