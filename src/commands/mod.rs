//! Commands
//!
//! Entry points invoked by the command-line interface.

pub mod analyze;

pub use analyze::*;
