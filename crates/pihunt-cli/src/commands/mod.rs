//! CLI command implementations.
//!
//! One module per subcommand.

pub mod haystack;
pub mod render;
pub mod search;
pub mod verify;
