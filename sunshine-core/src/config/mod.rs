//! Face configuration
//!
//! Built once at activation and read-only afterwards. The renderer and the
//! face engine borrow it.

mod parse;
mod types;

pub use parse::{parse_config, ParseError};
pub use types::*;
