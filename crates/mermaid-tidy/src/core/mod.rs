//! Core building blocks shared by the flowchart and markdown layers
//!
//! Types, configuration, errors and the parser combinators every line form
//! is built from.

pub mod chumsky_utils;
mod config;
mod error;
pub mod logging;
mod types;

pub use config::*;
pub use error::*;
pub use logging::*;
pub use types::*;
