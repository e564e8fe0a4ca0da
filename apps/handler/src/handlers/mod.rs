//! Function handlers
//!
//! The host runs a single Function, `set-variable`, which writes one environment
//! variable of the deployment it is served from.

pub mod variables;


pub use variables::{cors_options, handle_preflight, handle_set_variable, with_cors};
