mod environment;
mod variable;

pub use environment::{Environment, Service};
pub use variable::Variable;
