mod envelope;
mod event;
mod response;

pub use envelope::{Envelope, ErrorBody, ErrorDetail};
pub use event::FunctionEvent;
pub use response::{FunctionResponse, MutableResponse};
