//! Effect handlers.
//!
//! Handlers own the I/O. They either return a `UiEvent` for the runtime to
//! dispatch right away or push events into the inbox as work progresses.

mod dictation;
mod response;

pub use dictation::start_dictation;
pub use response::spawn_response;
