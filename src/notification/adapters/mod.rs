//! Notifier adapters.

mod logging;
mod memory;

pub use logging::TracingNotifier;
pub use memory::RecordingNotifier;
