pub mod classifier;
pub mod controller;
pub mod debounce;
pub mod events;
pub mod recorder;
pub mod store;

pub use classifier::{EventClassifier, RecorderState};
pub use controller::RecordingController;
pub use events::RawEvent;
pub use recorder::{Clock, Recorder, SystemClock};
pub use store::{ActionSink, SessionStore};
