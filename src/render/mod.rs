//! Presentation boundary.
//!
//! The round machine talks to the screen only through [`Presenter`]. Every
//! call is one-way: the machine never reads anything back, so phase logic
//! runs the same against a real surface, a log, or a test recorder.
//!
//! ## Implementations
//!
//! - [`RecordingPresenter`]: keeps every call as a [`PresenterEvent`]
//! - [`TracingPresenter`]: logs every call through `tracing`

pub mod presenter;
pub mod recording;

pub use presenter::{Bars, Presenter, SoundCue, Surface};
pub use recording::{PresenterEvent, RecordingPresenter, TracingPresenter};
