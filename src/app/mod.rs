// Application layer - Use case interactors

pub mod container;
pub mod convert_interactor;
pub mod engine_lifecycle;
pub mod form;
pub mod session;
pub mod upload_controller;

// Re-export interactors
pub use container::DefaultAppContainer;
pub use convert_interactor::{ConversionOutcome, ConvertInteractor};
pub use engine_lifecycle::EngineLifecycle;
pub use form::{FormFields, FormState};
pub use session::{ConversionSession, SubmitOutcome, FAILURE_MESSAGE};
pub use upload_controller::{Presentation, UploadController};
