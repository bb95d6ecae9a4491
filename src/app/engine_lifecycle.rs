// Engine lifecycle - Loads the shared engine once and tracks readiness

use std::sync::Arc;

use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::errors::{ConversionError, EngineError};
use crate::ports::EnginePort;

/// Owns the one engine handle of the process. Initialization runs at most
/// once; its outcome, including a failure, is kept for the process lifetime.
pub struct EngineLifecycle {
    engine: Arc<dyn EnginePort>,
    outcome: OnceCell<Result<(), EngineError>>,
}

impl EngineLifecycle {
    pub fn new(engine: Arc<dyn EnginePort>) -> Self {
        Self {
            engine,
            outcome: OnceCell::new(),
        }
    }

    /// Load the engine, or wait for the load already in progress
    pub async fn initialize(&self) -> Result<(), ConversionError> {
        let outcome = self
            .outcome
            .get_or_init(|| async {
                info!("Loading media engine");
                let result = self.engine.initialize().await;
                match &result {
                    Ok(()) => info!("Media engine ready"),
                    Err(e) => error!("Media engine failed to load, conversions disabled: {}", e),
                }
                result
            })
            .await;

        outcome.clone().map_err(ConversionError::Initialization)
    }

    /// Start loading in the background, the way the form does on startup
    pub fn start(self: &Arc<Self>) -> JoinHandle<Result<(), ConversionError>> {
        let lifecycle = Arc::clone(self);
        tokio::spawn(async move { lifecycle.initialize().await })
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.outcome.get(), Some(Ok(())))
    }

    /// The engine handle, only once it is ready
    pub fn engine(&self) -> Result<Arc<dyn EnginePort>, ConversionError> {
        match self.outcome.get() {
            Some(Ok(())) => Ok(Arc::clone(&self.engine)),
            Some(Err(e)) => Err(ConversionError::Initialization(e.clone())),
            None => Err(ConversionError::NotReady),
        }
    }
}
