use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{
    AppConfig, BlobUrlRegistry, ConsoleNotifier, FfmpegProcessEngine, FsDownloadAdapter,
};
use crate::app::convert_interactor::ConvertInteractor;
use crate::app::engine_lifecycle::EngineLifecycle;
use crate::app::form::FormState;
use crate::app::session::ConversionSession;
use crate::domain::model::FailurePolicy;
use crate::ports::{EnginePort, NotifyPort, PreviewPort, SavePort};

/// Wires adapters to the application layer. The engine is built once here
/// and shared by every session the container hands out.
pub struct DefaultAppContainer {
    lifecycle: Arc<EngineLifecycle>,
    interactor: Arc<ConvertInteractor>,
    previews: Arc<dyn PreviewPort>,
    notifier: Arc<dyn NotifyPort>,
    policy: FailurePolicy,
}

impl DefaultAppContainer {
    /// Production wiring from configuration
    pub fn new(config: &AppConfig) -> Self {
        let engine = FfmpegProcessEngine::new(&config.ffmpeg_path)
            .with_threads(config.threads)
            .with_timeout(config.timeout_secs.map(Duration::from_secs));

        Self::with_ports(
            Arc::new(engine),
            Arc::new(FsDownloadAdapter::new(&config.download_dir)),
            Arc::new(BlobUrlRegistry::new()),
            Arc::new(ConsoleNotifier::new()),
            config.failure_policy,
        )
    }

    /// Wiring with explicit ports
    pub fn with_ports(
        engine: Arc<dyn EnginePort>,
        saver: Arc<dyn SavePort>,
        previews: Arc<dyn PreviewPort>,
        notifier: Arc<dyn NotifyPort>,
        policy: FailurePolicy,
    ) -> Self {
        let lifecycle = Arc::new(EngineLifecycle::new(engine));
        let interactor = Arc::new(ConvertInteractor::new(Arc::clone(&lifecycle), saver));

        Self {
            lifecycle,
            interactor,
            previews,
            notifier,
            policy,
        }
    }

    pub fn lifecycle(&self) -> Arc<EngineLifecycle> {
        Arc::clone(&self.lifecycle)
    }

    pub fn interactor(&self) -> Arc<ConvertInteractor> {
        Arc::clone(&self.interactor)
    }

    /// Fresh form session bound to the shared engine
    pub fn session(&self) -> ConversionSession {
        ConversionSession::new(
            FormState::new(Arc::clone(&self.previews)),
            Arc::clone(&self.interactor),
            Arc::clone(&self.notifier),
            self.policy,
        )
    }
}
