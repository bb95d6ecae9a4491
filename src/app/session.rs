// Conversion session - Binds the form to the interactor and applies the reset policy

use std::sync::Arc;

use tracing::{debug, warn};

use crate::app::convert_interactor::{ConversionOutcome, ConvertInteractor};
use crate::app::form::FormState;
use crate::domain::errors::ConversionError;
use crate::domain::model::FailurePolicy;
use crate::ports::NotifyPort;

/// The one message users see for any failed conversion
pub const FAILURE_MESSAGE: &str = "Conversion failed";

/// What a submit attempt did
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Submit control was disabled; nothing ran
    Disabled,
    /// Request refused before reaching the engine
    Rejected(ConversionError),
    /// Artifact saved
    Saved(ConversionOutcome),
    /// Engine pipeline failed; the user was alerted
    Failed(ConversionError),
}

/// One user's form plus the machinery behind its submit control
pub struct ConversionSession {
    form: FormState,
    interactor: Arc<ConvertInteractor>,
    notifier: Arc<dyn NotifyPort>,
    policy: FailurePolicy,
}

impl ConversionSession {
    pub fn new(
        form: FormState,
        interactor: Arc<ConvertInteractor>,
        notifier: Arc<dyn NotifyPort>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            form,
            interactor,
            notifier,
            policy,
        }
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn is_loading(&self) -> bool {
        self.interactor.is_loading()
    }

    pub fn submit_enabled(&self) -> bool {
        self.form.submit_enabled(self.is_loading())
    }

    pub fn render(&self) -> String {
        self.form.render(self.is_loading())
    }

    /// Submit the form. After a saved artifact the form always resets; after
    /// an engine failure it resets unless the policy keeps the source.
    pub async fn submit(&mut self) -> SubmitOutcome {
        if !self.submit_enabled() {
            debug!("Submit ignored: control disabled");
            return SubmitOutcome::Disabled;
        }

        let request = match self.form.job_request() {
            Ok(request) => request,
            Err(e) => {
                warn!("Submit rejected: {}", e);
                return SubmitOutcome::Rejected(e);
            }
        };

        match self.interactor.convert(self.form.source(), &request).await {
            Ok(outcome) => {
                self.form.close();
                SubmitOutcome::Saved(outcome)
            }
            Err(e) if e.is_rejection() => {
                warn!("Submit rejected: {}", e);
                SubmitOutcome::Rejected(e)
            }
            Err(e) => {
                self.notifier.alert(FAILURE_MESSAGE);
                if self.policy == FailurePolicy::Reset {
                    self.form.close();
                }
                SubmitOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use tempfile::TempDir;

    use crate::adapters::fs_download::FsDownloadAdapter;
    use crate::adapters::mock_engine::{FailAt, MockEngine};
    use crate::adapters::preview_registry::BlobUrlRegistry;
    use crate::app::engine_lifecycle::EngineLifecycle;
    use crate::domain::model::{MediaFile, OutputKind};

    #[derive(Default)]
    struct RecordingNotifier {
        alerts: Mutex<Vec<String>>,
    }

    impl NotifyPort for RecordingNotifier {
        fn alert(&self, message: &str) {
            self.alerts.lock().unwrap().push(message.to_string());
        }
    }

    struct Fixture {
        _dir: TempDir,
        engine: Arc<MockEngine>,
        notifier: Arc<RecordingNotifier>,
        previews: Arc<BlobUrlRegistry>,
        session: ConversionSession,
    }

    async fn fixture(engine: MockEngine, policy: FailurePolicy) -> Fixture {
        let dir = TempDir::new().unwrap();
        let engine = Arc::new(engine);
        let lifecycle = Arc::new(EngineLifecycle::new(engine.clone()));
        lifecycle.initialize().await.unwrap();
        let interactor = Arc::new(ConvertInteractor::new(
            lifecycle,
            Arc::new(FsDownloadAdapter::new(dir.path())),
        ));
        let notifier = Arc::new(RecordingNotifier::default());
        let previews = Arc::new(BlobUrlRegistry::new());
        let session = ConversionSession::new(
            FormState::new(previews.clone()),
            interactor,
            notifier.clone(),
            policy,
        );
        Fixture {
            _dir: dir,
            engine,
            notifier,
            previews,
            session,
        }
    }

    fn video() -> MediaFile {
        MediaFile::new("movie.mp4", "video/mp4", b"movie".to_vec())
    }

    #[tokio::test]
    async fn test_submit_without_file_is_disabled() {
        let mut f = fixture(MockEngine::new(), FailurePolicy::Reset).await;
        f.session.form_mut().set_name("clip");

        assert!(matches!(f.session.submit().await, SubmitOutcome::Disabled));
        assert_eq!(f.engine.execute_count(), 0);
    }

    #[tokio::test]
    async fn test_success_resets_form() {
        let mut f = fixture(MockEngine::new(), FailurePolicy::Reset).await;
        f.session.form_mut().select_file(video()).unwrap();
        f.session.form_mut().set_name("clip");

        let outcome = f.session.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Saved(ref o) if o.saved.file_name == "clip.gif"));
        assert!(!f.session.form().has_source());
        assert_eq!(f.session.form().fields().name, "");
        assert_eq!(f.previews.live_count(), 0);
        assert!(f.notifier.alerts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failure_alerts_once_and_resets() {
        let mut f = fixture(MockEngine::new().failing_at(FailAt::Execute), FailurePolicy::Reset).await;
        f.session.form_mut().select_file(video()).unwrap();

        let outcome = f.session.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Failed(ConversionError::Execution(_))));
        assert_eq!(*f.notifier.alerts.lock().unwrap(), vec![FAILURE_MESSAGE.to_string()]);
        assert!(!f.session.form().has_source());
        assert_eq!(f.previews.live_count(), 0);
    }

    #[tokio::test]
    async fn test_keep_policy_preserves_source_after_failure() {
        let mut f = fixture(MockEngine::new().failing_at(FailAt::Read), FailurePolicy::KeepSource).await;
        f.session.form_mut().select_file(video()).unwrap();
        f.session.form_mut().select_kind(OutputKind::Mp3);

        let outcome = f.session.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Failed(ConversionError::Read { .. })));
        assert_eq!(f.notifier.alerts.lock().unwrap().len(), 1);
        assert!(f.session.form().has_source());
        assert!(f.session.submit_enabled());
    }

    #[tokio::test]
    async fn test_invalid_field_is_rejected_without_alert() {
        let mut f = fixture(MockEngine::new(), FailurePolicy::Reset).await;
        f.session.form_mut().select_file(video()).unwrap();
        f.session.form_mut().set_start("-3");

        let outcome = f.session.submit().await;

        assert!(matches!(outcome, SubmitOutcome::Rejected(ConversionError::InvalidRequest(_))));
        assert!(f.session.form().has_source());
        assert!(f.notifier.alerts.lock().unwrap().is_empty());
        assert_eq!(f.engine.execute_count(), 0);
    }
}
