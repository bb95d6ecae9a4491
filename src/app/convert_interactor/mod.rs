// Convert interactor - Orchestrates one trim-and-convert job against the engine

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::app::engine_lifecycle::EngineLifecycle;
use crate::domain::errors::ConversionError;
use crate::domain::model::*;
use crate::domain::rules;
use crate::ports::{EnginePort, SavePort};

/// Result of a successful job
#[derive(Debug, Clone, Serialize)]
pub struct ConversionOutcome {
    pub saved: SavedArtifact,
    pub kind: OutputKind,
    pub args: Vec<String>,
    pub elapsed_ms: u64,
    pub finished_at: DateTime<Utc>,
}

/// Runs jobs one at a time. A call made while another job is in flight is
/// rejected before it reaches the engine.
pub struct ConvertInteractor {
    lifecycle: Arc<EngineLifecycle>,
    saver: Arc<dyn SavePort>,
    state: Arc<Mutex<JobState>>,
}

/// Holds the job slot; puts the state back to `Idle` when dropped
struct JobSlot {
    state: Arc<Mutex<JobState>>,
}

impl JobSlot {
    fn set(&self, next: JobState) {
        let mut state = lock(&self.state);
        debug!("Job state {} -> {}", *state, next);
        *state = next;
    }
}

impl Drop for JobSlot {
    fn drop(&mut self) {
        *lock(&self.state) = JobState::Idle;
    }
}

fn lock(state: &Mutex<JobState>) -> MutexGuard<'_, JobState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ConvertInteractor {
    pub fn new(lifecycle: Arc<EngineLifecycle>, saver: Arc<dyn SavePort>) -> Self {
        Self {
            lifecycle,
            saver,
            state: Arc::new(Mutex::new(JobState::Idle)),
        }
    }

    pub fn state(&self) -> JobState {
        *lock(&self.state)
    }

    /// True while a job is anywhere between validation and saving
    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    pub fn lifecycle(&self) -> &Arc<EngineLifecycle> {
        &self.lifecycle
    }

    fn claim(&self) -> Result<JobSlot, ConversionError> {
        let mut state = lock(&self.state);
        if state.is_loading() {
            return Err(ConversionError::JobInFlight);
        }
        *state = JobState::Validating;
        Ok(JobSlot {
            state: Arc::clone(&self.state),
        })
    }

    /// Trim and convert `source`, then save the artifact
    pub async fn convert(
        &self,
        source: Option<&SourceMedia>,
        request: &JobRequest,
    ) -> Result<ConversionOutcome, ConversionError> {
        let slot = self.claim()?;
        let started = Instant::now();

        let result = self.run(&slot, source, request).await;
        if let Err(e) = &result {
            slot.set(JobState::Failed);
            if !e.is_rejection() {
                error!("Conversion failed: {}", e);
            }
        }
        drop(slot);

        let (saved, args) = result?;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            "Converted to {} in {} ms: {}",
            request.output_kind,
            elapsed_ms,
            saved.path.display()
        );

        Ok(ConversionOutcome {
            saved,
            kind: request.output_kind,
            args,
            elapsed_ms,
            finished_at: Utc::now(),
        })
    }

    async fn run(
        &self,
        slot: &JobSlot,
        source: Option<&SourceMedia>,
        request: &JobRequest,
    ) -> Result<(SavedArtifact, Vec<String>), ConversionError> {
        let source = source.ok_or(ConversionError::NoSource)?;
        request.validate()?;
        let engine = self.lifecycle.engine()?;

        let staged = rules::staged_input_name(&source.file);
        let output_file_name = request.output_file_name();
        let args = rules::build_engine_args(&staged, request);

        let produced = self
            .produce(slot, engine.as_ref(), source, &staged, &args, &output_file_name)
            .await;
        discard(engine.as_ref(), &[staged.as_str(), output_file_name.as_str()]).await;
        let bytes = produced?;

        slot.set(JobState::Saving);
        let artifact = Artifact {
            bytes,
            file_name: output_file_name,
            mime: request.mime(),
        };
        let saved = self
            .saver
            .save(&artifact)
            .await
            .map_err(|e| ConversionError::Save {
                file: artifact.file_name.clone(),
                message: e.to_string(),
            })?;

        Ok((saved, args))
    }

    /// Stage the source, run the engine and read the artifact back
    async fn produce(
        &self,
        slot: &JobSlot,
        engine: &dyn EnginePort,
        source: &SourceMedia,
        staged: &str,
        args: &[String],
        output_file_name: &str,
    ) -> Result<Vec<u8>, ConversionError> {
        slot.set(JobState::Staging);
        engine
            .write_file(staged, &source.file.bytes)
            .await
            .map_err(|e| ConversionError::Staging {
                file: staged.to_string(),
                source: e,
            })?;

        slot.set(JobState::Executing);
        info!("Running engine: {}", args.join(" "));
        engine.execute(args).await.map_err(ConversionError::Execution)?;

        slot.set(JobState::Reading);
        let data = engine
            .read_file(output_file_name)
            .await
            .map_err(|e| ConversionError::Read {
                file: output_file_name.to_string(),
                source: e,
            })?;
        Ok(data.into_bytes())
    }
}

/// Drop job files from the engine workspace; failures are only logged
async fn discard(engine: &dyn EnginePort, names: &[&str]) {
    for name in names {
        if let Err(e) = engine.delete_file(name).await {
            warn!("Could not remove {} from the engine workspace: {}", name, e);
        }
    }
}
