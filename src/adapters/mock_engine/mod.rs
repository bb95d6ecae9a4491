// Mock engine adapter - Scripted in-memory engine for tests and dry runs

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::errors::EngineError;
use crate::domain::model::EngineData;
use crate::ports::EnginePort;

/// Engine step a mock can be told to fail at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    Initialize,
    Write,
    Execute,
    Read,
}

/// Representation `read_file` hands back
#[derive(Debug, Clone, PartialEq)]
pub enum MockOutput {
    Binary(Vec<u8>),
    Text(String),
}

/// Recorded engine call
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    Initialize,
    WriteFile { name: String, len: usize },
    Execute(Vec<String>),
    ReadFile(String),
    DeleteFile(String),
}

#[derive(Debug, Default)]
struct MockState {
    loaded: bool,
    files: HashMap<String, Vec<u8>>,
    calls: Vec<MockCall>,
}

/// In-memory engine. `execute` writes the configured output under the last
/// argument, which is where ffmpeg-style commands name their output file.
#[derive(Debug)]
pub struct MockEngine {
    state: Mutex<MockState>,
    fail_at: Option<FailAt>,
    output: MockOutput,
    execute_delay: Option<Duration>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
            fail_at: None,
            output: MockOutput::Binary(b"GIF89a-mock".to_vec()),
            execute_delay: None,
        }
    }

    pub fn failing_at(mut self, step: FailAt) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn with_binary_output(mut self, bytes: impl Into<Vec<u8>>) -> Self {
        self.output = MockOutput::Binary(bytes.into());
        self
    }

    pub fn with_text_output(mut self, text: impl Into<String>) -> Self {
        self.output = MockOutput::Text(text.into());
        self
    }

    /// Hold every `execute` for `delay`, keeping a job in flight
    pub fn with_execute_delay(mut self, delay: Duration) -> Self {
        self.execute_delay = Some(delay);
        self
    }

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fail(&self, step: FailAt) -> Result<(), EngineError> {
        if self.fail_at != Some(step) {
            return Ok(());
        }
        Err(match step {
            FailAt::Initialize => EngineError::Load("mock engine refused to load".to_string()),
            FailAt::Write => EngineError::Io("mock workspace is read-only".to_string()),
            FailAt::Execute => EngineError::command_failed("mock command failed", Some(1)),
            FailAt::Read => EngineError::Io("mock read failed".to_string()),
        })
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<MockCall> {
        self.state().calls.clone()
    }

    /// Argument lists passed to `execute`
    pub fn executed_args(&self) -> Vec<Vec<String>> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                MockCall::Execute(args) => Some(args.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn execute_count(&self) -> usize {
        self.executed_args().len()
    }

    pub fn initialize_count(&self) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|call| matches!(call, MockCall::Initialize))
            .count()
    }

    /// Bytes currently held in the workspace under `name`
    pub fn file(&self, name: &str) -> Option<Vec<u8>> {
        self.state().files.get(name).cloned()
    }
}

#[async_trait]
impl EnginePort for MockEngine {
    async fn initialize(&self) -> Result<(), EngineError> {
        self.state().calls.push(MockCall::Initialize);
        self.fail(FailAt::Initialize)?;
        self.state().loaded = true;
        Ok(())
    }

    async fn write_file(&self, name: &str, bytes: &[u8]) -> Result<(), EngineError> {
        let mut state = self.state();
        state.calls.push(MockCall::WriteFile {
            name: name.to_string(),
            len: bytes.len(),
        });
        if !state.loaded {
            return Err(EngineError::NotLoaded);
        }
        self.fail(FailAt::Write)?;
        state.files.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn execute(&self, args: &[String]) -> Result<(), EngineError> {
        {
            let mut state = self.state();
            state.calls.push(MockCall::Execute(args.to_vec()));
            if !state.loaded {
                return Err(EngineError::NotLoaded);
            }
        }

        if let Some(delay) = self.execute_delay {
            tokio::time::sleep(delay).await;
        }
        self.fail(FailAt::Execute)?;

        let output_name = args
            .last()
            .ok_or_else(|| EngineError::command_failed("no output file given", Some(1)))?;
        let bytes = match &self.output {
            MockOutput::Binary(bytes) => bytes.clone(),
            MockOutput::Text(text) => text.clone().into_bytes(),
        };
        self.state().files.insert(output_name.clone(), bytes);
        Ok(())
    }

    async fn read_file(&self, name: &str) -> Result<EngineData, EngineError> {
        let mut state = self.state();
        state.calls.push(MockCall::ReadFile(name.to_string()));
        if !state.loaded {
            return Err(EngineError::NotLoaded);
        }
        self.fail(FailAt::Read)?;

        let bytes = state
            .files
            .get(name)
            .cloned()
            .ok_or_else(|| EngineError::FileNotFound(name.to_string()))?;
        Ok(match &self.output {
            MockOutput::Binary(_) => EngineData::Binary(bytes),
            MockOutput::Text(_) => EngineData::Text(String::from_utf8_lossy(&bytes).into_owned()),
        })
    }

    async fn delete_file(&self, name: &str) -> Result<(), EngineError> {
        let mut state = self.state();
        state.calls.push(MockCall::DeleteFile(name.to_string()));
        if !state.loaded {
            return Err(EngineError::NotLoaded);
        }
        state.files.remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_records_calls_in_order() {
        let engine = MockEngine::new().with_binary_output(vec![1, 2, 3]);
        engine.initialize().await.unwrap();
        engine.write_file("input.mp4", b"video").await.unwrap();
        let args = vec!["-i".to_string(), "input.mp4".to_string(), "out.gif".to_string()];
        engine.execute(&args).await.unwrap();
        let data = engine.read_file("out.gif").await.unwrap();

        assert_eq!(data, EngineData::Binary(vec![1, 2, 3]));
        assert_eq!(
            engine.calls(),
            vec![
                MockCall::Initialize,
                MockCall::WriteFile { name: "input.mp4".to_string(), len: 5 },
                MockCall::Execute(args),
                MockCall::ReadFile("out.gif".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_requires_initialize() {
        let engine = MockEngine::new();
        assert_eq!(engine.write_file("a", b"x").await, Err(EngineError::NotLoaded));
    }

    #[tokio::test]
    async fn test_scripted_failure() {
        let engine = MockEngine::new().failing_at(FailAt::Execute);
        engine.initialize().await.unwrap();
        assert!(engine.execute(&["out.gif".to_string()]).await.is_err());
        assert!(engine.file("out.gif").is_none());
    }

    #[tokio::test]
    async fn test_delete_file_forgets_contents() {
        let engine = MockEngine::new();
        engine.initialize().await.unwrap();
        engine.write_file("input.mp4", b"video").await.unwrap();

        engine.delete_file("input.mp4").await.unwrap();
        engine.delete_file("input.mp4").await.unwrap();

        assert!(engine.file("input.mp4").is_none());
    }

    #[tokio::test]
    async fn test_text_output() {
        let engine = MockEngine::new().with_text_output("ID3");
        engine.initialize().await.unwrap();
        engine.execute(&["out.mp3".to_string()]).await.unwrap();
        assert_eq!(
            engine.read_file("out.mp3").await.unwrap(),
            EngineData::Text("ID3".to_string())
        );
    }
}
