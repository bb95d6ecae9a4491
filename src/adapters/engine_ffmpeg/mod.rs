//! FFmpeg process engine adapter
//!
//! Runs the `ffmpeg` executable against a private temporary workspace. Staged
//! files live in that workspace and every command runs with it as the working
//! directory, so the engine only ever sees bare file names.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::errors::EngineError;
use crate::domain::model::EngineData;
use crate::ports::EnginePort;
use crate::utils::path::is_plain_file_name;

/// Lines of stderr kept in a command failure
const STDERR_TAIL_LINES: usize = 8;

/// Loaded engine state
struct Workspace {
    dir: TempDir,
    version: String,
}

/// FFmpeg-based engine
pub struct FfmpegProcessEngine {
    ffmpeg_path: PathBuf,
    threads: usize,
    timeout: Option<Duration>,
    workspace: OnceCell<Workspace>,
}

impl FfmpegProcessEngine {
    /// Create new engine adapter; nothing runs until `initialize`
    pub fn new(ffmpeg_path: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg_path: ffmpeg_path.into(),
            threads: num_cpus::get().max(1),
            timeout: None,
            workspace: OnceCell::new(),
        }
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn loaded(&self) -> Result<&Workspace, EngineError> {
        self.workspace.get().ok_or(EngineError::NotLoaded)
    }

    fn resolve(&self, name: &str) -> Result<PathBuf, EngineError> {
        if !is_plain_file_name(name) {
            return Err(EngineError::InvalidFileName(name.to_string()));
        }
        Ok(self.loaded()?.dir.path().join(name))
    }

    async fn load(&self) -> Result<Workspace, EngineError> {
        let output = Command::new(&self.ffmpeg_path)
            .arg("-version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| {
                EngineError::Load(format!("{}: {}", self.ffmpeg_path.display(), e))
            })?;

        if !output.status.success() {
            return Err(EngineError::Load(format!(
                "{} -version exited with {}",
                self.ffmpeg_path.display(),
                output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or("ffmpeg")
            .to_string();

        let dir = tempfile::Builder::new()
            .prefix("trimcast-")
            .tempdir()
            .map_err(|e| EngineError::Load(format!("Failed to create workspace: {}", e)))?;

        info!("Engine loaded: {} (workspace {})", version, dir.path().display());
        Ok(Workspace { dir, version })
    }
}

/// Last few lines of engine stderr, where ffmpeg reports the actual error
fn stderr_tail(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
    lines[start..].join("\n")
}

#[async_trait]
impl EnginePort for FfmpegProcessEngine {
    async fn initialize(&self) -> Result<(), EngineError> {
        self.workspace.get_or_try_init(|| self.load()).await?;
        Ok(())
    }

    async fn write_file(&self, name: &str, bytes: &[u8]) -> Result<(), EngineError> {
        let path = self.resolve(name)?;
        debug!("Staging {} bytes as {}", bytes.len(), name);
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn execute(&self, args: &[String]) -> Result<(), EngineError> {
        let workspace = self.loaded()?;

        let mut command = Command::new(&self.ffmpeg_path);
        command
            .current_dir(workspace.dir.path())
            .args(["-hide_banner", "-nostdin", "-y"])
            .arg("-threads")
            .arg(self.threads.to_string())
            .args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        debug!("Running {} {}", self.ffmpeg_path.display(), args.join(" "));

        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| EngineError::Timeout(limit.as_secs()))??,
            None => command.output().await?,
        };

        if !output.status.success() {
            return Err(EngineError::command_failed(
                stderr_tail(&output.stderr),
                output.status.code(),
            ));
        }

        Ok(())
    }

    async fn read_file(&self, name: &str) -> Result<EngineData, EngineError> {
        let path = self.resolve(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(EngineData::Binary(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(EngineError::FileNotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_file(&self, name: &str) -> Result<(), EngineError> {
        let path = self.resolve(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Removed {} from the workspace", name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// First line of `ffmpeg -version`
    fn version(&self) -> Option<String> {
        self.workspace.get().map(|ws| ws.version.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_calls_before_initialize_fail() {
        let engine = FfmpegProcessEngine::new("ffmpeg");
        assert_eq!(
            engine.write_file("input.mp4", b"x").await,
            Err(EngineError::NotLoaded)
        );
        assert_eq!(
            engine.execute(&["-version".to_string()]).await,
            Err(EngineError::NotLoaded)
        );
        assert!(engine.version().is_none());
    }

    #[tokio::test]
    async fn test_initialize_with_missing_binary() {
        let engine = FfmpegProcessEngine::new("/nonexistent/trimcast/ffmpeg");
        let err = engine.initialize().await.unwrap_err();
        assert!(matches!(err, EngineError::Load(_)));
        assert!(engine.workspace.get().is_none());
    }

    #[tokio::test]
    async fn test_invalid_names_are_rejected_first() {
        let engine = FfmpegProcessEngine::new("ffmpeg");
        assert_eq!(
            engine.read_file("../etc/passwd").await,
            Err(EngineError::InvalidFileName("../etc/passwd".to_string()))
        );
    }

    #[test]
    fn test_stderr_tail_keeps_last_lines() {
        let stderr: String = (0..20).map(|i| format!("line {}\n\n", i)).collect();
        let tail = stderr_tail(stderr.as_bytes());
        assert_eq!(tail.lines().count(), STDERR_TAIL_LINES);
        assert!(tail.ends_with("line 19"));
    }

    #[test]
    fn test_thread_count_has_floor() {
        let engine = FfmpegProcessEngine::new("ffmpeg").with_threads(0);
        assert_eq!(engine.threads, 1);
    }

    #[cfg(unix)]
    mod with_fake_ffmpeg {
        use super::*;
        use std::os::unix::fs::PermissionsExt;
        use std::path::Path;
        use tempfile::TempDir;

        /// Stand-in executable: records its arguments in `args.txt`, writes
        /// `converted` to the last argument, fails for outputs named `broken*`
        /// and hangs for outputs named `slow*`
        const FAKE_FFMPEG: &str = r#"#!/bin/sh
if [ "$1" = "-version" ]; then
    echo "ffmpeg version 6.1-fake Copyright (c) the authors"
    echo "built with sh"
    exit 0
fi
for last; do :; done
echo "$@" > args.txt
case "$last" in
    broken*)
        echo "Input #0, mov,mp4" >&2
        echo "input.mp4: Invalid data found when processing input" >&2
        exit 1
        ;;
    slow*)
        sleep 5
        ;;
esac
printf converted > "$last"
"#;

        fn fake_ffmpeg() -> (TempDir, PathBuf) {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("ffmpeg");
            std::fs::write(&path, FAKE_FFMPEG).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            (dir, path)
        }

        fn job(output: &str) -> Vec<String> {
            ["-i", "input.mp4", "-t", "3", "-ss", "5", "-f", "gif", output]
                .iter()
                .map(|a| a.to_string())
                .collect()
        }

        async fn loaded(path: &Path) -> FfmpegProcessEngine {
            let engine = FfmpegProcessEngine::new(path).with_threads(2);
            engine.initialize().await.unwrap();
            engine
        }

        fn workspace_files(engine: &FfmpegProcessEngine) -> Vec<String> {
            let dir = engine.workspace.get().unwrap().dir.path();
            let mut names: Vec<String> = std::fs::read_dir(dir)
                .unwrap()
                .map(|entry| entry.unwrap().file_name().to_string_lossy().to_string())
                .collect();
            names.sort();
            names
        }

        #[tokio::test]
        async fn test_initialize_reads_version_line() {
            let (_bin, path) = fake_ffmpeg();
            let engine = loaded(&path).await;

            assert_eq!(
                engine.version().as_deref(),
                Some("ffmpeg version 6.1-fake Copyright (c) the authors")
            );
            assert!(engine.workspace.get().unwrap().dir.path().is_dir());
        }

        #[tokio::test]
        async fn test_write_execute_read_round_trip() {
            let (_bin, path) = fake_ffmpeg();
            let engine = loaded(&path).await;

            engine.write_file("input.mp4", b"video").await.unwrap();
            engine.execute(&job("clip.gif")).await.unwrap();

            assert_eq!(
                engine.read_file("clip.gif").await.unwrap(),
                EngineData::Binary(b"converted".to_vec())
            );
            assert_eq!(
                engine.read_file("missing.gif").await,
                Err(EngineError::FileNotFound("missing.gif".to_string()))
            );
        }

        #[tokio::test]
        async fn test_fixed_flags_precede_job_arguments() {
            let (_bin, path) = fake_ffmpeg();
            let engine = loaded(&path).await;

            engine.execute(&job("clip.gif")).await.unwrap();

            let recorded = engine.read_file("args.txt").await.unwrap().into_bytes();
            assert_eq!(
                String::from_utf8(recorded).unwrap().trim_end(),
                "-hide_banner -nostdin -y -threads 2 -i input.mp4 -t 3 -ss 5 -f gif clip.gif"
            );
        }

        #[tokio::test]
        async fn test_failed_command_keeps_stderr_tail() {
            let (_bin, path) = fake_ffmpeg();
            let engine = loaded(&path).await;

            let err = engine.execute(&job("broken.gif")).await.unwrap_err();

            match err {
                EngineError::CommandFailed { message, exit_code } => {
                    assert_eq!(exit_code, Some(1));
                    assert!(message.ends_with("Invalid data found when processing input"));
                }
                other => panic!("unexpected error: {:?}", other),
            }
        }

        #[tokio::test]
        async fn test_command_timeout() {
            let (_bin, path) = fake_ffmpeg();
            let engine = FfmpegProcessEngine::new(&path)
                .with_timeout(Some(Duration::from_millis(200)));
            engine.initialize().await.unwrap();

            let err = engine.execute(&job("slow.gif")).await.unwrap_err();
            assert!(matches!(err, EngineError::Timeout(_)));
        }

        #[tokio::test]
        async fn test_delete_file_empties_workspace() {
            let (_bin, path) = fake_ffmpeg();
            let engine = loaded(&path).await;

            engine.write_file("input.mp4", b"video").await.unwrap();
            engine.execute(&job("clip.gif")).await.unwrap();
            for name in ["input.mp4", "clip.gif", "args.txt"] {
                engine.delete_file(name).await.unwrap();
            }
            engine.delete_file("clip.gif").await.unwrap();

            assert!(workspace_files(&engine).is_empty());
            assert_eq!(
                engine.delete_file("../clip.gif").await,
                Err(EngineError::InvalidFileName("../clip.gif".to_string()))
            );
        }
    }
}
