//! Transcoding engine seam.
//!
//! The converter never talks to FFmpeg directly; it drives a [`TranscodeEngine`]
//! through its lifecycle and passes files through the engine's own flat
//! filesystem namespace.

use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

use crate::error::EngineError;
use crate::PROGRAM;

pub trait TranscodeEngine {
    fn load(&mut self) -> Result<(), EngineError>;
    fn is_loaded(&self) -> bool;
    /// Tear down the loaded instance and everything in its filesystem.
    fn exit(&mut self) -> Result<(), EngineError>;
    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), EngineError>;
    fn read_file(&self, name: &str) -> Result<Vec<u8>, EngineError>;
    /// Run the program with `args` (program name excluded).
    fn run(&mut self, args: &[String]) -> Result<(), EngineError>;
}

/// Engine file names are a flat namespace: no separators, no parent refs.
pub fn validate_file_name(name: &str) -> Result<(), EngineError> {
    let flat = !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && !name.contains('\0');
    if flat {
        Ok(())
    } else {
        Err(EngineError::InvalidFileName(name.to_string()))
    }
}

/// Runs the system FFmpeg binary inside a scratch directory that is created
/// on `load` and removed on `exit`.
pub struct FfmpegEngine {
    binary: PathBuf,
    workdir: Option<TempDir>,
}

impl FfmpegEngine {
    pub fn new() -> Self {
        Self::with_binary(PROGRAM)
    }

    pub fn with_binary<P: Into<PathBuf>>(binary: P) -> Self {
        Self {
            binary: binary.into(),
            workdir: None,
        }
    }

    fn workdir(&self) -> Result<&Path, EngineError> {
        self.workdir
            .as_ref()
            .map(TempDir::path)
            .ok_or(EngineError::NotLoaded)
    }
}

impl Default for FfmpegEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscodeEngine for FfmpegEngine {
    fn load(&mut self) -> Result<(), EngineError> {
        let output = Command::new(&self.binary)
            .args(["-hide_banner", "-version"])
            .stdin(Stdio::null())
            .output()
            .map_err(|e| EngineError::Unavailable(format!("{}: {}", self.binary.display(), e)))?;

        if !output.status.success() {
            return Err(EngineError::Unavailable(format!(
                "{} -version exited with {}",
                self.binary.display(),
                output.status
            )));
        }

        let version = String::from_utf8_lossy(&output.stdout);
        info!("loaded {}", version.lines().next().unwrap_or("ffmpeg"));

        let dir = tempfile::Builder::new().prefix("medio-convert-").tempdir()?;
        debug!("engine filesystem at {:?}", dir.path());
        self.workdir = Some(dir);
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.workdir.is_some()
    }

    fn exit(&mut self) -> Result<(), EngineError> {
        if let Some(dir) = self.workdir.take() {
            debug!("removing engine filesystem {:?}", dir.path());
            dir.close()?;
        }
        Ok(())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), EngineError> {
        validate_file_name(name)?;
        let path = self.workdir()?.join(name);
        std::fs::write(path, data)?;
        Ok(())
    }

    fn read_file(&self, name: &str) -> Result<Vec<u8>, EngineError> {
        validate_file_name(name)?;
        let path = self.workdir()?.join(name);
        if !path.is_file() {
            return Err(EngineError::MissingOutput(name.to_string()));
        }
        Ok(std::fs::read(path)?)
    }

    fn run(&mut self, args: &[String]) -> Result<(), EngineError> {
        let dir = self.workdir()?.to_path_buf();
        info!("running {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary)
            .args(args)
            .current_dir(&dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| EngineError::Unavailable(format!("{}: {}", self.binary.display(), e)))?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines() {
            debug!("[ffmpeg] {}", line);
        }

        if !output.status.success() {
            warn!("ffmpeg exited with {}", output.status);
            let tail: Vec<&str> = stderr.lines().rev().take(5).collect();
            return Err(EngineError::Failed {
                status: output.status.to_string(),
                stderr: tail.into_iter().rev().collect::<Vec<_>>().join("\n"),
            });
        }

        Ok(())
    }
}

impl Drop for FfmpegEngine {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
