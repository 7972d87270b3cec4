use log::{error, info, warn};
use std::sync::{Arc, Mutex};

use crate::audio::{self, DecodedAudio};
use crate::command::TranscodeCommand;
use crate::engine::TranscodeEngine;
use crate::error::{ConvertError, ConvertResult};
use crate::{ConversionRequest, INPUT_FILE_NAME, OUTPUT_FILE_NAME, PROGRAM};

/// Result of one successful conversion.
#[derive(Clone, Debug)]
pub struct ConversionOutput {
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// The converted audio decoded again for the waveform preview; `None`
    /// when it could not be decoded. `bytes` are delivered either way.
    pub audio: Option<DecodedAudio>,
    pub command: TranscodeCommand,
}

/// Drives `engine` through one transcode of `input`.
///
/// A loaded engine is torn down first so nothing from a previous run
/// survives in its filesystem.
pub fn transcode<E: TranscodeEngine + ?Sized>(
    engine: &mut E,
    args: &[String],
    input: &[u8],
) -> ConvertResult<Vec<u8>> {
    if engine.is_loaded() {
        engine.exit()?;
    }
    engine.load()?;

    let (program, rest) = match args.split_first() {
        Some((program, rest)) if program == PROGRAM => (program, rest),
        _ => {
            let line = args.join(" ");
            error!("refusing to run malformed command: {}", line);
            return Err(ConvertError::MalformedCommand(line));
        }
    };

    engine.write_file(INPUT_FILE_NAME, input)?;
    info!("{} {}", program, rest.join(" "));
    engine.run(rest)?;

    Ok(engine.read_file(OUTPUT_FILE_NAME)?)
}

/// Owns the shared engine handle and runs probe -> assemble -> transcode -> decode.
pub struct Converter<E> {
    engine: Arc<Mutex<E>>,
}

impl<E> Clone for Converter<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<E: TranscodeEngine> Converter<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    pub fn engine(&self) -> &Arc<Mutex<E>> {
        &self.engine
    }

    /// Probes the input and builds the command without touching the engine.
    pub fn plan(&self, request: &ConversionRequest) -> ConvertResult<TranscodeCommand> {
        if request.input.bytes.is_empty() {
            return Err(ConvertError::NoInput);
        }
        let ext = request.input.extension();
        let duration = audio::probe_duration(request.input.bytes.clone(), ext.as_deref())?;
        info!("{:?}: {:.3}s", request.input.name, duration);
        Ok(TranscodeCommand::new(request, duration))
    }

    pub fn convert(&self, request: &ConversionRequest) -> ConvertResult<ConversionOutput> {
        let command = self.plan(request)?;
        let args = command.to_args();

        let bytes = {
            // engine is reset before every run, poisoned or not
            let mut engine = self.engine.lock().unwrap_or_else(|e| e.into_inner());
            transcode(&mut *engine, &args, &request.input.bytes)?
        };
        info!("transcoded {} bytes", bytes.len());

        let audio = match audio::decode_bytes(bytes.clone(), Some("wav")) {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!("no waveform preview: {}", e);
                None
            }
        };

        Ok(ConversionOutput {
            file_name: command.output.clone(),
            bytes,
            audio,
            command,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use std::collections::HashMap;

    #[derive(Default)]
    struct RecordingEngine {
        loaded: bool,
        files: HashMap<String, Vec<u8>>,
        calls: Vec<String>,
        produce_output: bool,
    }

    impl TranscodeEngine for RecordingEngine {
        fn load(&mut self) -> Result<(), EngineError> {
            self.calls.push("load".into());
            self.loaded = true;
            Ok(())
        }
        fn is_loaded(&self) -> bool {
            self.loaded
        }
        fn exit(&mut self) -> Result<(), EngineError> {
            self.calls.push("exit".into());
            self.loaded = false;
            self.files.clear();
            Ok(())
        }
        fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), EngineError> {
            self.calls.push(format!("write {name}"));
            self.files.insert(name.to_string(), data.to_vec());
            Ok(())
        }
        fn read_file(&self, name: &str) -> Result<Vec<u8>, EngineError> {
            self.files
                .get(name)
                .cloned()
                .ok_or_else(|| EngineError::MissingOutput(name.to_string()))
        }
        fn run(&mut self, args: &[String]) -> Result<(), EngineError> {
            self.calls.push(format!("run {}", args.join(" ")));
            if self.produce_output {
                self.files.insert(OUTPUT_FILE_NAME.to_string(), b"RIFF".to_vec());
            }
            Ok(())
        }
    }

    fn args(line: &str) -> Vec<String> {
        crate::command::parse_command_line(line)
    }

    #[test]
    fn resets_loaded_engine_before_running() {
        let mut engine = RecordingEngine {
            loaded: true,
            produce_output: true,
            ..Default::default()
        };
        engine.files.insert("stale.wav".into(), vec![1]);

        let out = transcode(&mut engine, &args("ffmpeg -i medioai.mp3 medioai.wav"), b"mp3").unwrap();
        assert_eq!(out, b"RIFF");
        assert!(!engine.files.contains_key("stale.wav"));
        assert_eq!(
            engine.calls,
            vec!["exit", "load", "write medioai.mp3", "run -i medioai.mp3 medioai.wav"]
        );
    }

    #[test]
    fn fresh_engine_is_not_exited() {
        let mut engine = RecordingEngine {
            produce_output: true,
            ..Default::default()
        };
        transcode(&mut engine, &args("ffmpeg -i medioai.mp3 medioai.wav"), b"").unwrap();
        assert_eq!(engine.calls[0], "load");
    }

    #[test]
    fn rejects_command_without_program_token() {
        for line in ["sox -i medioai.mp3 medioai.wav", "", "-i medioai.mp3 ffmpeg"] {
            let mut engine = RecordingEngine::default();
            let err = transcode(&mut engine, &args(line), b"mp3").unwrap_err();
            assert!(matches!(err, ConvertError::MalformedCommand(_)));
            assert!(engine.calls.iter().all(|c| !c.starts_with("run") && !c.starts_with("write")));
        }
    }

    #[test]
    fn missing_output_is_reported() {
        let mut engine = RecordingEngine::default();
        let err = transcode(&mut engine, &args("ffmpeg -af bogus medioai.wav"), b"mp3").unwrap_err();
        assert!(matches!(err, ConvertError::Engine(EngineError::MissingOutput(_))));
    }

    #[test]
    fn empty_input_is_no_input() {
        let converter = Converter::new(RecordingEngine::default());
        let request = ConversionRequest::new(crate::InputFile::new("a.mp3", Vec::new()));
        assert!(matches!(converter.plan(&request), Err(ConvertError::NoInput)));
    }
}
