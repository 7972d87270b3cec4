//! End-to-end conversion flow against an in-memory engine.

use std::collections::HashMap;
use std::io::Cursor;

use medio_convert::convert::Converter;
use medio_convert::engine::{validate_file_name, TranscodeEngine};
use medio_convert::error::{ConvertError, EngineError};
use medio_convert::preset::FilterPreset;
use medio_convert::waveform;
use medio_convert::{ConversionRequest, InputFile, INPUT_FILE_NAME, OUTPUT_FILE_NAME};

/// Mono 16-bit WAV with a slow ramp so the waveform is not flat.
fn wav(sample_rate: u32, frames: usize) -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for i in 0..frames {
            writer.write_sample(((i % 200) as i16 - 100) * 100).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

/// Stands in for FFmpeg: "transcodes" by emitting a short WAV at the requested rate.
#[derive(Default)]
struct FakeEngine {
    loaded: bool,
    files: HashMap<String, Vec<u8>>,
    loads: usize,
    exits: usize,
    runs: Vec<Vec<String>>,
    skip_output: bool,
    /// Bytes to emit instead of a WAV at the requested rate.
    raw_output: Option<Vec<u8>>,
}

impl TranscodeEngine for FakeEngine {
    fn load(&mut self) -> Result<(), EngineError> {
        self.loaded = true;
        self.loads += 1;
        Ok(())
    }

    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn exit(&mut self) -> Result<(), EngineError> {
        self.loaded = false;
        self.exits += 1;
        self.files.clear();
        Ok(())
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> Result<(), EngineError> {
        validate_file_name(name)?;
        if !self.loaded {
            return Err(EngineError::NotLoaded);
        }
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
        assert!(self.files.contains_key(INPUT_FILE_NAME), "input not written before run");
        self.runs.push(args.to_vec());
        if self.skip_output {
            return Ok(());
        }
        let rate = args
            .iter()
            .position(|a| a == "-ar")
            .and_then(|i| args.get(i + 1))
            .and_then(|r| r.parse().ok())
            .unwrap_or(44_100);
        let out = args.last().cloned().unwrap_or_default();
        let bytes = match &self.raw_output {
            Some(raw) => raw.clone(),
            None => wav(rate, (rate / 10) as usize),
        };
        self.files.insert(out, bytes);
        Ok(())
    }
}

fn ten_second_clip() -> InputFile {
    InputFile::new("clip.wav", wav(8000, 80_000))
}

#[test]
fn normal_preset_end_to_end() {
    let converter = Converter::new(FakeEngine::default());
    let request = ConversionRequest {
        input: ten_second_clip(),
        bitrate_kbps: 320,
        sample_rate_hz: 192_000,
        fade_in_secs: 2.0,
        fade_out_secs: 3.0,
        filter: FilterPreset::from_key("normal"),
    };

    let output = converter.convert(&request).unwrap();

    assert_eq!(
        output.command.to_string(),
        "ffmpeg -i medioai.mp3 -af loudnorm=I=-14:LRA=7:TP=-2,alimiter=limit=0.9,afade=t=in:ss=0:d=2,afade=t=out:st=7:d=3 -b:a 320k -ar 192000 medioai.wav"
    );
    assert_eq!(output.file_name, OUTPUT_FILE_NAME);
    let audio = output.audio.as_ref().unwrap();
    assert_eq!(audio.sample_rate, 192_000);
    assert_eq!(audio.frames(), 19_200);

    let engine = converter.engine().lock().unwrap();
    assert_eq!(engine.runs.len(), 1);
    assert_eq!(engine.runs[0][0], "-i");
    assert_eq!(engine.files[INPUT_FILE_NAME], request.input.bytes);
}

#[test]
fn engine_is_reset_between_conversions() {
    let converter = Converter::new(FakeEngine::default());
    let request = ConversionRequest::new(ten_second_clip());

    converter.convert(&request).unwrap();
    converter.convert(&request).unwrap();

    let engine = converter.engine().lock().unwrap();
    assert_eq!(engine.loads, 2);
    assert_eq!(engine.exits, 1);
}

#[test]
fn missing_output_surfaces_engine_error() {
    let converter = Converter::new(FakeEngine {
        skip_output: true,
        ..Default::default()
    });
    let err = converter.convert(&ConversionRequest::new(ten_second_clip())).unwrap_err();
    assert!(matches!(err, ConvertError::Engine(EngineError::MissingOutput(_))));
}

#[test]
fn undecodable_input_never_reaches_engine() {
    let converter = Converter::new(FakeEngine::default());
    let request = ConversionRequest::new(InputFile::new("broken.mp3", vec![0x13; 2048]));
    let err = converter.convert(&request).unwrap_err();
    assert!(matches!(err, ConvertError::Decode(_)));
    assert_eq!(converter.engine().lock().unwrap().loads, 0);
}

#[test]
fn fade_longer_than_clip_is_passed_through() {
    let converter = Converter::new(FakeEngine::default());
    let mut request = ConversionRequest::new(ten_second_clip());
    request.fade_out_secs = 12.5;
    let command = converter.plan(&request).unwrap();
    assert_eq!(command.fade_out_start_secs, -2.5);
    assert!(command.to_string().contains("afade=t=out:st=-2.5:d=12.5"));
}

#[test]
fn waveform_of_output_fills_width() {
    let converter = Converter::new(FakeEngine::default());
    let output = converter.convert(&ConversionRequest::new(ten_second_clip())).unwrap();
    let channel = output.audio.unwrap().first_channel();
    for width in [320usize, 777, 1920] {
        assert_eq!(waveform::trace_points(&channel, width, 120.0).len(), width);
    }
}

#[test]
fn undecodable_output_is_still_delivered() {
    let converter = Converter::new(FakeEngine {
        raw_output: Some(b"RIFF".to_vec()),
        ..Default::default()
    });
    let output = converter.convert(&ConversionRequest::new(ten_second_clip())).unwrap();
    assert_eq!(output.bytes, b"RIFF");
    assert_eq!(output.file_name, OUTPUT_FILE_NAME);
    assert!(output.audio.is_none());
}

#[test]
fn zero_length_input_fades_from_negative_start() {
    let converter = Converter::new(FakeEngine::default());
    let mut request = ConversionRequest::new(InputFile::new("empty.wav", wav(8000, 0)));
    request.fade_out_secs = 3.0;
    let command = converter.plan(&request).unwrap();
    assert_eq!(command.fade_out_start_secs, -3.0);
    assert!(command.to_string().contains("afade=t=out:st=-3:d=3"));
}
