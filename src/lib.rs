pub mod audio;
pub mod command;
pub mod control;
pub mod convert;
pub mod engine;
pub mod error;
pub mod export;
pub mod gui;
pub mod i18n;
pub mod player;
pub mod preset;
pub mod waveform;

use preset::FilterPreset;

/// Name the input is stored under inside the engine's filesystem.
pub const INPUT_FILE_NAME: &str = "medioai.mp3";
/// Name the engine writes the converted audio to, and the default save name.
pub const OUTPUT_FILE_NAME: &str = "medioai.wav";
/// Program token every assembled command starts with.
pub const PROGRAM: &str = "ffmpeg";

pub const DEFAULT_BITRATE_KBPS: u32 = 320;
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 192_000;

pub const BITRATE_CHOICES: [u32; 6] = [64, 96, 128, 192, 256, 320];
pub const SAMPLE_RATE_CHOICES: [u32; 5] = [22_050, 44_100, 48_000, 96_000, 192_000];
pub const MAX_FADE_SECS: f64 = 10.0;

/// A user-picked file, held in memory for the duration of one conversion.
#[derive(Clone, Debug)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { name: name.into(), bytes }
    }

    /// Lower-cased extension of the original file name, used as a decoder hint.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }
}

#[derive(Clone, Debug)]
pub struct ConversionRequest {
    pub input: InputFile,
    pub bitrate_kbps: u32,
    pub sample_rate_hz: u32,
    pub fade_in_secs: f64,
    pub fade_out_secs: f64,
    pub filter: FilterPreset,
}

impl ConversionRequest {
    /// Request with the default encoding settings, no fades and no filter.
    pub fn new(input: InputFile) -> Self {
        Self {
            input,
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            fade_in_secs: 0.0,
            fade_out_secs: 0.0,
            filter: FilterPreset::None,
        }
    }
}
