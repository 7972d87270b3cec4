use std::fmt;

use crate::preset::FilterPreset;
use crate::{ConversionRequest, INPUT_FILE_NAME, OUTPUT_FILE_NAME, PROGRAM};

/// Structured FFmpeg invocation for one conversion.
///
/// Renders to `ffmpeg -i <input> -af <chain> -b:a <n>k -ar <rate> <output>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscodeCommand {
    pub input: String,
    pub output: String,
    pub filter: FilterPreset,
    pub fade_in_secs: f64,
    pub fade_out_start_secs: f64,
    pub fade_out_secs: f64,
    pub bitrate_kbps: u32,
    pub sample_rate_hz: u32,
}

impl TranscodeCommand {
    /// `duration_secs` is the decoded length of the input; the fade-out starts
    /// at `duration - fade_out`, which is negative when the fade is longer
    /// than the clip.
    pub fn new(request: &ConversionRequest, duration_secs: f64) -> Self {
        Self {
            input: INPUT_FILE_NAME.to_string(),
            output: OUTPUT_FILE_NAME.to_string(),
            filter: request.filter,
            fade_in_secs: request.fade_in_secs,
            fade_out_start_secs: duration_secs - request.fade_out_secs,
            fade_out_secs: request.fade_out_secs,
            bitrate_kbps: request.bitrate_kbps,
            sample_rate_hz: request.sample_rate_hz,
        }
    }

    pub fn filter_chain(&self) -> String {
        format!(
            "{}afade=t=in:ss=0:d={},afade=t=out:st={}:d={}",
            self.filter.filter_expression(),
            self.fade_in_secs,
            self.fade_out_start_secs,
            self.fade_out_secs
        )
    }

    /// Ordered tokens, program name first.
    pub fn to_args(&self) -> Vec<String> {
        vec![
            PROGRAM.to_string(),
            "-i".to_string(),
            self.input.clone(),
            "-af".to_string(),
            self.filter_chain(),
            "-b:a".to_string(),
            format!("{}k", self.bitrate_kbps),
            "-ar".to_string(),
            self.sample_rate_hz.to_string(),
            self.output.clone(),
        ]
    }
}

impl fmt::Display for TranscodeCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_args().join(" "))
    }
}

/// Splits a single-line command into tokens on spaces.
///
/// No quoting is understood; the fixed file names never contain spaces.
pub fn parse_command_line(line: &str) -> Vec<String> {
    line.split(' ')
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
