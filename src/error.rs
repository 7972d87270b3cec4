//! Error types shared by the decoding, engine and conversion layers.

use thiserror::Error;

/// Failure to turn encoded bytes into PCM.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("failed to read audio: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported format: {0}")]
    Unsupported(String),

    #[error("no supported audio track")]
    NoAudioTrack,

    #[error("codec error: {0}")]
    Codec(String),

    #[error("audio stream has no usable sample rate or channel layout")]
    Empty,
}

/// Failure reported by a transcoding engine.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("engine is not loaded")]
    NotLoaded,

    #[error("engine unavailable: {0}")]
    Unavailable(String),

    #[error("engine filesystem error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid file name for engine filesystem: {0:?}")]
    InvalidFileName(String),

    #[error("transcode failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    #[error("engine produced no output file {0:?}")]
    MissingOutput(String),
}

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("no input file selected")]
    NoInput,

    #[error("a conversion is already running")]
    Busy,

    #[error("malformed command: {0:?}")]
    MalformedCommand(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

pub type ConvertResult<T> = Result<T, ConvertError>;
