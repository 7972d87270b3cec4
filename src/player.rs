use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::audio::DecodedAudio;

/// Plays the converted result on the default output device.
pub struct PreviewPlayer {
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
}

impl PreviewPlayer {
    /// `None` when no output device can be opened.
    pub fn try_default() -> Option<Self> {
        let (stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                log::warn!("no audio output device: {}", e);
                return None;
            }
        };
        let sink = Sink::try_new(&handle).ok()?;
        Some(Self {
            _stream: stream,
            _handle: handle,
            sink,
        })
    }

    pub fn play(&self, audio: &DecodedAudio) {
        self.sink.stop();
        let source = SamplesBuffer::new(audio.channels.max(1), audio.sample_rate, audio.samples.clone());
        self.sink.append(source);
        self.sink.play();
    }

    pub fn stop(&self) {
        self.sink.stop();
    }
}
