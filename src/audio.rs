use log::debug;
use symphonia::core::audio::{AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use crate::error::DecodeError;

#[derive(Clone, Debug, Default)]
pub struct DecodedAudio {
    pub samples: Vec<f32>, // Interleaved samples
    pub sample_rate: u32,
    pub channels: u16,
}

impl DecodedAudio {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            return 0;
        }
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / self.sample_rate as f64
    }

    /// De-interleaved samples of the first channel.
    pub fn first_channel(&self) -> Vec<f32> {
        let channels = self.channels.max(1) as usize;
        self.samples.iter().step_by(channels).copied().collect()
    }
}

pub fn decode_from_source(source: Box<dyn MediaSource>, hint: &Hint) -> Result<DecodedAudio, DecodeError> {
    let mss = MediaSourceStream::new(source, Default::default());

    let meta_opts: MetadataOptions = Default::default();
    let fmt_opts: FormatOptions = Default::default();

    let probed = symphonia::default::get_probe()
        .format(hint, mss, &fmt_opts, &meta_opts)
        .map_err(|e| DecodeError::Unsupported(e.to_string()))?;

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or(DecodeError::NoAudioTrack)?;

    let dec_opts: DecoderOptions = Default::default();
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &dec_opts)
        .map_err(|e| DecodeError::Codec(e.to_string()))?;

    let track_id = track.id;
    // Stream-level parameters; a zero-frame stream never yields a buffer spec
    let mut sample_rate = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);
    let mut samples: Vec<f32> = Vec::new();
    let mut spec_seen = false;
    let mut skipped_packets = 0usize;

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            // End of stream surfaces as an unexpected EOF
            Err(Error::IoError(_)) => break,
            Err(Error::ResetRequired) => break,
            Err(e) => {
                debug!("stopping at packet error: {}", e);
                break;
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                if !spec_seen {
                    spec_seen = true;
                    let spec = decoded.spec();
                    sample_rate = spec.rate;
                    channels = spec.channels.count() as u16;
                }
                push_interleaved(&decoded, &mut samples);
            }
            Err(Error::DecodeError(_)) => skipped_packets += 1,
            Err(e) => {
                debug!("stopping at decoder error: {}", e);
                break;
            }
        }
    }

    if skipped_packets > 0 {
        debug!("skipped {} undecodable packets", skipped_packets);
    }

    if sample_rate == 0 || channels == 0 {
        return Err(DecodeError::Empty);
    }

    Ok(DecodedAudio {
        samples,
        sample_rate,
        channels,
    })
}

macro_rules! interleave {
    ($buf:expr, $out:expr, |$s:ident| $conv:expr) => {{
        let channels = $buf.spec().channels.count();
        $out.reserve($buf.frames() * channels);
        for i in 0..$buf.frames() {
            for c in 0..channels {
                let $s = $buf.chan(c)[i];
                $out.push($conv);
            }
        }
    }};
}

fn push_interleaved(decoded: &AudioBufferRef<'_>, out: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::F32(buf) => interleave!(buf, out, |s| s),
        AudioBufferRef::F64(buf) => interleave!(buf, out, |s| s as f32),
        AudioBufferRef::U8(buf) => interleave!(buf, out, |s| (s as f32 / 128.0) - 1.0),
        AudioBufferRef::U16(buf) => interleave!(buf, out, |s| (s as f32 / 32768.0) - 1.0),
        AudioBufferRef::U24(buf) => interleave!(buf, out, |s| (s.0 as f32 / 8388608.0) - 1.0),
        AudioBufferRef::U32(buf) => interleave!(buf, out, |s| (s as f32 / 2147483648.0) - 1.0),
        AudioBufferRef::S8(buf) => interleave!(buf, out, |s| s as f32 / 128.0),
        AudioBufferRef::S16(buf) => interleave!(buf, out, |s| s as f32 / 32768.0),
        AudioBufferRef::S24(buf) => interleave!(buf, out, |s| s.0 as f32 / 8388608.0),
        AudioBufferRef::S32(buf) => interleave!(buf, out, |s| s as f32 / 2147483648.0),
    }
}

pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DecodedAudio, DecodeError> {
    let src = File::open(&path)?;

    let mut hint = Hint::new();
    if let Some(ext) = path.as_ref().extension() {
        if let Some(ext_str) = ext.to_str() {
            hint.with_extension(ext_str);
        }
    }

    decode_from_source(Box::new(src), &hint)
}

pub fn decode_bytes(data: Vec<u8>, extension_hint: Option<&str>) -> Result<DecodedAudio, DecodeError> {
    let src = Cursor::new(data);

    let mut hint = Hint::new();
    if let Some(ext) = extension_hint {
        hint.with_extension(ext);
    }

    decode_from_source(Box::new(src), &hint)
}

/// Fully decodes `data` only to report its length in seconds.
pub fn probe_duration(data: Vec<u8>, extension_hint: Option<&str>) -> Result<f64, DecodeError> {
    let audio = decode_bytes(data, extension_hint)?;
    let duration = audio.duration_secs();
    debug!(
        "probed duration {:.3}s ({} frames @ {}Hz)",
        duration,
        audio.frames(),
        audio.sample_rate
    );
    Ok(duration)
}

pub fn probe_file_duration<P: AsRef<Path>>(path: P) -> Result<f64, DecodeError> {
    Ok(decode_file(path)?.duration_secs())
}
