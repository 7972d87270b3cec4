use anyhow::{Context, Result};
use std::path::Path;

use crate::convert::ConversionOutput;
use crate::waveform;

/// Writes the converted audio where the user asked for it.
pub fn save_output<P: AsRef<Path>>(path: P, bytes: &[u8]) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, bytes).with_context(|| format!("failed to write {:?}", path))?;
    log::info!("saved {} bytes to {:?}", bytes.len(), path);
    Ok(())
}

/// Renders the waveform of `output` to a PNG file.
pub fn save_waveform_png<P: AsRef<Path>>(
    path: P,
    output: &ConversionOutput,
    width: u32,
    height: u32,
) -> Result<()> {
    let path = path.as_ref();
    let audio = output
        .audio
        .as_ref()
        .context("converted audio could not be decoded for a waveform")?;
    let img = waveform::render_image(&audio.first_channel(), width, height);
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("failed to write waveform {:?}", path))?;
    Ok(())
}
