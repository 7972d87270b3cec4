use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use medio_convert::convert::Converter;
use medio_convert::engine::FfmpegEngine;
use medio_convert::preset::FilterPreset;
use medio_convert::{export, gui, waveform};
use medio_convert::{ConversionRequest, InputFile, DEFAULT_BITRATE_KBPS, DEFAULT_SAMPLE_RATE_HZ, OUTPUT_FILE_NAME, PROGRAM};

#[derive(Parser)]
#[command(author, version, about = "Convert MP3 to WAV with loudness, EQ and fade presets", long_about = None)]
struct Cli {
    input: Option<PathBuf>,
    #[arg(short, long, default_value = OUTPUT_FILE_NAME)]
    output: PathBuf,
    /// Target bitrate in kbps
    #[arg(short, long, default_value_t = DEFAULT_BITRATE_KBPS)]
    bitrate: u32,
    /// Target sample rate in Hz
    #[arg(short = 'r', long, default_value_t = DEFAULT_SAMPLE_RATE_HZ)]
    sample_rate: u32,
    #[arg(long, default_value_t = 0.0)]
    fade_in: f64,
    #[arg(long, default_value_t = 0.0)]
    fade_out: f64,
    /// loud, normal, quiet, brighter, bassier, volume_up, volume_down, dynaudnorm or none
    #[arg(short, long, default_value = "none")]
    filter: String,
    /// Also render the waveform of the result to this PNG
    #[arg(long)]
    waveform: Option<PathBuf>,
    #[arg(long, default_value_t = 800)]
    width: u32,
    #[arg(long, default_value_t = waveform::DEFAULT_HEIGHT)]
    height: u32,
    /// Print the FFmpeg command and exit
    #[arg(long)]
    dry_run: bool,
    #[arg(long)]
    gui: bool,
    #[arg(long, env = "MEDIO_FFMPEG", default_value = PROGRAM)]
    ffmpeg: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let engine = FfmpegEngine::with_binary(&cli.ffmpeg);

    let input_path = match cli.input {
        Some(path) if !cli.gui => path,
        initial => return gui::run(initial, engine),
    };

    let filter = FilterPreset::from_key(&cli.filter);
    if filter == FilterPreset::None && cli.filter != "none" {
        log::warn!("unknown filter preset {:?}, converting without a filter", cli.filter);
    }

    let name = input_path.file_name().unwrap_or_default().to_string_lossy().to_string();
    let bytes = std::fs::read(&input_path).with_context(|| format!("failed to read {:?}", input_path))?;

    let request = ConversionRequest {
        input: InputFile::new(name, bytes),
        bitrate_kbps: cli.bitrate,
        sample_rate_hz: cli.sample_rate,
        fade_in_secs: cli.fade_in,
        fade_out_secs: cli.fade_out,
        filter,
    };

    let converter = Converter::new(engine);

    if cli.dry_run {
        println!("{}", converter.plan(&request)?);
        return Ok(());
    }

    println!("Converting {:?}...", input_path);
    let output = converter.convert(&request)?;
    println!("{}", output.command);

    export::save_output(&cli.output, &output.bytes)?;
    match &output.audio {
        Some(audio) => println!(
            "Saved {:?} ({:.2}s, {}Hz, {} channels)",
            cli.output,
            audio.duration_secs(),
            audio.sample_rate,
            audio.channels
        ),
        None => println!("Saved {:?} (could not be decoded for preview)", cli.output),
    }

    if let Some(png) = cli.waveform {
        export::save_waveform_png(&png, &output, cli.width, cli.height)?;
        println!("Waveform written to {:?}", png);
    }

    Ok(())
}
