use crossbeam_channel::{unbounded, Receiver, Sender};
use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;

use crate::control::ConvertControl;
use crate::convert::{ConversionOutput, Converter};
use crate::engine::FfmpegEngine;
use crate::error::ConvertError;
use crate::player::PreviewPlayer;
use crate::preset::FilterPreset;
use crate::{export, i18n, waveform};
use crate::{ConversionRequest, InputFile, BITRATE_CHOICES, DEFAULT_BITRATE_KBPS, DEFAULT_SAMPLE_RATE_HZ, MAX_FADE_SECS, SAMPLE_RATE_CHOICES};

const STROKE: egui::Color32 = egui::Color32::from_rgb(
    waveform::STROKE_RGBA[0],
    waveform::STROKE_RGBA[1],
    waveform::STROKE_RGBA[2],
);

const DISABLED_FILL: egui::Color32 = egui::Color32::from_gray(40);

pub fn run(initial_file: Option<PathBuf>, engine: FfmpegEngine) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([640.0, 520.0])
            .with_min_inner_size([480.0, 420.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Medio Convert",
        options,
        Box::new(move |cc| {
            configure_visuals(&cc.egui_ctx);
            Ok(Box::new(ConverterApp::new(initial_file, engine, cc.egui_ctx.clone())))
        }),
    )
    .map_err(|e| anyhow::anyhow!("GUI Error: {}", e))
}

pub fn configure_visuals(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.window_corner_radius = egui::CornerRadius::same(8);
    visuals.widgets.noninteractive.bg_fill = egui::Color32::from_gray(20);
    ctx.set_visuals(visuals);
}

enum AppMessage {
    Converted(Box<ConversionOutput>),
    Failed(String),
}

pub struct ConverterApp {
    msg_receiver: Receiver<AppMessage>,
    msg_sender: Sender<AppMessage>,
    ctx: egui::Context,

    converter: Converter<FfmpegEngine>,
    control: ConvertControl,
    player: Option<PreviewPlayer>,

    // Parameters
    input: Option<InputFile>,
    bitrate_kbps: u32,
    sample_rate_hz: u32,
    fade_in_secs: f64,
    fade_out_secs: f64,
    filter: FilterPreset,

    // Result
    output: Option<Arc<ConversionOutput>>,
    preview: Option<Arc<Vec<f32>>>,
    status: Option<String>,
    notice: Option<String>,
}

impl ConverterApp {
    pub fn new(initial_file: Option<PathBuf>, engine: FfmpegEngine, ctx: egui::Context) -> Self {
        let (sender, receiver) = unbounded();

        let mut app = Self {
            msg_receiver: receiver,
            msg_sender: sender,
            ctx,
            converter: Converter::new(engine),
            control: ConvertControl::new(),
            player: PreviewPlayer::try_default(),
            input: None,
            bitrate_kbps: DEFAULT_BITRATE_KBPS,
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            fade_in_secs: 0.0,
            fade_out_secs: 0.0,
            filter: FilterPreset::None,
            output: None,
            preview: None,
            status: None,
            notice: None,
        };

        if let Some(path) = initial_file {
            app.load_file(&path);
        }

        app
    }

    fn load_file(&mut self, path: &Path) {
        let name = path.file_name().unwrap_or_default().to_string_lossy().to_string();
        match std::fs::read(path) {
            Ok(bytes) => {
                log::info!("selected {:?} ({} bytes)", path, bytes.len());
                self.input = Some(InputFile::new(name, bytes));
                self.status = None;
            }
            Err(e) => {
                self.notice = Some(format!("{:?}: {}", path, e));
            }
        }
    }

    fn on_convert_clicked(&mut self) {
        if let Err(ConvertError::Busy) = self.control.try_begin() {
            self.notice = Some(i18n::t("please_wait"));
            return;
        }

        let Some(input) = self.input.clone() else {
            self.control.finish();
            self.notice = Some(i18n::t("select_file"));
            return;
        };

        let request = ConversionRequest {
            input,
            bitrate_kbps: self.bitrate_kbps,
            sample_rate_hz: self.sample_rate_hz,
            fade_in_secs: self.fade_in_secs,
            fade_out_secs: self.fade_out_secs,
            filter: self.filter,
        };

        if let Some(player) = &self.player {
            player.stop();
        }
        self.status = None;

        let converter = self.converter.clone();
        let sender = self.msg_sender.clone();
        let ctx = self.ctx.clone();

        thread::spawn(move || {
            let msg = match converter.convert(&request) {
                Ok(output) => AppMessage::Converted(Box::new(output)),
                Err(e) => {
                    log::error!("conversion failed: {}", e);
                    AppMessage::Failed(e.to_string())
                }
            };
            sender.send(msg).ok();
            ctx.request_repaint();
        });
    }

    fn on_converted(&mut self, output: ConversionOutput) {
        self.preview = output.audio.as_ref().map(|a| Arc::new(a.first_channel()));

        if let Some(path) = rfd::FileDialog::new()
            .set_title(i18n::t("save_file"))
            .set_file_name(&output.file_name)
            .add_filter("WAV", &["wav"])
            .save_file()
        {
            match export::save_output(&path, &output.bytes) {
                Ok(()) => self.status = Some(format!("{}{}", i18n::t("saved"), path.display())),
                Err(e) => self.notice = Some(format!("{}{:#}", i18n::t("convert_fail"), e)),
            }
        }

        self.output = Some(Arc::new(output));
    }

    fn render_controls(&mut self, ui: &mut egui::Ui) {
        egui::Grid::new("params")
            .num_columns(2)
            .spacing([16.0, 8.0])
            .show(ui, |ui| {
                ui.label(i18n::t("bitrate"));
                egui::ComboBox::from_id_salt("bitrate")
                    .selected_text(format!("{} kbps", self.bitrate_kbps))
                    .show_ui(ui, |ui| {
                        for b in BITRATE_CHOICES {
                            ui.selectable_value(&mut self.bitrate_kbps, b, format!("{} kbps", b));
                        }
                    });
                ui.end_row();

                ui.label(i18n::t("sample_rate"));
                egui::ComboBox::from_id_salt("sample_rate")
                    .selected_text(format!("{} Hz", self.sample_rate_hz))
                    .show_ui(ui, |ui| {
                        for r in SAMPLE_RATE_CHOICES {
                            ui.selectable_value(&mut self.sample_rate_hz, r, format!("{} Hz", r));
                        }
                    });
                ui.end_row();

                ui.label(i18n::t("fade_in"));
                ui.add(
                    egui::Slider::new(&mut self.fade_in_secs, 0.0..=MAX_FADE_SECS)
                        .step_by(0.5)
                        .suffix(i18n::t("seconds")),
                );
                ui.end_row();

                ui.label(i18n::t("fade_out"));
                ui.add(
                    egui::Slider::new(&mut self.fade_out_secs, 0.0..=MAX_FADE_SECS)
                        .step_by(0.5)
                        .suffix(i18n::t("seconds")),
                );
                ui.end_row();

                ui.label(i18n::t("filter"));
                egui::ComboBox::from_id_salt("filter")
                    .selected_text(preset_label(self.filter))
                    .show_ui(ui, |ui| {
                        for preset in FilterPreset::ALL {
                            ui.selectable_value(&mut self.filter, preset, preset_label(preset));
                        }
                    });
                ui.end_row();
            });
    }

    fn render_waveform(&self, ui: &mut egui::Ui) {
        let size = egui::vec2(ui.available_width(), waveform::DEFAULT_HEIGHT as f32);
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 4.0, egui::Color32::from_gray(28));

        let Some(channel) = &self.preview else {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                i18n::t("drag_drop"),
                egui::FontId::proportional(14.0),
                egui::Color32::GRAY,
            );
            return;
        };

        // Stride is recomputed from the current panel width every frame
        let points: Vec<egui::Pos2> = waveform::trace_points(channel, rect.width() as usize, rect.height())
            .into_iter()
            .map(|[x, y]| egui::pos2(rect.left() + x, rect.top() + y))
            .collect();
        painter.add(egui::Shape::line(points, egui::Stroke::new(1.0, STROKE)));
    }

    fn render_notice(&mut self, ctx: &egui::Context) {
        let Some(message) = self.notice.clone() else {
            return;
        };
        let mut open = true;
        egui::Window::new(i18n::t("app_title"))
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .open(&mut open)
            .show(ctx, |ui| {
                ui.label(message);
                if ui.button(i18n::t("ok")).clicked() {
                    self.notice = None;
                }
            });
        if !open {
            self.notice = None;
        }
    }
}

/// Fill for the convert button; converting gets a dimmed, disabled look.
fn convert_button_fill(control: &ConvertControl) -> Option<egui::Color32> {
    if control.enabled() {
        None
    } else {
        Some(DISABLED_FILL)
    }
}

fn convert_button(control: &ConvertControl) -> egui::Button<'static> {
    let mut text = egui::RichText::new(control.label());
    if !control.enabled() {
        text = text.weak();
    }
    let button = egui::Button::new(text).min_size(egui::vec2(160.0, 28.0));
    match convert_button_fill(control) {
        Some(fill) => button.fill(fill),
        None => button,
    }
}

fn preset_label(preset: FilterPreset) -> String {
    i18n::t(&format!("preset_{}", preset.key()))
}

impl eframe::App for ConverterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(msg) = self.msg_receiver.try_recv() {
            self.control.finish();
            match msg {
                AppMessage::Converted(output) => self.on_converted(*output),
                AppMessage::Failed(e) => {
                    self.notice = Some(format!("{}{}", i18n::t("convert_fail"), e));
                }
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.spacing_mut().item_spacing = egui::vec2(10.0, 10.0);

            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(i18n::t("app_title")).strong().color(egui::Color32::from_gray(100)));

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    egui::ComboBox::from_id_salt("lang_select")
                        .selected_text(if i18n::get_language() == i18n::Language::Zh { "中文" } else { "English" })
                        .show_ui(ui, |ui| {
                            if ui.selectable_label(i18n::get_language() == i18n::Language::Zh, "中文").clicked() {
                                i18n::set_language(i18n::Language::Zh);
                            }
                            if ui.selectable_label(i18n::get_language() == i18n::Language::En, "English").clicked() {
                                i18n::set_language(i18n::Language::En);
                            }
                        });

                    if ui.button(i18n::t("open_file")).clicked() {
                        if let Some(path) = rfd::FileDialog::new()
                            .add_filter("Audio", &["mp3", "wav", "flac", "ogg", "m4a"])
                            .pick_file()
                        {
                            self.load_file(&path);
                        }
                    }
                });
            });
            ui.separator();

            match &self.input {
                Some(input) => ui.label(egui::RichText::new(&input.name).heading()),
                None => ui.label(egui::RichText::new(i18n::t("no_file")).color(egui::Color32::GRAY)),
            };

            self.render_controls(ui);

            ui.horizontal(|ui| {
                // Stays clickable while converting so a second click gets the wait notice
                let button = convert_button(&self.control);
                if ui.add(button).clicked() {
                    self.on_convert_clicked();
                }
                if self.control.is_converting() {
                    ui.spinner();
                }

                let audio = self.output.as_ref().and_then(|o| o.audio.as_ref());
                if let (Some(player), Some(audio)) = (&self.player, audio) {
                    if ui.button(i18n::t("play")).clicked() {
                        player.play(audio);
                    }
                    if ui.button(i18n::t("stop")).clicked() {
                        player.stop();
                    }
                }
            });

            self.render_waveform(ui);

            if let Some(status) = &self.status {
                ui.small(status.as_str());
            }
            if let Some(output) = &self.output {
                ui.small(egui::RichText::new(output.command.to_string()).monospace().color(egui::Color32::GRAY));
            }

            if !ctx.input(|i| i.raw.dropped_files.is_empty()) {
                let dropped = ctx.input(|i| i.raw.dropped_files.clone());
                if let Some(path) = dropped.first().and_then(|f| f.path.clone()) {
                    self.load_file(&path);
                }
            }
        });

        self.render_notice(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_button_dims_while_converting() {
        let mut control = ConvertControl::new();
        assert_eq!(convert_button_fill(&control), None);

        control.try_begin().unwrap();
        assert_eq!(convert_button_fill(&control), Some(DISABLED_FILL));

        control.finish();
        assert_eq!(convert_button_fill(&control), None);
    }
}
