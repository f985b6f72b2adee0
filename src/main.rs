use std::fs;
use std::path::Path;

use anyhow::Context as _;
use eframe::{egui, App, CreationContext, Frame};
use egui::{Align, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use egui_plot::{Legend, Line, Plot, PlotPoints};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod models;
mod planner;
mod sheet;
mod store;

use models::Entry;
use planner::{next_session, trend_points};
use store::{EntryStore, FileBlob};

const EXPORT_FILE: &str = "training_data.xlsx";

fn main() -> Result<(), eframe::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1280 as f32, 800 as f32]),
        ..Default::default()
    };

    eframe::run_native(
        "Adaptive Training Log",
        options,
        Box::new(|cc| Ok(Box::new(TrainingApp::new(cc)))),
    )
}

#[derive(PartialEq, Clone, Copy)]
enum DisplayMode {
    Log,
    Trend,
}

struct TrainingApp {
    store: EntryStore<FileBlob>,
    display_mode: DisplayMode,
    week: i32,
    exercise: String,
    weight: f64,
    reps: i32,
    rir: i32,
    suggestion: Option<String>,
    import_path: String,
    status: Option<String>,
}

impl TrainingApp {
    fn new(cc: &CreationContext) -> Self {
        let mut style = (*cc.egui_ctx.style()).clone();
        style.text_styles.insert(
            egui::TextStyle::Body,
            egui::FontId::new(20.0, egui::FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Heading,
            egui::FontId::new(32.0, egui::FontFamily::Proportional),
        );
        cc.egui_ctx.set_style(style);

        let (store, status) = match EntryStore::load(FileBlob::in_data_dir()) {
            Ok(store) => {
                info!("Hydrated {} logged sets", store.entries().len());
                (store, None)
            }
            Err(err) => {
                warn!("Could not hydrate training data: {err}");
                (
                    EntryStore::empty(FileBlob::in_data_dir()),
                    Some(format!("Could not load saved data: {err}")),
                )
            }
        };

        TrainingApp {
            store,
            display_mode: DisplayMode::Log,
            week: 1,
            exercise: String::new(),
            weight: 0.0,
            reps: 0,
            rir: 0,
            suggestion: None,
            import_path: String::new(),
            status,
        }
    }
}

impl App for TrainingApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Num1)) {
            self.display_mode = DisplayMode::Log;
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Num2)) {
            self.display_mode = DisplayMode::Trend;
        }

        self.handle_dropped_files(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.with_layout(Layout::top_down_justified(Align::Center), |ui| {
                ui.add_space(10.0);
                ui.label(
                    RichText::new("Adaptive Training Log")
                        .heading()
                        .size(36.0)
                        .strong(),
                );
                ui.add_space(10.0);

                ui.horizontal(|ui| {
                    if ui
                        .selectable_label(self.display_mode == DisplayMode::Log, "Log")
                        .clicked()
                    {
                        self.display_mode = DisplayMode::Log;
                    }
                    if ui
                        .selectable_label(self.display_mode == DisplayMode::Trend, "Trend")
                        .clicked()
                    {
                        self.display_mode = DisplayMode::Trend;
                    }
                });

                ui.add_space(20.0);

                match self.display_mode {
                    DisplayMode::Log => self.show_log_display(ui),
                    DisplayMode::Trend => self.show_trend_display(ui),
                }

                if let Some(status) = &self.status {
                    ui.add_space(20.0);
                    ui.label(RichText::new(status).size(18.0));
                }
            });
        });
    }
}

impl TrainingApp {
    fn show_log_display(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label("Week");
            ui.add(egui::DragValue::new(&mut self.week));
            ui.label("Exercise");
            ui.add(
                egui::TextEdit::singleline(&mut self.exercise)
                    .desired_width(160.0)
                    .hint_text("Squat"),
            );
            ui.label("Kg");
            ui.add(egui::DragValue::new(&mut self.weight).speed(0.5));
            ui.label("Reps");
            ui.add(egui::DragValue::new(&mut self.reps));
            ui.label("RIR");
            ui.add(egui::DragValue::new(&mut self.rir));

            if ui.button(RichText::new("Save set").size(20.0)).clicked() {
                self.save_entry();
            }
        });

        if let Some(suggestion) = &self.suggestion {
            ui.add_space(20.0);
            ui.label(
                RichText::new("Next session")
                    .heading()
                    .size(28.0)
                    .strong(),
            );
            ui.label(RichText::new(suggestion).size(24.0));
        }

        ui.add_space(20.0);
        ui.horizontal(|ui| {
            if ui.button(RichText::new("Export .xlsx").size(20.0)).clicked() {
                self.export_entries();
            }
            ui.separator();
            ui.add(
                egui::TextEdit::singleline(&mut self.import_path)
                    .desired_width(260.0)
                    .hint_text(EXPORT_FILE),
            );
            if ui.button(RichText::new("Import .xlsx").size(20.0)).clicked() {
                let path = self.import_path.clone();
                self.import_from_path(Path::new(&path));
            }
        });
        ui.label(RichText::new("Dropping an .xlsx file on the window imports it too.").size(16.0));

        ui.add_space(20.0);
        if self.store.entries().is_empty() {
            ui.label(RichText::new("No sets logged yet.").size(20.0));
        } else {
            self.show_entry_table(ui);
        }
    }

    fn show_entry_table(&self, ui: &mut Ui) {
        TableBuilder::new(ui)
            .striped(true)
            .columns(Column::remainder(), 6)
            .header(24.0, |mut header| {
                for title in ["Week", "Exercise", "Kg", "Reps", "RIR", "e1RM"] {
                    header.col(|ui| {
                        ui.label(RichText::new(title).strong());
                    });
                }
            })
            .body(|mut body| {
                for entry in self.store.entries() {
                    body.row(20.0, |mut row| {
                        row.col(|ui| {
                            ui.label(entry.week.to_string());
                        });
                        row.col(|ui| {
                            ui.label(entry.exercise.as_str());
                        });
                        row.col(|ui| {
                            ui.label(format!("{}", entry.weight));
                        });
                        row.col(|ui| {
                            ui.label(entry.reps.to_string());
                        });
                        row.col(|ui| {
                            ui.label(entry.rir.to_string());
                        });
                        row.col(|ui| {
                            ui.label(format!("{:.1}", entry.e1rm));
                        });
                    });
                }
            });
    }

    fn show_trend_display(&mut self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            ui.label("Exercise");
            ui.add(
                egui::TextEdit::singleline(&mut self.exercise)
                    .desired_width(160.0)
                    .hint_text("Squat"),
            );
        });
        ui.add_space(10.0);

        let points = trend_points(self.store.entries(), &self.exercise);
        if points.is_empty() {
            ui.label(
                RichText::new(format!("No sets logged for \"{}\" yet.", self.exercise)).size(20.0),
            );
        }

        let line = Line::new(PlotPoints::from(points)).name("e1RM");
        Plot::new("e1rm_trend")
            .height(360.0)
            .x_axis_label("week")
            .y_axis_label("e1RM (kg)")
            .legend(Legend::default())
            .show(ui, |plot_ui| {
                plot_ui.line(line);
            });
    }

    /// Log the current form as a set. A blank exercise name is ignored.
    fn save_entry(&mut self) {
        if self.exercise.is_empty() {
            return;
        }

        let entry = Entry::logged(self.week, self.exercise.clone(), self.weight, self.reps, self.rir);
        self.suggestion = Some(next_session(&entry));

        match self.store.append(entry) {
            Ok(()) => {
                self.status = Some(format!("Logged set {}", self.store.entries().len()));
            }
            Err(err) => {
                warn!("Could not persist training data: {err}");
                self.status = Some(format!("Saved in memory only: {err}"));
            }
        }
    }

    fn export_entries(&mut self) {
        let result = sheet::export_workbook(self.store.entries())
            .map_err(anyhow::Error::from)
            .and_then(|bytes| fs::write(EXPORT_FILE, bytes).context("could not write export file"));

        match result {
            Ok(()) => {
                info!("Exported {} sets to {EXPORT_FILE}", self.store.entries().len());
                self.status = Some(format!(
                    "Exported {} sets to {EXPORT_FILE}",
                    self.store.entries().len()
                ));
            }
            Err(err) => {
                warn!("Export failed: {err:#}");
                self.status = Some(format!("Export failed: {err:#}"));
            }
        }
    }

    fn import_from_path(&mut self, path: &Path) {
        let outcome = fs::read(path)
            .with_context(|| format!("could not read {}", path.display()))
            .and_then(|bytes| self.import_bytes(&bytes));
        self.report_import(outcome);
    }

    /// The whole file is in memory before the store is touched, so the
    /// replacement is all-or-nothing from the view's perspective.
    fn import_bytes(&mut self, bytes: &[u8]) -> anyhow::Result<usize> {
        let entries = sheet::import_workbook(bytes).context("could not parse spreadsheet")?;
        let count = entries.len();
        self.store
            .replace_all(entries)
            .context("could not persist imported data")?;
        Ok(count)
    }

    fn report_import(&mut self, outcome: anyhow::Result<usize>) {
        match outcome {
            Ok(count) => {
                info!("Imported {count} sets");
                self.status = Some(format!("Imported {count} sets"));
            }
            Err(err) => {
                warn!("Import failed: {err:#}");
                self.status = Some(format!("Import failed: {err:#}"));
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(bytes) = file.bytes {
                let outcome = self.import_bytes(&bytes);
                self.report_import(outcome);
            } else if let Some(path) = file.path {
                if path.extension().map(|ext| ext == "xlsx").unwrap_or(false) {
                    self.import_from_path(&path);
                }
            }
        }
    }
}
