use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;
use tokio::runtime::Handle;

use crate::app::AppState;

const REFRESH_INTERVAL: Duration = Duration::from_secs(1);
const STATUS_LIFETIME: Duration = Duration::from_secs(3);

/// The counter window: live count, lifetime total, and the
/// Save / Reset / Post buttons.
pub struct CounterWindow {
    state: Arc<AppState>,
    rt: Handle,
    status: Option<(String, Instant)>,
}

impl CounterWindow {
    fn new(state: Arc<AppState>, rt: Handle) -> Self {
        Self {
            state,
            rt,
            status: None,
        }
    }

    fn show_status(&mut self, msg: impl Into<String>) {
        self.status = Some((msg.into(), Instant::now()));
    }

    fn save_clicked(&mut self) {
        match self.state.save_snapshot() {
            Ok(()) => self.show_status("Saved"),
            Err(e) => {
                log::error!("save failed: {:#}", e);
                self.show_status(format!("Save failed: {}", e));
            }
        }
    }

    fn post_clicked(&mut self) {
        let count = self.state.count();
        let reporter = Arc::clone(&self.state.reporter);

        // The request runs on the runtime so the window stays responsive;
        // report failures are logged, never surfaced.
        self.rt.spawn(async move {
            reporter.post(count).await;
        });

        self.show_status(if self.state.reporter.is_configured() {
            "Posted"
        } else {
            "No report URL configured"
        });
    }
}

impl eframe::App for CounterWindow {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Expire the transient status message.
        if let Some((_, shown_at)) = &self.status {
            if shown_at.elapsed() >= STATUS_LIFETIME {
                self.status = None;
            }
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::Grid::new("counters").spacing([16.0, 8.0]).show(ui, |ui| {
                ui.label("Characters pressed:");
                ui.label(egui::RichText::new(self.state.count().to_string()).strong());
                ui.end_row();

                ui.label("Total (so far):");
                ui.label(self.state.total().to_string());
                ui.end_row();
            });

            ui.add_space(8.0);

            ui.horizontal(|ui| {
                if ui.button("Save").clicked() {
                    self.save_clicked();
                }
                if ui.button("Reset").clicked() {
                    self.state.reset();
                }
                if ui.button("Post").clicked() {
                    self.post_clicked();
                }
            });

            if let Some((msg, _)) = &self.status {
                ui.add_space(4.0);
                ui.label(egui::RichText::new(msg).size(11.0).weak());
            }
        });

        // The displayed count follows the live counter at a one-second
        // cadence; repaints stop with the window.
        ctx.request_repaint_after(REFRESH_INTERVAL);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Final flush so the session's count survives the window closing.
        if let Err(e) = self.state.save_snapshot() {
            log::error!("final save failed: {:#}", e);
        }
    }
}

pub fn run(state: Arc<AppState>, rt: Handle) -> eframe::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([250.0, 150.0])
            .with_resizable(false),
        ..Default::default()
    };

    eframe::run_native(
        "Keystroke Counter",
        native_options,
        Box::new(move |_cc| Ok(Box::new(CounterWindow::new(state, rt)))),
    )
}
