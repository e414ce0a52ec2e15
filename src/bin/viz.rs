use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use gimbal_mixer::gnc::GimbalState;
use gimbal_mixer::io::RunSummary;
use gimbal_mixer::sim::{self, CommandKind, RigidVessel, ScriptEvent, SimConfig, TickRecord};
use gimbal_mixer::vehicle::{presets, ControlDemand};

fn main() -> eframe::Result {
    let gimbal = presets::booster();
    let range = gimbal.gimbal_range;
    let script = [
        ScriptEvent::new(1.0, CommandKind::SetDemand(ControlDemand::pitch(0.5))),
        ScriptEvent::new(2.0, CommandKind::SetDemand(ControlDemand::new(1.0, -0.6, 0.0))),
        ScriptEvent::new(3.0, CommandKind::Toggle),
        ScriptEvent::new(4.0, CommandKind::Toggle),
        ScriptEvent::new(5.0, CommandKind::SetDemand(ControlDemand::new(-2.0, 0.0, 0.0))),
        ScriptEvent::new(6.0, CommandKind::SetDemand(ControlDemand::default())),
    ];
    let config = SimConfig { dt: 0.02, max_time: 8.0 };
    let records = sim::simulate(gimbal, RigidVessel::upright(2.0), &script, &config)
        .unwrap_or_default();

    let summary = RunSummary::from_records(&records, range);
    let app = GimbalViz { records, summary, range };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Gimbal Mixer", options, Box::new(|_| Ok(Box::new(app))))
}

struct GimbalViz {
    records: Vec<TickRecord>,
    summary: RunSummary,
    range: f64,
}

impl eframe::App for GimbalViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading(format!("Gimbal range: {:.1} deg", self.range));
            ui.label(format!(
                "Peak: {:.2} deg  |  Saturated: {} ticks  |  Locked: {} ticks  |  Run: {:.1} s",
                self.summary.peak_deflection_deg,
                self.summary.saturated_ticks,
                self.summary.locked_ticks,
                self.summary.duration_s,
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_h = available.y / 2.0 - 8.0;

            ui.vertical(|ui| {
                ui.label("Deflection from neutral (deg)");
                let defl: PlotPoints = self.records.iter()
                    .map(|r| [r.time, r.deflection_deg])
                    .collect();
                let limit: PlotPoints = self.records.iter()
                    .map(|r| [r.time, self.range])
                    .collect();
                let locked: PlotPoints = self.records.iter()
                    .map(|r| [r.time, if r.state == GimbalState::Locked { self.range } else { 0.0 }])
                    .collect();
                Plot::new("deflection")
                    .height(half_h)
                    .x_axis_label("Time (s)")
                    .show(ui, |plot_ui| {
                        plot_ui.line(Line::new("Deflection", defl));
                        plot_ui.line(Line::new("Range", limit));
                        plot_ui.line(Line::new("Locked", locked));
                    });

                ui.label("Control demand");
                let series = |f: fn(&TickRecord) -> f64| -> PlotPoints {
                    self.records.iter().map(|r| [r.time, f(r)]).collect()
                };
                Plot::new("demand")
                    .height(half_h)
                    .x_axis_label("Time (s)")
                    .show(ui, |plot_ui| {
                        plot_ui.line(Line::new("Pitch", series(|r| r.demand.pitch)));
                        plot_ui.line(Line::new("Yaw", series(|r| r.demand.yaw)));
                        plot_ui.line(Line::new("Roll", series(|r| r.demand.roll)));
                    });
            });
        });
    }
}
