use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SpaceXDashApp {
    pub state: AppState,
}

impl SpaceXDashApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SpaceXDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &self.state);
        });

        // ---- Left side panel: site + payload selection ----
        egui::SidePanel::left("selection_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: launches in the scatter chart ----
        egui::TopBottomPanel::bottom("rows_panel")
            .resizable(true)
            .default_height(180.0)
            .show(ctx, |ui| {
                table::rows_table(ui, self.state.scatter(), &self.state.scatter_colors);
            });

        // ---- Central panel: pie above scatter ----
        egui::CentralPanel::default().show(ctx, |ui| {
            let chart_height = ((ui.available_height() - 60.0) / 2.0).max(160.0);
            plot::pie_chart(ui, self.state.pie(), chart_height);
            ui.separator();
            plot::scatter_chart(
                ui,
                self.state.scatter(),
                &self.state.scatter_colors,
                chart_height,
            );
        });
    }
}
