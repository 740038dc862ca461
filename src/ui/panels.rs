use eframe::egui::{self, Ui};

use crate::data::model::SiteSelection;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left panel: site dropdown, payload range, dataset summary.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Launch Site");
    ui.separator();

    let mut chosen = state.selection.site.clone();
    let selected_text = state.config.site_label(chosen.as_value()).to_string();
    egui::ComboBox::from_id_salt("site_dropdown")
        .selected_text(selected_text)
        .width(ui.available_width())
        .show_ui(ui, |ui: &mut Ui| {
            for option in &state.config.site_options {
                ui.selectable_value(
                    &mut chosen,
                    SiteSelection::from(option.value.as_str()),
                    &option.label,
                );
            }
        });
    state.set_site(chosen);

    ui.add_space(12.0);
    ui.strong("Payload range (Kg):");

    // Two sliders stand in for a range slider; each keeps the pair ordered.
    let limits = state.config.slider;
    let mut range = state.selection.payload_range;
    let low_changed = ui
        .add(
            egui::Slider::new(&mut range.low, limits.min..=limits.max)
                .step_by(limits.step)
                .text("min"),
        )
        .changed();
    let high_changed = ui
        .add(
            egui::Slider::new(&mut range.high, limits.min..=limits.max)
                .step_by(limits.step)
                .text("max"),
        )
        .changed();
    if low_changed && range.low > range.high {
        range.high = range.low;
    }
    if high_changed && range.high < range.low {
        range.low = range.high;
    }
    if low_changed || high_changed {
        state.set_payload_range(range);
    }

    ui.add_space(12.0);
    ui.separator();

    let ds = &state.dataset;
    ui.label(format!("{} launches, {} sites", ds.len(), ds.sites().len()));
    match ds.payload_bounds() {
        Some(bounds) => {
            ui.label(format!(
                "Payload {:.0} – {:.0} kg",
                bounds.low, bounds.high
            ));
        }
        None => {
            ui.label("No launch records loaded.");
        }
    }
    if let Some(addr) = state.http_address {
        ui.hyperlink_to(format!("API: http://{addr}"), format!("http://{addr}/api/dataset"));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with the current selection summary.
pub fn top_bar(ui: &mut Ui, state: &AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(
            egui::RichText::new("SpaceX Launch Records Dashboard")
                .size(28.0)
                .color(egui::Color32::from_rgb(0x50, 0x3D, 0x36)),
        );
    });

    ui.horizontal(|ui: &mut Ui| {
        let site = state.config.site_label(state.selection.site.as_value());
        let visible = state.scatter().map(|s| s.points.len()).unwrap_or(0);
        ui.label(format!(
            "{site} · {visible} of {} launches in payload range",
            state.dataset.len()
        ));
    });
}
