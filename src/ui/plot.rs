use std::f64::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Legend, MarkerShape, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::color::ColorMap;
use crate::figure::{PieFigure, ScatterFigure, Sector};

/// Largest arc drawn as one polygon; egui only fills convex shapes.
const MAX_WEDGE: f64 = 0.25;
const ARC_STEPS_PER_TURN: f64 = 120.0;

// ---------------------------------------------------------------------------
// Outcome pie chart
// ---------------------------------------------------------------------------

/// Render the outcome pie chart.
pub fn pie_chart(ui: &mut Ui, pie: Option<&PieFigure>, height: f32) {
    let Some(pie) = pie else {
        return;
    };
    ui.strong(&pie.title);

    let sectors = pie.sectors();
    if sectors.is_empty() {
        ui.label("No launches match the selected site.");
        return;
    }

    let colors = ColorMap::new(pie.slices.iter().map(|s| s.label.as_str()));

    Plot::new("success_pie_chart")
        .height(height)
        .legend(Legend::default())
        .data_aspect(1.0)
        .include_x(-1.4)
        .include_x(1.4)
        .include_y(-1.1)
        .include_y(1.1)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show(ui, |plot_ui| {
            for sector in &sectors {
                let slice = &pie.slices[sector.slice];
                let color = colors.color_for(&slice.label);

                for wedge in wedge_outlines(sector) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(wedge))
                            .name(&slice.label)
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                }

                let [x, y] = unit_point((sector.start + sector.end) / 2.0, 0.65);
                plot_ui.text(Text::new(
                    PlotPoint::new(x, y),
                    RichText::new(format!("{:.1}%", sector.fraction() * 100.0))
                        .color(Color32::WHITE)
                        .strong(),
                ));
            }
        });
}

/// Split a sector into convex wedges (centre + arc), clockwise from 12 o'clock.
fn wedge_outlines(sector: &Sector) -> Vec<Vec<[f64; 2]>> {
    let mut wedges = Vec::new();
    let mut start = sector.start;
    while start < sector.end {
        let end = (start + MAX_WEDGE).min(sector.end);
        let steps = (((end - start) * ARC_STEPS_PER_TURN).ceil() as usize).max(1);
        let mut outline = Vec::with_capacity(steps + 2);
        outline.push([0.0, 0.0]);
        for i in 0..=steps {
            let t = start + (end - start) * i as f64 / steps as f64;
            outline.push(unit_point(t, 1.0));
        }
        wedges.push(outline);
        start = end;
    }
    wedges
}

/// Point at fraction `t` of a clockwise turn starting at the top.
fn unit_point(t: f64, radius: f64) -> [f64; 2] {
    let angle = FRAC_PI_2 - TAU * t;
    [radius * angle.cos(), radius * angle.sin()]
}

// ---------------------------------------------------------------------------
// Payload vs outcome scatter chart
// ---------------------------------------------------------------------------

/// Render the payload/outcome scatter chart, one series per group.
pub fn scatter_chart(ui: &mut Ui, scatter: Option<&ScatterFigure>, colors: &ColorMap, height: f32) {
    let Some(scatter) = scatter else {
        return;
    };
    ui.strong(&scatter.title);

    Plot::new("success_payload_scatter_chart")
        .height(height)
        .legend(Legend::default())
        .x_axis_label(scatter.x_label.clone())
        .y_axis_label(scatter.y_label.clone())
        .include_x(0.0)
        .include_y(-0.25)
        .include_y(1.25)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for group in scatter.groups() {
                let points: PlotPoints = scatter
                    .points
                    .iter()
                    .filter(|p| p.group == group)
                    .map(|p| [p.x, p.y])
                    .collect();

                plot_ui.points(
                    Points::new(points)
                        .name(group)
                        .color(colors.color_for(group))
                        .shape(MarkerShape::Circle)
                        .filled(true)
                        .radius(4.0),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wedges_never_exceed_a_quarter_turn() {
        let sector = Sector {
            slice: 0,
            start: 0.0,
            end: 0.8,
        };
        let wedges = wedge_outlines(&sector);
        assert_eq!(wedges.len(), 4);
        for wedge in &wedges {
            assert_eq!(wedge[0], [0.0, 0.0]);
        }
    }

    #[test]
    fn pie_starts_at_twelve_o_clock() {
        let [x, y] = unit_point(0.0, 1.0);
        assert!(x.abs() < 1e-12);
        assert!((y - 1.0).abs() < 1e-12);
        let [x, _] = unit_point(0.25, 1.0);
        assert!((x - 1.0).abs() < 1e-12);
    }
}
