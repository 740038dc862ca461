use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::color::ColorMap;
use crate::figure::ScatterFigure;

const ROW_HEIGHT: f32 = 18.0;

/// List the launches currently plotted on the scatter chart.
pub fn rows_table(ui: &mut Ui, scatter: Option<&ScatterFigure>, colors: &ColorMap) {
    let Some(scatter) = scatter else {
        return;
    };

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(40.0))
        .column(Column::auto().at_least(140.0))
        .column(Column::auto().at_least(60.0))
        .column(Column::remainder())
        .header(ROW_HEIGHT + 2.0, |mut header| {
            header.col(|ui| {
                ui.strong("#");
            });
            header.col(|ui| {
                ui.strong(&scatter.x_label);
            });
            header.col(|ui| {
                ui.strong(&scatter.y_label);
            });
            header.col(|ui| {
                ui.strong("Group");
            });
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, scatter.points.len(), |mut row| {
                let index = row.index();
                let point = &scatter.points[index];
                row.col(|ui| {
                    ui.label((index + 1).to_string());
                });
                row.col(|ui| {
                    ui.label(format!("{:.1}", point.x));
                });
                row.col(|ui| {
                    ui.label(format!("{}", point.y));
                });
                row.col(|ui| {
                    ui.label(RichText::new(&point.group).color(colors.color_for(&point.group)));
                });
            });
        });
}
