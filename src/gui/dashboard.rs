//! Dashboard Widget
//! Central scrollable panel: KPI cards, charts and the raw-data preview.

use egui::{Color32, RichText, ScrollArea};

use crate::gui::charts;
use crate::view::DashboardView;

const ACCENT: Color32 = Color32::from_rgb(100, 149, 237);

pub struct Dashboard;

impl Dashboard {
    pub fn show(ui: &mut egui::Ui, view: &DashboardView) {
        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.add_space(4.0);
                ui.label(
                    RichText::new("🏙 USA Housing Analytics")
                        .size(24.0)
                        .strong()
                        .color(ACCENT),
                );
                ui.label(
                    RichText::new(format!("{} sales match the current filters", view.row_count))
                        .size(12.0)
                        .color(Color32::GRAY),
                );
                ui.add_space(8.0);
                ui.separator();

                Self::kpi_row(ui, view);
                ui.add_space(12.0);
                ui.separator();

                Self::section_title(ui, "📈 Price vs Living Area");
                charts::draw_scatter(ui, &view.scatter);
                ui.add_space(12.0);

                Self::section_title(ui, "🛏 Average Price by Bedrooms");
                charts::draw_group_bars(
                    ui,
                    "bar_price_bedrooms",
                    "Average Price ($)",
                    &view.price_by_bedrooms,
                );
                ui.add_space(12.0);

                Self::section_title(ui, "🗺 Average Price by City (Top 20)");
                charts::draw_group_bars(
                    ui,
                    "bar_price_city",
                    "Average Price ($)",
                    &view.price_by_city,
                );
                ui.add_space(12.0);

                Self::section_title(ui, "📊 Feature Correlation");
                match &view.correlation {
                    Some(corr) => charts::draw_correlation_grid(ui, corr),
                    None => {
                        ui.label(
                            RichText::new("Not enough numeric data to compute correlation.")
                                .color(Color32::GRAY),
                        );
                    }
                }
                ui.add_space(12.0);

                egui::CollapsingHeader::new(RichText::new("🔍 Show filtered raw data").strong())
                    .default_open(false)
                    .show(ui, |ui| {
                        Self::preview_table(ui, view);
                    });
                ui.add_space(12.0);
            });
    }

    fn section_title(ui: &mut egui::Ui, title: &str) {
        ui.label(RichText::new(title).size(16.0).strong());
        ui.add_space(4.0);
    }

    fn kpi_row(ui: &mut egui::Ui, view: &DashboardView) {
        ui.horizontal(|ui| {
            Self::kpi_card(
                ui,
                "Average Price $",
                view.kpis
                    .avg_price
                    .map(thousands)
                    .unwrap_or_else(|| "N/A".to_string()),
            );
            Self::kpi_card(
                ui,
                "Median Area in Sqft",
                view.kpis
                    .median_sqft
                    .map(|v| thousands(v.round() as i64))
                    .unwrap_or_else(|| "N/A".to_string()),
            );
            Self::kpi_card(
                ui,
                "Avg Bedrooms",
                view.kpis
                    .avg_bedrooms
                    .map(|v| format!("{v}"))
                    .unwrap_or_else(|| "N/A".to_string()),
            );
            Self::kpi_card(
                ui,
                "Avg Bathrooms",
                view.kpis
                    .avg_bathrooms
                    .map(|v| format!("{v}"))
                    .unwrap_or_else(|| "N/A".to_string()),
            );
        });
    }

    fn kpi_card(ui: &mut egui::Ui, title: &str, value: String) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(8.0)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_min_width(150.0);
                ui.vertical(|ui| {
                    ui.label(RichText::new(title).size(11.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(20.0).strong());
                });
            });
    }

    fn preview_table(ui: &mut egui::Ui, view: &DashboardView) {
        if view.preview.rows.is_empty() {
            ui.label(RichText::new("No records match.").color(Color32::GRAY));
            return;
        }

        ScrollArea::both()
            .id_salt("preview_table")
            .max_height(320.0)
            .show(ui, |ui| {
                egui::Grid::new("preview_grid")
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([10.0, 3.0])
                    .show(ui, |ui| {
                        for name in &view.preview.columns {
                            ui.label(RichText::new(name).strong().size(11.0));
                        }
                        ui.end_row();

                        for row in &view.preview.rows {
                            for cell in row {
                                ui.label(RichText::new(cell).size(11.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

/// Group digits with commas: 1234567 → "1,234,567".
fn thousands(n: i64) -> String {
    let digits = n.abs().to_string();
    let mut out = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if n < 0 {
        format!("-{out}")
    } else {
        out
    }
}

#[cfg(test)]
mod tests {
    use super::thousands;

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(500), "500");
        assert_eq!(thousands(2140), "2,140");
        assert_eq!(thousands(1234567), "1,234,567");
        assert_eq!(thousands(-42000), "-42,000");
    }
}
