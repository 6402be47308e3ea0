//! Chart Plotter Module
//! Interactive visualizations over the current DashboardView using egui_plot.

use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoints, Points};

use crate::stats::CorrelationMatrix;
use crate::view::{GroupBar, ScatterPoint};

/// Color palette keyed by bedroom count (and reused for bars).
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219),  // Blue
    Color32::from_rgb(231, 76, 60),   // Red
    Color32::from_rgb(46, 204, 113),  // Green
    Color32::from_rgb(155, 89, 182),  // Purple
    Color32::from_rgb(243, 156, 18),  // Orange
    Color32::from_rgb(26, 188, 156),  // Teal
    Color32::from_rgb(233, 30, 99),   // Pink
    Color32::from_rgb(0, 188, 212),   // Cyan
    Color32::from_rgb(255, 87, 34),   // Deep Orange
    Color32::from_rgb(121, 85, 72),   // Brown
];

pub fn bedroom_color(bedrooms: i64) -> Color32 {
    PALETTE[(bedrooms.max(0) as usize) % PALETTE.len()]
}

/// Price vs living area: color encodes bedrooms, point size bathrooms.
pub fn draw_scatter(ui: &mut egui::Ui, points: &[ScatterPoint]) {
    // One series per (bedrooms, half-bathroom) pair; same-bedroom series
    // share a legend entry.
    let mut series: Vec<((i64, i64), Vec<[f64; 2]>)> = Vec::new();
    for p in points {
        let key = (p.bedrooms, (p.bathrooms * 2.0).round() as i64);
        match series.iter_mut().find(|(k, _)| *k == key) {
            Some((_, pts)) => pts.push([p.sqft, p.price]),
            None => series.push((key, vec![[p.sqft, p.price]])),
        }
    }
    series.sort_by_key(|(k, _)| *k);

    // Nearest-point lookup so hovering shows the sale's location.
    let hover_points: Vec<([f64; 2], String)> = points
        .iter()
        .map(|p| {
            (
                [p.sqft, p.price],
                format!(
                    "{} ({})\n{:.0} sqft — ${:.0}\n{} bd / {} ba",
                    p.city, p.statezip, p.sqft, p.price, p.bedrooms, p.bathrooms
                ),
            )
        })
        .collect();

    Plot::new("scatter_price_sqft")
        .height(340.0)
        .x_axis_label("Living Area (sqft)")
        .y_axis_label("Price ($)")
        .allow_scroll(false)
        .legend(Legend::default())
        .label_formatter(move |_name, value| {
            hover_points
                .iter()
                .map(|(p, label)| {
                    let dx = p[0] - value.x;
                    let dy = p[1] - value.y;
                    (dx * dx + dy * dy, label)
                })
                .min_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(_, label)| label.clone())
                .unwrap_or_default()
        })
        .show(ui, |plot_ui| {
            for ((bedrooms, bath_halves), pts) in &series {
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(pts.iter().copied()))
                        .radius(point_radius(*bath_halves as f64 / 2.0))
                        .color(bedroom_color(*bedrooms))
                        .name(format!("{} bd", bedrooms)),
                );
            }
        });
}

/// Scatter point size grows with bathroom count, bounded for readability.
fn point_radius(bathrooms: f64) -> f32 {
    (1.5 + bathrooms as f32 * 0.6).clamp(1.5, 5.5)
}

/// Bar chart of grouped means with index-positioned bars and label ticks.
pub fn draw_group_bars(ui: &mut egui::Ui, id: &str, y_label: &str, bars: &[GroupBar]) {
    let labels: Vec<String> = bars.iter().map(|b| b.label.clone()).collect();

    let chart_bars: Vec<Bar> = bars
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Bar::new(i as f64, b.value)
                .width(0.6)
                .fill(PALETTE[i % PALETTE.len()].gamma_multiply(0.8))
        })
        .collect();

    Plot::new(id.to_string())
        .height(280.0)
        .y_axis_label(y_label.to_string())
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_drag(false)
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if idx >= 0.0 && (mark.value - idx).abs() < 1e-6 {
                labels.get(idx as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(chart_bars));
        });
}

/// Correlation heatmap as a colored grid with the coefficient in each cell.
pub fn draw_correlation_grid(ui: &mut egui::Ui, corr: &CorrelationMatrix) {
    egui::Frame::none()
        .fill(ui.visuals().widgets.noninteractive.bg_fill)
        .rounding(5.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            egui::Grid::new("correlation_grid")
                .spacing([4.0, 4.0])
                .min_col_width(64.0)
                .show(ui, |ui| {
                    ui.label("");
                    for name in &corr.columns {
                        ui.label(RichText::new(name).strong().size(11.0));
                    }
                    ui.end_row();

                    for (i, name) in corr.columns.iter().enumerate() {
                        ui.label(RichText::new(name).strong().size(11.0));
                        for &value in &corr.values[i] {
                            draw_correlation_cell(ui, value);
                        }
                        ui.end_row();
                    }
                });
        });
}

fn draw_correlation_cell(ui: &mut egui::Ui, value: f64) {
    let (fill, text) = if value.is_nan() {
        (Color32::from_gray(60), "—".to_string())
    } else {
        (diverging_color(value), format!("{:.2}", value))
    };

    egui::Frame::none()
        .fill(fill)
        .rounding(3.0)
        .inner_margin(egui::Margin::symmetric(10.0, 6.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text).size(11.0).color(Color32::WHITE));
        });
}

/// Blue-white-red scale over [-1, 1].
fn diverging_color(value: f64) -> Color32 {
    let v = value.clamp(-1.0, 1.0);
    if v < 0.0 {
        let t = -v;
        lerp_color(Color32::from_rgb(66, 66, 70), Color32::from_rgb(41, 98, 255), t)
    } else {
        lerp_color(Color32::from_rgb(66, 66, 70), Color32::from_rgb(213, 0, 0), v)
    }
}

fn lerp_color(a: Color32, b: Color32, t: f64) -> Color32 {
    let t = t.clamp(0.0, 1.0) as f32;
    let mix = |x: u8, y: u8| (x as f32 + (y as f32 - x as f32) * t) as u8;
    Color32::from_rgb(mix(a.r(), b.r()), mix(a.g(), b.g()), mix(a.b(), b.b()))
}

#[cfg(test)]
mod tests {
    use super::point_radius;

    #[test]
    fn point_radius_grows_with_bathrooms_within_bounds() {
        assert!(point_radius(1.0) < point_radius(2.5));
        assert_eq!(point_radius(0.0), 1.5);
        assert_eq!(point_radius(50.0), 5.5);
    }
}
