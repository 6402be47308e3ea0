//! Hometrics Main Application
//! Sidebar filters on the left, dashboard on the right. Every filter change
//! triggers one synchronous recompute of the view pipeline; the dataset
//! itself is loaded once and shared read-only.

use egui::SidePanel;
use polars::prelude::DataFrame;

use crate::data::filter::FilterOptions;
use crate::gui::{Dashboard, FilterAction, FilterPanel};
use crate::view::{build_view, DashboardView};

pub struct HometricsApp {
    dataset: &'static DataFrame,
    panel: FilterPanel,
    view: DashboardView,
    error: Option<String>,
}

impl HometricsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, dataset: &'static DataFrame) -> Self {
        let panel = FilterPanel::new(FilterOptions::from_dataframe(dataset));
        let mut app = Self {
            dataset,
            panel,
            view: DashboardView::default(),
            error: None,
        };
        app.recompute();
        app
    }

    /// Re-run the filter-and-aggregate pipeline for the current constraints.
    fn recompute(&mut self) {
        match build_view(self.dataset, &self.panel.constraints) {
            Ok(view) => {
                log::debug!("recomputed view: {} rows", view.row_count);
                self.view = view;
                self.error = None;
            }
            Err(e) => {
                log::error!("recompute failed: {e}");
                self.error = Some(e.to_string());
            }
        }
    }
}

impl eframe::App for HometricsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        SidePanel::left("filter_panel")
            .min_width(240.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                if self.panel.show(ui) == FilterAction::Changed {
                    self.recompute();
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(error) = &self.error {
                ui.colored_label(egui::Color32::from_rgb(220, 53, 69), error);
                return;
            }
            Dashboard::show(ui, &self.view);
        });
    }
}
