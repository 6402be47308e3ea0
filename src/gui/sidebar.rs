//! Filter Panel Widget
//! Left side panel holding the constraint widgets. Owns the live
//! `ConstraintSet`; reports when the selection changed so the app can
//! recompute the view.

use egui::{Color32, RichText, ScrollArea, Slider};
use std::collections::BTreeSet;
use std::fmt::Display;

use crate::data::filter::{ConstraintSet, FilterOptions};

/// What the panel wants the app to do after drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    None,
    /// Constraints changed; recompute the dashboard view.
    Changed,
}

pub struct FilterPanel {
    pub options: FilterOptions,
    pub constraints: ConstraintSet,
}

impl FilterPanel {
    pub fn new(options: FilterOptions) -> Self {
        let constraints = ConstraintSet::unrestricted(&options);
        Self {
            options,
            constraints,
        }
    }

    pub fn show(&mut self, ui: &mut egui::Ui) -> FilterAction {
        let mut changed = false;

        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🏠 Filters")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(8.0);
        ui.separator();

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                changed |= self.price_sliders(ui);
                ui.separator();

                let bedroom_values = self.options.bedrooms.clone();
                changed |= Self::membership_section(
                    ui,
                    "Bedrooms",
                    &bedroom_values,
                    &mut self.constraints.bedrooms_in,
                );

                let bathroom_values = self.options.bathrooms.clone();
                changed |= Self::membership_section(
                    ui,
                    "Bathrooms",
                    &bathroom_values,
                    &mut self.constraints.bathrooms_in,
                );

                let cities = self.options.cities.clone();
                changed |=
                    Self::membership_section(ui, "City", &cities, &mut self.constraints.city_in);

                let statezips = self.options.statezips.clone();
                changed |= Self::membership_section(
                    ui,
                    "State / Zip",
                    &statezips,
                    &mut self.constraints.statezip_in,
                );

                ui.separator();
                changed |= self.year_sliders(ui);

                ui.separator();
                ui.add_space(4.0);
                if ui.button("Reset filters").clicked() {
                    self.constraints = ConstraintSet::unrestricted(&self.options);
                    changed = true;
                }
            });

        if changed {
            FilterAction::Changed
        } else {
            FilterAction::None
        }
    }

    fn price_sliders(&mut self, ui: &mut egui::Ui) -> bool {
        let mut changed = false;
        let (bound_lo, bound_hi) = (self.options.price_min, self.options.price_max);
        let (mut lo, mut hi) = self.constraints.price_range;

        ui.strong("Price range");
        changed |= ui
            .add(Slider::new(&mut lo, bound_lo..=bound_hi).text("min"))
            .changed();
        changed |= ui
            .add(Slider::new(&mut hi, bound_lo..=bound_hi).text("max"))
            .changed();

        // Keep the bounds ordered when one slider crosses the other.
        if lo > hi {
            hi = lo;
        }
        self.constraints.price_range = (lo, hi);
        changed
    }

    fn year_sliders(&mut self, ui: &mut egui::Ui) -> bool {
        let Some((bound_lo, bound_hi)) = self.options.year_span else {
            return false;
        };

        if bound_lo == bound_hi {
            ui.label(
                RichText::new(format!("📅 Data available only for year {bound_lo}"))
                    .size(11.0)
                    .color(Color32::GRAY),
            );
            return false;
        }

        let mut changed = false;
        let (mut lo, mut hi) = self.constraints.year_range.unwrap_or((bound_lo, bound_hi));

        ui.strong("Year range");
        changed |= ui
            .add(Slider::new(&mut lo, bound_lo..=bound_hi).text("from"))
            .changed();
        changed |= ui
            .add(Slider::new(&mut hi, bound_lo..=bound_hi).text("to"))
            .changed();

        if lo > hi {
            hi = lo;
        }
        // The full span means "no year filter", keeping records whose
        // date never parsed visible.
        self.constraints.year_range = if (lo, hi) == (bound_lo, bound_hi) {
            None
        } else {
            Some((lo, hi))
        };
        changed
    }

    /// Collapsible checkbox list over a set-membership constraint.
    /// No boxes checked means "no restriction"; Clear returns to that state.
    fn membership_section<T: Clone + Ord + Display>(
        ui: &mut egui::Ui,
        title: &str,
        values: &[T],
        selected: &mut BTreeSet<T>,
    ) -> bool {
        let mut changed = false;

        let header = if selected.is_empty() {
            format!("{title}  (any)")
        } else {
            format!("{title}  ({}/{})", selected.len(), values.len())
        };

        egui::CollapsingHeader::new(RichText::new(header).strong())
            .id_salt(title)
            .default_open(false)
            .show(ui, |ui| {
                if ui.small_button("Clear").clicked() && !selected.is_empty() {
                    selected.clear();
                    changed = true;
                }

                ScrollArea::vertical()
                    .id_salt(format!("{title}_list"))
                    .max_height(140.0)
                    .show(ui, |ui| {
                        for value in values {
                            let mut checked = selected.contains(value);
                            if ui.checkbox(&mut checked, value.to_string()).changed() {
                                if checked {
                                    selected.insert(value.clone());
                                } else {
                                    selected.remove(value);
                                }
                                changed = true;
                            }
                        }
                    });
            });

        changed
    }
}
