use eframe::egui::{self, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BikeDashboardApp {
    pub state: AppState,
}

impl BikeDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for BikeDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: date range ----
        egui::SidePanel::left("date_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            dashboard(ui, &self.state);
        });
    }
}

fn dashboard(ui: &mut Ui, state: &AppState) {
    let Some(loaded) = &state.loaded else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view rentals  (File → Open…)");
        });
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Bike Sharing Dataset");
            ui.separator();

            if loaded.view.is_empty() {
                ui.label("No records fall inside the selected range.");
            }
            panels::metrics_overview(ui, &loaded.metrics);
            ui.add_space(12.0);

            ui.heading("Casual vs Registered Users Over Time");
            plot::daily_plot(ui, &loaded.metrics);
            ui.add_space(12.0);

            ui.heading("Average Hourly Rentals: Working vs Non-Working Days");
            plot::working_day_bars(ui, &loaded.metrics);
            ui.add_space(12.0);

            // The charts below use the whole dataset, not the selected range.
            ui.heading("Hourly Rental Pattern by Day Type");
            plot::hourly_plots(ui, &loaded.patterns);
            ui.add_space(12.0);

            ui.heading("Effect of Weather on Rentals");
            plot::weather_bars(ui, &loaded.patterns);
            panels::weather_details(ui);
        });
}
