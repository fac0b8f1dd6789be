use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::DatePickerButton;

use crate::data::metrics::Metrics;
use crate::data::model::Weather;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – date range selector
// ---------------------------------------------------------------------------

/// Render the left panel with the date range pickers.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Date Range");
    ui.separator();

    let Some(loaded) = &state.loaded else {
        ui.label("No dataset loaded.");
        return;
    };
    let first = loaded.dataset.min_date();
    let last = loaded.dataset.max_date();

    let mut start = state.picker_start.unwrap_or(first);
    let mut end = state.picker_end.unwrap_or(last);

    egui::Grid::new("date_range_grid")
        .num_columns(2)
        .spacing([8.0, 6.0])
        .show(ui, |ui: &mut Ui| {
            ui.label("From");
            ui.add(
                DatePickerButton::new(&mut start)
                    .id_salt("start_date")
                    .calendar_week(false),
            );
            ui.end_row();

            ui.label("To");
            ui.add(
                DatePickerButton::new(&mut end)
                    .id_salt("end_date")
                    .calendar_week(false),
            );
            ui.end_row();
        });

    let edited = state.picker_start != Some(start) || state.picker_end != Some(end);
    if edited && state.set_date_range(Some(start), Some(end)) {
        log::debug!("date range changed to {start}..{end}");
    }

    ui.add_space(4.0);
    if ui.button("Full range").clicked() {
        state.reset_date_range();
    }

    ui.separator();
    ui.label(format!("Data covers {first} to {last}."));
    if let (Some(s), Some(e)) = (state.picker_start, state.picker_end) {
        if s > e {
            ui.label(
                RichText::new("Start is after end; showing the full range.")
                    .color(Color32::YELLOW),
            );
        }
    }
    if let Some(active) = state.active_range() {
        ui.label(format!(
            "Showing {} to {} ({} days).",
            active.start(),
            active.end(),
            active.days()
        ));
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(loaded) = &state.loaded {
            ui.label(format!(
                "{} records loaded, {} in range",
                loaded.dataset.len(),
                loaded.view.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Metric cards
// ---------------------------------------------------------------------------

/// Format a mean, showing "n/a" when it is undefined.
pub fn format_mean(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.2}")
    }
}

fn metric_card(ui: &mut Ui, label: &str, value: String) {
    ui.group(|ui: &mut Ui| {
        ui.set_min_width(ui.available_width());
        ui.label(RichText::new(label).small());
        ui.label(RichText::new(value).size(24.0).strong());
    });
}

/// Average temperature / humidity and ride totals for the active range.
pub fn metrics_overview(ui: &mut Ui, metrics: &Metrics) {
    ui.heading("Metrics Overview");
    ui.columns(2, |cols| {
        metric_card(
            &mut cols[0],
            "Average Temperature (°C)",
            format_mean(metrics.average_temp_c),
        );
        metric_card(
            &mut cols[1],
            "Average Humidity (%)",
            format_mean(metrics.average_humidity_pct),
        );
    });

    ui.add_space(8.0);
    ui.heading("Total Bike Sharing Orders");
    ui.columns(2, |cols| {
        metric_card(&mut cols[0], "Casual", metrics.total_casual.to_string());
        metric_card(
            &mut cols[1],
            "Registered",
            metrics.total_registered.to_string(),
        );
    });
}

/// Collapsible explanation of the weather categories.
pub fn weather_details(ui: &mut Ui) {
    egui::CollapsingHeader::new("Weather details")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            for weather in Weather::ALL {
                ui.horizontal_wrapped(|ui: &mut Ui| {
                    ui.strong(format!("{}. {}:", weather.code(), weather.label()));
                    ui.label(weather.description());
                });
            }
        });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open bike-sharing data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undefined_means_show_as_not_available() {
        assert_eq!(format_mean(f64::NAN), "n/a");
        assert_eq!(format_mean(12.346), "12.35");
        assert_eq!(format_mean(0.0), "0.00");
    }
}
