use chrono::{Datelike, NaiveDate};
use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints};

use crate::color::{generate_palette, ColorMap};
use crate::data::metrics::{Metrics, Patterns};
use crate::data::model::{Weather, WorkingDay};

/// Hue of the first colour in every palette below: orange, then blue.
const HUE_OFFSET: f32 = 30.0;
const CHART_HEIGHT: f32 = 280.0;

// ---------------------------------------------------------------------------
// Axis helpers
// ---------------------------------------------------------------------------

/// Dates are plotted as days since 0001-01-01.
fn date_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_date_label(x: f64) -> String {
    if (x - x.round()).abs() > 1e-6 {
        return String::new();
    }
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Label integer positions `0..labels.len()` with category names.
fn category_label(labels: &[&str], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels
        .get(idx as usize)
        .map(|s| s.to_string())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Casual vs registered over time (filtered)
// ---------------------------------------------------------------------------

pub fn daily_plot(ui: &mut Ui, metrics: &Metrics) {
    let colors = generate_palette(2, HUE_OFFSET);

    let casual: PlotPoints = metrics
        .daily
        .iter()
        .map(|d| [date_to_x(d.date), d.casual as f64])
        .collect();
    let registered: PlotPoints = metrics
        .daily
        .iter()
        .map(|d| [date_to_x(d.date), d.registered as f64])
        .collect();

    Plot::new("daily_plot")
        .legend(Legend::default())
        .height(CHART_HEIGHT)
        .x_axis_label("Date")
        .y_axis_label("Bike rentals")
        .x_axis_formatter(|mark: GridMark, _range| x_to_date_label(mark.value))
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.line(Line::new(casual).name("Casual").color(colors[0]).width(2.0));
            plot_ui.line(
                Line::new(registered)
                    .name("Registered")
                    .color(colors[1])
                    .width(2.0),
            );
        });
}

// ---------------------------------------------------------------------------
// Average rentals: working vs non-working day (filtered)
// ---------------------------------------------------------------------------

pub fn working_day_bars(ui: &mut Ui, metrics: &Metrics) {
    let colors = ColorMap::new(&WorkingDay::ALL, HUE_OFFSET);

    let bars: Vec<Bar> = WorkingDay::ALL
        .iter()
        .enumerate()
        .filter_map(|(i, &day)| {
            let mean = *metrics.by_working_day.get(&day)?;
            Some(
                Bar::new(i as f64, mean)
                    .name(day.label())
                    .fill(colors.color_for(day))
                    .width(0.6),
            )
        })
        .collect();

    let labels = WorkingDay::ALL.map(WorkingDay::label);
    Plot::new("working_day_bars")
        .height(CHART_HEIGHT)
        .x_axis_label("Day type")
        .y_axis_label("Average rentals per hour")
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Average rentals"));
        });
}

// ---------------------------------------------------------------------------
// Hourly pattern per day type (whole dataset)
// ---------------------------------------------------------------------------

pub fn hourly_plots(ui: &mut Ui, patterns: &Patterns) {
    let colors = ColorMap::new(&WorkingDay::ALL, HUE_OFFSET);

    ui.columns(2, |cols| {
        for (col, day) in cols.iter_mut().zip(WorkingDay::ALL) {
            col.strong(day.label());

            let points: PlotPoints = patterns
                .hourly(day)
                .into_iter()
                .map(|(hour, mean)| [hour as f64, mean])
                .collect();

            Plot::new(("hourly_plot", day))
                .height(CHART_HEIGHT * 0.8)
                .x_axis_label("Hour")
                .y_axis_label("Average rentals")
                .include_x(0.0)
                .include_x(23.0)
                .allow_scroll(false)
                .show(col, |plot_ui| {
                    plot_ui.line(
                        Line::new(points)
                            .name(day.label())
                            .color(colors.color_for(day))
                            .width(2.0),
                    );
                });
        }
    });
}

// ---------------------------------------------------------------------------
// Average rentals per weather category (whole dataset)
// ---------------------------------------------------------------------------

pub fn weather_bars(ui: &mut Ui, patterns: &Patterns) {
    let colors = ColorMap::new(&Weather::ALL, 200.0);

    let bars: Vec<Bar> = Weather::ALL
        .iter()
        .enumerate()
        .filter_map(|(i, &weather)| {
            let mean = *patterns.by_weather.get(&weather)?;
            Some(
                Bar::new(i as f64, mean)
                    .name(weather.label())
                    .fill(colors.color_for(weather))
                    .width(0.6),
            )
        })
        .collect();

    let labels = Weather::ALL.map(Weather::label);
    Plot::new("weather_bars")
        .height(CHART_HEIGHT)
        .x_axis_label("Weather")
        .y_axis_label("Average rentals")
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&labels, mark.value))
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Average rentals"));
        });
}
