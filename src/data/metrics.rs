//! The filter-and-aggregate pipeline behind every number and chart.
//!
//! [`compute`] is re-run on each date-range change and only looks at the
//! filtered view. [`Patterns`] covers the whole dataset and is built once per
//! load: the hourly and weather charts do not follow the date selector.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::filter::{filter_view, DateRange, FilteredView};
use super::model::{Dataset, Record, Weather, WorkingDay};

/// `temp` is normalized by the dataset's maximum of 41 °C.
pub const TEMP_SCALE_C: f64 = 41.0;
/// `hum` is a fraction; the dashboard shows percent.
pub const HUMIDITY_SCALE_PCT: f64 = 100.0;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Casual and registered rides summed over one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyTotals {
    pub date: NaiveDate,
    pub casual: u64,
    pub registered: u64,
}

/// Everything derived from a filtered view.
///
/// Means are `NaN` when the view is empty; sums are zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub average_temp_c: f64,
    pub average_humidity_pct: f64,
    pub total_casual: u64,
    pub total_registered: u64,
    /// One entry per date present in the view, ascending.
    pub daily: Vec<DailyTotals>,
    /// Mean `total_count` per working-day flag, filtered.
    pub by_working_day: BTreeMap<WorkingDay, f64>,
}

/// Whole-dataset averages, independent of the date selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Patterns {
    pub by_working_day: BTreeMap<WorkingDay, f64>,
    pub by_working_day_hour: BTreeMap<(WorkingDay, u8), f64>,
    pub by_weather: BTreeMap<Weather, f64>,
}

impl Patterns {
    /// `(hour, mean count)` for one kind of day, ordered by hour.
    pub fn hourly(&self, day: WorkingDay) -> Vec<(u8, f64)> {
        self.by_working_day_hour
            .range((day, u8::MIN)..=(day, u8::MAX))
            .map(|(&(_, hour), &mean)| (hour, mean))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Filter `dataset` to `range` and aggregate the result.
pub fn compute(dataset: &Dataset, range: DateRange) -> (FilteredView, Metrics) {
    let view = filter_view(dataset, range);
    let metrics = summarize(view.records(dataset));
    log::debug!(
        "computed metrics for {}..{}: {} of {} records",
        range.start(),
        range.end(),
        view.len(),
        dataset.len()
    );
    (view, metrics)
}

/// Aggregate an arbitrary run of records.
pub fn summarize<'a>(records: impl Iterator<Item = &'a Record>) -> Metrics {
    let mut temp = Mean::default();
    let mut humidity = Mean::default();
    let mut total_casual = 0;
    let mut total_registered = 0;
    let mut daily: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
    let mut by_working_day: BTreeMap<WorkingDay, Mean> = BTreeMap::new();

    for rec in records {
        temp.push(rec.temp_norm);
        humidity.push(rec.humidity_norm);
        total_casual += rec.casual_count;
        total_registered += rec.registered_count;

        let day = daily.entry(rec.date).or_default();
        day.0 += rec.casual_count;
        day.1 += rec.registered_count;

        by_working_day
            .entry(rec.working_day)
            .or_default()
            .push(rec.total_count as f64);
    }

    Metrics {
        average_temp_c: temp.value() * TEMP_SCALE_C,
        average_humidity_pct: humidity.value() * HUMIDITY_SCALE_PCT,
        total_casual,
        total_registered,
        daily: daily
            .into_iter()
            .map(|(date, (casual, registered))| DailyTotals {
                date,
                casual,
                registered,
            })
            .collect(),
        by_working_day: finish(by_working_day),
    }
}

/// Group means of `total_count` over the whole dataset.
pub fn patterns(dataset: &Dataset) -> Patterns {
    let records = dataset.records();
    Patterns {
        by_working_day: group_mean(records.iter().map(|r| (r.working_day, r.total_count))),
        by_working_day_hour: group_mean(
            records
                .iter()
                .map(|r| ((r.working_day, r.hour), r.total_count)),
        ),
        by_weather: group_mean(records.iter().map(|r| (r.weather, r.total_count))),
    }
}

// ---------------------------------------------------------------------------
// Arithmetic helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, v: f64) {
        self.sum += v;
        self.count += 1;
    }

    /// `NaN` for no samples.
    fn value(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

fn group_mean<K: Ord>(rows: impl Iterator<Item = (K, u64)>) -> BTreeMap<K, f64> {
    let mut groups: BTreeMap<K, Mean> = BTreeMap::new();
    for (key, count) in rows {
        groups.entry(key).or_default().push(count as f64);
    }
    finish(groups)
}

fn finish<K: Ord>(groups: BTreeMap<K, Mean>) -> BTreeMap<K, f64> {
    groups.into_iter().map(|(k, m)| (k, m.value())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::resolve_range;
    use crate::data::model::tests::{day, record};

    fn three_days() -> Dataset {
        Dataset::new(vec![
            record(day(1), 0, 5, 100),
            record(day(2), 0, 10, 200),
            record(day(3), 0, 15, 300),
        ])
        .unwrap()
    }

    fn mixed() -> Dataset {
        let mut rows = Vec::new();
        for (d, wd, weather, hour, cnt) in [
            (1, WorkingDay::NonWorking, Weather::Clear, 8, 10),
            (1, WorkingDay::NonWorking, Weather::Mist, 9, 20),
            (2, WorkingDay::Working, Weather::Clear, 8, 100),
            (2, WorkingDay::Working, Weather::LightRain, 9, 40),
            (3, WorkingDay::Working, Weather::Clear, 8, 60),
            (3, WorkingDay::Working, Weather::Mist, 17, 90),
        ] {
            let mut r = record(day(d), hour, 1, 2);
            r.working_day = wd;
            r.weather = weather;
            r.total_count = cnt;
            rows.push(r);
        }
        Dataset::new(rows).unwrap()
    }

    #[test]
    fn two_of_three_days() {
        let ds = three_days();
        let range = DateRange::new(day(1), day(2)).unwrap();
        let (view, m) = compute(&ds, range);
        assert_eq!(view.indices, vec![0, 1]);
        assert_eq!(m.total_casual, 15);
        assert_eq!(m.total_registered, 300);
    }

    #[test]
    fn scalar_means_are_denormalized() {
        let mut rows = vec![record(day(1), 0, 0, 0), record(day(1), 1, 0, 0)];
        rows[0].temp_norm = 0.2;
        rows[1].temp_norm = 0.4;
        rows[0].humidity_norm = 0.5;
        rows[1].humidity_norm = 0.7;
        let ds = Dataset::new(rows).unwrap();
        let (_, m) = compute(&ds, DateRange::full(&ds));
        assert!((m.average_temp_c - 0.3 * 41.0).abs() < 1e-9);
        assert!((m.average_humidity_pct - 60.0).abs() < 1e-9);
    }

    #[test]
    fn full_range_fallback_matches_explicit_bounds() {
        let ds = mixed();
        let explicit = resolve_range(&ds, Some(ds.min_date()), Some(ds.max_date()));
        let fallback = resolve_range(&ds, None, None);
        assert_eq!(compute(&ds, explicit), compute(&ds, fallback));
    }

    #[test]
    fn empty_view_has_nan_means_and_zero_sums() {
        let ds = three_days();
        let range = DateRange::new(day(20), day(21)).unwrap();
        let (view, m) = compute(&ds, range);
        assert!(view.is_empty());
        assert_eq!(m.total_casual, 0);
        assert_eq!(m.total_registered, 0);
        assert!(m.average_temp_c.is_nan());
        assert!(m.average_humidity_pct.is_nan());
        assert!(m.daily.is_empty());
        assert!(m.by_working_day.is_empty());
    }

    #[test]
    fn totals_are_independent_of_casual_and_registered() {
        let mut rows = vec![record(day(1), 0, 3, 4)];
        rows[0].total_count = 100;
        let ds = Dataset::new(rows).unwrap();
        let (_, m) = compute(&ds, DateRange::full(&ds));
        assert_eq!(m.total_casual + m.total_registered, 7);
        assert_eq!(m.by_working_day[&WorkingDay::Working], 100.0);
    }

    #[test]
    fn daily_totals_sum_each_date() {
        let ds = Dataset::new(vec![
            record(day(2), 0, 1, 10),
            record(day(1), 0, 2, 20),
            record(day(2), 1, 3, 30),
        ])
        .unwrap();
        let (_, m) = compute(&ds, DateRange::full(&ds));
        assert_eq!(
            m.daily,
            vec![
                DailyTotals { date: day(1), casual: 2, registered: 20 },
                DailyTotals { date: day(2), casual: 4, registered: 40 },
            ]
        );
    }

    #[test]
    fn filtered_working_day_means_follow_the_range() {
        let ds = mixed();
        let (_, all) = compute(&ds, DateRange::full(&ds));
        assert_eq!(all.by_working_day[&WorkingDay::NonWorking], 15.0);
        assert_eq!(all.by_working_day[&WorkingDay::Working], 72.5);

        let (_, first) = compute(&ds, DateRange::new(day(1), day(1)).unwrap());
        assert_eq!(first.by_working_day.len(), 1);
        assert_eq!(first.by_working_day[&WorkingDay::NonWorking], 15.0);
    }

    #[test]
    fn patterns_cover_the_whole_dataset() {
        let ds = mixed();
        let p = patterns(&ds);

        assert_eq!(p.by_working_day[&WorkingDay::NonWorking], 15.0);
        assert_eq!(p.by_working_day[&WorkingDay::Working], 72.5);

        assert_eq!(p.by_weather[&Weather::Clear], 170.0 / 3.0);
        assert_eq!(p.by_weather[&Weather::Mist], 55.0);
        assert_eq!(p.by_weather[&Weather::LightRain], 40.0);
        assert!(!p.by_weather.contains_key(&Weather::HeavyRain));

        assert_eq!(p.hourly(WorkingDay::NonWorking), vec![(8, 10.0), (9, 20.0)]);
        assert_eq!(
            p.hourly(WorkingDay::Working),
            vec![(8, 80.0), (9, 40.0), (17, 90.0)]
        );
    }
}
