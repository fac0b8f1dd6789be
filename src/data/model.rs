use std::fmt;

use chrono::NaiveDate;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Categorical codes
// ---------------------------------------------------------------------------

/// A raw categorical code that has no label in the dataset's convention.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryError {
    #[error("unknown working-day code {0} (expected 0 or 1)")]
    WorkingDay(i64),
    #[error("unknown weather code {0} (expected 1 to 4)")]
    Weather(i64),
}

/// The `workingday` flag: weekends and holidays are non-working days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WorkingDay {
    NonWorking,
    Working,
}

impl WorkingDay {
    pub const ALL: [WorkingDay; 2] = [WorkingDay::NonWorking, WorkingDay::Working];

    pub fn label(self) -> &'static str {
        match self {
            WorkingDay::NonWorking => "Non-Working Day",
            WorkingDay::Working => "Working Day",
        }
    }
}

impl TryFrom<i64> for WorkingDay {
    type Error = CategoryError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(WorkingDay::NonWorking),
            1 => Ok(WorkingDay::Working),
            other => Err(CategoryError::WorkingDay(other)),
        }
    }
}

impl fmt::Display for WorkingDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The `weathersit` category, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weather {
    Clear,
    Mist,
    LightRain,
    HeavyRain,
}

impl Weather {
    pub const ALL: [Weather; 4] = [
        Weather::Clear,
        Weather::Mist,
        Weather::LightRain,
        Weather::HeavyRain,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::Mist => "Mist",
            Weather::LightRain => "Light Rain",
            Weather::HeavyRain => "Heavy Rain",
        }
    }

    /// Short explanation shown next to the weather chart.
    pub fn description(self) -> &'static str {
        match self {
            Weather::Clear => {
                "Sunny with few or no clouds; usually the busiest riding weather."
            }
            Weather::Mist => "Foggy or misty; lower visibility but riding is barely affected.",
            Weather::LightRain => {
                "Light rain or snow; some riders stay home but most trips still happen."
            }
            Weather::HeavyRain => "Heavy rain, storms or snow; rentals drop sharply.",
        }
    }

    /// The code used in the source data (1-based).
    pub fn code(self) -> i64 {
        match self {
            Weather::Clear => 1,
            Weather::Mist => 2,
            Weather::LightRain => 3,
            Weather::HeavyRain => 4,
        }
    }
}

impl TryFrom<i64> for Weather {
    type Error = CategoryError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Weather::Clear),
            2 => Ok(Weather::Mist),
            3 => Ok(Weather::LightRain),
            4 => Ok(Weather::HeavyRain),
            other => Err(CategoryError::Weather(other)),
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the source table
// ---------------------------------------------------------------------------

/// A single hourly rental observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub date: NaiveDate,
    /// Hour of day, 0..=23.
    pub hour: u8,
    /// Normalized temperature in `[0, 1]`.
    pub temp_norm: f64,
    /// Normalized relative humidity in `[0, 1]`.
    pub humidity_norm: f64,
    pub casual_count: u64,
    pub registered_count: u64,
    /// Authoritative total; not checked against casual + registered.
    pub total_count: u64,
    pub working_day: WorkingDay,
    pub weather: Weather,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatasetError {
    #[error("dataset contains no records")]
    Empty,
}

/// The full parsed dataset. Immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<Record>,
    min_date: NaiveDate,
    max_date: NaiveDate,
}

impl Dataset {
    /// Wrap loaded records, caching the date span.
    pub fn new(records: Vec<Record>) -> Result<Self, DatasetError> {
        let mut dates = records.iter().map(|r| r.date);
        let first = dates.next().ok_or(DatasetError::Empty)?;
        let (min_date, max_date) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));

        Ok(Dataset {
            records,
            min_date,
            max_date,
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn min_date(&self) -> NaiveDate {
        self.min_date
    }

    pub fn max_date(&self) -> NaiveDate {
        self.max_date
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 1, d).unwrap()
    }

    pub(crate) fn record(date: NaiveDate, hour: u8, casual: u64, registered: u64) -> Record {
        Record {
            date,
            hour,
            temp_norm: 0.5,
            humidity_norm: 0.5,
            casual_count: casual,
            registered_count: registered,
            total_count: casual + registered,
            working_day: WorkingDay::Working,
            weather: Weather::Clear,
        }
    }

    #[test]
    fn empty_dataset_is_rejected() {
        assert_eq!(Dataset::new(Vec::new()).unwrap_err(), DatasetError::Empty);
    }

    #[test]
    fn date_span_ignores_row_order() {
        let ds = Dataset::new(vec![
            record(day(5), 0, 1, 1),
            record(day(2), 0, 1, 1),
            record(day(9), 0, 1, 1),
        ])
        .unwrap();
        assert_eq!(ds.min_date(), day(2));
        assert_eq!(ds.max_date(), day(9));
        assert_eq!(ds.len(), 3);
    }

    #[test]
    fn category_codes_map_totally() {
        assert_eq!(WorkingDay::try_from(0), Ok(WorkingDay::NonWorking));
        assert_eq!(WorkingDay::try_from(1), Ok(WorkingDay::Working));
        assert_eq!(WorkingDay::try_from(2), Err(CategoryError::WorkingDay(2)));

        for w in Weather::ALL {
            assert_eq!(Weather::try_from(w.code()), Ok(w));
        }
        assert_eq!(Weather::try_from(0), Err(CategoryError::Weather(0)));
        assert_eq!(Weather::try_from(5), Err(CategoryError::Weather(5)));
    }

    #[test]
    fn labels() {
        assert_eq!(WorkingDay::NonWorking.to_string(), "Non-Working Day");
        assert_eq!(WorkingDay::Working.to_string(), "Working Day");
        let labels: Vec<_> = Weather::ALL.iter().map(|w| w.label()).collect();
        assert_eq!(labels, ["Clear", "Mist", "Light Rain", "Heavy Rain"]);
    }
}
