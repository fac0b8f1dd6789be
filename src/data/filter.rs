use chrono::NaiveDate;

use super::model::{Dataset, Record};

// ---------------------------------------------------------------------------
// Date range: the active interval, always ordered
// ---------------------------------------------------------------------------

/// An inclusive calendar interval with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// `None` unless `start <= end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(DateRange { start, end })
    }

    /// The span of every record in the dataset.
    pub fn full(dataset: &Dataset) -> Self {
        DateRange {
            start: dataset.min_date(),
            end: dataset.max_date(),
        }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, counting both endpoints.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Turn whatever the date selector produced into a usable interval.
///
/// Anything other than two ordered endpoints (one date, none, or a reversed
/// pair) falls back to the dataset's full span.
pub fn resolve_range(
    dataset: &Dataset,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> DateRange {
    match (start, end) {
        (Some(s), Some(e)) => DateRange::new(s, e).unwrap_or_else(|| {
            log::debug!("reversed interval {s}..{e}, using full range");
            DateRange::full(dataset)
        }),
        _ => {
            log::debug!("partial interval {start:?}..{end:?}, using full range");
            DateRange::full(dataset)
        }
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Records of a dataset that fall inside a [`DateRange`], by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView {
    pub range: DateRange,
    /// Indices into [`Dataset::records`], ascending.
    pub indices: Vec<usize>,
}

impl FilteredView {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The selected records, in dataset order.
    pub fn records<'a>(&'a self, dataset: &'a Dataset) -> impl Iterator<Item = &'a Record> + 'a {
        self.indices.iter().map(move |&i| &dataset.records()[i])
    }
}

/// Return the indices of records dated within `range`.
pub fn filtered_indices(dataset: &Dataset, range: DateRange) -> Vec<usize> {
    dataset
        .records()
        .iter()
        .enumerate()
        .filter(|(_, rec)| range.contains(rec.date))
        .map(|(i, _)| i)
        .collect()
}

pub fn filter_view(dataset: &Dataset, range: DateRange) -> FilteredView {
    FilteredView {
        range,
        indices: filtered_indices(dataset, range),
    }
}
