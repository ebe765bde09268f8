//! Market inputs: time-indexed price series and the ordered asset universe.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("series '{0}' is empty")]
    Empty(String),
    #[error("series '{name}' has {times} timestamps but {values} values")]
    LengthMismatch {
        name: String,
        times: usize,
        values: usize,
    },
    #[error("series '{name}' timestamps are not ascending at position {position}")]
    UnsortedTimes { name: String, position: usize },
    #[error("series '{name}' is not aligned with '{reference}'")]
    Misaligned { name: String, reference: String },
    #[error("no series were provided")]
    NoSeries,
}

/// One asset's historical prices, ascending in time.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries {
    name: String,
    times: Vec<NaiveDate>,
    values: Vec<f64>,
}

impl PriceSeries {
    /// Build a validated series: non-empty, matched lengths, strictly
    /// ascending timestamps.
    pub fn new(
        name: impl Into<String>,
        times: Vec<NaiveDate>,
        values: Vec<f64>,
    ) -> Result<Self, SeriesError> {
        let name = name.into();
        if times.is_empty() {
            return Err(SeriesError::Empty(name));
        }
        if times.len() != values.len() {
            return Err(SeriesError::LengthMismatch {
                name,
                times: times.len(),
                values: values.len(),
            });
        }
        if let Some(position) = times.windows(2).position(|w| w[0] >= w[1]) {
            return Err(SeriesError::UnsortedTimes {
                name,
                position: position + 1,
            });
        }
        Ok(Self {
            name,
            times,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn time(&self, index: usize) -> NaiveDate {
        self.times[index]
    }

    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    pub fn times(&self) -> &[NaiveDate] {
        &self.times
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Simple return over one sampling step: `v[i] / v[i-1] - 1`.
    ///
    /// Index 0 (or a non-positive previous value) yields 0.0.
    pub fn step_return(&self, index: usize) -> f64 {
        if index == 0 {
            return 0.0;
        }
        let prev = self.values[index - 1];
        if prev <= 0.0 {
            return 0.0;
        }
        self.values[index] / prev - 1.0
    }
}

/// Verify all series share one sampling grid; returns the common length.
pub fn check_aligned(series: &[PriceSeries]) -> Result<usize, SeriesError> {
    let first = series.first().ok_or(SeriesError::NoSeries)?;
    for other in &series[1..] {
        if other.times != first.times {
            return Err(SeriesError::Misaligned {
                name: other.name.clone(),
                reference: first.name.clone(),
            });
        }
    }
    Ok(first.len())
}

/// Ordered list of asset names; index order is the distribution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetUniverse {
    names: Vec<String>,
}

impl AssetUniverse {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    pub fn name(&self, index: usize) -> &str {
        &self.names[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dates(days: &[u32]) -> Vec<NaiveDate> {
        days.iter()
            .map(|&d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap())
            .collect()
    }

    #[test]
    fn valid_series_builds() {
        let s = PriceSeries::new("SPY", dates(&[1, 2, 3]), vec![100.0, 101.0, 99.0]).unwrap();
        assert_eq!(s.len(), 3);
        assert_eq!(s.value(1), 101.0);
    }

    #[test]
    fn rejects_empty_and_mismatched() {
        assert_eq!(
            PriceSeries::new("SPY", vec![], vec![]),
            Err(SeriesError::Empty("SPY".into()))
        );
        assert!(matches!(
            PriceSeries::new("SPY", dates(&[1, 2]), vec![100.0]),
            Err(SeriesError::LengthMismatch { .. })
        ));
    }

    #[test]
    fn rejects_unsorted_times() {
        let err = PriceSeries::new("SPY", dates(&[1, 3, 2]), vec![1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(
            err,
            SeriesError::UnsortedTimes {
                name: "SPY".into(),
                position: 2
            }
        );
    }

    #[test]
    fn step_return_basics() {
        let s = PriceSeries::new("SPY", dates(&[1, 2, 3]), vec![100.0, 110.0, 99.0]).unwrap();
        assert_eq!(s.step_return(0), 0.0);
        assert!((s.step_return(1) - 0.10).abs() < 1e-12);
        assert!((s.step_return(2) - (-0.10)).abs() < 1e-12);
    }

    #[test]
    fn alignment_check() {
        let a = PriceSeries::new("A", dates(&[1, 2]), vec![1.0, 2.0]).unwrap();
        let b = PriceSeries::new("B", dates(&[1, 2]), vec![3.0, 4.0]).unwrap();
        let c = PriceSeries::new("C", dates(&[1, 3]), vec![3.0, 4.0]).unwrap();

        assert_eq!(check_aligned(&[a.clone(), b]), Ok(2));
        assert!(matches!(
            check_aligned(&[a, c]),
            Err(SeriesError::Misaligned { .. })
        ));
        assert_eq!(check_aligned(&[]), Err(SeriesError::NoSeries));
    }

    #[test]
    fn universe_lookup() {
        let universe = AssetUniverse::new(vec!["SPY".into(), "TLT".into()]);
        assert_eq!(universe.index_of("TLT"), Some(1));
        assert_eq!(universe.index_of("GLD"), None);
        assert_eq!(universe.name(0), "SPY");
    }
}
