//! Data loading: the EIA client, an offline sample source, and memoization.
//!
//! Every source implements [`PriceSource`]. Front-ends never call a source
//! directly; they go through [`load`] (failure becomes an empty dataset) and
//! usually through [`MemoizedDataset`] (one fetch per process).

use std::cell::OnceCell;

use tracing::{info, warn};

use crate::domain::Dataset;
use crate::error::AppError;

pub mod eia;
pub mod sample;

pub use eia::EiaClient;
pub use sample::SampleSource;

/// Something that can produce the full dataset for a region.
pub trait PriceSource {
    fn fetch(&self, region: &str) -> Result<Dataset, AppError>;
}

/// Fetch a region's dataset, turning any failure into an empty dataset.
///
/// Callers must treat an empty result as fatal for the rest of the pipeline.
pub fn load(source: &dyn PriceSource, region: &str) -> Dataset {
    match source.fetch(region) {
        Ok(dataset) => {
            info!(region, rows = dataset.len(), "loaded dataset");
            dataset
        }
        Err(err) => {
            warn!(region, error = %err, "data load failed");
            Dataset::empty(region)
        }
    }
}

/// A region's dataset, loaded on first access and kept for the life of the value.
pub struct MemoizedDataset {
    source: Box<dyn PriceSource>,
    region: String,
    cell: OnceCell<Dataset>,
}

impl MemoizedDataset {
    pub fn new(source: Box<dyn PriceSource>, region: impl Into<String>) -> Self {
        Self {
            source,
            region: region.into(),
            cell: OnceCell::new(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn get(&self) -> &Dataset {
        self.cell.get_or_init(|| load(self.source.as_ref(), &self.region))
    }

    /// Like [`MemoizedDataset::get`], but an empty dataset is an error.
    pub fn require(&self) -> Result<&Dataset, AppError> {
        let dataset = self.get();
        if dataset.is_empty() {
            return Err(AppError::data("Failed to load data from EIA API."));
        }
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Observation;

    struct CountingSource {
        calls: Rc<Cell<usize>>,
        fail: bool,
    }

    impl PriceSource for CountingSource {
        fn fetch(&self, region: &str) -> Result<Dataset, AppError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail {
                return Err(AppError::data("EIA request failed with status 403 Forbidden."));
            }
            Ok(Dataset::new(
                region,
                vec![Observation {
                    period: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
                    sector: "residential".to_string(),
                    sector_id: None,
                    price: 10.0,
                    revenue: None,
                    sales: None,
                    customers: None,
                }],
            ))
        }
    }

    #[test]
    fn memoized_dataset_fetches_once() {
        let calls = Rc::new(Cell::new(0));
        let memo = MemoizedDataset::new(
            Box::new(CountingSource { calls: calls.clone(), fail: false }),
            "NY",
        );
        assert_eq!(memo.get().len(), 1);
        assert_eq!(memo.get().len(), 1);
        assert!(memo.require().is_ok());
        assert_eq!(calls.get(), 1);
        assert_eq!(memo.get().region(), "NY");
    }

    #[test]
    fn failed_load_is_empty_and_not_retried() {
        let calls = Rc::new(Cell::new(0));
        let memo = MemoizedDataset::new(
            Box::new(CountingSource { calls: calls.clone(), fail: true }),
            "NY",
        );
        assert!(memo.get().is_empty());
        let err = memo.require().unwrap_err();
        assert_eq!(err.to_string(), "Failed to load data from EIA API.");
        assert_eq!(calls.get(), 1);
    }
}
