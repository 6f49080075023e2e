use crate::domain::{Dataset, FilterCriteria};

/// Keep rows for `criteria.sector` whose period lies in `[start, end]`.
///
/// No match is a valid, empty result.
pub fn filter(dataset: &Dataset, criteria: &FilterCriteria) -> Dataset {
    let rows = dataset
        .rows()
        .iter()
        .filter(|r| r.sector == criteria.sector && criteria.contains(r.period))
        .cloned()
        .collect();
    Dataset::from_ordered_subset(dataset.region(), rows)
}
