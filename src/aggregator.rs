//! Per-scan best-score selection across a batch of spectra (C7).
//!
//! Groups matcher output by scan number, and within a scan retains only
//! the results tied for the maximum score. The first result seen for a
//! scan is always retained unconditionally, even though it hasn't been
//! compared against anything yet — there is nothing better to drop it
//! for until a second result for the same scan arrives.

use std::collections::BTreeMap;

use crate::matcher::SearchResult;

/// One scan's worth of matcher output, tagged with its scan number
/// (the matcher itself is scan-agnostic; the caller attaches it).
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult {
    pub scan: String,
    pub result: SearchResult,
}

/// Collapses per-spectrum matcher results to the best-scoring (possibly
/// tied) results per scan, returned in ascending scan order.
#[derive(Debug, Clone, Default)]
pub struct ResultAggregator {
    best_score: BTreeMap<String, f64>,
    results: BTreeMap<String, Vec<SearchResult>>,
}

impl ResultAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one spectrum's result (if any — spectra with no surviving
    /// candidate contribute nothing to the aggregate).
    pub fn add(&mut self, scan: impl Into<String>, result: SearchResult) {
        let scan = scan.into();
        match self.best_score.get(&scan).copied() {
            None => {
                self.best_score.insert(scan.clone(), result.score);
                self.results.insert(scan, vec![result]);
            }
            Some(current_best) if result.score > current_best => {
                self.best_score.insert(scan.clone(), result.score);
                self.results.insert(scan, vec![result]);
            }
            Some(current_best) if result.score == current_best => {
                self.results.entry(scan).or_default().push(result);
            }
            Some(_) => {}
        }
    }

    /// Merge in every result from a batch of `(scan, result)` pairs,
    /// e.g. the output of a parallel per-spectrum search.
    pub fn extend(&mut self, results: impl IntoIterator<Item = (String, SearchResult)>) {
        for (scan, result) in results {
            self.add(scan, result);
        }
    }

    /// The retained results, flattened in ascending scan order. Within
    /// a scan, results are in the order they were added.
    pub fn into_results(self) -> Vec<ScanResult> {
        self.results
            .into_iter()
            .flat_map(|(scan, results)| {
                results.into_iter().map(move |result| ScanResult { scan: scan.clone(), result })
            })
            .collect()
    }
}
