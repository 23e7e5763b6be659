//! In-silico proteolysis (A3): a `Protease` cleavage rule and
//! multi-protease digestion with missed cleavages, operating on plain
//! one-letter amino acid sequences.

use std::collections::BTreeSet;

/// A sequence-specificity cleavage rule: cut immediately after any
/// residue in `cleave_after`, unless the following residue is in
/// `not_before` (e.g. trypsin does not cut before proline).
#[derive(Debug, Clone)]
pub struct Protease {
    pub name: String,
    cleave_after: Vec<u8>,
    not_before: Vec<u8>,
}

impl Protease {
    pub fn new(name: impl Into<String>, cleave_after: Vec<u8>, not_before: Vec<u8>) -> Self {
        Self { name: name.into(), cleave_after, not_before }
    }

    /// Trypsin: cleaves after `K`/`R`, except before `P`.
    pub fn trypsin() -> Self {
        Self::new("Trypsin", vec![b'K', b'R'], vec![b'P'])
    }

    /// Chymotrypsin: cleaves after `F`/`Y`/`W`, except before `P`.
    pub fn chymotrypsin() -> Self {
        Self::new("Chymotrypsin", vec![b'F', b'Y', b'W'], vec![b'P'])
    }

    /// Every index at which this protease cleaves `sequence`,
    /// including the implicit N- and C-terminal boundaries.
    fn cleavage_sites(&self, sequence: &[u8]) -> Vec<usize> {
        let mut sites = vec![0];
        for (i, &residue) in sequence.iter().enumerate() {
            if !self.cleave_after.contains(&residue) {
                continue;
            }
            if sequence.get(i + 1).is_some_and(|next| self.not_before.contains(next)) {
                continue;
            }
            sites.push(i + 1);
        }
        if sites.last() != Some(&sequence.len()) {
            sites.push(sequence.len());
        }
        sites
    }

    /// Every peptide obtainable from `sequence` by cutting at this
    /// protease's sites, allowing up to `max_missed_cleavages`
    /// consecutive uncut sites per peptide.
    pub fn digest(&self, sequence: &str, max_missed_cleavages: usize) -> Vec<String> {
        let sites = self.cleavage_sites(sequence.as_bytes());
        let mut peptides = Vec::new();
        for start_idx in 0..sites.len().saturating_sub(1) {
            for end_idx in (start_idx + 1)..sites.len() {
                if end_idx - start_idx - 1 > max_missed_cleavages {
                    break;
                }
                let (start, end) = (sites[start_idx], sites[end_idx]);
                if start < end {
                    peptides.push(sequence[start..end].to_owned());
                }
            }
        }
        peptides
    }
}

/// The union of peptides produced by digesting `sequence` with every
/// protease in `proteases`, deduplicated. A multi-protease search
/// always searches the union of all configured enzymes' cut sites
/// rather than one at a time.
pub fn digest_with_all(
    proteases: &[Protease],
    sequence: &str,
    max_missed_cleavages: usize,
) -> Vec<String> {
    let mut peptides: BTreeSet<String> = BTreeSet::new();
    for protease in proteases {
        peptides.extend(protease.digest(sequence, max_missed_cleavages));
    }
    peptides.into_iter().collect()
}
