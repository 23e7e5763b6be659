//! Precursor-mass candidate filtering: the first of the matcher's
//! three stages, narrowing every (peptide, glycan) pair down to those
//! whose combined mass explains the observed precursor.
//!
//! Candidates are always collected into a fresh map rather than
//! appended to a vector being iterated over, which would silently
//! re-test masses already emitted once the vector being scanned also
//! grows.

use std::collections::{BTreeMap, BTreeSet};

use crate::glycan::BuiltGlycans;
use crate::mass;
use crate::tolerance::Tolerance;

/// The precursor-filtered candidate set for one spectrum: every
/// peptide that has at least one glycan *composition name* whose
/// combined mass matches the observed precursor within tolerance.
#[derive(Debug, Clone, Default)]
pub struct MatchResultStore {
    glycans_of: BTreeMap<String, BTreeSet<String>>,
}

impl MatchResultStore {
    /// Filter every `(peptide, glycan name)` pair whose combined
    /// monoisotopic mass falls within `tolerance` of `precursor_mass`.
    pub fn build(
        precursor_mass: f64,
        tolerance: Tolerance,
        peptides: &[String],
        glycans: &BuiltGlycans,
    ) -> Self {
        let mut glycans_of: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for peptide in peptides {
            let peptide_mass = mass::peptide_mass(peptide);
            for name in glycans.isomers.keys() {
                let Some(glycan_mass) = glycans.mass_of_name(name) else { continue };
                let total_mass = peptide_mass + glycan_mass;
                if tolerance.matches(precursor_mass, total_mass) {
                    glycans_of.entry(peptide.clone()).or_default().insert(name.clone());
                }
            }
        }
        Self { glycans_of }
    }

    /// Every peptide with at least one surviving glycan, in ascending
    /// order — the outer iteration order the matcher's tie policy
    /// depends on.
    pub fn peptides(&self) -> impl Iterator<Item = &String> {
        self.glycans_of.keys()
    }

    /// The glycan composition names that survived precursor filtering
    /// for `peptide`, in ascending order.
    pub fn glycans(&self, peptide: &str) -> impl Iterator<Item = &String> {
        self.glycans_of.get(peptide).into_iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.glycans_of.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glycan::{Category, CompositionEnvelope, GlycanBuilder, Monosaccharide};

    #[test]
    fn only_the_matching_peptide_glycan_pair_survives() {
        let builder = GlycanBuilder::new(vec![Monosaccharide::GlcNAc, Monosaccharide::Man]);
        let envelope = CompositionEnvelope::capped(&[(Category::HexNAc, 2), (Category::Hex, 3)]);
        let glycans = builder.build(&envelope);

        let peptides = vec!["NITK".to_owned(), "GLYCOPEPTIDE".to_owned()];
        let core_mass = glycans.mass_of_name("HexNAc2Hex3").unwrap();
        let precursor_mass = mass::peptide_mass("NITK") + core_mass;

        let store = MatchResultStore::build(precursor_mass, Tolerance::Ppm(10.0), &peptides, &glycans);
        let peps: Vec<_> = store.peptides().collect();
        assert_eq!(peps, vec!["NITK"]);
        let names: Vec<_> = store.glycans("NITK").collect();
        assert_eq!(names, vec!["HexNAc2Hex3"]);
    }

    #[test]
    fn no_candidates_when_nothing_matches() {
        let builder = GlycanBuilder::new(vec![Monosaccharide::GlcNAc, Monosaccharide::Man]);
        let envelope = CompositionEnvelope::capped(&[(Category::HexNAc, 2), (Category::Hex, 3)]);
        let glycans = builder.build(&envelope);
        let peptides = vec!["NITK".to_owned()];

        let store = MatchResultStore::build(1.0, Tolerance::Ppm(10.0), &peptides, &glycans);
        assert!(store.is_empty());
    }
}
