//! The three-stage spectrum matcher (C6): oxonium-ion screening, then
//! the peptide backbone c/z-ion ladder, then the glycan Y-ion ladder,
//! each stage short-circuiting the next on a clean miss.
//!
//! Each stage's query masses are neutral monoisotopic masses, tested
//! against the spectrum's `PeakIndex` (C5), which has already expanded
//! every observed peak into a mass hypothesis at each charge
//! `1..=precursor_charge` — the matcher never converts mass to `m/z`
//! itself except when building the stage-2 backbone ladder, which is
//! queried against a fresh per-(glycan, site) `BinaryIndex` over `m/z`
//! instead.

use crate::candidates::MatchResultStore;
use crate::glycan::{BuiltGlycans, GlycanStructure, Monosaccharide};
use crate::index::{BinaryIndex, ScalarIndex};
use crate::mass::{self, Ion};
use crate::spectrum::{PeakIndex, Spectrum, SpectrumKind};
use crate::tolerance::Tolerance;

/// Every 0-based position of an N-X-S/T sequon (X anything but
/// proline) in `sequence` — the candidate N-glycosylation sites.
/// Windows overlap (e.g. `NNSS` has sequons at both 0 and 1), so each
/// start index is tested independently rather than via a non-overlapping
/// pattern scan.
pub fn find_n_glycan_sites(sequence: &str) -> Vec<usize> {
    let bytes = sequence.as_bytes();
    (0..bytes.len().saturating_sub(2))
        .filter(|&i| bytes[i] == b'N' && bytes[i + 1] != b'P' && matches!(bytes[i + 2], b'S' | b'T'))
        .collect()
}

/// The monoisotopic mass of a composition `name`, as interpreted by
/// [`GlycanStructure::interpret`] and re-summed with a representative
/// monosaccharide per category (`Man` stands in for `Hex`, sound
/// because `Man`/`Gal` share a residue mass; see `glycan/builder.rs`'s
/// `mass_of_name`). Used to add the glycan's extra mass to the
/// backbone ladder when `name` is not present in the builder's stores
/// (e.g. it was supplied directly rather than grown).
fn mass_of_composition_name(name: &str) -> f64 {
    use crate::glycan::Category;
    GlycanStructure::interpret(name)
        .into_iter()
        .map(|(category, count)| {
            let representative = match category {
                Category::HexNAc => Monosaccharide::GlcNAc,
                Category::Hex => Monosaccharide::Man,
                Category::Fuc => Monosaccharide::Fuc,
                Category::NeuAc => Monosaccharide::NeuAc,
                Category::NeuGc => Monosaccharide::NeuGc,
            };
            f64::from(count) * representative.residue_mass()
        })
        .sum()
}

/// One surviving (peptide, glycan, site) identification: the unique
/// best-scoring candidate for a spectrum.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub peptide: String,
    /// The glycan composition *name* (`Glycan.name()`), not a structure id.
    pub glycan: String,
    pub position: usize,
    pub score: f64,
}

/// Runs the three-stage match of one spectrum's precursor-filtered
/// candidate set against its peaks.
pub struct SpectrumMatcher {
    pub fragment_tolerance: Tolerance,
}

impl SpectrumMatcher {
    pub fn new(fragment_tolerance: Tolerance) -> Self {
        Self { fragment_tolerance }
    }

    /// Stage 1: peptide_mass(pep) + i * mass(HexNAc), i in {1,2} — the
    /// first two glycan-loss Y-ions, diagnostic that *some* glycan
    /// mass is attached to this peptide backbone in this spectrum.
    /// Returns the summed intensity of whichever of the two hit (the
    /// "most intense hit per i"), or `None` if neither did.
    fn oxonium_stage(&self, peptide_mass: f64, peaks: &PeakIndex<'_>) -> Option<f64> {
        let hexnac = Monosaccharide::GlcNAc.residue_mass();
        let mut total = 0.0;
        let mut any = false;
        for i in 1..=2 {
            let target = peptide_mass + f64::from(i) * hexnac;
            if let Some(peak) = peaks.best_match(target, self.fragment_tolerance) {
                any = true;
                total += peak.intensity.0;
            }
        }
        any.then_some(total)
    }

    /// Stage 2: the c/z backbone ladder spanning `site`, with the
    /// glycan's extra mass `delta` added to every ion (both ion sets
    /// are chosen to span the glycosylation site, so both retain the
    /// attached glycan). Returns the summed intensity of matched peaks
    /// (querying observed `peak.mz` directly, at charges
    /// `1..=precursor_charge`), or `None` if nothing matched.
    fn backbone_stage(
        &self,
        peptide: &str,
        site: usize,
        delta: f64,
        spectrum: &Spectrum,
    ) -> Option<f64> {
        let mut masses = Vec::new();
        for i in site..=peptide.len().saturating_sub(2) {
            masses.push(mass::ion_mass(&peptide[..=i], Ion::C) + delta);
        }
        for i in 1..=site {
            masses.push(mass::ion_mass(&peptide[i..], Ion::Z) + delta);
        }

        let mut mz_hypotheses = Vec::new();
        for m in &masses {
            for charge in 1..=spectrum.precursor_charge.max(1) {
                mz_hypotheses.push((mass::mz_of(*m, charge), ()));
            }
        }
        let ladder = BinaryIndex::build(mz_hypotheses);

        let mut total = 0.0;
        let mut any = false;
        for peak in &spectrum.peaks {
            if ladder.contains(peak.mz, self.fragment_tolerance) {
                any = true;
                total += peak.intensity.0;
            }
        }
        any.then_some(total)
    }

    /// Stage 3: the Y-ladder for structure `id` — `peptide_mass` plus
    /// every biosynthetic ancestor structure's mass (never `id`'s own
    /// full mass; the intact precursor is not part of this ladder),
    /// each tested as `spectrum_mass(peak.mz, charge) - peptide_mass`
    /// against the ladder so charge is implicit rather than re-derived
    /// per mass. A peak is counted once even if it matches at more
    /// than one charge.
    fn glycan_stage(
        &self,
        peptide_mass: f64,
        glycan_id: &str,
        glycans: &BuiltGlycans,
        spectrum: &Spectrum,
    ) -> Option<f64> {
        let ids: Vec<String> = glycans.ancestors_of(glycan_id).into_iter().collect();

        let ladder_masses: Vec<(f64, ())> = ids
            .iter()
            .filter_map(|id| glycans.masses.get(id))
            .flat_map(|masses| masses.iter().map(|m| (m.0, ())))
            .collect();
        if ladder_masses.is_empty() {
            return None;
        }
        let ladder = BinaryIndex::build(ladder_masses);

        let mut total = 0.0;
        let mut any = false;
        for peak in &spectrum.peaks {
            let hit = (1..=spectrum.precursor_charge.max(1)).any(|charge| {
                let candidate_mass = mass::spectrum_mass(peak.mz, charge) - peptide_mass;
                ladder.contains(candidate_mass, self.fragment_tolerance)
            });
            if hit {
                any = true;
                total += peak.intensity.0;
            }
        }
        any.then_some(total)
    }

    /// Search every candidate in `candidates` against `spectrum`,
    /// returning the unique best-scoring `(peptide, glycan, site, id)`
    /// combination, or `None` if nothing fires in all three stages.
    ///
    /// Ties are broken by the iteration order of `peptides()`, then
    /// `glycans(pep)`, then sites, then structure ids: the first
    /// combination to reach a given score wins, since only a strictly
    /// greater score replaces the current best.
    pub fn search(
        &self,
        candidates: &MatchResultStore,
        glycans: &BuiltGlycans,
        spectrum: &Spectrum,
    ) -> Option<SearchResult> {
        if spectrum.kind != SpectrumKind::EThcD {
            return None;
        }

        let peaks = PeakIndex::build(spectrum, self.fragment_tolerance);
        let mut best: Option<SearchResult> = None;

        for peptide in candidates.peptides() {
            let peptide_mass = mass::peptide_mass(peptide);
            let Some(oxonium_score) = self.oxonium_stage(peptide_mass, &peaks) else { continue };

            for glycan_name in candidates.glycans(peptide) {
                let delta =
                    glycans.mass_of_name(glycan_name).unwrap_or_else(|| mass_of_composition_name(glycan_name));

                for site in find_n_glycan_sites(peptide) {
                    let Some(backbone_score) = self.backbone_stage(peptide, site, delta, spectrum) else {
                        continue;
                    };

                    let mut ids: Vec<&String> =
                        glycans.isomers.get(glycan_name).into_iter().flatten().collect();
                    ids.sort();
                    for id in ids {
                        let Some(glycan_score) = self.glycan_stage(peptide_mass, id, glycans, spectrum) else {
                            continue;
                        };

                        let score = oxonium_score + backbone_score + glycan_score;
                        if best.as_ref().map_or(true, |b| score > b.score) {
                            best = Some(SearchResult {
                                peptide: peptide.clone(),
                                glycan: glycan_name.clone(),
                                position: site,
                                score,
                            });
                        }
                    }
                }
            }
        }

        best.filter(|r| r.score > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glycan::{Category, CompositionEnvelope, GlycanBuilder};
    use crate::spectrum::{Peak, SpectrumKind};

    #[test]
    fn sequon_excludes_proline_but_allows_other_residues() {
        assert_eq!(find_n_glycan_sites("NIT"), vec![0]);
        assert_eq!(find_n_glycan_sites("NPT"), Vec::<usize>::new());
        assert_eq!(find_n_glycan_sites("AANITKAANVSK"), vec![2, 8]);
    }

    #[test]
    fn overlapping_sequons_are_all_found() {
        // The N at position 1 starts its own sequon (NSS) even though
        // it also sits inside the one starting at position 0.
        assert_eq!(find_n_glycan_sites("NNSS"), vec![0, 1]);
    }

    fn built_core() -> (BuiltGlycans, String, f64) {
        let builder = GlycanBuilder::new(vec![Monosaccharide::GlcNAc, Monosaccharide::Man]);
        let envelope = CompositionEnvelope::capped(&[(Category::HexNAc, 2), (Category::Hex, 3)]);
        let glycans = builder.build(&envelope);
        let id = glycans.isomers["HexNAc2Hex3"].iter().next().unwrap().clone();
        let mass = glycans.masses[&id].iter().next().unwrap().0;
        (glycans, id, mass)
    }

    #[test]
    fn positive_identification_end_to_end() {
        // A synthetic spectrum built from the engine's own mass
        // functions must be identified back by the matcher, with a
        // score equal to the sum of every placed peak's intensity.
        //
        // The sequon sits at position 0, so the z-ion half of the
        // backbone ladder (`i in 1..=site`) is empty by construction —
        // only the c-ion ladder carries stage-2 evidence here.
        let peptide = "NITK";
        let (glycans, _id, glycan_mass) = built_core();
        let peptide_mass = mass::peptide_mass(peptide);

        let oxonium_peak = Peak::new(mass::mz_of(peptide_mass + Monosaccharide::GlcNAc.residue_mass(), 1), 9000.0);
        let c_ion_1 = Peak::new(mass::mz_of(mass::ion_mass(&peptide[..1], Ion::C) + glycan_mass, 1), 1000.0);
        let c_ion_2 = Peak::new(mass::mz_of(mass::ion_mass(&peptide[..2], Ion::C) + glycan_mass, 1), 1100.0);
        // An ancestor mass, not the glycan's own full mass: the Y-ladder
        // never includes the intact structure being identified.
        let y_ancestor =
            Peak::new(mass::mz_of(peptide_mass + Monosaccharide::GlcNAc.residue_mass(), 2), 800.0);

        let expected_score: f64 =
            [&oxonium_peak, &c_ion_1, &c_ion_2, &y_ancestor].iter().map(|p| p.intensity.0).sum();

        let spectrum = Spectrum {
            scan: "1".into(),
            kind: SpectrumKind::EThcD,
            precursor_mz: mass::mz_of(peptide_mass + glycan_mass, 2),
            precursor_charge: 2,
            peaks: vec![oxonium_peak, c_ion_1, c_ion_2, y_ancestor],
        };

        let candidates = MatchResultStore::build(
            spectrum.precursor_mass(),
            Tolerance::Ppm(20.0),
            &[peptide.to_owned()],
            &glycans,
        );

        let matcher = SpectrumMatcher::new(Tolerance::Ppm(20.0));
        let result = matcher.search(&candidates, &glycans, &spectrum).expect("must identify");
        assert_eq!(result.peptide, "NITK");
        assert_eq!(result.glycan, "HexNAc2Hex3");
        assert_eq!(result.position, 0);
        assert!((result.score - expected_score).abs() < 1e-6);
    }

    #[test]
    fn ms_spectra_are_never_matched() {
        let (glycans, _id, glycan_mass) = built_core();
        let peptide = "NITK";
        let peptide_mass = mass::peptide_mass(peptide);
        let oxonium_peak = Peak::new(mass::mz_of(peptide_mass + Monosaccharide::GlcNAc.residue_mass(), 1), 9000.0);
        let spectrum = Spectrum {
            scan: "1".into(),
            kind: SpectrumKind::Ms,
            precursor_mz: mass::mz_of(peptide_mass + glycan_mass, 2),
            precursor_charge: 2,
            peaks: vec![oxonium_peak],
        };
        let candidates = MatchResultStore::build(
            spectrum.precursor_mass(),
            Tolerance::Ppm(20.0),
            &[peptide.to_owned()],
            &glycans,
        );
        let matcher = SpectrumMatcher::new(Tolerance::Ppm(20.0));
        assert!(matcher.search(&candidates, &glycans, &spectrum).is_none());
    }

    #[test]
    fn missing_oxonium_evidence_short_circuits_to_none() {
        // No peak anywhere near peptide_mass + HexNAc means stage 1
        // prunes before any backbone/glycan work.
        let (glycans, _id, _mass) = built_core();
        let spectrum = Spectrum {
            scan: "1".into(),
            kind: SpectrumKind::EThcD,
            precursor_mz: 500.0,
            precursor_charge: 1,
            peaks: vec![Peak::new(100.0, 10.0)],
        };
        let candidates = MatchResultStore::build(
            spectrum.precursor_mass(),
            Tolerance::Ppm(1e9),
            &["NITK".to_owned()],
            &glycans,
        );
        let matcher = SpectrumMatcher::new(Tolerance::Ppm(20.0));
        assert!(matcher.search(&candidates, &glycans, &spectrum).is_none());
    }

    #[test]
    fn empty_candidate_set_yields_no_result() {
        let (glycans, ..) = built_core();
        let spectrum = Spectrum {
            scan: "1".into(),
            kind: SpectrumKind::EThcD,
            precursor_mz: 500.0,
            precursor_charge: 1,
            peaks: vec![],
        };
        let candidates = MatchResultStore::default();
        let matcher = SpectrumMatcher::new(Tolerance::Ppm(20.0));
        assert!(matcher.search(&candidates, &glycans, &spectrum).is_none());
    }
}
