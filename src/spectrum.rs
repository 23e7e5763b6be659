//! Tandem mass spectrum data model and a tolerance-aware peak index
//! (C5) built on top of `index.rs`.

use ordered_float::OrderedFloat;

use crate::index::{BucketIndex, ScalarIndex};
use crate::mass;
use crate::tolerance::Tolerance;

/// A single centroided peak: an `m/z` value and its intensity.
#[derive(Debug, Clone, PartialEq)]
pub struct Peak {
    pub mz: f64,
    pub intensity: OrderedFloat<f64>,
}

impl Peak {
    pub fn new(mz: f64, intensity: f64) -> Self {
        Self { mz, intensity: OrderedFloat(intensity) }
    }
}

/// The fragmentation method a spectrum was acquired with. Only
/// `EThcD` spectra carry both the peptide backbone c/z-ion ladder and
/// the glycan oxonium/Y-ion signal this engine searches for; plain
/// `Ms` spectra are parsed but `SpectrumMatcher::search` skips them
/// outright (see `matcher.rs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpectrumKind {
    Ms,
    EThcD,
}

/// One MS/MS scan: its precursor and the peaks observed in it.
#[derive(Debug, Clone)]
pub struct Spectrum {
    pub scan: String,
    pub kind: SpectrumKind,
    pub precursor_mz: f64,
    pub precursor_charge: i32,
    pub peaks: Vec<Peak>,
}

impl Spectrum {
    /// The neutral monoisotopic precursor mass implied by
    /// `precursor_mz` at `precursor_charge`.
    pub fn precursor_mass(&self) -> f64 {
        mass::spectrum_mass(self.precursor_mz, self.precursor_charge)
    }
}

/// A tolerance-aware index over one spectrum's peaks (C5), keyed not by
/// raw `m/z` but by the neutral monoisotopic *mass* each peak would
/// imply at every charge hypothesis `1..=precursor_charge` — this is
/// what lets the matcher query it directly with theoretical neutral
/// masses (oxonium/backbone/Y-ladder) instead of re-deriving an `m/z`
/// for every charge itself. Rebuilt fresh for each spectrum.
pub struct PeakIndex<'s> {
    index: BucketIndex<&'s Peak>,
}

impl<'s> PeakIndex<'s> {
    /// Index every `(peak, charge)` mass hypothesis in `spectrum`.
    /// `fragment_tolerance` sizes the bucket resolution: using the
    /// tolerance evaluated at the spectrum's own precursor mass (the
    /// largest mass any query will plausibly test) conservatively
    /// widens bins rather than risk a query's tolerance window
    /// exceeding the bucket width (`index.rs`'s bucket index requires
    /// `resolution >= tolerance width` to scan only neighbouring bins).
    pub fn build(spectrum: &'s Spectrum, fragment_tolerance: Tolerance) -> Self {
        let charges = 1..=spectrum.precursor_charge.max(1);
        let items: Vec<(f64, &'s Peak)> = spectrum
            .peaks
            .iter()
            .flat_map(|peak| charges.clone().map(move |charge| (mass::spectrum_mass(peak.mz, charge), peak)))
            .collect();
        let resolution = fragment_tolerance.half_width_at(spectrum.precursor_mass().max(1.0)).max(1e-6);
        Self { index: BucketIndex::build(items, resolution) }
    }

    /// Every peak whose mass, at some charge hypothesis, lands within
    /// `tolerance` of `target_mass`.
    pub fn query(&self, target_mass: f64, tolerance: Tolerance) -> Vec<&'s Peak> {
        self.index.query(target_mass, tolerance).into_iter().copied().collect()
    }

    /// Whether any `(peak, charge)` hypothesis matches `target_mass`.
    pub fn contains(&self, target_mass: f64, tolerance: Tolerance) -> bool {
        self.index.contains(target_mass, tolerance)
    }

    /// The highest-intensity peak matching `target_mass`, if any.
    pub fn best_match(&self, target_mass: f64, tolerance: Tolerance) -> Option<&'s Peak> {
        self.query(target_mass, tolerance).into_iter().max_by_key(|p| p.intensity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum() -> Spectrum {
        Spectrum {
            scan: "1".into(),
            kind: SpectrumKind::EThcD,
            precursor_mz: 1000.0,
            precursor_charge: 2,
            peaks: vec![
                Peak::new(204.087, 5000.0),
                Peak::new(204.090, 9000.0),
                Peak::new(366.140, 2000.0),
            ],
        }
    }

    #[test]
    fn best_match_prefers_higher_intensity_among_ties() {
        let spectrum = spectrum();
        let index = PeakIndex::build(&spectrum, Tolerance::Dalton(0.01));
        // Both 204.087 and 204.090 imply (at charge 1) a neutral mass
        // within 0.01 Da of 204.088's charge-1 mass.
        let target = mass::spectrum_mass(204.088, 1);
        let best = index.best_match(target, Tolerance::Dalton(0.01)).unwrap();
        assert!((best.intensity.0 - 9000.0).abs() < 1e-9);
    }

    #[test]
    fn precursor_mass_uses_charge_and_proton_mass() {
        let s = spectrum();
        let expected = mass::spectrum_mass(1000.0, 2);
        assert!((s.precursor_mass() - expected).abs() < 1e-9);
    }

    #[test]
    fn out_of_tolerance_mass_has_no_match() {
        let spectrum = spectrum();
        let index = PeakIndex::build(&spectrum, Tolerance::Dalton(0.01));
        assert!(!index.contains(mass::spectrum_mass(500.0, 1), Tolerance::Dalton(0.01)));
    }

    #[test]
    fn matches_at_any_charge_hypothesis_up_to_precursor_charge() {
        // The spectrum's precursor_charge is 2, so a peak's mass
        // hypothesis at charge 2 must be queryable too.
        let spectrum = spectrum();
        let index = PeakIndex::build(&spectrum, Tolerance::Dalton(0.01));
        let target = mass::spectrum_mass(366.140, 2);
        assert!(index.contains(target, Tolerance::Dalton(0.01)));
    }
}
