//! Search configuration (A2): `SearchParameter`, loaded from a JSON
//! file, a serializable bundle of run parameters.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::digest::Protease;
use crate::error::CustomError;
use crate::glycan::{Category, CompositionEnvelope, Monosaccharide};
use crate::tolerance::Tolerance;

/// Per-category maximum counts for the composition envelope, in a shape
/// that round-trips cleanly through JSON. There is no minimum: a
/// category absent or zero simply means that sugar never appears.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    #[serde(default)]
    pub hexnac: u32,
    #[serde(default)]
    pub hex: u32,
    #[serde(default)]
    pub fuc: u32,
    #[serde(default)]
    pub neuac: u32,
    #[serde(default)]
    pub neugc: u32,
}

impl EnvelopeConfig {
    pub fn to_envelope(&self) -> CompositionEnvelope {
        CompositionEnvelope::capped(&[
            (Category::HexNAc, self.hexnac),
            (Category::Hex, self.hex),
            (Category::Fuc, self.fuc),
            (Category::NeuAc, self.neuac),
            (Category::NeuGc, self.neugc),
        ])
    }
}

fn default_candidates() -> Vec<String> {
    Monosaccharide::DEFAULT_CANDIDATES.iter().map(ToString::to_string).collect()
}

fn default_proteases() -> Vec<String> {
    vec!["trypsin".to_owned()]
}

/// The full set of parameters governing one search run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParameter {
    pub precursor_tolerance: Tolerance,
    pub fragment_tolerance: Tolerance,
    pub envelope: EnvelopeConfig,
    #[serde(default = "default_candidates")]
    pub candidates: Vec<String>,
    #[serde(default)]
    pub max_missed_cleavages: usize,
    #[serde(default = "default_proteases")]
    pub proteases: Vec<String>,
    #[serde(default = "default_min_peptide_length")]
    pub min_peptide_length: usize,
}

fn default_min_peptide_length() -> usize {
    4
}

impl SearchParameter {
    /// Load and parse a JSON config file.
    ///
    /// # Errors
    /// Returns a [`CustomError`] if the file can't be read or its
    /// contents aren't valid JSON for this shape.
    pub fn load(path: &Path) -> Result<Self, CustomError> {
        let text = fs::read_to_string(path).map_err(|e| {
            CustomError::error(format!("could not read config file '{}'", path.display()))
                .with_long_description(e.to_string())
        })?;
        serde_json::from_str(&text).map_err(|e| {
            CustomError::error("config file is not valid JSON for SearchParameter")
                .with_long_description(e.to_string())
        })
    }

    /// The candidate monosaccharide set this run's glycan builder grows.
    pub fn candidate_sugars(&self) -> Vec<Monosaccharide> {
        self.candidates.iter().filter_map(|name| monosaccharide_from_name(name)).collect()
    }

    /// The proteases this run digests with.
    pub fn protease_set(&self) -> Vec<Protease> {
        self.proteases.iter().filter_map(|name| protease_from_name(name)).collect()
    }
}

fn monosaccharide_from_name(name: &str) -> Option<Monosaccharide> {
    Monosaccharide::ALL.into_iter().find(|sugar| sugar.to_string().eq_ignore_ascii_case(name))
}

fn protease_from_name(name: &str) -> Option<Protease> {
    match name.to_ascii_lowercase().as_str() {
        "trypsin" => Some(Protease::trypsin()),
        "chymotrypsin" => Some(Protease::chymotrypsin()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_config_converts_category_bounds() {
        let cfg = EnvelopeConfig { hexnac: 2, hex: 3, fuc: 1, neuac: 0, neugc: 0 };
        let envelope = cfg.to_envelope();
        assert!(envelope.contains(&[(Category::HexNAc, 2), (Category::Hex, 3)].into_iter().collect()));
    }

    #[test]
    fn deserializes_from_json_with_defaults() {
        let json = r#"{
            "precursor_tolerance": {"unit": "ppm", "value": 10.0},
            "fragment_tolerance": {"unit": "da", "value": 0.02},
            "envelope": {"hexnac": 6, "hex": 9}
        }"#;
        let parsed: SearchParameter = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.max_missed_cleavages, 0);
        assert_eq!(parsed.proteases, vec!["trypsin"]);
        assert_eq!(parsed.min_peptide_length, 4);
        assert!(!parsed.candidate_sugars().is_empty());
    }

    #[test]
    fn protease_names_map_to_known_proteases() {
        assert!(protease_from_name("Trypsin").is_some());
        assert!(protease_from_name("unknown-enzyme").is_none());
    }
}
