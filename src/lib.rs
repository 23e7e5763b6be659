//! N-linked glycopeptide identification from tandem mass spectra: an
//! enumerative glycan structure builder, tolerance-aware peak indexes,
//! and a three-stage (oxonium / peptide-backbone / glycan-ladder)
//! spectrum matcher, plus the thin adapters (FASTA, MGF-like spectra,
//! digestion, config) that feed it.

pub mod aggregator;
pub mod candidates;
pub mod config;
pub mod digest;
pub mod error;
pub mod fasta;
pub mod glycan;
pub mod index;
pub mod mass;
pub mod matcher;
pub mod mgf;
pub mod spectrum;
pub mod tolerance;
