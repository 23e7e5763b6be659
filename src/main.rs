//! CLI / orchestration (A6): loads a protein database and a batch of
//! spectra, builds the glycan structure space once, searches every
//! spectrum in parallel against the shared read-only stores, and
//! writes the per-scan best-scoring identifications to a CSV file.
//!
//! Grounded in `examples/multi-annotator/src/main.rs`'s `clap::Parser`
//! CLI and `rayon::prelude::*` per-item parallel search.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use rayon::prelude::*;

use glycosearch::aggregator::ResultAggregator;
use glycosearch::candidates::MatchResultStore;
use glycosearch::config::{EnvelopeConfig, SearchParameter};
use glycosearch::digest;
use glycosearch::error::CustomError;
use glycosearch::fasta;
use glycosearch::glycan::GlycanBuilder;
use glycosearch::matcher::{find_n_glycan_sites, SpectrumMatcher};
use glycosearch::mgf;
use glycosearch::tolerance::Tolerance;

/// Identify N-linked glycopeptides from tandem mass spectra by
/// searching a composition-bounded glycan structure space against a
/// tolerance-aware peak index.
#[derive(Parser)]
#[command(name = "glycosearch", version, about)]
struct Cli {
    /// FASTA protein database.
    #[arg(short, long)]
    fasta: PathBuf,
    /// MGF-like spectrum file.
    #[arg(short, long)]
    spectra: PathBuf,
    /// Output CSV path.
    #[arg(short, long)]
    out: PathBuf,
    /// Optional JSON `SearchParameter` file; any flag below overrides
    /// the corresponding field once the file is loaded.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Precursor mass tolerance, e.g. `10ppm` or `0.02da`.
    #[arg(long, value_parser = tolerance_parser)]
    precursor_tolerance: Option<Tolerance>,
    /// Fragment mass tolerance, e.g. `20ppm` or `0.01da`.
    #[arg(long, value_parser = tolerance_parser)]
    fragment_tolerance: Option<Tolerance>,
    /// Maximum HexNAc count.
    #[arg(long)]
    hexnac: Option<u32>,
    /// Maximum Hex count.
    #[arg(long)]
    hex: Option<u32>,
    /// Maximum Fuc count.
    #[arg(long)]
    fuc: Option<u32>,
    /// Maximum NeuAc count.
    #[arg(long)]
    neuac: Option<u32>,
    /// Maximum NeuGc count.
    #[arg(long)]
    neugc: Option<u32>,
    /// Maximum missed cleavages per peptide.
    #[arg(long)]
    max_missed_cleavages: Option<usize>,
    /// Comma-separated protease names (`trypsin`, `chymotrypsin`).
    #[arg(long, value_delimiter = ',')]
    proteases: Vec<String>,
    /// Minimum candidate peptide length.
    #[arg(long)]
    min_peptide_length: Option<usize>,
}

fn tolerance_parser(input: &str) -> Result<Tolerance, String> {
    Tolerance::from_str(input).map_err(|e| e.to_string())
}

/// The baseline `SearchParameter` used when no `--config` file is
/// given: a generous default envelope and 1 missed cleavage with
/// trypsin, overridden field-by-field by whichever flags are present.
fn default_parameter() -> SearchParameter {
    SearchParameter {
        precursor_tolerance: Tolerance::Ppm(10.0),
        fragment_tolerance: Tolerance::Ppm(20.0),
        envelope: EnvelopeConfig { hexnac: 8, hex: 12, fuc: 2, neuac: 4, neugc: 0 },
        candidates: glycosearch::glycan::Monosaccharide::DEFAULT_CANDIDATES
            .iter()
            .map(ToString::to_string)
            .collect(),
        max_missed_cleavages: 1,
        proteases: vec!["trypsin".to_owned()],
        min_peptide_length: 4,
    }
}

fn build_parameter(cli: &Cli) -> Result<SearchParameter, CustomError> {
    let mut parameter = match &cli.config {
        Some(path) => SearchParameter::load(path)?,
        None => default_parameter(),
    };

    if let Some(t) = cli.precursor_tolerance {
        parameter.precursor_tolerance = t;
    }
    if let Some(t) = cli.fragment_tolerance {
        parameter.fragment_tolerance = t;
    }
    if let Some(b) = cli.hexnac {
        parameter.envelope.hexnac = b;
    }
    if let Some(b) = cli.hex {
        parameter.envelope.hex = b;
    }
    if let Some(b) = cli.fuc {
        parameter.envelope.fuc = b;
    }
    if let Some(b) = cli.neuac {
        parameter.envelope.neuac = b;
    }
    if let Some(b) = cli.neugc {
        parameter.envelope.neugc = b;
    }
    if let Some(n) = cli.max_missed_cleavages {
        parameter.max_missed_cleavages = n;
    }
    if !cli.proteases.is_empty() {
        parameter.proteases = cli.proteases.clone();
    }
    if let Some(n) = cli.min_peptide_length {
        parameter.min_peptide_length = n;
    }
    Ok(parameter)
}

fn run(cli: &Cli) -> Result<(), CustomError> {
    let parameter = build_parameter(cli)?;

    let fasta_text = fs::read_to_string(&cli.fasta).map_err(|e| {
        CustomError::error(format!("could not read FASTA file '{}'", cli.fasta.display()))
            .with_long_description(e.to_string())
    })?;
    let proteins = fasta::parse(&fasta_text)?;

    let spectra_text = fs::read_to_string(&cli.spectra).map_err(|e| {
        CustomError::error(format!("could not read spectrum file '{}'", cli.spectra.display()))
            .with_long_description(e.to_string())
    })?;
    let spectra = mgf::parse(&spectra_text)?;

    println!("Loaded {} protein(s), {} spectrum/spectra.", proteins.len(), spectra.len());

    let proteases = parameter.protease_set();
    let peptides: Vec<String> = proteins
        .iter()
        .flat_map(|protein| digest::digest_with_all(&proteases, &protein.sequence, parameter.max_missed_cleavages))
        .filter(|peptide| {
            peptide.len() >= parameter.min_peptide_length && !find_n_glycan_sites(peptide).is_empty()
        })
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();
    println!("{} candidate N-glycosylated peptide(s) after digestion.", peptides.len());

    let builder = GlycanBuilder::new(parameter.candidate_sugars());
    let glycans = builder.build(&parameter.envelope.to_envelope());
    println!(
        "Built {} glycan structure(s) across {} composition(s).",
        glycans.structures.len(),
        glycans.isomers.len()
    );

    let matcher = SpectrumMatcher::new(parameter.fragment_tolerance);

    let hits: Vec<(String, glycosearch::matcher::SearchResult)> = spectra
        .par_iter()
        .filter_map(|spectrum| {
            let candidates = MatchResultStore::build(
                spectrum.precursor_mass(),
                parameter.precursor_tolerance,
                &peptides,
                &glycans,
            );
            matcher.search(&candidates, &glycans, spectrum).map(|result| (spectrum.scan.clone(), result))
        })
        .collect();

    println!("{} spectrum/spectra produced an identification.", hits.len());

    let mut aggregator = ResultAggregator::new();
    aggregator.extend(hits);
    let results = aggregator.into_results();

    let mut csv = String::from("scan#,peptide,glycan,score\n");
    for scan_result in &results {
        csv.push_str(&format!(
            "{},{},{},{}\n",
            scan_result.scan, scan_result.result.peptide, scan_result.result.glycan, scan_result.result.score
        ));
    }
    fs::write(&cli.out, csv).map_err(|e| {
        CustomError::error(format!("could not write output CSV '{}'", cli.out.display()))
            .with_long_description(e.to_string())
    })?;

    println!("Wrote {} identification(s) to {}.", results.len(), cli.out.display());
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
