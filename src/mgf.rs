//! Minimal MGF-like spectrum reader (A5): `BEGIN IONS`/`END IONS`
//! blocks containing `KEY=value` header lines and `<m/z> <intensity>`
//! peak lines.

use crate::error::{Context, CustomError};
use crate::spectrum::{Peak, Spectrum, SpectrumKind};

/// Parse an MGF-like text into its spectra.
///
/// # Errors
/// Returns a [`CustomError`] for unbalanced `BEGIN IONS`/`END IONS`
/// blocks, data outside a block, or a header/peak line that can't be
/// parsed as the field it claims to be.
pub fn parse(text: &str) -> Result<Vec<Spectrum>, CustomError> {
    let mut spectra = Vec::new();
    let mut in_block = false;
    let mut scan = String::new();
    let mut kind = SpectrumKind::EThcD;
    let mut precursor_mz = 0.0_f64;
    let mut precursor_charge = 1_i32;
    let mut peaks: Vec<Peak> = Vec::new();

    for (line_index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("BEGIN IONS") {
            in_block = true;
            scan.clear();
            kind = SpectrumKind::EThcD;
            precursor_mz = 0.0;
            precursor_charge = 1;
            peaks = Vec::new();
            continue;
        }
        if line.eq_ignore_ascii_case("END IONS") {
            if !in_block {
                return Err(CustomError::error("END IONS without a matching BEGIN IONS")
                    .with_context(Context::line(line_index, line)));
            }
            spectra.push(Spectrum {
                scan: scan.clone(),
                kind,
                precursor_mz,
                precursor_charge,
                peaks: std::mem::take(&mut peaks),
            });
            in_block = false;
            continue;
        }
        if !in_block {
            return Err(CustomError::error("peak or header data outside a BEGIN IONS/END IONS block")
                .with_context(Context::line(line_index, line)));
        }

        if let Some(value) = line.strip_prefix("TITLE=") {
            scan = value.to_owned();
        } else if let Some(value) = line.strip_prefix("SCANS=") {
            scan = value.to_owned();
        } else if let Some(value) = line.strip_prefix("TYPE=") {
            kind = if value.eq_ignore_ascii_case("MS") { SpectrumKind::Ms } else { SpectrumKind::EThcD };
        } else if let Some(value) = line.strip_prefix("PEPMASS=") {
            precursor_mz = value
                .split_whitespace()
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| malformed(line_index, line, "PEPMASS"))?;
        } else if let Some(value) = line.strip_prefix("CHARGE=") {
            let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
            precursor_charge =
                digits.parse().map_err(|_| malformed(line_index, line, "CHARGE"))?;
        } else {
            let mut fields = line.split_whitespace();
            let mz: f64 = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| malformed(line_index, line, "peak m/z"))?;
            let intensity: f64 = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| malformed(line_index, line, "peak intensity"))?;
            peaks.push(Peak::new(mz, intensity));
        }
    }

    if in_block {
        return Err(CustomError::error("unterminated BEGIN IONS block (missing END IONS)"));
    }
    Ok(spectra)
}

fn malformed(line_index: usize, line: &str, field: &str) -> CustomError {
    CustomError::error(format!("expected a numeric {field}")).with_context(Context::line(line_index, line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_two_spectra_with_headers_and_peaks() {
        let text = "\
BEGIN IONS
TITLE=scan=1
PEPMASS=1000.5 5000
CHARGE=2+
204.0867 9000.0
366.1395 2000.0
END IONS
BEGIN IONS
SCANS=2
PEPMASS=850.25
CHARGE=1
175.119 500.0
END IONS
";
        let spectra = parse(text).unwrap();
        assert_eq!(spectra.len(), 2);
        assert_eq!(spectra[0].scan, "scan=1");
        assert_eq!(spectra[0].precursor_charge, 2);
        assert_eq!(spectra[0].peaks.len(), 2);
        assert_eq!(spectra[1].precursor_charge, 1);
    }

    #[test]
    fn rejects_unterminated_block() {
        assert!(parse("BEGIN IONS\nPEPMASS=1.0\nCHARGE=1\n").is_err());
    }

    #[test]
    fn rejects_peak_data_outside_a_block() {
        assert!(parse("204.0 9000.0\n").is_err());
    }
}
