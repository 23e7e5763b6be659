//! Minimal FASTA reader (A4): one `Protein` per `>header` record, its
//! sequence the concatenation of every non-header line until the next
//! `>` or end of input.

use crate::error::{Context, CustomError};

/// A single FASTA record.
#[derive(Debug, Clone, PartialEq)]
pub struct Protein {
    pub header: String,
    pub sequence: String,
}

/// Parse a FASTA-formatted string into its records.
///
/// # Errors
/// Returns a [`CustomError`] if sequence data appears before the
/// first `>` header line.
pub fn parse(text: &str) -> Result<Vec<Protein>, CustomError> {
    let mut proteins = Vec::new();
    let mut current: Option<(String, String)> = None;

    for (line_index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            if let Some((header, sequence)) = current.take() {
                proteins.push(Protein { header, sequence });
            }
            current = Some((header.to_owned(), String::new()));
        } else {
            match &mut current {
                Some((_, sequence)) => sequence.push_str(line),
                None => {
                    return Err(CustomError::error("sequence data before any header line")
                        .with_context(Context::line(line_index, line))
                        .with_suggestion("FASTA records must start with a '>' header line"));
                }
            }
        }
    }

    if let Some((header, sequence)) = current.take() {
        proteins.push(Protein { header, sequence });
    }
    Ok(proteins)
}
