//! Monoisotopic mass tables and ion/peptide/glycan mass functions (C1).
//!
//! All constants here are fixed and documented; there is no runtime
//! configurability of the underlying atomic masses, matching the
//! mass-table contract in the system design.

use crate::glycan::Monosaccharide;

/// Monoisotopic mass of hydrogen-1.
pub const H: f64 = 1.007_825_032;
/// Monoisotopic mass of carbon-12 (exact, by definition of the dalton).
pub const C: f64 = 12.0;
/// Monoisotopic mass of nitrogen-14.
pub const N: f64 = 14.003_074_004;
/// Monoisotopic mass of oxygen-16.
pub const O: f64 = 15.994_914_620;

/// Mass of a water molecule, lost on peptide bond formation and gained
/// back as the C-terminal/N-terminal caps of an intact peptide.
pub const WATER: f64 = 2.0 * H + O;

/// Mass of a proton, used to convert between neutral mass and m/z.
/// Distinct from [`H`] (the neutral hydrogen atom mass) because charge
/// carriers here are protons, not hydrogen atoms.
pub const PROTON: f64 = 1.007_276_467;

/// Monoisotopic residue masses (residue = amino acid minus water) for
/// the twenty canonical amino acids, keyed by one-letter code.
const fn residue_mass(aa: u8) -> Option<f64> {
    Some(match aa {
        b'G' => 57.021_464,
        b'A' => 71.037_114,
        b'S' => 87.032_028,
        b'P' => 97.052_764,
        b'V' => 99.068_414,
        b'T' => 101.047_678,
        b'C' => 103.009_185,
        b'L' => 113.084_064,
        b'I' => 113.084_064,
        b'N' => 114.042_927,
        b'D' => 115.026_943,
        b'Q' => 128.058_578,
        b'K' => 128.094_963,
        b'E' => 129.042_593,
        b'M' => 131.040_485,
        b'H' => 137.058_912,
        b'F' => 147.068_414,
        b'R' => 156.101_111,
        b'Y' => 163.063_329,
        b'W' => 186.079_313,
        _ => return None,
    })
}

/// The six ion types produced by peptide backbone fragmentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ion {
    /// a ions: N-terminal fragment, `-2O -H -C` relative to `peptide_mass`.
    A,
    /// b ions: N-terminal fragment, `-O -H` relative to `peptide_mass`.
    B,
    /// c ions: N-terminal fragment, `-O +2H +N` relative to `peptide_mass`.
    C,
    /// x ions: C-terminal fragment, `+C +O -H` relative to `peptide_mass`.
    X,
    /// y ions: C-terminal fragment, `+H` relative to `peptide_mass`.
    Y,
    /// z ions: C-terminal fragment, `-N -2H` relative to `peptide_mass`.
    Z,
}

impl Ion {
    /// The mass delta added to `peptide_mass(seq)` for this ion type.
    const fn delta(self) -> f64 {
        match self {
            Self::A => -2.0 * O - H - C,
            Self::B => -O - H,
            Self::C => -O + 2.0 * H + N,
            Self::X => C + O - H,
            Self::Y => H,
            Self::Z => -N - 2.0 * H,
        }
    }
}

/// The monoisotopic mass of a peptide sequence: the sum of residue
/// masses plus one water (the intact N- and C-termini).
///
/// # Panics
/// Panics if `seq` contains a byte that is not one of the twenty
/// canonical upper-case amino acid one-letter codes. Candidate
/// peptides always come from the digester, which never emits one.
pub fn peptide_mass(seq: &str) -> f64 {
    seq.bytes().fold(WATER, |acc, aa| {
        acc + residue_mass(aa).unwrap_or_else(|| panic!("unknown amino acid byte: {aa}"))
    })
}

/// The mass of a single fragment ion generated from `seq`, per the
/// canonical atomic-delta table for `ion`.
pub fn ion_mass(seq: &str, ion: Ion) -> f64 {
    peptide_mass(seq) + ion.delta()
}

/// The monoisotopic mass of a glycan composition: the sum, over every
/// monosaccharide present, of `count * residue_mass(monosaccharide)`.
pub fn glycan_mass(composition: &[(Monosaccharide, u32)]) -> f64 {
    composition
        .iter()
        .map(|(sugar, count)| f64::from(*count) * sugar.residue_mass())
        .sum()
}

/// The neutral monoisotopic mass implied by an observed `m/z` at the
/// given `charge`.
pub fn spectrum_mass(mz: f64, charge: i32) -> f64 {
    mz * f64::from(charge) - f64::from(charge) * PROTON
}

/// The `m/z` at which a neutral monoisotopic `mass` would be observed
/// at the given `charge`. The left inverse of [`spectrum_mass`].
pub fn mz_of(mass: f64, charge: i32) -> f64 {
    mass / f64::from(charge) + PROTON
}
