//! The closed set of monosaccharides this engine reasons about, and the
//! glycomics categories used for composition envelopes and names.

use std::fmt;

/// A single monosaccharide residue kind. Closed set per the system's
/// data model: only these six participate in N-glycan search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Monosaccharide {
    /// N-acetylglucosamine.
    GlcNAc,
    /// Mannose.
    Man,
    /// Galactose.
    Gal,
    /// Fucose (deoxyhexose).
    Fuc,
    /// N-acetylneuraminic acid (sialic acid).
    NeuAc,
    /// N-glycolylneuraminic acid (sialic acid).
    NeuGc,
}

impl Monosaccharide {
    /// All six monosaccharides, in a fixed canonical order used
    /// wherever a deterministic iteration order matters (id/name
    /// generation, default candidate ordering).
    pub const ALL: [Self; 6] = [
        Self::GlcNAc,
        Self::Man,
        Self::Gal,
        Self::Fuc,
        Self::NeuAc,
        Self::NeuGc,
    ];

    /// The default candidate sugar set and order used by the glycan
    /// builder: every monosaccharide except `NeuGc`.
    pub const DEFAULT_CANDIDATES: [Self; 5] =
        [Self::GlcNAc, Self::Man, Self::Gal, Self::Fuc, Self::NeuAc];

    /// The monoisotopic residue mass (i.e. after the loss of water on
    /// glycosidic bond formation) of this monosaccharide.
    pub const fn residue_mass(self) -> f64 {
        match self {
            // C8H13NO5
            Self::GlcNAc => 203.079_373,
            // C6H10O5 (Man and Gal are both hexoses: identical formula, identical mass)
            Self::Man | Self::Gal => 162.052_824,
            // C6H10O4
            Self::Fuc => 146.057_909,
            // C11H17NO8
            Self::NeuAc => 291.095_417,
            // C11H17NO9
            Self::NeuGc => 307.090_331,
        }
    }

    /// The glycomics category this monosaccharide is folded into for
    /// composition envelopes and `name()` strings. `Man` and `Gal` both
    /// fold into `Hex`.
    pub const fn category(self) -> Category {
        match self {
            Self::GlcNAc => Category::HexNAc,
            Self::Man | Self::Gal => Category::Hex,
            Self::Fuc => Category::Fuc,
            Self::NeuAc => Category::NeuAc,
            Self::NeuGc => Category::NeuGc,
        }
    }

    /// The one-letter-ish abbreviation used in `id()` strings (the
    /// literal monosaccharide, not its category).
    const fn code(self) -> &'static str {
        match self {
            Self::GlcNAc => "GlcNAc",
            Self::Man => "Man",
            Self::Gal => "Gal",
            Self::Fuc => "Fuc",
            Self::NeuAc => "NeuAc",
            Self::NeuGc => "NeuGc",
        }
    }
}

impl fmt::Display for Monosaccharide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The five glycomics categories used by composition envelopes and by
/// `Glycan::name()`. `HexNAc` and `Hex` each fold multiple
/// [`Monosaccharide`] variants together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// N-acetylhexosamine count (`GlcNAc`).
    HexNAc,
    /// Hexose count (`Man` + `Gal`).
    Hex,
    /// Deoxyhexose count (`Fuc`).
    Fuc,
    /// Sialic acid count (`NeuAc`).
    NeuAc,
    /// Sialic acid count (`NeuGc`).
    NeuGc,
}

impl Category {
    /// Fixed iteration order used when rendering a `name()` string, so
    /// names are stable across runs: `HexNAc`, `Hex`, `Fuc`, `NeuAc`,
    /// `NeuGc`.
    pub const ORDER: [Self; 5] = [
        Self::HexNAc,
        Self::Hex,
        Self::Fuc,
        Self::NeuAc,
        Self::NeuGc,
    ];

    const fn code(self) -> &'static str {
        match self {
            Self::HexNAc => "HexNAc",
            Self::Hex => "Hex",
            Self::Fuc => "Fuc",
            Self::NeuAc => "NeuAc",
            Self::NeuGc => "NeuGc",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
