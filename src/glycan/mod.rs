//! N-glycan data model: the monosaccharide alphabet, the structure
//! tree built from it, and the BFS builder that enumerates the
//! structure space within a composition envelope.

mod builder;
mod monosaccharide;
mod structure;

pub use builder::{BuiltGlycans, CompositionEnvelope, GlycanBuilder};
pub use monosaccharide::{Category, Monosaccharide};
pub use structure::GlycanStructure;
