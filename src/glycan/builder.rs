//! Biosynthesis-constrained BFS enumeration of the glycan structure
//! space (C4), and the stores the matcher queries against it.
//!
//! The search space is a DAG, not a tree: different attachment orders
//! can reach the same canonical structure, so children are merged by
//! `id()` rather than kept as separate branches (`structure.rs`'s
//! `grow` already collapses this within one parent; the builder
//! additionally merges across parents).

use std::collections::{HashMap, HashSet, VecDeque};

use ordered_float::OrderedFloat;

use super::monosaccharide::{Category, Monosaccharide};
use super::structure::GlycanStructure;
use crate::mass;

/// Per-category maxima a built structure's composition must not
/// exceed to be reported as a search candidate. Categories absent from
/// `max` are treated as `0`. There is no minimum: a structure is in
/// the envelope as soon as none of its counts overshoot.
#[derive(Debug, Clone, Default)]
pub struct CompositionEnvelope {
    pub max: HashMap<Category, u32>,
}

impl CompositionEnvelope {
    /// An envelope capping each named category at the given count,
    /// e.g. the paucimannose core `HexNAc2Hex3`.
    pub fn capped(max_counts: &[(Category, u32)]) -> Self {
        Self { max: max_counts.iter().copied().collect() }
    }

    fn bound(&self, category: Category) -> u32 {
        self.max.get(&category).copied().unwrap_or(0)
    }

    /// Whether `composition` stays at or below the maximum in every
    /// category — the sole criterion a structure must meet to be a
    /// reportable candidate (and, equivalently, for a BFS branch built
    /// on top of it to still be worth growing further).
    pub fn contains(&self, composition: &HashMap<Category, u32>) -> bool {
        Category::ORDER.iter().all(|&cat| composition.get(&cat).copied().unwrap_or(0) <= self.bound(cat))
    }
}

/// The three stores the matcher queries: structures keyed by id,
/// composition names keyed to the structure ids that realize them, and
/// each structure id's ancestor ids (the partial structures on every
/// path from the bare site to it — the Y-ion ladder's building
/// blocks), plus each id's monoisotopic mass.
#[derive(Debug, Default)]
pub struct BuiltGlycans {
    /// All structures built within the envelope, keyed by `id()`.
    pub structures: HashMap<String, GlycanStructure>,
    /// `IsomerStore`: composition name → the structure ids realizing it.
    pub isomers: HashMap<String, HashSet<String>>,
    /// `SubsetStore`: structure id → every ancestor id reachable by
    /// walking back toward the bare site.
    pub subsets: HashMap<String, HashSet<String>>,
    /// `GlycanMassStore`: structure id → its monoisotopic mass(es). The
    /// builder only ever inserts one mass per id; the set-valued type
    /// is kept for forward compatibility (see `DESIGN.md`).
    pub masses: HashMap<String, HashSet<OrderedFloat<f64>>>,
}

impl BuiltGlycans {
    /// The ancestor ids of `id`, or an empty set if `id` is unknown.
    pub fn ancestors_of(&self, id: &str) -> HashSet<String> {
        self.subsets.get(id).cloned().unwrap_or_default()
    }

    /// A representative monoisotopic mass for a composition `name`, i.e.
    /// the mass shared by every isomer in `isomers[name]`. Sound because
    /// `Man`/`Gal` (the two monosaccharides folded into `Category::Hex`)
    /// share an identical residue mass, so every structure realizing the
    /// same composition name has the same total mass regardless of which
    /// isomer it is.
    pub fn mass_of_name(&self, name: &str) -> Option<f64> {
        let id = self.isomers.get(name)?.iter().min()?;
        self.masses.get(id)?.iter().next().map(|m| m.0)
    }
}

fn glycan_mass_of(structure: &GlycanStructure) -> f64 {
    let composition: Vec<(Monosaccharide, u32)> = structure.composition().into_iter().collect();
    mass::glycan_mass(&composition)
}

/// Enumerates the N-glycan structure space by breadth-first growth,
/// one monosaccharide at a time, from the bare glycosylation site.
#[derive(Debug, Clone)]
pub struct GlycanBuilder {
    candidates: Vec<Monosaccharide>,
}

impl Default for GlycanBuilder {
    /// The default candidate set and order used throughout this
    /// engine: every monosaccharide except `NeuGc`.
    fn default() -> Self {
        Self { candidates: Monosaccharide::DEFAULT_CANDIDATES.to_vec() }
    }
}

impl GlycanBuilder {
    /// Build with an explicit candidate set and order.
    pub fn new(candidates: Vec<Monosaccharide>) -> Self {
        Self { candidates }
    }

    /// Breadth-first enumeration of every structure whose composition
    /// stays within `envelope`'s maxima, stopping each branch as soon
    /// as it overshoots. Every structure that survives this check is
    /// recorded in `isomers`/`masses`, not just leaves or a further
    /// minimum-bounded subset — the envelope has no minimum, so every
    /// visited id is a reportable candidate.
    pub fn build(&self, envelope: &CompositionEnvelope) -> BuiltGlycans {
        let mut out = BuiltGlycans::default();
        let mut queue: VecDeque<GlycanStructure> = VecDeque::new();
        queue.push_back(GlycanStructure::root());
        out.structures.insert(String::new(), GlycanStructure::root());

        while let Some(parent) = queue.pop_front() {
            let parent_id = parent.id();
            let parent_ancestors = out.subsets.get(&parent_id).cloned().unwrap_or_default();

            for &sugar in &self.candidates {
                for child in parent.grow(sugar) {
                    let child_composition: HashMap<Category, u32> =
                        child.category_composition().into_iter().collect();
                    if !envelope.contains(&child_composition) {
                        continue;
                    }

                    let child_id = child.id();
                    let mut ancestors = parent_ancestors.clone();
                    if !parent_id.is_empty() {
                        ancestors.insert(parent_id.clone());
                    }
                    out.subsets.entry(child_id.clone()).or_default().extend(ancestors);

                    if out.structures.contains_key(&child_id) {
                        continue;
                    }

                    out.isomers.entry(child.name()).or_default().insert(child_id.clone());
                    out.masses
                        .entry(child_id.clone())
                        .or_default()
                        .insert(OrderedFloat(glycan_mass_of(&child)));

                    out.structures.insert(child_id.clone(), child.clone());
                    queue.push_back(child);
                }
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_envelope_yields_exactly_the_trimannosyl_core() {
        // The paucimannose core HexNAc2Hex3, only GlcNAc/Man candidates.
        let builder = GlycanBuilder::new(vec![Monosaccharide::GlcNAc, Monosaccharide::Man]);
        let envelope = CompositionEnvelope::capped(&[(Category::HexNAc, 2), (Category::Hex, 3)]);
        let built = builder.build(&envelope);

        let ids = built.isomers.get("HexNAc2Hex3").expect("core composition must be built");
        assert_eq!(ids.len(), 1, "the minimal core has exactly one isomer");

        let id = ids.iter().next().unwrap();
        assert_eq!(built.masses.get(id).map(HashSet::len), Some(1));

        // Every structure on the path to the core (the single root
        // GlcNAc, the chitobiose pair, and the beta-Man) must be
        // recorded as an ancestor, but not the final id itself.
        let ancestors = built.ancestors_of(id);
        assert_eq!(ancestors.len(), 3);
        assert!(!ancestors.contains(id));
    }

    #[test]
    fn envelope_prunes_branches_that_overshoot() {
        let builder = GlycanBuilder::default();
        let envelope = CompositionEnvelope::capped(&[(Category::HexNAc, 2), (Category::Hex, 3)]);
        let built = builder.build(&envelope);

        for structure in built.structures.values() {
            let composition: HashMap<Category, u32> =
                structure.category_composition().into_iter().collect();
            assert!(envelope.contains(&composition));
        }
    }

    #[test]
    fn fucosylated_and_bare_cores_both_fit_a_maxima_only_envelope() {
        let builder = GlycanBuilder::new(vec![Monosaccharide::GlcNAc, Monosaccharide::Man, Monosaccharide::Fuc]);
        let envelope =
            CompositionEnvelope::capped(&[(Category::HexNAc, 2), (Category::Hex, 3), (Category::Fuc, 1)]);
        let built = builder.build(&envelope);

        // With no minimum, the bare core (Fuc=0) is just as reportable
        // as its fucosylated extension (Fuc=1) — both stay at or below
        // every cap.
        assert!(built.isomers.get("HexNAc2Hex3Fuc1").is_some());
        assert!(built.isomers.get("HexNAc2Hex3").is_some());
    }
}
