//! The N-glycan structure tree (C3): an arena of [`Monosaccharide`]
//! nodes, growth rules that encode N-glycan biosynthesis, and the
//! canonical `id`/`name` strings used to key the glycan stores.
//!
//! Structures are kept as an arena of nodes addressed by index rather
//! than as a tree of owned/shared pointers, so that only the small
//! `id`/`name`/mass triple needs to be retained once the builder has
//! moved past a node.

use std::collections::BTreeMap;

use itertools::Itertools;

use super::monosaccharide::{Category, Monosaccharide};

#[derive(Debug, Clone)]
struct GlycanNode {
    sugar: Monosaccharide,
    children: Vec<usize>,
}

/// A single N-glycan structure: a rooted tree of monosaccharides
/// consistent with the canonical N-glycan core and antenna extension
/// rules (`NGlycanComplex`, the only variant this engine builds).
///
/// An empty structure (`GlycanStructure::root()`) represents the bare
/// glycosylation site before any sugar has been attached.
#[derive(Debug, Clone, Default)]
pub struct GlycanStructure {
    arena: Vec<GlycanNode>,
}

impl GlycanStructure {
    /// The empty structure: no sugars attached yet.
    pub fn root() -> Self {
        Self { arena: Vec::new() }
    }

    /// Whether this is the empty root structure.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    fn parent_of(&self, idx: usize) -> Option<usize> {
        self.arena.iter().position(|n| n.children.contains(&idx))
    }

    /// Whether attaching `sugar` as a new child of `self.arena[idx]` is
    /// a legal biosynthetic step. Encodes the N-glycan growth grammar:
    /// core chitobiose and core fucosylation off the root, branching
    /// and antenna extension further out.
    fn can_attach_here(&self, idx: usize, sugar: Monosaccharide) -> bool {
        let node = &self.arena[idx];
        let parent_sugar = self.parent_of(idx).map(|p| self.arena[p].sugar);
        match (node.sugar, parent_sugar) {
            // Root: the sequon-attached GlcNAc. Accepts the second core
            // GlcNAc (chitobiose) and, independently, one Fuc (core
            // fucosylation).
            (Monosaccharide::GlcNAc, None) => match sugar {
                Monosaccharide::GlcNAc => {
                    !node.children.iter().any(|&c| self.arena[c].sugar == Monosaccharide::GlcNAc)
                }
                Monosaccharide::Fuc => {
                    !node.children.iter().any(|&c| self.arena[c].sugar == Monosaccharide::Fuc)
                }
                _ => false,
            },
            // Chitobiose-core GlcNAc (child of root): accepts the
            // beta-mannose that starts the trimannosyl core.
            (Monosaccharide::GlcNAc, Some(Monosaccharide::GlcNAc)) => {
                sugar == Monosaccharide::Man && node.children.is_empty()
            }
            // Beta-Man (child of the chitobiose GlcNAc): accepts up to
            // two alpha-Man antennae.
            (Monosaccharide::Man, Some(Monosaccharide::GlcNAc)) => {
                sugar == Monosaccharide::Man && node.children.len() < 2
            }
            // Antenna Man (child of beta-Man): accepts one GlcNAc that
            // initiates antenna extension.
            (Monosaccharide::Man, Some(Monosaccharide::Man)) => {
                sugar == Monosaccharide::GlcNAc && node.children.is_empty()
            }
            // Antenna-initiating GlcNAc (child of an antenna Man):
            // accepts one Gal.
            (Monosaccharide::GlcNAc, Some(Monosaccharide::Man)) => {
                sugar == Monosaccharide::Gal && node.children.is_empty()
            }
            // Antenna Gal: accepts a terminal sialic acid cap.
            (Monosaccharide::Gal, Some(Monosaccharide::GlcNAc)) => {
                matches!(sugar, Monosaccharide::NeuAc | Monosaccharide::NeuGc)
                    && node.children.is_empty()
            }
            // Fuc, NeuAc, NeuGc: terminal, no further growth.
            _ => false,
        }
    }

    /// Every distinct child structure obtainable by attaching one
    /// `sugar` at a legal site. Children whose canonical `id()`
    /// coincides are deduplicated.
    pub fn grow(&self, sugar: Monosaccharide) -> Vec<Self> {
        if self.arena.is_empty() {
            return if sugar == Monosaccharide::GlcNAc {
                vec![Self {
                    arena: vec![GlycanNode { sugar, children: Vec::new() }],
                }]
            } else {
                Vec::new()
            };
        }

        let mut children = Vec::new();
        for idx in 0..self.arena.len() {
            if self.can_attach_here(idx, sugar) {
                let mut arena = self.arena.clone();
                let new_idx = arena.len();
                arena.push(GlycanNode { sugar, children: Vec::new() });
                arena[idx].children.push(new_idx);
                children.push(Self { arena });
            }
        }

        children
            .into_iter()
            .unique_by(Self::id)
            .collect()
    }

    /// The full multiset of monosaccharides in this structure.
    pub fn composition(&self) -> BTreeMap<Monosaccharide, u32> {
        let mut map = BTreeMap::new();
        for node in &self.arena {
            *map.entry(node.sugar).or_insert(0) += 1;
        }
        map
    }

    /// The glycomics category composition (`HexNAc`/`Hex`/`Fuc`/`NeuAc`/`NeuGc`
    /// counts), used by the composition envelope and by `name()`.
    pub fn category_composition(&self) -> BTreeMap<Category, u32> {
        let mut map = BTreeMap::new();
        for node in &self.arena {
            *map.entry(node.sugar.category()).or_insert(0) += 1;
        }
        map
    }

    fn node_id(&self, idx: usize) -> String {
        let node = &self.arena[idx];
        if node.children.is_empty() {
            node.sugar.to_string()
        } else {
            let mut child_ids = node.children.iter().map(|&c| self.node_id(c)).collect_vec();
            child_ids.sort_unstable();
            format!("{}({})", node.sugar, child_ids.join(","))
        }
    }

    /// The canonical structure id: a deterministic function of the
    /// rooted tree shape, stable across structurally-identical trees
    /// built via different attachment orders (children are sorted
    /// before rendering).
    pub fn id(&self) -> String {
        if self.arena.is_empty() {
            String::new()
        } else {
            self.node_id(0)
        }
    }

    /// The canonical composition name, e.g. `HexNAc2Hex3Fuc1NeuAc2`.
    /// A deterministic function of the multiset `category_composition`.
    pub fn name(&self) -> String {
        name_from_category_composition(&self.category_composition())
    }

    /// Parse a `name()` string back into its category composition.
    /// Left inverse of `name()` (not of the finer-grained
    /// `Monosaccharide`-level `composition()`, since `Man` and `Gal`
    /// both collapse into `Hex` and that split cannot be recovered from
    /// the name alone).
    pub fn interpret(name: &str) -> BTreeMap<Category, u32> {
        let mut map = BTreeMap::new();
        let mut rest = name;
        while !rest.is_empty() {
            let Some(category) = Category::ORDER.iter().find(|c| rest.starts_with(&c.to_string()))
            else {
                break;
            };
            rest = &rest[category.to_string().len()..];
            let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
            if digits_len == 0 {
                break;
            }
            let count: u32 = rest[..digits_len].parse().unwrap_or(0);
            rest = &rest[digits_len..];
            if count > 0 {
                map.insert(*category, count);
            }
        }
        map
    }
}

fn name_from_category_composition(composition: &BTreeMap<Category, u32>) -> String {
    Category::ORDER
        .iter()
        .filter_map(|cat| composition.get(cat).filter(|&&n| n > 0).map(|n| format!("{cat}{n}")))
        .join("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core() -> GlycanStructure {
        let mut g = GlycanStructure::root();
        g = g.grow(Monosaccharide::GlcNAc).remove(0);
        g = g.grow(Monosaccharide::GlcNAc).remove(0);
        g = g.grow(Monosaccharide::Man).remove(0);
        g
    }

    #[test]
    fn empty_only_grows_glcnac() {
        let g = GlycanStructure::root();
        assert_eq!(g.grow(Monosaccharide::Man).len(), 0);
        assert_eq!(g.grow(Monosaccharide::GlcNAc).len(), 1);
    }

    #[test]
    fn trimannosyl_core_accepts_two_antennae_then_stops() {
        let beta_man = core();
        let with_one = beta_man.grow(Monosaccharide::Man);
        assert_eq!(with_one.len(), 1);
        let with_two = with_one[0].grow(Monosaccharide::Man);
        assert_eq!(with_two.len(), 1);
        // A third antenna Man has no legal attachment point.
        assert_eq!(with_two[0].grow(Monosaccharide::Man).len(), 0);
    }

    #[test]
    fn symmetric_antennae_deduplicate_by_id() {
        let beta_man = core();
        let two_antennae = beta_man
            .grow(Monosaccharide::Man)
            .remove(0)
            .grow(Monosaccharide::Man)
            .remove(0);
        // Both antenna Man leaves are legal (and symmetric) attachment
        // points for an initiating GlcNAc; the resulting trees must
        // collapse to one canonical id.
        let grown = two_antennae.grow(Monosaccharide::GlcNAc);
        assert_eq!(grown.len(), 1);
    }

    #[test]
    fn name_round_trips_through_category_composition() {
        let beta_man = core();
        let two_antennae = beta_man
            .grow(Monosaccharide::Man)
            .remove(0)
            .grow(Monosaccharide::Man)
            .remove(0);
        assert_eq!(two_antennae.name(), "HexNAc2Hex3");
        assert_eq!(
            GlycanStructure::interpret(&two_antennae.name()),
            two_antennae.category_composition()
        );
    }

    #[test]
    fn fucosylation_attaches_once_to_root() {
        let g = core();
        let fucosylated = g.grow(Monosaccharide::Fuc);
        assert_eq!(fucosylated.len(), 1);
        assert_eq!(fucosylated[0].grow(Monosaccharide::Fuc).len(), 0);
    }
}
