//! Structure-ontology contract.
//!
//! Region names are acronyms of brain structures in a hierarchical ontology
//! (cortex contains isocortex, which contains motor areas, and so on). Sorting
//! markers only needs a small view of that ontology, expressed by two traits:
//!
//! - [`Ontology`] - resolves an acronym to a node, or to nothing.
//! - [`StructureNode`] - a node with a depth-consistent total order and an
//!   ancestry predicate.
//!
//! [`StructureTree`] is the file-backed implementation used by the command
//! line tool; tests and embedders are free to provide their own.

mod tree;

pub use tree::{OntologyError, Structure, StructureRecord, StructureTree};

use crate::color::Color;

/// A node of a structure ontology.
///
/// The [`Ord`] implementation must be a total order consistent with depth:
/// whenever `a.contains(b)`, `a < b`. Sorting a set of nodes therefore puts
/// the shallowest first.
pub trait StructureNode: Ord {
    /// Returns the acronym the node is looked up by
    fn acronym(&self) -> &str;

    /// Returns a human-readable name for reports
    fn name(&self) -> &str {
        self.acronym()
    }

    /// Returns the display color of the structure, if known
    fn color(&self) -> Option<Color> {
        None
    }

    /// Returns true if `other` lies strictly below this node in the tree.
    ///
    /// A node does not contain itself.
    fn contains(&self, other: &Self) -> bool;
}

/// Read-only acronym lookup into a structure ontology.
///
/// Lookups must not change the answer for an acronym. The same instance is
/// shared by every section of a batch across worker threads, hence the
/// [`Sync`] bound.
pub trait Ontology: Sync {
    /// Node type returned by lookups
    type Node: StructureNode;

    /// Returns the node for `acronym`, or `None` if the ontology has no such
    /// structure.
    fn lookup(&self, acronym: &str) -> Option<&Self::Node>;
}
