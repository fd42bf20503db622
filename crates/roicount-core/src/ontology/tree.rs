//! File-backed structure ontology.
//!
//! Structures are read from a JSON document in the shape served by brain
//! atlas APIs: either a bare array of structure records or an object holding
//! that array under `structures` (or `msg`). Each record names its parent by
//! id; depth and ancestry are derived when the tree is built.
//!
//! ```json
//! [
//!   {"id": 8, "acronym": "grey", "name": "Basic cell groups and regions", "parent_structure_id": null},
//!   {"id": 688, "acronym": "CTX", "name": "Cerebral cortex", "parent_structure_id": 8, "color_hex_triplet": "B0FFB8"}
//! ]
//! ```

use std::{cmp::Ordering, collections::HashMap};

use log::debug;
use serde::Deserialize;
use thiserror::Error;

use super::{Ontology, StructureNode};
use crate::color::Color;

/// Errors raised while building a [`StructureTree`]
#[derive(Debug, Error)]
pub enum OntologyError {
    #[error("invalid ontology document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("structure id {0} appears more than once")]
    DuplicateId(u32),

    #[error("acronym `{0}` is used by more than one structure")]
    DuplicateAcronym(String),

    #[error("structure {id} refers to missing parent {parent}")]
    MissingParent { id: u32, parent: u32 },

    #[error("structure {id} is part of a parent cycle")]
    Cycle { id: u32 },

    #[error("the ontology has no root structure")]
    NoRoot,

    #[error("the ontology has more than one root: {first} and {second}")]
    MultipleRoots { first: u32, second: u32 },

    #[error("structure `{acronym}` has an invalid color: {message}")]
    InvalidColor { acronym: String, message: String },
}

/// One structure as stored in an ontology document.
///
/// Fields other than the ones below are ignored, so full atlas exports can
/// be used as they are.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StructureRecord {
    id: u32,
    acronym: String,
    name: String,
    #[serde(default)]
    parent_structure_id: Option<u32>,
    #[serde(default)]
    color_hex_triplet: Option<String>,
    #[serde(default)]
    graph_order: Option<u32>,
}

impl StructureRecord {
    /// Creates a record with no color and no explicit graph order.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique structure id
    /// * `acronym` - Lookup key
    /// * `name` - Full structure name
    /// * `parent` - Parent id, `None` for the root
    pub fn new(
        id: u32,
        acronym: impl Into<String>,
        name: impl Into<String>,
        parent: Option<u32>,
    ) -> Self {
        Self {
            id,
            acronym: acronym.into(),
            name: name.into(),
            parent_structure_id: parent,
            color_hex_triplet: None,
            graph_order: None,
        }
    }

    /// Sets the display color as a hex triplet
    pub fn with_color(mut self, hex: impl Into<String>) -> Self {
        self.color_hex_triplet = Some(hex.into());
        self
    }

    /// Sets the position of the structure in a depth-first listing
    pub fn with_graph_order(mut self, graph_order: u32) -> Self {
        self.graph_order = Some(graph_order);
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StructureDocument {
    List(Vec<StructureRecord>),
    Wrapped {
        #[serde(alias = "msg")]
        structures: Vec<StructureRecord>,
    },
}

/// A structure of a [`StructureTree`].
///
/// Structures order by depth first, then by graph order, then by id.
#[derive(Debug, Clone)]
pub struct Structure {
    id: u32,
    acronym: String,
    name: String,
    parent_id: Option<u32>,
    depth: usize,
    graph_order: u32,
    color: Option<Color>,
    /// Ids from the root down to this structure, inclusive
    path: Vec<u32>,
}

impl Structure {
    /// Returns the structure id
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Returns the parent id, `None` for the root
    pub fn parent_id(&self) -> Option<u32> {
        self.parent_id
    }

    /// Returns the number of ancestors of the structure; the root has depth 0
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn order_key(&self) -> (usize, u32, u32) {
        (self.depth, self.graph_order, self.id)
    }
}

impl PartialEq for Structure {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Structure {}

impl PartialOrd for Structure {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Structure {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }
}

impl StructureNode for Structure {
    fn acronym(&self) -> &str {
        &self.acronym
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn color(&self) -> Option<Color> {
        self.color
    }

    fn contains(&self, other: &Self) -> bool {
        other.path.len() > self.path.len() && other.path[self.depth] == self.id
    }
}

/// An in-memory structure ontology with case-sensitive acronym lookup.
///
/// # Examples
///
/// ```
/// use roicount_core::ontology::{Ontology, StructureNode, StructureRecord, StructureTree};
///
/// let tree = StructureTree::from_records(vec![
///     StructureRecord::new(1, "grey", "Grey matter", None),
///     StructureRecord::new(2, "CTX", "Cerebral cortex", Some(1)),
///     StructureRecord::new(3, "CNU", "Cerebral nuclei", Some(1)),
///     StructureRecord::new(4, "ACB", "Nucleus accumbens", Some(3)),
/// ])
/// .unwrap();
///
/// let cnu = tree.lookup("CNU").unwrap();
/// let acb = tree.lookup("ACB").unwrap();
/// assert!(cnu.contains(acb));
/// assert!(cnu < acb);
/// assert!(tree.lookup("acb").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct StructureTree {
    structures: Vec<Structure>,
    by_acronym: HashMap<String, usize>,
}

impl StructureTree {
    /// Parses a tree from a JSON ontology document.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError`] if the document is malformed or does not
    /// describe a single rooted tree.
    pub fn from_json(source: &str) -> Result<Self, OntologyError> {
        let document: StructureDocument = serde_json::from_str(source)?;
        let records = match document {
            StructureDocument::List(records) => records,
            StructureDocument::Wrapped { structures } => structures,
        };
        Self::from_records(records)
    }

    /// Builds a tree from structure records.
    ///
    /// Records without a graph order are ordered by their position in
    /// `records`.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError`] on duplicate ids or acronyms, missing
    /// parents, parent cycles, invalid colors, or anything other than exactly
    /// one root.
    pub fn from_records(
        records: impl IntoIterator<Item = StructureRecord>,
    ) -> Result<Self, OntologyError> {
        let records: Vec<StructureRecord> = records.into_iter().collect();

        let mut by_id = HashMap::with_capacity(records.len());
        let mut by_acronym = HashMap::with_capacity(records.len());
        let mut root: Option<u32> = None;
        for (index, record) in records.iter().enumerate() {
            if by_id.insert(record.id, index).is_some() {
                return Err(OntologyError::DuplicateId(record.id));
            }
            if by_acronym.insert(record.acronym.clone(), index).is_some() {
                return Err(OntologyError::DuplicateAcronym(record.acronym.clone()));
            }
            if record.parent_structure_id.is_none() {
                if let Some(first) = root {
                    return Err(OntologyError::MultipleRoots {
                        first,
                        second: record.id,
                    });
                }
                root = Some(record.id);
            }
        }
        if root.is_none() {
            return Err(OntologyError::NoRoot);
        }

        let mut structures = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let path = ancestry_path(record, &records, &by_id)?;
            let color = record
                .color_hex_triplet
                .as_deref()
                .map(Color::from_hex_triplet)
                .transpose()
                .map_err(|message| OntologyError::InvalidColor {
                    acronym: record.acronym.clone(),
                    message,
                })?;
            let graph_order = match record.graph_order {
                Some(order) => order,
                None => u32::try_from(index).unwrap_or(u32::MAX),
            };

            structures.push(Structure {
                id: record.id,
                acronym: record.acronym.clone(),
                name: record.name.clone(),
                parent_id: record.parent_structure_id,
                depth: path.len() - 1,
                graph_order,
                color,
                path,
            });
        }

        debug!(structures = structures.len(); "Structure tree built");

        Ok(Self {
            structures,
            by_acronym,
        })
    }

    /// Returns the number of structures in the tree
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    /// Returns true if the tree holds no structures
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

impl Ontology for StructureTree {
    type Node = Structure;

    fn lookup(&self, acronym: &str) -> Option<&Structure> {
        self.by_acronym
            .get(acronym)
            .map(|&index| &self.structures[index])
    }
}

/// Walks parent links from `record` up to the root and returns the ids from
/// the root down to `record`.
fn ancestry_path(
    record: &StructureRecord,
    records: &[StructureRecord],
    by_id: &HashMap<u32, usize>,
) -> Result<Vec<u32>, OntologyError> {
    let mut path = vec![record.id];
    let mut current = record;
    while let Some(parent) = current.parent_structure_id {
        // A path longer than the tree itself must revisit a node
        if path.len() > records.len() {
            return Err(OntologyError::Cycle { id: record.id });
        }
        let &index = by_id.get(&parent).ok_or(OntologyError::MissingParent {
            id: current.id,
            parent,
        })?;
        current = &records[index];
        path.push(current.id);
    }
    path.reverse();
    Ok(path)
}
