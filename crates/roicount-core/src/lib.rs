//! Roicount Core Types and Definitions
//!
//! This crate provides the foundational types for sorting cell markers into
//! the brain regions drawn on a microscopy section. It includes:
//!
//! - **Geometry**: Points, bounding boxes and polygons ([`geometry`] module)
//! - **Colors**: Color handling for ontology structures ([`color::Color`])
//! - **Sections**: Loaded annotation records ([`section`] module)
//! - **Ontology**: The structure-ontology contract and a file-backed
//!   implementation ([`ontology`] module)

pub mod color;
pub mod geometry;
pub mod ontology;
pub mod section;
