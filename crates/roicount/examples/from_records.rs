//! Example: Counting markers from in-memory records
//!
//! This example demonstrates how to build an ontology and a section in code,
//! count the markers per region, and print the division summary.

use roicount::{
    SectionCounter,
    config::AppConfig,
    geometry::{Point, Polygon},
    ontology::{StructureRecord, StructureTree},
    section::{Region, Section, SectionMetadata},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A tiny ontology: root > CTX > HPF, root > TH
    let ontology = StructureTree::from_records([
        StructureRecord::new(997, "root", "root", None),
        StructureRecord::new(688, "CTX", "Cerebral cortex", Some(997)).with_color("B0FFB8"),
        StructureRecord::new(1089, "HPF", "Hippocampal formation", Some(688)).with_color("7ED04B"),
        StructureRecord::new(549, "TH", "Thalamus", Some(997)).with_color("FF7080"),
    ])?;

    let square = |min: f64, max: f64| {
        Polygon::new(vec![
            Point::new(min, min),
            Point::new(max, min),
            Point::new(max, max),
            Point::new(min, max),
        ])
    };

    // HPF is drawn inside the cortex outline; TH stands apart
    let regions = vec![
        Region::new("CTX", square(0.0, 100.0)?),
        Region::new("HPF", square(20.0, 40.0)?),
        Region::new("TH", square(200.0, 260.0)?),
    ];
    let markers = vec![
        Point::new(10.0, 10.0),
        Point::new(30.0, 30.0),
        Point::new(35.0, 22.0),
        Point::new(80.0, 60.0),
        Point::new(230.0, 230.0),
    ];
    let section = Section::new(markers, regions, SectionMetadata::default())?;

    let counter = SectionCounter::new(&ontology, AppConfig::default());
    let counts = counter.count(&section, "example")?;

    for (region, count) in counts.iter() {
        println!("{region}: {count}");
    }

    println!("\n{}", counter.summarize(&counts).to_tsv());

    Ok(())
}
