//! # BNS Export
//!
//! Publishes the facts of a deployment run (contract addresses, TLD → chain
//! mappings, ABIs) into JSON artifact files that other projects consume.
//!
//! - **Merge**: deep, right-biased union of new facts over an existing document
//! - **Exporter**: per-target read → merge → write, isolated per target
//!
//! ## Example
//!
//! ```rust,ignore
//! use bns_core::{ExportTarget, FactSet, PathParams};
//! use bns_export::ArtifactExporter;
//!
//! let exporter = ArtifactExporter::new();
//! let targets = [ExportTarget::directory("../app/config/contracts")];
//! let report = exporter.export_facts(&facts, &targets, &PathParams::new(97)).await;
//! assert!(report.is_success());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod exporter;
mod merge;

pub use exporter::{
    AbiArtifact, ArtifactExporter, CorruptDocumentPolicy, ExportReport, ExporterConfig,
    TargetOutcome,
};
pub use merge::{deep_merge, merge_facts};
