//! Core signal-cleaning and record management for time-resolved pump-probe
//! reflectivity scans.
//!
//! The modules mirror the acquisition workflow: an import adapter hands over
//! a [`RawRecord`], [`TransientRecord`] derives the experiment metadata and
//! drives the [`cleaning::CleaningPipeline`], and every transformation lands
//! in the [`provenance::ProvenanceLog`] so a cleaned trace stays auditable
//! and reproducible.

pub mod cleaning;
pub mod math;
pub mod metadata;
pub mod prelude;
pub mod provenance;
pub mod record;

pub use prelude::{CleanConfig, CleanError, CleanResult, TraceData, TraceStage};
pub use record::{RawRecord, TransientRecord};
