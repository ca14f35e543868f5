//! FTTH optical path tracer.
//!
//! Given a splitter inside a splice box, this crate walks the fiber
//! connection graph upstream (through fusions, cascaded splitters, patch
//! panels and cables between boxes) until it reaches an OLT port, then
//! reports the accumulated loss and the received power budget.
//!
//! The binary `fibertrace` traces or audits a project snapshot stored as JSON.

pub mod audit;
pub mod budget;
pub mod catalog;
pub mod config;
pub mod error;
pub mod geo;
pub mod graph;
pub mod model;
pub mod project;
pub mod trace;

pub use budget::{OpticalPathResult, PathElement, SignalStatus, Termination};
pub use config::TraceConfig;
pub use error::TraceError;
pub use trace::{PathTracer, trace_path};
