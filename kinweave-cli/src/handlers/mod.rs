//! Command handlers for the kinweave CLI

pub mod catalog;

pub use catalog::{
    ConflictReport, KindReport, WorkerSource, conflict_report, handle_allowed, handle_check,
    handle_conflicts, handle_inverses, handle_report, kind_report,
};
