//! Library side of the `chainlab` binary: configuration, logging and the
//! demo sessions, kept here so they can be tested without a terminal.

pub mod config;
pub mod hospital;
pub mod logging;
pub mod note;
pub mod rag;
pub mod repl;
pub mod travel;

#[cfg(test)]
mod testing;

pub use config::AppConfig;
pub use hospital::HospitalSession;
pub use note::{PatientNoteSummary, summarize_note};
pub use rag::RagSession;
pub use repl::ChatSession;
pub use travel::{TravelConfig, TravelPlan, TravelPlanner, TravelRequest};
