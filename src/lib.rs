//! Ranks the files of a git repository by how bug-prone they look, from
//! seven history signals combined into one weighted 0–100 score.
//!
//! ```no_run
//! use git_hotspots::engine::{analyze_repo, AnalysisOptions, Outcome};
//!
//! let outcome = analyze_repo(std::path::Path::new("."), &AnalysisOptions::default())?;
//! if let Outcome::Report(report) = outcome {
//!     for r in report.results.iter().take(5) {
//!         println!("{:>3} {}", r.hotspot_score, r.file);
//!     }
//! }
//! # Ok::<(), git_hotspots::error::ScanError>(())
//! ```

pub mod analyzers;
pub mod config;
pub mod engine;
pub mod error;
pub mod filters;
pub mod git;
pub mod reporters;
pub mod scoring;
pub mod types;

pub use engine::{analyze_history, analyze_repo, AnalysisOptions, Outcome};
pub use error::{Result, ScanError};
