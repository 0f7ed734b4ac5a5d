#![doc = include_str!("../README.md")]

pub mod config;
pub mod correlate;
pub mod diag;
pub mod error;
pub mod locator;
pub mod osv;
pub mod parser;
pub mod report;
pub mod scanner;
pub mod types;
pub mod version;

pub use config::{DepScannerConfig, DepScannerConfigBuilder};
pub use diag::{CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
pub use error::DepScannerError;
pub use locator::ManifestLocator;
pub use osv::{AdvisoryProvider, OsvClient};
pub use report::format_report;
pub use scanner::{DepScanner, DepScannerBuilder, ScannerStats};
pub use types::{Dependency, Ecosystem, ScanResult, SeverityCounts, VulnerabilityReport};
