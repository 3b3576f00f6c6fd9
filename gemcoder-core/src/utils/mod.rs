pub mod project_scan;

pub use project_scan::{ProjectScan, ScanOptions, ScannedFile, scan_project};
