pub mod icon;
pub mod status;

pub use icon::{arcs_lit, render_icon};
pub use status::{ApRecord, ScanResult, StatusPanel, WifiInfo, render_scan};
