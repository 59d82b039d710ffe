//! Core data types shared by every pipeline stage.
//!
//! ## Module Structure
//!
//! - `component`: CanonicalComponent (the library's export surface)
//! - `usage`: UsageRecord, PropRecord, PropValue, Customization
//! - `report`: ComponentStats, OverallStats, UnifiedReport

pub mod component;
pub mod report;
pub mod usage;

pub use component::CanonicalComponent;
pub use report::{
    ComponentStats, CustomizationStats, NamedCount, OverallStats, UnifiedReport, NOT_FOUND,
};
pub use usage::{Customization, PropKind, PropRecord, PropValue, UsageRecord};
