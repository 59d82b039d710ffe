//! Core analysis engine.
//!
//! ## Pipeline
//!
//! 1. **Locate**: list host source files and library component candidates (`locate`)
//! 2. **Directory**: parse the library export manifest into a frozen snapshot
//!    (`directory`, `snapshot`)
//! 3. **Extract**: parse each file and record component usages (`parsers`, `extract`)
//! 4. **Aggregate**: fold records into per-component statistics (`aggregate`)
//!
//! Reports from separate runs are combined by `merge`. `context` wires the
//! stages together.

pub mod aggregate;
pub mod context;
pub mod data;
pub mod directory;
pub mod extract;
pub mod locate;
pub mod merge;
pub mod parsers;
pub mod snapshot;
pub mod versions;

pub use aggregate::{aggregate, aggregate_at};
pub use context::{AnalysisContext, SourceFile};
pub use data::*;
pub use directory::CanonicalDirectory;
pub use extract::{ExtractOptions, extract_usages, try_extract_usages};
pub use merge::{merge, merge_at};
pub use snapshot::LibrarySnapshot;
