//! Page selection for PDF split, merge and organize tools.
//!
//! The core ([`page_range`], [`page_set`], [`split_plan`]) is pure and only
//! deals in page lists. The [`pdf`] module turns those lists into documents
//! with `lopdf`.

pub mod error;
pub mod page_range;
pub mod page_set;
pub mod pdf;
pub mod split_plan;

pub use error::{PageSetError, PlanError, RangeError};
pub use page_range::RangeSpec;
pub use page_set::{Direction, PageId, PageRef, PageSet, Rotation};
pub use split_plan::{plan, OutputDocument, SplitFailure, SplitMode, SplitPlan, SplitResult};
