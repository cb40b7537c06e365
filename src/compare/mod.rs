//! Branch comparison
//!
//! [`BranchComparator`] builds the current and target branch one after the
//! other, measures their artifacts and yields a [`ComparisonOutcome`].
//! With a repository URL configured the builds happen in a fresh clone under
//! a scratch [`WorkDir`]; otherwise they run in the project checkout, whose
//! branch and local changes are restored afterwards.

pub mod comparator;
pub mod outcome;
pub mod workdir;

pub use comparator::BranchComparator;
pub use outcome::{ComparisonError, ComparisonOutcome};
pub use workdir::{is_safe_to_delete, safe_remove_dir, CleanupError, WorkDir};
