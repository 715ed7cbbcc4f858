//! Family domain logic for kindred.
//!
//! Two layers live here:
//!
//! - [`FamilyBuilder`] and [`FamilyRecord`]: primitives that assert
//!   person, marriage, and parentage facts into a graph, and the
//!   injectable seed-record form the CLI feeds them from.
//! - [`classify`]: the age rule pass that derives `Minor` / `Infant` /
//!   `Old` type assertions from `foaf:age` values.

mod builder;
mod classify;
mod error;
mod records;

pub use builder::FamilyBuilder;
pub use classify::{classify, INFANT_BELOW, MINOR_BELOW, OLD_ABOVE};
pub use error::ClassifyError;
pub use records::{apply_records, simpson_records, FamilyRecord};
