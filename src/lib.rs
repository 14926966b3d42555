//! In-memory analytical view over the GWAS catalog associations export.
//!
//! [`table::Table`] holds the raw tab-separated rows, [`mask::ValidityMask`]
//! finds rows whose numeric cells parse, and [`gwas::GwasCatalog`] puts the
//! catalog's column names on top of both.

pub mod error;
pub mod gwas;
pub mod mask;
pub mod parse;
pub mod source;
pub mod table;

pub use error::{CatalogError, Result};
pub use gwas::{CatalogSummary, ColumnRef, GwasCatalog};
pub use mask::ValidityMask;
pub use table::Table;
