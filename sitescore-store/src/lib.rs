//! SQLite site registry for suitability scoring.
//!
//! The crate persists the weight configuration in `analysis_parameters` and
//! candidate sites in `sites`, and implements
//! [`SiteRegistry`](sitescore_core::SiteRegistry) so
//! [`recalculate_all_sites`](sitescore_core::recalculate_all_sites) can
//! rescore every site in one transaction. The bulk compute runs inside
//! SQLite through scalar functions that wrap the core normalisers.
//!
//! # Examples
//!
//! ```no_run
//! use camino::Utf8Path;
//! use sitescore_core::{Weights, recalculate_all_sites};
//! use sitescore_store::SqliteSiteRegistry;
//!
//! let mut registry = SqliteSiteRegistry::open(Utf8Path::new("artifacts/sites.db"))
//!     .expect("open site registry");
//! let report = recalculate_all_sites(&mut registry, Weights::default())
//!     .expect("recalculate scores");
//! println!("{}", report.message);
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod functions;
mod registry;
mod schema;
mod sites;

pub use error::SiteRegistryError;
pub use registry::{SqliteSession, SqliteSiteRegistry, StoredWeight};
pub use schema::initialise_schema;
pub use sites::{Page, ScoreSummary, SiteFilter, SiteStatistics};
