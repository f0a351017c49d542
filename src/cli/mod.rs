//! # CLI Module
//!
//! User-facing commands. Each command takes a fully built
//! [`Config`](crate::config::Config), drives the library, shows a spinner
//! while remote calls are in flight and prints a summary table at the end.
//!
//! Failures are reported with the crate's `error!` macro, which prints the
//! message and exits with status 1. There is no partial-success bookkeeping;
//! rerunning the command is the recovery path.
//!
//! ## Commands
//!
//! - [`run`] - the full resolve, hydrate, normalize, enrich and write pipeline
//! - [`resolve`] - artist name to id lookup only
//!
//! ## Usage
//!
//! ```bash
//! spotetl run                                  # built-in artist list
//! spotetl run --artist "Lauv" --output-dir out # single artist
//! spotetl run --groups all --strict            # every album group, fail fast
//! spotetl resolve --artist "BTS"               # check the search match
//! ```

mod resolve;
mod run;

pub use resolve::resolve;
pub use run::{collect_tables, run};
