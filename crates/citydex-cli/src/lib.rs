//! citydex-cli
//! ===========
//!
//! Command-line interface for the `citydex-core` city catalog.
//!
//! This crate primarily provides a binary (`citydex`). We include a small
//! library target so that docs.rs renders a documentation page and shows this
//! overview.
//!
//! Quick start
//! -----------
//!
//! ```text
//! citydex --help
//! citydex stats
//! citydex search "new"
//! citydex fav 707860
//! citydex favorites
//! ```
//!
//! For programmatic access to the catalog, index and favorites APIs, use the
//! `citydex-core` crate directly.

// This library target intentionally exposes no API; the binary is the primary
// deliverable.
