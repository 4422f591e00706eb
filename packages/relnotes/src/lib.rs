//! # Release-notes database.
//!
//! Release records live in CUE files, one per version, under a `releases`
//! map keyed by version string. This crate reads them into a [`core::catalog::Catalog`],
//! checks them, and renders them back out as CUE, Markdown or JSON.
//!
//! ## Quickstart: `prelude`
//!
//! ```no_run
//! use relnotes::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let catalog = Catalog::load_dir("website/cue/reference/releases", &DecoderConfig::default())?;
//! let report = Validator::default().validate_catalog(&catalog);
//!
//! if let Some(latest) = catalog.latest() {
//!     println!("{}", render_markdown(latest));
//! }
//! # Ok(())
//! # }
//! ```

pub mod core {
    pub use relnotes_core::*;
}

pub mod types {
    pub use relnotes_core::types::*;
}

/// Easy imports of frequently used
#[doc(hidden)]
pub mod prelude {
    //! The relnotes prelude
    //!
    //! The purpose of this module is to alleviate imports of many common types:
    //!
    //! ```
    //! # #![allow(unused_imports)]
    //! use relnotes::prelude::*;
    //! ```
    pub use super::{
        core::{
            catalog::Catalog,
            codec::{CueDecoder, CueEncoder, DecoderConfig},
            config::Config,
            render::{render_commit_table, render_json, render_markdown},
            stats::{stats, ReleaseStats},
            traits::CueConvertible,
            validation::{Report, ValidationConfig, Validator},
        },
        types::{
            errors::{Error, Result},
            ChangeType, ChangelogEntry, CommitRecord, Release, ReleaseVersion,
        },
    };
}
