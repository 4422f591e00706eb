pub use crate::types::{
    change_type::ChangeType,
    changelog_entry::ChangelogEntry,
    commit::{CommitDate, CommitRecord, COMMIT_DATE_FORMAT},
    release::{Release, WhatsNext},
    sha::{CommitSha, SHA_HEX_LEN},
    value::{Fields, Value},
    version::ReleaseVersion,
};

mod change_type;
mod changelog_entry;
mod commit;
pub mod errors;
mod release;
mod sha;
mod value;
mod version;
