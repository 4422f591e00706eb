mod cue_decoder;
mod cue_encoder;
mod lexer;
mod utils;

pub use cue_decoder::*;
pub use cue_encoder::*;

use crate::types::{
    errors::{Error, Result},
    Release, ReleaseVersion, Value,
};

pub const RELEASES_LABEL: &str = "releases";

/// Pulls every release out of the `releases` map of a decoded document.
pub fn releases_from_document(document: Value) -> Result<Vec<Release>> {
    let mut root = match document {
        Value::Struct(root) => root,
        other => {
            return Err(Error::Decode {
                path: String::new(),
                msg: format!("expected a struct at the document root, got {}", other.kind()),
            })
        }
    };

    let releases = match root.take(RELEASES_LABEL) {
        Some(Value::Struct(releases)) => releases,
        Some(other) => {
            return Err(Error::Decode {
                path: RELEASES_LABEL.to_string(),
                msg: format!("expected a struct, got {}", other.kind()),
            })
        }
        None => {
            return Err(Error::Decode {
                path: RELEASES_LABEL.to_string(),
                msg: "missing required field".to_string(),
            })
        }
    };

    releases
        .into_iter()
        .map(|(key, body)| {
            let path = join_path(RELEASES_LABEL, &key);
            let version: ReleaseVersion = key.parse().map_err(|e: Error| e.under(&path))?;

            Release::from_value(version, body).map_err(|e| e.under(&path))
        })
        .collect()
}

pub fn decode_releases(text: &str, decoder: &CueDecoder) -> Result<Vec<Release>> {
    releases_from_document(decoder.decode_document(text)?)
}
