mod markdown;

pub use markdown::*;

use crate::types::{errors::Result, Release};

pub fn render_json(release: &Release) -> Result<String> {
    Ok(serde_json::to_string_pretty(release)?)
}
