mod cue_convertible;

pub use cue_convertible::*;
