pub mod catalog;
pub mod codec;
pub mod config;
pub mod conventional;
pub mod fragments;
pub mod render;
pub mod stats;
pub mod traits;
pub mod types;
pub mod validation;
