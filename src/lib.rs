//! Illustrated children's story generation over third-party AI providers.
//!
//! A story is written by one of several language or image providers, each
//! page is illustrated independently, and the result can be saved to a local
//! story library and read aloud.

pub mod ai;
pub mod error;
pub mod generator;
pub mod models;
pub mod narration;
pub mod prompts;
pub mod store;

pub use error::{Error, Result};
pub use generator::StoryGenerator;
