//! Pattern-based extraction of single-valued clinical fields.
//!
//! Each field owns an ordered list of rules. The first rule that matches
//! anywhere in the text wins; when none match the field is `Not Found`.

pub mod engine;
pub mod patterns;

pub use engine::ExtractionEngine;
pub use patterns::{Case, Field, FieldPattern, PatternDef, Render, default_patterns};
