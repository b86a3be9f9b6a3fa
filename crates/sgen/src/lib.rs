//! `sgen` is a template preprocessor for shader source text: a small,
//! deterministic directive language embedded in shader files that, given a
//! property environment, produces the final source string handed to the
//! shader compiler. A renderer embeds it to specialize GPU shaders at
//! runtime from material and feature flags.
//!
//! Directives start with `@`: `@property(expr) ... @end` blocks for
//! conditional inclusion, `@foreach` loops, named `@piece` bodies spliced
//! back in with `@insertpiece`, and integer arithmetic over the property
//! environment (`@set`, `@counter`, `@value`, and the silent `@pset`
//! family). See [`generate`] for the pass pipeline.

pub use config::*;
pub use error::*;
pub use generator::*;
pub use passes::*;
pub use properties::*;

pub mod config;
mod error;
pub(crate) mod expression;
mod generator;
mod passes;
mod properties;
pub(crate) mod scanner;
pub(crate) mod substr;

#[cfg(test)]
mod __fixtures;
