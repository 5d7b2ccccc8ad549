//! brickgen-bindings: generators turning device models into bindings,
//! documentation, example programs and release archives
//!
//! Every generator implements [`Generator`] and is driven over a
//! [`brickgen_core::DeviceRegistry`] by [`run`]. Language specifics live
//! behind [`LanguageTrait`] so the documentation generator is shared.

pub mod changelog;
pub mod csharp;
pub mod doc;
pub mod fs;
pub mod generator;
pub mod json;
pub mod language;
pub mod package;
pub mod text;

#[cfg(test)]
mod test_support;

pub use changelog::{Changelog, ChangelogEntry};
pub use doc::DocGenerator;
pub use generator::{
    run, GenerateSummary, Generator, GeneratorContext, GeneratorError, ReleasedFiles,
};
pub use language::LanguageTrait;
pub use package::ZipGenerator;
