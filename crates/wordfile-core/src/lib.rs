//! wordfile-core - parsing and registry for wordfile language descriptors.
//!
//! A wordfile is a line-oriented descriptor of one language's lexical rules:
//! a `/L<n>"Name"` header with flag and comment-marker keywords, optional
//! `/Colors`, `/Font Style` and marker-list directives, and `/C<n>` code
//! format blocks listing keywords and prefixes. [`Wordfile::parse`] turns
//! source text into an immutable [`Wordfile`]; [`WordfileRegistry`] collects
//! parsed descriptors and answers number/kind/extension lookups.

#![warn(missing_docs)]

mod descriptor;
mod error;
mod parser;
mod registry;
mod tokenizer;

pub use descriptor::{
    CodeFormat, CommentMarkers, FontStyle, LanguageKind, Rgb, StyleSlot, Wordfile,
    STYLE_SLOT_COUNT,
};
pub use error::{ParseError, WordfileError};
pub use registry::{
    RegisteredWordfile, WordfileOrigin, WordfileRegistry, WORDFILE_EXTENSION,
};
