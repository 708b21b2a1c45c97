//! # golite-common
//!
//! Shared infrastructure for the golite compiler front end:
//! - Source location tracking (`span`)
//! - Source file management (`source`)
//! - Diagnostic collection and rendering (`diagnostics`)

pub mod diagnostics;
pub mod source;
pub mod span;

pub use diagnostics::{Diagnostic, DiagnosticEmitter, DiagnosticSink, Label, Severity};
pub use source::{SourceFile, SourceMap};
pub use span::{BytePos, Span};
