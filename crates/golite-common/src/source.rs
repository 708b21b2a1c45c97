//! Source file management.
//!
//! Files share one global position space: each file occupies the byte
//! range `[base, base + len]`, so any [`Span`] pins down both the file
//! and the location inside it without a separate file id.

use std::fmt;

use crate::span::{BytePos, Span};

/// Line and column of a position, both 1-indexed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct LineCol {
    pub line: u32,
    pub column: u32,
}

/// A single source file registered in a [`SourceMap`].
#[derive(Clone)]
pub struct SourceFile {
    name: String,
    source: String,
    base: u32,
}

impl SourceFile {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The base offset of this file in the global position space.
    pub fn base(&self) -> u32 {
        self.base
    }

    /// Whether the global position falls inside this file.
    pub fn contains(&self, pos: BytePos) -> bool {
        let p = pos.to_u32();
        p >= self.base && p <= self.base + self.source.len() as u32
    }

    /// Converts a global span to a range local to this file.
    pub fn local_range(&self, span: Span) -> std::ops::Range<usize> {
        let start = span.start.to_u32().saturating_sub(self.base) as usize;
        let end = span.end.to_u32().saturating_sub(self.base) as usize;
        start.min(self.source.len())..end.min(self.source.len())
    }

    /// Line and column of a global position, 1-indexed.
    pub fn line_col(&self, pos: BytePos) -> LineCol {
        let offset = (pos.to_u32().saturating_sub(self.base) as usize).min(self.source.len());
        let before = &self.source[..offset];
        let line = before.bytes().filter(|&b| b == b'\n').count() as u32 + 1;
        let column = match before.rfind('\n') {
            Some(nl) => (offset - nl) as u32,
            None => offset as u32 + 1,
        };
        LineCol { line, column }
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("base", &self.base)
            .field("len", &self.source.len())
            .finish()
    }
}

/// The registry of source files, handing out base offsets.
#[derive(Default)]
pub struct SourceMap {
    files: Vec<SourceFile>,
    next_base: u32,
}

impl SourceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a file and returns its base offset. Pass the base to the
    /// lexer so token spans land in the global space.
    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> u32 {
        let source = source.into();
        let base = self.next_base;
        // +1 keeps neighbouring files from sharing a boundary position.
        self.next_base += source.len() as u32 + 1;
        self.files.push(SourceFile {
            name: name.into(),
            source,
            base,
        });
        base
    }

    pub fn files(&self) -> &[SourceFile] {
        &self.files
    }

    /// The file containing the given global position.
    pub fn file_for(&self, pos: BytePos) -> Option<&SourceFile> {
        self.files.iter().rev().find(|f| f.contains(pos))
    }

    /// The index of the file containing the given position, matching the
    /// order of [`SourceMap::files`].
    pub fn file_index_for(&self, pos: BytePos) -> Option<usize> {
        self.files.iter().rposition(|f| f.contains(pos))
    }
}
