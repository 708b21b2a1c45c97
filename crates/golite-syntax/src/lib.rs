//! # golite-syntax
//!
//! Lexer, AST definitions, and parser for the golite language.
//!
//! This crate provides the frontend components of the golite compiler:
//! - Tokenization of source code, including automatic semicolon insertion
//! - Abstract Syntax Tree definitions
//! - Recursive descent parser with Pratt expression parsing

pub mod ast;
pub mod display;
pub mod errors;
pub mod lexer;
pub mod parser;
pub mod stream;
pub mod token;

pub use lexer::Lexer;
pub use parser::{parse, Parser};
pub use stream::TokenStream;
pub use token::{Keyword, Punct, Token, TokenKind};
