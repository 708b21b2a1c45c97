//! golite CLI.
//!
//! Commands:
//!   tok     Read source from stdin, print one token per line
//!   ast     Read source from stdin, print the parsed tree
//!   help    Show help
//!   version Show version

use std::env;
use std::io::{self, Read};
use std::process;

use golite_common::diagnostics::DiagnosticEmitter;
use golite_common::source::SourceMap;
use golite_syntax::display::render_source_file;
use golite_syntax::lexer::Lexer;
use golite_syntax::parser::Parser;
use golite_syntax::stream::TokenStream;

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    if args.is_empty() {
        print_usage();
        process::exit(1);
    }

    let code = match args[0].as_str() {
        "tok" => cmd_tok(),
        "ast" => cmd_ast(),
        "-h" | "--help" | "help" => {
            print_usage();
            0
        }
        "-v" | "--version" | "version" => {
            println!("golite version {}", env!("CARGO_PKG_VERSION"));
            0
        }
        cmd => {
            eprintln!("unknown command: {cmd}");
            print_usage();
            1
        }
    };

    process::exit(code);
}

fn print_usage() {
    eprintln!("usage: golite <command>");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  tok       tokenize standard input, one token per line");
    eprintln!("  ast       parse standard input and print the tree");
    eprintln!("  help      show this help");
    eprintln!("  version   show version");
}

fn read_stdin() -> io::Result<String> {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;
    Ok(source)
}

fn cmd_tok() -> i32 {
    let source = match read_stdin() {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error reading stdin: {err}");
            return 1;
        }
    };

    let mut map = SourceMap::new();
    let base = map.add_file("<stdin>", source.clone());

    let (output, ok) = tokenize(&source, base, &map);
    print!("{output}");
    if ok {
        0
    } else {
        1
    }
}

/// Lexes `source` and renders one token per line. Diagnostics go to
/// stderr; the bool is false if any were errors.
fn tokenize(source: &str, base: u32, map: &SourceMap) -> (String, bool) {
    let (tokens, diags) = Lexer::new(source, base).collect_tokens();

    let mut out = String::new();
    for token in tokens.iter().filter(|t| !t.is_eof()) {
        out.push_str(&token.to_string());
        out.push('\n');
    }

    if diags.has_errors() {
        DiagnosticEmitter::new(map).emit_all(&diags);
        return (out, false);
    }
    (out, true)
}

fn cmd_ast() -> i32 {
    let source = match read_stdin() {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error reading stdin: {err}");
            return 1;
        }
    };

    let mut map = SourceMap::new();
    let base = map.add_file("<stdin>", source.clone());

    match parse_tree(&source, base, &map) {
        Some(rendered) => {
            print!("{rendered}");
            0
        }
        None => {
            eprintln!("error: could not parse source file");
            1
        }
    }
}

/// Lexes and parses `source`, rendering the tree on success. Lexical
/// diagnostics go to stderr and fail the run.
fn parse_tree(source: &str, base: u32, map: &SourceMap) -> Option<String> {
    let (tokens, diags) = Lexer::new(source, base).collect_tokens();
    if diags.has_errors() {
        DiagnosticEmitter::new(map).emit_all(&diags);
        return None;
    }

    let mut parser = Parser::new(TokenStream::new(tokens));
    let file = parser.parse_source_file()?;
    Some(render_source_file(&file))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(source: &str) -> (SourceMap, u32) {
        let mut map = SourceMap::new();
        let base = map.add_file("<stdin>", source.to_string());
        (map, base)
    }

    #[test]
    fn tokenize_lists_tokens_line_by_line() {
        let source = "package main";
        let (map, base) = fixture(source);
        let (out, ok) = tokenize(source, base, &map);
        assert!(ok);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "Keyword(kind: package)");
        assert_eq!(lines[1], "Identifier(ident: main)");
    }

    #[test]
    fn tokenize_reports_lexical_errors() {
        let source = "var x = 0x";
        let (map, base) = fixture(source);
        let (_, ok) = tokenize(source, base, &map);
        assert!(!ok);
    }

    #[test]
    fn parse_tree_renders_the_file() {
        let source = "package p\nvar x = 1\n";
        let (map, base) = fixture(source);
        let rendered = parse_tree(source, base, &map).unwrap();
        assert!(rendered.starts_with("SourceFile ["));
        assert!(rendered.contains("VarDecl ["));
    }

    #[test]
    fn parse_tree_fails_on_bad_syntax() {
        let source = "package p\nvar = 1\n";
        let (map, base) = fixture(source);
        assert!(parse_tree(source, base, &map).is_none());
    }
}
