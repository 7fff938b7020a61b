//! Yarn 1 ("classic") lockfile parser
//!
//! The classic format is indentation based:
//!
//! ```text
//! # yarn lockfile v1
//!
//! "@babel/code-frame@^7.0.0", "@babel/code-frame@^7.10.4":
//!   version "7.10.4"
//!   dependencies:
//!     "@babel/highlight" "^7.10.4"
//! ```
//!
//! Each level is indented by two spaces. A line is either `key value` or
//! `key:` followed by a nested block. Headers may list several keys joined
//! by commas; every key receives the same value, like the reference yarn
//! parser does.

use super::{ParseAttempt, ParsedLockfile};
use crate::types::{LockfileEntries, LockfileFormat, ResolvedEntry};
use std::collections::BTreeMap;

/// Try to parse `content` as a classic lockfile.
pub fn parse(content: &str) -> ParseAttempt {
    let result = tokenize(content)
        .and_then(|tokens| Parser::new(tokens).parse_document())
        .and_then(entries_from_document);

    match result {
        Ok(entries) => ParseAttempt::Success(ParsedLockfile {
            format: LockfileFormat::Classic,
            entries,
        }),
        Err(reason) => ParseAttempt::Failure(reason),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Newline,
    Indent(usize),
    Colon,
    Comma,
    String(String),
    Eof,
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Node {
    Scalar(String),
    Object(BTreeMap<String, Node>),
}

fn is_unquoted_start(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'/' | b'.' | b'-' | b'_' | b'@' | b'^' | b'~' | b'*' | b'<' | b'>' | b'=')
}

fn is_unquoted_end(c: u8) -> bool {
    matches!(c, b':' | b' ' | b'\t' | b'\n' | b'\r' | b',')
}

fn tokenize(content: &str) -> Result<Vec<Spanned>, String> {
    let bytes = content.as_bytes();
    let mut tokens = Vec::new();
    let mut line = 1;
    let mut i = line_start(bytes, 0, line, &mut tokens)?;

    while i < bytes.len() {
        let c = bytes[i];
        match c {
            b'\n' | b'\r' => {
                i += if c == b'\r' && bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                tokens.push(Spanned { token: Token::Newline, line });
                line += 1;
                i = line_start(bytes, i, line, &mut tokens)?;
            }
            b' ' | b'\t' => i += 1,
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' && bytes[i] != b'\r' {
                    i += 1;
                }
            }
            b':' => {
                tokens.push(Spanned { token: Token::Colon, line });
                i += 1;
            }
            b',' => {
                tokens.push(Spanned { token: Token::Comma, line });
                i += 1;
            }
            b'"' => {
                let (value, consumed) = quoted_string(&content[i..])
                    .ok_or_else(|| format!("line {line}: unterminated string"))?;
                tokens.push(Spanned { token: Token::String(value), line });
                i += consumed;
            }
            c if is_unquoted_start(c) => {
                let len = bytes[i..].iter().take_while(|&&b| !is_unquoted_end(b)).count();
                tokens.push(Spanned {
                    token: Token::String(content[i..i + len].to_string()),
                    line,
                });
                i += len;
            }
            _ => {
                let ch = content[i..].chars().next().unwrap_or('?');
                return Err(format!("line {line}: unexpected character '{ch}'"));
            }
        }
    }

    tokens.push(Spanned { token: Token::Eof, line });
    Ok(tokens)
}

/// Measure the leading spaces of the line starting at `start` and push its
/// `Indent` token, column 0 included. Blank and comment-only lines carry no
/// indentation. Returns the offset of the first byte after the indentation.
fn line_start(bytes: &[u8], start: usize, line: usize, tokens: &mut Vec<Spanned>) -> Result<usize, String> {
    let width = bytes[start..].iter().take_while(|&&b| b == b' ').count();
    let end = start + width;
    if matches!(bytes.get(end), None | Some(b'\n' | b'\r' | b'#')) {
        return Ok(end);
    }
    if width % 2 != 0 {
        return Err(format!("line {line}: invalid indentation of {width} spaces"));
    }
    tokens.push(Spanned { token: Token::Indent(width / 2), line });
    Ok(end)
}

/// Decode a double-quoted string starting at `input[0]`.
///
/// Returns the decoded value and the number of bytes consumed, including
/// both quotes.
fn quoted_string(input: &str) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut chars = input.char_indices().skip(1);

    while let Some((index, c)) = chars.next() {
        match c {
            '"' => return Some((value, index + 1)),
            '\\' => {
                let (_, escaped) = chars.next()?;
                value.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
            }
            '\n' => return None,
            c => value.push(c),
        }
    }
    None
}

static EOF: Token = Token::Eof;

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<Spanned>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .map_or(&EOF, |spanned| &spanned.token)
    }

    fn line(&self) -> usize {
        self.tokens.get(self.pos).map_or(0, |spanned| spanned.line)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn parse_document(mut self) -> Result<BTreeMap<String, Node>, String> {
        let document = self.parse_block(0)?;
        match self.peek() {
            Token::Eof => Ok(document),
            other => Err(format!("line {}: unexpected {other:?} at top level", self.line())),
        }
    }

    fn parse_block(&mut self, indent: usize) -> Result<BTreeMap<String, Node>, String> {
        let mut block = BTreeMap::new();

        loop {
            match self.peek().clone() {
                Token::Newline => {
                    self.advance();
                }
                // A shallower line closes this block and belongs to an ancestor.
                Token::Indent(level) if level < indent => break,
                Token::Indent(level) if level > indent => {
                    return Err(format!(
                        "line {}: unexpected indentation level {level} inside a block at level {indent}",
                        self.line()
                    ));
                }
                Token::Indent(_) => {
                    self.advance();
                }
                Token::Eof => break,
                Token::String(first) => {
                    self.advance();
                    let keys = self.parse_extra_keys(first)?;

                    let had_colon = *self.peek() == Token::Colon;
                    if had_colon {
                        self.advance();
                    }

                    match self.peek().clone() {
                        Token::String(value) => {
                            self.advance();
                            for key in keys {
                                block.insert(key, Node::Scalar(value.clone()));
                            }
                        }
                        _ if had_colon => {
                            let child = self.parse_block(indent + 1)?;
                            for key in keys {
                                block.insert(key, Node::Object(child.clone()));
                            }
                        }
                        other => {
                            return Err(format!(
                                "line {}: expected a value or ':' but found {other:?}",
                                self.line()
                            ));
                        }
                    }
                }
                other => {
                    return Err(format!("line {}: unexpected {other:?}", self.line()));
                }
            }
        }

        Ok(block)
    }

    fn parse_extra_keys(&mut self, first: String) -> Result<Vec<String>, String> {
        let mut keys = vec![first];
        while *self.peek() == Token::Comma {
            self.advance();
            match self.advance() {
                Token::String(key) => keys.push(key),
                other => {
                    return Err(format!(
                        "line {}: expected a key after ',' but found {other:?}",
                        self.line()
                    ));
                }
            }
        }
        Ok(keys)
    }
}

fn entries_from_document(document: BTreeMap<String, Node>) -> Result<LockfileEntries, String> {
    document
        .into_iter()
        .map(|(spec, node)| {
            let Node::Object(fields) = node else {
                return Err(format!("entry '{spec}' is not a block"));
            };
            let Some(Node::Scalar(version)) = fields.get("version") else {
                return Err(format!("entry '{spec}' has no version"));
            };

            let dependencies = match fields.get("dependencies") {
                Some(Node::Object(deps)) => deps
                    .iter()
                    .filter_map(|(name, range)| match range {
                        Node::Scalar(range) => Some((name.clone(), range.clone())),
                        Node::Object(_) => None,
                    })
                    .collect(),
                _ => BTreeMap::new(),
            };

            let entry = ResolvedEntry {
                version: version.clone(),
                resolution: scalar_field(&fields, "resolved"),
                integrity: scalar_field(&fields, "integrity"),
                dependencies,
            };
            Ok((spec, entry))
        })
        .collect()
}

fn scalar_field(fields: &BTreeMap<String, Node>, name: &str) -> Option<String> {
    match fields.get(name) {
        Some(Node::Scalar(value)) => Some(value.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_success(content: &str) -> LockfileEntries {
        match parse(content) {
            ParseAttempt::Success(parsed) => parsed.entries,
            ParseAttempt::Failure(reason) => panic!("parse failed: {reason}"),
        }
    }

    fn expect_failure(content: &str) -> String {
        match parse(content) {
            ParseAttempt::Success(parsed) => panic!("unexpected success: {:?}", parsed.entries),
            ParseAttempt::Failure(reason) => reason,
        }
    }

    #[test]
    fn test_parse_classic_lockfile() {
        let entries = expect_success(
            r#"# THIS IS AN AUTOGENERATED FILE. DO NOT EDIT THIS FILE DIRECTLY.
# yarn lockfile v1


"@babel/code-frame@^7.0.0", "@babel/code-frame@^7.10.4":
  version "7.10.4"
  resolved "https://registry.yarnpkg.com/@babel/code-frame/-/code-frame-7.10.4.tgz#168da1a36e90da68ae8d49c0f1b48c7c6249213a"
  integrity sha512-vG6SvB6oYEhvgisZNFRmRCUkLz11c7rp+tbNTynGqc6mS1d5ATd/sGyV6W0KZZnXRKMTzZDRgQT3Ou9jhpAfUg==
  dependencies:
    "@babel/highlight" "^7.10.4"

js-tokens@^4.0.0:
  version "4.0.0"
  resolved "https://registry.yarnpkg.com/js-tokens/-/js-tokens-4.0.0.tgz"
"#,
        );

        assert_eq!(entries.len(), 3);
        let babel = &entries["@babel/code-frame@^7.0.0"];
        assert_eq!(babel.version, "7.10.4");
        assert_eq!(babel, &entries["@babel/code-frame@^7.10.4"]);
        assert!(babel.resolution.as_deref().unwrap().ends_with("249213a"));
        assert!(babel.integrity.as_deref().unwrap().starts_with("sha512-"));
        assert_eq!(babel.dependencies["@babel/highlight"], "^7.10.4");
        assert_eq!(entries["js-tokens@^4.0.0"].version, "4.0.0");
    }

    #[test]
    fn test_unquoted_multi_key_header() {
        let entries = expect_success("lodash@^4.17.0, lodash@^4.17.4:\n  version \"4.17.21\"\n");
        assert_eq!(entries["lodash@^4.17.0"].version, "4.17.21");
        assert_eq!(entries["lodash@^4.17.4"].version, "4.17.21");
    }

    #[test]
    fn test_crlf_line_endings() {
        let entries = expect_success("a@^1.0.0:\r\n  version \"1.0.0\"\r\n\r\nb@^2.0.0:\r\n  version \"2.1.0\"\r\n");
        assert_eq!(entries["a@^1.0.0"].version, "1.0.0");
        assert_eq!(entries["b@^2.0.0"].version, "2.1.0");
    }

    #[test]
    fn test_nested_blocks_and_dedent() {
        let entries = expect_success(
            "a@^1.0.0:\n  version \"1.0.0\"\n  dependencies:\n    b \"^2.0.0\"\n    c \"^3.0.0\"\n  optionalDependencies:\n    d \"^4.0.0\"\nb@^2.0.0:\n  version \"2.0.0\"\n",
        );
        assert_eq!(entries["a@^1.0.0"].dependencies.len(), 2);
        assert_eq!(entries["b@^2.0.0"].version, "2.0.0");
    }

    #[test]
    fn test_dedent_two_levels_after_dependencies() {
        let entries = expect_success(
            "a@^1.0.0:\n  version \"1.0.0\"\n  dependencies:\n    b \"^2.0.0\"\nb@^2.0.0:\n  version \"2.0.0\"\n",
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries["a@^1.0.0"].version, "1.0.0");
        assert_eq!(entries["a@^1.0.0"].dependencies["b"], "^2.0.0");
        assert_eq!(entries["b@^2.0.0"].version, "2.0.0");
        assert!(entries["b@^2.0.0"].dependencies.is_empty());
    }

    #[test]
    fn test_empty_nested_block_then_next_entry() {
        let entries = expect_success(
            "a@^1.0.0:\n  version \"1.0.0\"\n  dependencies:\nb@^2.0.0:\n  version \"2.0.0\"\n",
        );
        assert!(entries["a@^1.0.0"].dependencies.is_empty());
        assert_eq!(entries["b@^2.0.0"].version, "2.0.0");
    }

    #[test]
    fn test_indented_comments_and_blank_lines_are_ignored() {
        let entries = expect_success(
            "a@^1.0.0:\n  version \"1.0.0\"\n   # odd comment\n   \n  dependencies:\n\n    b \"^2.0.0\"\n",
        );
        assert_eq!(entries["a@^1.0.0"].dependencies["b"], "^2.0.0");
    }

    #[test]
    fn test_escaped_quotes() {
        let (value, consumed) = quoted_string(r#""a \"b\" c" rest"#).unwrap();
        assert_eq!(value, r#"a "b" c"#);
        assert_eq!(consumed, 11);
    }

    #[test]
    fn test_odd_indentation_is_rejected() {
        let reason = expect_failure("a@^1.0.0:\n   version \"1.0.0\"\n");
        assert!(reason.contains("indentation"), "{reason}");
    }

    #[test]
    fn test_unterminated_string_is_rejected() {
        let reason = expect_failure("\"a@^1.0.0:\n  version \"1.0.0\"\n");
        assert!(reason.contains("line 1"), "{reason}");
    }

    #[test]
    fn test_entry_without_version_is_rejected() {
        let reason = expect_failure("a@^1.0.0:\n  resolved \"https://example.com/a.tgz\"\n");
        assert!(reason.contains("no version"), "{reason}");
    }

    #[test]
    fn test_unexpected_character_is_rejected() {
        let reason = expect_failure("{ \"a\": 1 }");
        assert!(reason.contains("unexpected character"), "{reason}");
    }

    #[test]
    fn test_stray_indentation_at_top_level_is_rejected() {
        let reason = expect_failure("  a@^1.0.0:\n    version \"1.0.0\"\n");
        assert!(reason.contains("line 1: unexpected indentation"), "{reason}");
    }
}
