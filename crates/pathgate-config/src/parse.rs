// pathgate-config/src/parse.rs
// ============================================================================
// Module: Rules Parsing
// Description: Load the engine's JSON rules format into a typed document.
// Purpose: Provide the inverse of rendering with fail-closed errors.
// Dependencies: pathgate-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Parsing accepts the JSON rules documents the engine accepts, restricted
//! to the expression subset the policy model supports: constants,
//! `auth != null`, `auth.uid === $capture`, `newData.hasChildren([...])`,
//! `newData.child('field').val() === auth.uid`, and `&&`/`||`/`!`
//! combinations thereof. Anything outside the subset fails closed with a
//! typed error; nothing is silently dropped or approximated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pathgate_core::AccessExpr;
use pathgate_core::CaptureChild;
use pathgate_core::CaptureName;
use pathgate_core::FieldName;
use pathgate_core::RuleNode;
use pathgate_core::RulesDocument;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Parse Errors
// ============================================================================

/// Errors raised while parsing a rules document or expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The input was not valid JSON.
    #[error("rules input is not valid JSON: {0}")]
    Json(String),
    /// The top-level value was not an object with a `rules` key.
    #[error("rules document must be a JSON object with a 'rules' key")]
    MissingRulesKey,
    /// A node value was not a JSON object.
    #[error("rule node at '{at}' must be a JSON object")]
    NodeNotObject {
        /// Template path of the offending node.
        at: String,
    },
    /// A `.`-prefixed key was not a recognized directive.
    #[error("unknown directive '{key}' at '{at}'")]
    UnknownDirective {
        /// Offending key.
        key: String,
        /// Template path of the offending node.
        at: String,
    },
    /// A directive value had the wrong JSON type.
    #[error("directive '{key}' at '{at}' must be a boolean or expression string")]
    InvalidDirective {
        /// Offending key.
        key: String,
        /// Template path of the offending node.
        at: String,
    },
    /// An `.indexOn` value was not an array of non-empty strings.
    #[error("'.indexOn' at '{at}' must be an array of non-empty strings")]
    InvalidIndexOn {
        /// Template path of the offending node.
        at: String,
    },
    /// A node declared more than one `$name` child.
    #[error("node at '{at}' declares more than one capture child")]
    MultipleCaptureChildren {
        /// Template path of the offending node.
        at: String,
    },
    /// Expression text outside the supported subset.
    #[error("unsupported expression at byte {at}: expected {expected}")]
    Expression {
        /// Byte offset of the failure.
        at: usize,
        /// Description of what was expected.
        expected: String,
    },
    /// Expression text continued past a complete expression.
    #[error("trailing input in expression at byte {at}")]
    Trailing {
        /// Byte offset of the first unconsumed byte.
        at: usize,
    },
}

// ============================================================================
// SECTION: Document Parsing
// ============================================================================

/// Parses a rules document from its JSON string form.
///
/// # Errors
///
/// Returns [`ParseError`] when the input is not valid JSON or is outside
/// the supported rules subset.
pub fn parse_rules_json_str(input: &str) -> Result<RulesDocument, ParseError> {
    let value: Value =
        serde_json::from_str(input).map_err(|err| ParseError::Json(err.to_string()))?;
    parse_rules_json(&value)
}

/// Parses a rules document from a JSON value.
///
/// # Errors
///
/// Returns [`ParseError`] when the value is outside the supported rules
/// subset.
pub fn parse_rules_json(value: &Value) -> Result<RulesDocument, ParseError> {
    let root = value
        .as_object()
        .and_then(|top| top.get("rules"))
        .ok_or(ParseError::MissingRulesKey)?;
    Ok(RulesDocument::new(parse_node(root, "/")?))
}

/// Parses one rule node object.
fn parse_node(value: &Value, at: &str) -> Result<RuleNode, ParseError> {
    let map = value.as_object().ok_or_else(|| ParseError::NodeNotObject {
        at: at.to_string(),
    })?;

    let mut node = RuleNode::default();
    for (key, entry) in map {
        if let Some(directive) = key.strip_prefix('.') {
            match directive {
                "read" => node.read = Some(parse_directive(entry, key, at)?),
                "write" => node.write = Some(parse_directive(entry, key, at)?),
                "validate" => node.validate = Some(parse_directive(entry, key, at)?),
                "indexOn" => node.index_on = parse_index_on(entry, at)?,
                _ => {
                    return Err(ParseError::UnknownDirective {
                        key: key.clone(),
                        at: at.to_string(),
                    });
                }
            }
        } else if let Some(name) = key.strip_prefix('$') {
            if node.capture.is_some() {
                return Err(ParseError::MultipleCaptureChildren {
                    at: at.to_string(),
                });
            }
            let child_at = join_path(at, key);
            node.capture = Some(Box::new(CaptureChild {
                name: CaptureName::new(name),
                node: parse_node(entry, &child_at)?,
            }));
        } else {
            let child_at = join_path(at, key);
            node.children.insert(key.clone(), parse_node(entry, &child_at)?);
        }
    }
    Ok(node)
}

/// Parses a `.read`/`.write`/`.validate` directive value.
fn parse_directive(value: &Value, key: &str, at: &str) -> Result<AccessExpr, ParseError> {
    match value {
        Value::Bool(constant) => Ok(AccessExpr::boolean(*constant)),
        Value::String(text) => parse_expr(text),
        _ => Err(ParseError::InvalidDirective {
            key: key.to_string(),
            at: at.to_string(),
        }),
    }
}

/// Parses an `.indexOn` directive value.
fn parse_index_on(value: &Value, at: &str) -> Result<Vec<FieldName>, ParseError> {
    let entries = value.as_array().ok_or_else(|| ParseError::InvalidIndexOn {
        at: at.to_string(),
    })?;
    let mut fields = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry.as_str() {
            Some(name) if !name.is_empty() => fields.push(FieldName::new(name)),
            _ => {
                return Err(ParseError::InvalidIndexOn {
                    at: at.to_string(),
                });
            }
        }
    }
    Ok(fields)
}

/// Joins a parent template path with a child key for diagnostics.
fn join_path(parent: &str, key: &str) -> String {
    if parent == "/" {
        format!("/{key}")
    } else {
        format!("{parent}/{key}")
    }
}

// ============================================================================
// SECTION: Expression Parsing
// ============================================================================

/// Parses an expression in the engine's rule-expression syntax.
///
/// # Errors
///
/// Returns [`ParseError`] when the text is outside the supported subset.
pub fn parse_expr(input: &str) -> Result<AccessExpr, ParseError> {
    let mut cursor = Cursor::new(input);
    let expr = parse_or(&mut cursor)?;
    cursor.skip_whitespace();
    if cursor.at_end() {
        Ok(expr)
    } else {
        Err(ParseError::Trailing {
            at: cursor.position(),
        })
    }
}

/// Parses a `||` chain.
fn parse_or(cursor: &mut Cursor<'_>) -> Result<AccessExpr, ParseError> {
    let mut disjuncts = vec![parse_and(cursor)?];
    while cursor.eat("||") {
        disjuncts.push(parse_and(cursor)?);
    }
    if disjuncts.len() == 1 {
        Ok(disjuncts.swap_remove(0))
    } else {
        Ok(AccessExpr::or(disjuncts))
    }
}

/// Parses a `&&` chain.
fn parse_and(cursor: &mut Cursor<'_>) -> Result<AccessExpr, ParseError> {
    let mut conjuncts = vec![parse_unary(cursor)?];
    while cursor.eat("&&") {
        conjuncts.push(parse_unary(cursor)?);
    }
    if conjuncts.len() == 1 {
        Ok(conjuncts.swap_remove(0))
    } else {
        Ok(AccessExpr::and(conjuncts))
    }
}

/// Parses an optional `!` prefix.
fn parse_unary(cursor: &mut Cursor<'_>) -> Result<AccessExpr, ParseError> {
    if cursor.eat("!") {
        Ok(AccessExpr::negate(parse_unary(cursor)?))
    } else {
        parse_primary(cursor)
    }
}

/// Parses a parenthesized expression, constant, or domain predicate.
fn parse_primary(cursor: &mut Cursor<'_>) -> Result<AccessExpr, ParseError> {
    if cursor.eat("(") {
        let expr = parse_or(cursor)?;
        cursor.expect(")")?;
        return Ok(expr);
    }
    let ident = cursor.parse_ident()?;
    match ident.as_str() {
        "true" => Ok(AccessExpr::boolean(true)),
        "false" => Ok(AccessExpr::boolean(false)),
        "auth" => parse_auth_predicate(cursor),
        "newData" => parse_new_data_predicate(cursor),
        _ => Err(ParseError::Expression {
            at: cursor.position(),
            expected: "'true', 'false', 'auth', or 'newData'".to_string(),
        }),
    }
}

/// Parses the tail of an `auth` predicate.
fn parse_auth_predicate(cursor: &mut Cursor<'_>) -> Result<AccessExpr, ParseError> {
    if cursor.eat(".") {
        cursor.expect_ident("uid")?;
        cursor.expect("===")?;
        cursor.expect("$")?;
        let capture = cursor.parse_ident()?;
        return Ok(AccessExpr::auth_uid_equals_capture(capture));
    }
    cursor.expect("!=")?;
    cursor.expect_ident("null")?;
    Ok(AccessExpr::authenticated())
}

/// Parses the tail of a `newData` predicate.
fn parse_new_data_predicate(cursor: &mut Cursor<'_>) -> Result<AccessExpr, ParseError> {
    cursor.expect(".")?;
    let accessor = cursor.parse_ident()?;
    match accessor.as_str() {
        "child" => {
            cursor.expect("(")?;
            let field = cursor.parse_single_quoted()?;
            cursor.expect(")")?;
            cursor.expect(".")?;
            cursor.expect_ident("val")?;
            cursor.expect("(")?;
            cursor.expect(")")?;
            cursor.expect("===")?;
            cursor.expect_ident("auth")?;
            cursor.expect(".")?;
            cursor.expect_ident("uid")?;
            Ok(AccessExpr::new_data_child_equals_auth_uid(field))
        }
        "hasChildren" => {
            cursor.expect("(")?;
            cursor.expect("[")?;
            let mut fields = Vec::new();
            if !cursor.eat("]") {
                loop {
                    fields.push(FieldName::new(cursor.parse_single_quoted()?));
                    if !cursor.eat(",") {
                        break;
                    }
                }
                cursor.expect("]")?;
            }
            cursor.expect(")")?;
            Ok(AccessExpr::new_data_has_children(fields))
        }
        _ => Err(ParseError::Expression {
            at: cursor.position(),
            expected: "'child' or 'hasChildren'".to_string(),
        }),
    }
}

// ============================================================================
// SECTION: Expression Cursor
// ============================================================================

/// Byte cursor over expression text.
struct Cursor<'a> {
    /// Full input text.
    input: &'a str,
    /// Current byte offset.
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of the input.
    const fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
        }
    }

    /// Returns the current byte offset.
    const fn position(&self) -> usize {
        self.pos
    }

    /// Returns the unconsumed remainder of the input.
    fn rest(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or("")
    }

    /// Advances past any whitespace.
    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    /// Returns true when the input is fully consumed.
    fn at_end(&self) -> bool {
        self.rest().is_empty()
    }

    /// Consumes the token when it is next, after whitespace.
    fn eat(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        if self.rest().starts_with(token) {
            self.pos += token.len();
            true
        } else {
            false
        }
    }

    /// Consumes the token or fails with a typed error.
    fn expect(&mut self, token: &str) -> Result<(), ParseError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(ParseError::Expression {
                at: self.pos,
                expected: format!("'{token}'"),
            })
        }
    }

    /// Parses an identifier of word characters.
    fn parse_ident(&mut self) -> Result<String, ParseError> {
        self.skip_whitespace();
        let rest = self.rest();
        let end = rest
            .char_indices()
            .find(|(_, ch)| !ch.is_ascii_alphanumeric() && *ch != '_')
            .map_or(rest.len(), |(index, _)| index);
        if end == 0 {
            return Err(ParseError::Expression {
                at: self.pos,
                expected: "identifier".to_string(),
            });
        }
        self.pos += end;
        Ok(rest[..end].to_string())
    }

    /// Parses an exact identifier.
    fn expect_ident(&mut self, expected: &str) -> Result<(), ParseError> {
        let at = self.pos;
        let ident = self.parse_ident()?;
        if ident == expected {
            Ok(())
        } else {
            Err(ParseError::Expression {
                at,
                expected: format!("'{expected}'"),
            })
        }
    }

    /// Parses a single-quoted string literal without escapes.
    fn parse_single_quoted(&mut self) -> Result<String, ParseError> {
        self.expect("'")?;
        let rest = self.rest();
        let Some(end) = rest.find('\'') else {
            return Err(ParseError::Expression {
                at: self.pos,
                expected: "closing quote".to_string(),
            });
        };
        let text = rest[..end].to_string();
        self.pos += end + 1;
        Ok(text)
    }
}
