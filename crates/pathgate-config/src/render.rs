// pathgate-config/src/render.rs
// ============================================================================
// Module: Rules Rendering
// Description: Serialize a rules document into the engine's JSON rules format.
// Purpose: Produce deterministic console-ready rules artifacts.
// Dependencies: pathgate-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The external engine consumes a JSON document of the form
//! `{"rules": {...}}` where nodes carry `".read"`, `".write"`, and
//! `".validate"` expressions, `".indexOn"` arrays, and `$name` keys for
//! capture children. Rendering is deterministic: object keys are emitted in
//! sorted order, so identical documents always produce identical artifacts.
//! Constant expressions render as JSON booleans, matching the engine's
//! shorthand; everything else renders in the engine's expression syntax.

// ============================================================================
// SECTION: Imports
// ============================================================================

use pathgate_core::AccessExpr;
use pathgate_core::RuleNode;
use pathgate_core::RulesDocument;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Render Errors
// ============================================================================

/// Errors raised while rendering a rules document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    /// Serialization of the rendered document failed.
    #[error("failed to serialize rules document: {0}")]
    Serialize(String),
}

// ============================================================================
// SECTION: Document Rendering
// ============================================================================

/// Renders a rules document into the engine's JSON value form.
#[must_use]
pub fn rules_json(document: &RulesDocument) -> Value {
    let mut top = Map::new();
    top.insert("rules".to_string(), render_node(&document.root));
    Value::Object(top)
}

/// Renders a rules document into a pretty-printed JSON string suitable for
/// pasting into the vendor console's rules editor.
///
/// # Errors
///
/// Returns [`RenderError::Serialize`] when JSON serialization fails.
pub fn rules_json_string(document: &RulesDocument) -> Result<String, RenderError> {
    serde_json::to_string_pretty(&rules_json(document))
        .map_err(|err| RenderError::Serialize(err.to_string()))
}

/// Renders one rule node into a JSON object.
fn render_node(node: &RuleNode) -> Value {
    let mut map = Map::new();
    if let Some(expr) = &node.read {
        map.insert(".read".to_string(), render_rule_value(expr));
    }
    if let Some(expr) = &node.write {
        map.insert(".write".to_string(), render_rule_value(expr));
    }
    if let Some(expr) = &node.validate {
        map.insert(".validate".to_string(), render_rule_value(expr));
    }
    if !node.index_on.is_empty() {
        let fields =
            node.index_on.iter().map(|field| Value::String(field.to_string())).collect();
        map.insert(".indexOn".to_string(), Value::Array(fields));
    }
    for (key, child) in &node.children {
        map.insert(key.clone(), render_node(child));
    }
    if let Some(capture) = &node.capture {
        map.insert(format!("${}", capture.name), render_node(&capture.node));
    }
    Value::Object(map)
}

/// Renders a directive value: constant expressions become JSON booleans, all
/// other expressions become engine-syntax strings.
fn render_rule_value(expr: &AccessExpr) -> Value {
    match expr {
        AccessExpr::Bool {
            value,
        } => Value::Bool(*value),
        _ => Value::String(render_expr(expr)),
    }
}

// ============================================================================
// SECTION: Expression Rendering
// ============================================================================

/// Operator precedence levels used when parenthesizing sub-expressions.
const PREC_OR: u8 = 1;
/// Precedence of `&&`.
const PREC_AND: u8 = 2;
/// Precedence of atoms and `!`.
const PREC_ATOM: u8 = 3;

/// Renders an expression in the engine's rule-expression syntax.
#[must_use]
pub fn render_expr(expr: &AccessExpr) -> String {
    render_with_precedence(expr, PREC_OR)
}

/// Renders an expression, parenthesizing when its precedence is below the
/// enclosing context.
fn render_with_precedence(expr: &AccessExpr, min_precedence: u8) -> String {
    let (text, precedence) = match expr {
        AccessExpr::Bool {
            value,
        } => (value.to_string(), PREC_ATOM),
        AccessExpr::Authenticated => ("auth != null".to_string(), PREC_ATOM),
        AccessExpr::AuthUidEqualsCapture {
            capture,
        } => (format!("auth.uid === ${capture}"), PREC_ATOM),
        AccessExpr::NewDataHasChildren {
            fields,
        } => {
            let list = fields
                .iter()
                .map(|field| format!("'{field}'"))
                .collect::<Vec<_>>()
                .join(", ");
            (format!("newData.hasChildren([{list}])"), PREC_ATOM)
        }
        AccessExpr::NewDataChildEqualsAuthUid {
            field,
        } => (format!("newData.child('{field}').val() === auth.uid"), PREC_ATOM),
        AccessExpr::And {
            exprs,
        } if exprs.is_empty() => ("true".to_string(), PREC_ATOM),
        AccessExpr::And {
            exprs,
        } => (
            exprs
                .iter()
                .map(|expr| render_with_precedence(expr, PREC_AND))
                .collect::<Vec<_>>()
                .join(" && "),
            PREC_AND,
        ),
        AccessExpr::Or {
            exprs,
        } if exprs.is_empty() => ("false".to_string(), PREC_ATOM),
        AccessExpr::Or {
            exprs,
        } => (
            exprs
                .iter()
                .map(|expr| render_with_precedence(expr, PREC_OR))
                .collect::<Vec<_>>()
                .join(" || "),
            PREC_OR,
        ),
        AccessExpr::Not {
            expr,
        } => (format!("!({})", render_with_precedence(expr, PREC_OR)), PREC_ATOM),
    };
    if precedence < min_precedence { format!("({text})") } else { text }
}
