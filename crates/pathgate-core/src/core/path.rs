// pathgate-core/src/core/path.rs
// ============================================================================
// Module: Path Templates
// Description: Slash-delimited path templates, concrete paths, and capture binding.
// Purpose: Define the location language that rule nodes attach to.
// Dependencies: crate::core::identifiers, serde, thiserror
// ============================================================================

//! ## Overview
//! A path template addresses a subtree of the hierarchical database. Segments
//! are either literals (`users`) or capture variables (`$uid`). Matching a
//! template against a concrete request path binds each capture to the
//! concrete segment in the same position. Parsing is fail-closed: empty
//! segments, empty capture names, and oversized paths are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::CaptureName;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum number of segments in a template or concrete path.
pub const MAX_PATH_DEPTH: usize = 32;
/// Maximum length of a single path segment in bytes.
pub const MAX_SEGMENT_LENGTH: usize = 255;

// ============================================================================
// SECTION: Path Errors
// ============================================================================

/// Errors raised while parsing templates or concrete paths.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path contained no segments.
    #[error("path must contain at least one segment")]
    Empty,
    /// A segment between separators was empty.
    #[error("path segment {index} is empty")]
    EmptySegment {
        /// Zero-based index of the offending segment.
        index: usize,
    },
    /// A capture segment was `$` with no name.
    #[error("capture segment {index} has an empty name")]
    EmptyCaptureName {
        /// Zero-based index of the offending segment.
        index: usize,
    },
    /// A concrete segment used the reserved `$` prefix.
    #[error("concrete path segment {index} must not start with '$'")]
    ReservedPrefix {
        /// Zero-based index of the offending segment.
        index: usize,
    },
    /// The path exceeded [`MAX_PATH_DEPTH`] segments.
    #[error("path exceeds maximum depth of {MAX_PATH_DEPTH} segments")]
    DepthExceeded,
    /// A segment exceeded [`MAX_SEGMENT_LENGTH`] bytes.
    #[error("path segment {index} exceeds maximum length of {MAX_SEGMENT_LENGTH} bytes")]
    SegmentTooLong {
        /// Zero-based index of the offending segment.
        index: usize,
    },
}

// ============================================================================
// SECTION: Path Segments
// ============================================================================

/// One segment of a path template.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PathSegment {
    /// Literal segment matching exactly one concrete segment value.
    Literal {
        /// Segment value.
        value: String,
    },
    /// Capture segment matching any concrete segment and binding it.
    Capture {
        /// Capture variable name (without the leading `$`).
        name: CaptureName,
    },
}

impl PathSegment {
    /// Creates a literal segment.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    /// Creates a capture segment.
    #[must_use]
    pub fn capture(name: impl Into<CaptureName>) -> Self {
        Self::Capture {
            name: name.into(),
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal {
                value,
            } => f.write_str(value),
            Self::Capture {
                name,
            } => write!(f, "${name}"),
        }
    }
}

// ============================================================================
// SECTION: Path Template
// ============================================================================

/// A slash-delimited path pattern with literal and capture segments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathTemplate {
    /// Ordered template segments.
    segments: Vec<PathSegment>,
}

impl PathTemplate {
    /// Creates a template from pre-built segments.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when the segment list violates path limits.
    pub fn new(segments: Vec<PathSegment>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        if segments.len() > MAX_PATH_DEPTH {
            return Err(PathError::DepthExceeded);
        }
        for (index, segment) in segments.iter().enumerate() {
            let text = match segment {
                PathSegment::Literal {
                    value,
                } => value.as_str(),
                PathSegment::Capture {
                    name,
                } => name.as_str(),
            };
            if text.is_empty() {
                return match segment {
                    PathSegment::Literal {
                        ..
                    } => Err(PathError::EmptySegment {
                        index,
                    }),
                    PathSegment::Capture {
                        ..
                    } => Err(PathError::EmptyCaptureName {
                        index,
                    }),
                };
            }
            if text.len() > MAX_SEGMENT_LENGTH {
                return Err(PathError::SegmentTooLong {
                    index,
                });
            }
        }
        Ok(Self {
            segments,
        })
    }

    /// Parses a template from its slash-delimited string form.
    ///
    /// Leading and trailing separators are tolerated; `$name` segments become
    /// captures.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when a segment is empty or limits are exceeded.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        let mut segments = Vec::new();
        for raw in input.trim_matches('/').split('/') {
            if raw.is_empty() {
                return Err(PathError::EmptySegment {
                    index: segments.len(),
                });
            }
            let segment = raw.strip_prefix('$').map_or_else(
                || PathSegment::literal(raw),
                |name| PathSegment::capture(CaptureName::new(name)),
            );
            segments.push(segment);
        }
        Self::new(segments)
    }

    /// Returns the ordered template segments.
    #[must_use]
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Matches the template against a concrete path, binding captures.
    ///
    /// Returns `None` when lengths differ or a literal segment mismatches.
    #[must_use]
    pub fn matches(&self, path: &ConcretePath) -> Option<CaptureBindings> {
        if self.segments.len() != path.segments().len() {
            return None;
        }
        let mut bindings = CaptureBindings::new();
        for (segment, concrete) in self.segments.iter().zip(path.segments()) {
            match segment {
                PathSegment::Literal {
                    value,
                } => {
                    if value != concrete {
                        return None;
                    }
                }
                PathSegment::Capture {
                    name,
                } => bindings.bind(name.clone(), concrete.clone()),
            }
        }
        Some(bindings)
    }
}

impl fmt::Display for PathTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str("/")?;
            }
            segment.fmt(f)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Concrete Path
// ============================================================================

/// A fully literal request path addressing one database location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConcretePath {
    /// Ordered literal segments.
    segments: Vec<String>,
}

impl ConcretePath {
    /// Creates a concrete path from literal segments.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when a segment is empty, reserved, or limits
    /// are exceeded.
    pub fn new(segments: Vec<String>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        if segments.len() > MAX_PATH_DEPTH {
            return Err(PathError::DepthExceeded);
        }
        for (index, segment) in segments.iter().enumerate() {
            if segment.is_empty() {
                return Err(PathError::EmptySegment {
                    index,
                });
            }
            if segment.starts_with('$') {
                return Err(PathError::ReservedPrefix {
                    index,
                });
            }
            if segment.len() > MAX_SEGMENT_LENGTH {
                return Err(PathError::SegmentTooLong {
                    index,
                });
            }
        }
        Ok(Self {
            segments,
        })
    }

    /// Parses a concrete path from its slash-delimited string form.
    ///
    /// # Errors
    ///
    /// Returns [`PathError`] when a segment is empty, reserved, or limits
    /// are exceeded.
    pub fn parse(input: &str) -> Result<Self, PathError> {
        let segments = input.trim_matches('/').split('/').map(str::to_string).collect();
        Self::new(segments)
    }

    /// Returns the ordered literal segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for ConcretePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

// ============================================================================
// SECTION: Capture Bindings
// ============================================================================

/// Capture variables bound while walking a concrete path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaptureBindings {
    /// Bound values keyed by capture name.
    values: BTreeMap<CaptureName, String>,
}

impl CaptureBindings {
    /// Creates an empty binding set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds a capture name to a concrete segment value.
    pub fn bind(&mut self, name: CaptureName, value: String) {
        self.values.insert(name, value);
    }

    /// Returns the bound value for a capture name, when present.
    #[must_use]
    pub fn get(&self, name: &CaptureName) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns true when no captures are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
