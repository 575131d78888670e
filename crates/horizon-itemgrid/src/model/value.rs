//! Typed column values and stable row identities.

use std::fmt;

/// Stable identity of a data-source row.
///
/// A `RowId` survives reordering of the data source and is only invalidated
/// when its row is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowId(u64);

impl RowId {
    /// Create a row identity from its raw value.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Get the raw u64 value of this row ID.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

/// The declared type of a data-source column (or of a renderer property).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ColumnKind {
    /// UTF-8 text.
    Text,
    /// Boolean flag.
    Bool,
    /// Signed integer.
    Int,
    /// Floating point number.
    Float,
    /// Icon name.
    Icon,
}

impl ColumnKind {
    /// Whether a property of this kind can be fed from a column of `column` kind.
    ///
    /// Integers widen to floats and icon properties accept plain text names.
    pub fn accepts(self, column: ColumnKind) -> bool {
        self == column
            || matches!(
                (self, column),
                (ColumnKind::Float, ColumnKind::Int) | (ColumnKind::Icon, ColumnKind::Text)
            )
    }
}

/// A single typed value of a row/column pair.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellValue {
    /// No value.
    #[default]
    None,
    /// Text value.
    Text(String),
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Icon name.
    Icon(String),
}

impl CellValue {
    /// The kind of this value, or `None` for [`CellValue::None`].
    pub fn kind(&self) -> Option<ColumnKind> {
        match self {
            CellValue::None => None,
            CellValue::Text(_) => Some(ColumnKind::Text),
            CellValue::Bool(_) => Some(ColumnKind::Bool),
            CellValue::Int(_) => Some(ColumnKind::Int),
            CellValue::Float(_) => Some(ColumnKind::Float),
            CellValue::Icon(_) => Some(ColumnKind::Icon),
        }
    }

    /// Borrow the string payload of text and icon values.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) | CellValue::Icon(s) => Some(s),
            _ => None,
        }
    }

    /// Get a boolean value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            CellValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get a numeric value, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get an integer value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Text used for display and interactive search.
    pub fn display_text(&self) -> Option<String> {
        match self {
            CellValue::None => None,
            CellValue::Text(s) | CellValue::Icon(s) => Some(s.clone()),
            CellValue::Bool(b) => Some(b.to_string()),
            CellValue::Int(i) => Some(i.to_string()),
            CellValue::Float(f) => Some(f.to_string()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        CellValue::Int(i)
    }
}

impl From<f64> for CellValue {
    fn from(f: f64) -> Self {
        CellValue::Float(f)
    }
}
