//! Descriptive metadata that usually accompanies a named query: how many rows
//! it returns, the shape of those rows and the types of their columns.
//!
//! These are plain enumerations parsed from their lowercase names; the empty
//! string parses to the default of each type.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt::{self, Display};
use core::str::FromStr;

use crate::errors::Error;

/// The number of rows a query is expected to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum Cardinality {
    /// Exactly one row (`one`).
    One,
    /// One or more rows (`many`).
    Many,
    /// Zero or one row (`one?`).
    OneOrNone,
    /// Any number of rows (`many?`).
    #[default]
    ManyOrNone,
}

impl Cardinality {
    /// The canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Cardinality::One => "one",
            Cardinality::Many => "many",
            Cardinality::OneOrNone => "one?",
            Cardinality::ManyOrNone => "many?",
        }
    }

    /// Whether an empty result is acceptable.
    #[must_use]
    pub fn empty_ok(self) -> bool {
        matches!(self, Cardinality::OneOrNone | Cardinality::ManyOrNone)
    }
}

impl FromStr for Cardinality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "" => Ok(Self::default()),
            "one" => Ok(Cardinality::One),
            "many" => Ok(Cardinality::Many),
            "one?" => Ok(Cardinality::OneOrNone),
            "many?" => Ok(Cardinality::ManyOrNone),
            _ => Err(Error::InvalidCardinality(s.into())),
        }
    }
}

/// The kind of value held by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValueKind {
    /// Any value (`any`); never nullable since it already admits NULL.
    Any,
    /// `integer`, also spelled `int`.
    Integer,
    /// `real`.
    Real,
    /// `string`.
    String,
    /// `json`.
    Json,
}

impl ValueKind {
    fn as_str(self) -> &'static str {
        match self {
            ValueKind::Any => "any",
            ValueKind::Integer => "integer",
            ValueKind::Real => "real",
            ValueKind::String => "string",
            ValueKind::Json => "json",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        match name {
            "any" => Some(ValueKind::Any),
            "integer" | "int" => Some(ValueKind::Integer),
            "real" => Some(ValueKind::Real),
            "string" => Some(ValueKind::String),
            "json" => Some(ValueKind::Json),
            _ => None,
        }
    }
}

/// A column data type, e.g. `integer` or the nullable `integer?`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct DataType {
    /// The kind of value.
    pub kind: ValueKind,
    /// Whether NULL is allowed (written with a trailing `?`).
    pub nullable: bool,
}

impl DataType {
    /// A non-nullable data type.
    #[must_use]
    pub fn new(kind: ValueKind) -> Self {
        Self {
            kind,
            nullable: false,
        }
    }

    /// A nullable data type.
    #[must_use]
    pub fn nullable(kind: ValueKind) -> Self {
        Self {
            kind,
            nullable: true,
        }
    }

    /// Parse the lowercased name without the empty-string default.
    fn from_name(name: &str) -> Option<Self> {
        let (base, nullable) = match name.strip_suffix('?') {
            Some(base) => (base, true),
            None => (name, false),
        };
        let kind = ValueKind::from_name(base)?;
        if nullable && kind == ValueKind::Any {
            return None;
        }
        Some(Self { kind, nullable })
    }
}

impl Default for DataType {
    fn default() -> Self {
        Self::new(ValueKind::String)
    }
}

impl Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

impl FromStr for DataType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self::default());
        }
        Self::from_name(&s.to_ascii_lowercase()).ok_or_else(|| Error::InvalidDataType(s.into()))
    }
}

/// The shape of each row a query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub enum RowType {
    /// Rows are returned column by column (`columns`).
    #[default]
    Columns,
    /// Each row is a single value of the given type.
    Scalar(DataType),
}

impl Display for RowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowType::Columns => f.write_str("columns"),
            RowType::Scalar(data_type) => data_type.fmt(f),
        }
    }
}

impl FromStr for RowType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "" | "columns" => Ok(RowType::Columns),
            name => DataType::from_name(name)
                .map(RowType::Scalar)
                .ok_or_else(|| Error::InvalidRowType(s.into())),
        }
    }
}

/// Parse a list of result column types, reporting every invalid entry.
///
/// # Errors
///
/// Returns [`Error::InvalidColumnDataTypes`] listing each entry that is not a
/// valid [`DataType`].
pub fn parse_column_types<S: AsRef<str>>(names: &[S]) -> Result<Vec<DataType>, Error> {
    let mut types = Vec::with_capacity(names.len());
    let mut invalid = Vec::new();
    for name in names {
        match name.as_ref().parse::<DataType>() {
            Ok(data_type) => types.push(data_type),
            Err(_) => invalid.push(name.as_ref().to_string()),
        }
    }
    if invalid.is_empty() {
        Ok(types)
    } else {
        Err(Error::InvalidColumnDataTypes(invalid))
    }
}

/// The privileges a query needs on its connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AccessMode {
    /// Not stated.
    #[default]
    Unspecified,
    /// Reads only.
    ReadOnly,
    /// Reads and writes data.
    ReadWrite,
    /// Changes schema or settings.
    Admin,
    /// Unrestricted.
    SuperAdmin,
}

impl AccessMode {
    /// Whether the mode permits modifying data.
    #[must_use]
    pub fn allows_writes(self) -> bool {
        self >= AccessMode::ReadWrite
    }
}

impl Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Cardinality> for String {
    fn from(value: Cardinality) -> Self {
        value.as_str().into()
    }
}

impl From<DataType> for String {
    fn from(value: DataType) -> Self {
        value.to_string()
    }
}

impl From<RowType> for String {
    fn from(value: RowType) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Cardinality {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for DataType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<String> for RowType {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
