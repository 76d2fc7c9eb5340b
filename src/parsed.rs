//! The result of rewriting a query.

use alloc::string::String;
use alloc::vec::Vec;
use core::ops::{Deref, Range};

use crate::format::Dialect;
use crate::selector::{Identifier, Selector};

/// A distinct placeholder name and the 1-based index bound to it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    /// The placeholder name.
    pub name: Selector,
    /// The positional index, starting at 1.
    pub index: usize,
}

impl Parameter {
    /// Create a new parameter.
    #[must_use]
    pub fn new(name: Selector, index: usize) -> Self {
        Self { name, index }
    }

    /// Whether the name is a bare identifier rather than a path.
    #[must_use]
    pub fn is_identifier(&self) -> bool {
        self.name.is_identifier()
    }
}

/// Parameters ordered by index, one per distinct name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Parameters(Vec<Parameter>);

impl Parameters {
    /// Number the given names from 1 in order.
    #[must_use]
    pub fn from_names(names: impl IntoIterator<Item = Selector>) -> Self {
        names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Parameter::new(name, i + 1))
            .collect()
    }

    /// The names in index order.
    pub fn names(&self) -> impl Iterator<Item = &Selector> {
        self.0.iter().map(|p| &p.name)
    }

    /// The names that are bare identifiers.
    #[must_use]
    pub fn identifiers(&self) -> Vec<Identifier> {
        self.0.iter().filter_map(|p| p.name.as_identifier()).collect()
    }

    /// The names that are dotted or bracketed paths.
    #[must_use]
    pub fn dotted_selectors(&self) -> Vec<&Selector> {
        self.0
            .iter()
            .filter(|p| !p.is_identifier())
            .map(|p| &p.name)
            .collect()
    }

    /// Consume into the underlying vector.
    #[must_use]
    pub fn into_vec(self) -> Vec<Parameter> {
        self.0
    }
}

impl Deref for Parameters {
    type Target = [Parameter];

    fn deref(&self) -> &[Parameter] {
        &self.0
    }
}

impl FromIterator<Parameter> for Parameters {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Parameters {
    type Item = Parameter;
    type IntoIter = alloc::vec::IntoIter<Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Parameter;
    type IntoIter = core::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// One occurrence of a placeholder in the source text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryToken {
    /// The placeholder name.
    pub name: Selector,
    /// The index shared by every occurrence of the name.
    pub index: usize,
    /// Byte offset of the `:` in the source.
    pub start: usize,
    /// Byte offset just past the name.
    pub end: usize,
    /// The source text of the occurrence, colon included.
    pub raw: String,
}

impl QueryToken {
    /// The byte range of the occurrence in the source.
    #[must_use]
    pub fn span(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Read access to a rewritten query.
pub trait ParsedQuery {
    /// The rewritten query text.
    fn query_string(&self) -> &str;
    /// The distinct parameters in binding order.
    fn parameters(&self) -> &Parameters;
    /// Every placeholder occurrence in source order.
    fn occurrences(&self) -> &[QueryToken];
}

/// A query with its named placeholders rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParsedSql {
    sql: String,
    parameters: Parameters,
    occurrences: Vec<QueryToken>,
}

impl ParsedSql {
    pub(crate) fn new(sql: String, parameters: Parameters, occurrences: Vec<QueryToken>) -> Self {
        Self {
            sql,
            parameters,
            occurrences,
        }
    }

    /// The rewritten query text.
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// The distinct parameters, ordered by first occurrence.
    #[must_use]
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    /// Every placeholder occurrence, duplicates included, in source order.
    #[must_use]
    pub fn occurrences(&self) -> &[QueryToken] {
        &self.occurrences
    }

    /// The names in the order their values must be bound for `dialect`.
    ///
    /// Numbered dialects bind each distinct parameter once; MySQL's anonymous
    /// `?` needs a value for every occurrence.
    #[must_use]
    pub fn binding_sequence(&self, dialect: Dialect) -> Vec<&Selector> {
        if dialect.is_numbered() {
            self.parameters.names().collect()
        } else {
            self.occurrences.iter().map(|t| &t.name).collect()
        }
    }

    /// Split into the rewritten text, parameters and occurrences.
    #[must_use]
    pub fn into_parts(self) -> (String, Parameters, Vec<QueryToken>) {
        (self.sql, self.parameters, self.occurrences)
    }
}

impl ParsedQuery for ParsedSql {
    fn query_string(&self) -> &str {
        &self.sql
    }

    fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    fn occurrences(&self) -> &[QueryToken] {
        &self.occurrences
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::parse_sql;

    fn sel(name: &str) -> Selector {
        Selector::new(name).unwrap()
    }

    #[test]
    fn test_from_names_numbers_from_one() {
        let params = Parameters::from_names([sel("a"), sel("b")]);
        assert_eq!(params[0], Parameter::new(sel("a"), 1));
        assert_eq!(params[1], Parameter::new(sel("b"), 2));
    }

    #[test]
    fn test_identifiers_and_selectors() {
        let params = Parameters::from_names([sel("id"), sel("user.id"), sel("items[0]"), sel("q")]);
        assert_eq!(
            params.identifiers(),
            [Identifier::new("id").unwrap(), Identifier::new("q").unwrap()]
        );
        assert_eq!(params.dotted_selectors(), [&sel("user.id"), &sel("items[0]")]);
    }

    #[test]
    fn test_binding_sequence() {
        let sql = "a = :x AND b = :y AND c = :x";
        let numbered = parse_sql(sql, Some(&Dialect::Sqlite)).unwrap();
        let names: Vec<&str> = numbered
            .binding_sequence(Dialect::Sqlite)
            .into_iter()
            .map(Selector::as_str)
            .collect();
        assert_eq!(names, ["x", "y"]);

        let anonymous = parse_sql(sql, Some(&Dialect::MySql)).unwrap();
        assert_eq!(anonymous.sql(), "a = ? AND b = ? AND c = ?");
        let names: Vec<&str> = anonymous
            .binding_sequence(Dialect::MySql)
            .into_iter()
            .map(Selector::as_str)
            .collect();
        assert_eq!(names, ["x", "y", "x"]);
    }

    #[test]
    fn test_parsed_query_trait() {
        fn describe(query: &dyn ParsedQuery) -> (usize, usize) {
            (query.parameters().len(), query.occurrences().len())
        }
        let parsed = parse_sql("x = :a OR y = :a", Some(&Dialect::Postgres)).unwrap();
        assert_eq!(parsed.query_string(), "x = $1 OR y = $1");
        assert_eq!(describe(&parsed), (1, 2));
        assert_eq!(parsed.occurrences()[1].span(), 14..16);
    }
}
