//! First-occurrence-ordered parameter registry.

use indexmap::IndexSet as IndexSetRaw;

use crate::parsed::{Parameter, Parameters};
use crate::selector::Selector;

/// `IndexSet` alias using hashbrown's default hasher for `no_std` compatibility.
type IndexSet<T> = IndexSetRaw<T, hashbrown::DefaultHashBuilder>;

/// Assigns stable 1-based indices to placeholder names.
///
/// The first lookup of a name allocates the next index; later lookups of the
/// same name return it again.
#[derive(Debug, Default)]
pub(crate) struct ParameterRegistry {
    names: IndexSet<Selector>,
}

impl ParameterRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Index of `name`, allocating the next one on first sight.
    pub(crate) fn index_of(&mut self, name: &str) -> usize {
        if let Some(position) = self.names.get_index_of(name) {
            return position + 1;
        }
        let (position, _) = self
            .names
            .insert_full(Selector::new_unchecked(name.into()));
        position + 1
    }

    /// Number of distinct names registered so far.
    pub(crate) fn len(&self) -> usize {
        self.names.len()
    }

    /// The registered names as parameters, in index order.
    pub(crate) fn into_parameters(self) -> Parameters {
        self.names
            .into_iter()
            .enumerate()
            .map(|(position, name)| Parameter::new(name, position + 1))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_occurrence_order() {
        let mut registry = ParameterRegistry::new();
        assert_eq!(registry.index_of("a"), 1);
        assert_eq!(registry.index_of("b"), 2);
        assert_eq!(registry.index_of("a"), 1);
        assert_eq!(registry.index_of("c"), 3);
        assert_eq!(registry.len(), 3);

        let parameters = registry.into_parameters();
        let names: alloc::vec::Vec<&str> = parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
        let indices: alloc::vec::Vec<usize> = parameters.iter().map(|p| p.index).collect();
        assert_eq!(indices, [1, 2, 3]);
    }

    #[test]
    fn test_names_are_case_sensitive() {
        let mut registry = ParameterRegistry::new();
        assert_eq!(registry.index_of("userId"), 1);
        assert_eq!(registry.index_of("userid"), 2);
    }
}
