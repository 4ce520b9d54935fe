use std::collections::BTreeMap;

use super::{QualifiedName, XYDataset};
use crate::error::Result;

/// Source of datasets addressed by qualified name.
pub trait DatasetProvider: Send + Sync {
    /// Every dataset inside `group` and its subgroups, in lexicographic
    /// order. The empty string is the root group.
    fn list_contents(&self, group: &str) -> Result<Vec<QualifiedName>>;

    /// `Ok(None)` when no dataset carries that name.
    fn get_dataset(&self, name: &QualifiedName) -> Result<Option<XYDataset>>;
}

/// Provider backed by an ordered map, for programmatic inputs.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    datasets: BTreeMap<QualifiedName, XYDataset>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: QualifiedName, dataset: XYDataset) -> Option<XYDataset> {
        self.datasets.insert(name, dataset)
    }

    #[must_use]
    pub fn with(mut self, name: QualifiedName, dataset: XYDataset) -> Self {
        self.insert(name, dataset);
        self
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl FromIterator<(QualifiedName, XYDataset)> for InMemoryProvider {
    fn from_iter<I: IntoIterator<Item = (QualifiedName, XYDataset)>>(iter: I) -> Self {
        Self { datasets: iter.into_iter().collect() }
    }
}

impl DatasetProvider for InMemoryProvider {
    fn list_contents(&self, group: &str) -> Result<Vec<QualifiedName>> {
        Ok(self
            .datasets
            .keys()
            .filter(|name| name.belongs_in_group(group))
            .cloned()
            .collect())
    }

    fn get_dataset(&self, name: &QualifiedName) -> Result<Option<XYDataset>> {
        Ok(self.datasets.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat() -> XYDataset {
        XYDataset::from_pairs(vec![(1.0, 1.0), (2.0, 1.0)]).unwrap()
    }

    #[test]
    fn lists_recursively_in_order() {
        let provider: InMemoryProvider = ["sed/b", "sed/a/x", "other/c", "sed/a/y"]
            .iter()
            .map(|n| (QualifiedName::parse(n).unwrap(), flat()))
            .collect();

        let names: Vec<String> = provider
            .list_contents("sed")
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["sed/a/x", "sed/a/y", "sed/b"]);
        assert_eq!(provider.list_contents("").unwrap().len(), 4);
    }

    #[test]
    fn missing_dataset_is_none() {
        let provider = InMemoryProvider::new();
        let name = QualifiedName::parse("nothing").unwrap();
        assert!(provider.get_dataset(&name).unwrap().is_none());
    }
}
