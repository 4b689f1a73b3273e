use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::ModelError;

/// Class names ordered by the model's output index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabelTable {
    names: Vec<String>,
}

impl ClassLabelTable {
    /// Reads a JSON object of `class name -> index` and inverts it.
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let indices: HashMap<String, i64> =
            serde_json::from_str(&raw).map_err(|source| ModelError::LabelFormat {
                path: path.to_path_buf(),
                source,
            })?;
        Self::from_indices(indices)
    }

    /// Indices must cover `0..n` exactly once each.
    pub fn from_indices(indices: HashMap<String, i64>) -> Result<Self, ModelError> {
        if indices.is_empty() {
            return Err(ModelError::LabelIndices("no classes defined".into()));
        }

        let count = indices.len();
        let mut slots: Vec<Option<String>> = vec![None; count];

        for (name, index) in indices {
            if name.trim().is_empty() {
                return Err(ModelError::LabelIndices("empty class name".into()));
            }
            let slot = usize::try_from(index)
                .ok()
                .and_then(|i| slots.get_mut(i))
                .ok_or_else(|| {
                    ModelError::LabelIndices(format!(
                        "index {index} for '{name}' is outside 0..{count}"
                    ))
                })?;
            if let Some(existing) = slot.replace(name.clone()) {
                return Err(ModelError::LabelIndices(format!(
                    "'{existing}' and '{name}' share index {index}"
                )));
            }
        }

        // Every slot is filled: n distinct indices in 0..n.
        let names = slots.into_iter().flatten().collect();
        Ok(Self { names })
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn indices(pairs: &[(&str, i64)]) -> HashMap<String, i64> {
        pairs.iter().map(|(n, i)| (n.to_string(), *i)).collect()
    }

    #[test]
    fn inverts_name_to_index_mapping() {
        let table = ClassLabelTable::from_indices(indices(&[
            ("pituitary", 3),
            ("glioma", 0),
            ("notumor", 2),
            ("meningioma", 1),
        ]))
        .unwrap();

        assert_eq!(
            table.names(),
            &["glioma", "meningioma", "notumor", "pituitary"]
        );
        assert_eq!(table.name(2), Some("notumor"));
        assert_eq!(table.name(4), None);
    }

    #[test]
    fn rejects_gaps_and_duplicates() {
        let gap = ClassLabelTable::from_indices(indices(&[("a", 0), ("b", 2)]));
        assert!(matches!(gap, Err(ModelError::LabelIndices(_))));

        let negative = ClassLabelTable::from_indices(indices(&[("a", -1)]));
        assert!(matches!(negative, Err(ModelError::LabelIndices(_))));

        let empty = ClassLabelTable::from_indices(HashMap::new());
        assert!(matches!(empty, Err(ModelError::LabelIndices(_))));
    }

    #[test]
    fn duplicate_index_is_reported() {
        // Two names on index 0 leaves index 1 unreachable for a 2-entry map.
        let err = ClassLabelTable::from_indices(indices(&[("a", 0), ("b", 0)])).unwrap_err();
        assert!(err.to_string().contains("share index 0"));
    }

    #[test]
    fn load_reads_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"glioma": 0, "meningioma": 1, "notumor": 2, "pituitary": 3}}"#
        )
        .unwrap();

        let table = ClassLabelTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(table.name(0), Some("glioma"));
    }

    #[test]
    fn load_fails_on_missing_or_malformed_file() {
        let missing = ClassLabelTable::load(Path::new("/nonexistent/labels.json"));
        assert!(matches!(missing, Err(ModelError::Io { .. })));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"["glioma", "meningioma"]"#).unwrap();
        let malformed = ClassLabelTable::load(file.path());
        assert!(matches!(malformed, Err(ModelError::LabelFormat { .. })));
    }
}
