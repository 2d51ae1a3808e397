//! Class-name mapping loaded from `data.yaml`.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LabelscopeError;
use crate::label::ClassId;

/// Display names for class ids.
///
/// Ids absent from the mapping display as their decimal number, see
/// [`ClassNames::display_name`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ClassNames(BTreeMap<ClassId, String>);

impl ClassNames {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the configured name for `id`.
    pub fn get(&self, id: ClassId) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    /// Returns the configured name, or the stringified id when unmapped.
    pub fn display_name(&self, id: ClassId) -> String {
        self.get(id)
            .map(str::to_string)
            .unwrap_or_else(|| id.to_string())
    }

    pub fn insert(&mut self, id: ClassId, name: impl Into<String>) {
        self.0.insert(id, name.into());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassId, &str)> {
        self.0.iter().map(|(id, name)| (*id, name.as_str()))
    }
}

impl FromIterator<(ClassId, String)> for ClassNames {
    fn from_iter<I: IntoIterator<Item = (ClassId, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for ClassNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (id, name)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{id}: {name}")?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Deserialize)]
struct DataYaml {
    #[serde(default)]
    names: Option<DataYamlNames>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DataYamlNames {
    Sequence(Vec<String>),
    Mapping(BTreeMap<u32, String>),
}

/// Read the `names` entry of a `data.yaml` file.
///
/// Both the list form (`names: [cat, dog]`) and the mapping form
/// (`names: {0: cat, 1: dog}`) are accepted. A missing `names` key yields an
/// empty mapping.
pub fn read_data_yaml(path: &Path) -> Result<ClassNames, LabelscopeError> {
    let data = fs::read_to_string(path)?;
    let parsed: DataYaml =
        serde_yaml::from_str(&data).map_err(|source| LabelscopeError::DataYamlParse {
            path: path.to_path_buf(),
            source,
        })?;

    let names = match parsed.names {
        None => ClassNames::new(),
        Some(DataYamlNames::Sequence(names)) => names
            .into_iter()
            .enumerate()
            .map(|(index, name)| (ClassId(index as u32), name))
            .collect(),
        Some(DataYamlNames::Mapping(mapping)) => mapping
            .into_iter()
            .map(|(index, name)| (ClassId(index), name))
            .collect(),
    };

    Ok(names)
}
