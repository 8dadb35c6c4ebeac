//! Class usage model and the package/class graphs derived from it.
//!
//! ```text
//! Model (classes + member usages)
//!   ├─ graph(Scope::Classes)   one node per class, provenance = members
//!   └─ graph(Scope::Packages)  one node per package, provenance = classes
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

mod dto;
mod graph;

pub use dto::{ClassDto, ModelDto};
pub use graph::{is_nested, Graph, Node, Scope};

/// Package name used for classes without a package.
pub const UNNAMED_PACKAGE: &str = "<Unnamed Package>";

/// Returns the package of a fully qualified class name.
#[must_use]
pub fn package_of(class: &str) -> &str {
    class
        .rsplit_once('.')
        .map_or(UNNAMED_PACKAGE, |(package, _)| package)
}

/// Errors from loading a model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Failed to read the model file.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The JSON document is malformed.
    #[error("invalid model JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A class entry has an empty name.
    #[error("classes[{index}]: class name must not be empty")]
    EmptyClassName {
        /// Position in the `classes` array.
        index: usize,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct ClassEntry {
    uses: BTreeMap<String, BTreeSet<String>>,
}

/// Classes and their usages, as collected from compiled code.
///
/// Every class referenced as a usage target becomes part of the model too,
/// so libraries show up as (leaf) elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Model {
    classes: BTreeMap<String, ClassEntry>,
}

impl Model {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a model from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or a class has no name.
    pub fn from_json_str(content: &str) -> Result<Self, ModelError> {
        let dto: ModelDto = serde_json::from_str(content)?;
        Self::try_from(dto)
    }

    /// Reads a model from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: &Path) -> Result<Self, ModelError> {
        let content = std::fs::read_to_string(path).map_err(|e| ModelError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    /// Adds a class without any usages.
    pub fn add_class(&mut self, name: &str) -> &mut Self {
        self.classes.entry(name.to_string()).or_default();
        self
    }

    /// Records that class `from` uses class `to`.
    pub fn add_usage(&mut self, from: &str, to: &str) -> &mut Self {
        self.record(from, to, None)
    }

    /// Records that `member` of class `from` uses class `to`.
    pub fn add_member_usage(&mut self, from: &str, member: &str, to: &str) -> &mut Self {
        self.record(from, to, Some(member))
    }

    fn record(&mut self, from: &str, to: &str, member: Option<&str>) -> &mut Self {
        self.add_class(to);
        let entry = self.classes.entry(from.to_string()).or_default();
        if from != to {
            let via = entry.uses.entry(to.to_string()).or_default();
            if let Some(member) = member {
                via.insert(member.to_string());
            }
        }
        self
    }

    /// Names of all classes in name order.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    /// Number of classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Builds the graph for `scope`.
    #[must_use]
    pub fn graph(&self, scope: Scope) -> Graph {
        match scope {
            Scope::Classes => self.class_graph(),
            Scope::Packages => self.package_graph(),
        }
    }

    fn class_graph(&self) -> Graph {
        let mut graph = Graph::new(Scope::Classes);
        for (name, entry) in &self.classes {
            let node = graph.node_mut(name, package_of(name));
            for (target, members) in &entry.uses {
                if members.is_empty() {
                    node.record(target, [name.clone()]);
                } else {
                    node.record(target, members.iter().cloned());
                }
            }
        }
        graph
    }

    fn package_graph(&self) -> Graph {
        let mut graph = Graph::new(Scope::Packages);
        for (name, entry) in &self.classes {
            let package = package_of(name);
            graph.node_mut(package, package);
            for target in entry.uses.keys() {
                let target_package = package_of(target);
                if target_package != package {
                    graph
                        .node_mut(package, package)
                        .record(target_package, [name.clone()]);
                }
            }
        }
        graph
    }
}

impl TryFrom<ModelDto> for Model {
    type Error = ModelError;

    fn try_from(dto: ModelDto) -> Result<Self, Self::Error> {
        let mut model = Self::new();
        for (index, class) in dto.classes.into_iter().enumerate() {
            if class.name.is_empty() {
                return Err(ModelError::EmptyClassName { index });
            }
            model.add_class(&class.name);
            for target in &class.uses {
                model.add_usage(&class.name, target);
            }
            for (member, targets) in &class.members {
                for target in targets {
                    model.add_member_usage(&class.name, member, target);
                }
            }
        }
        Ok(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Model {
        let mut model = Model::new();
        model
            .add_usage("a.A1", "b.B1")
            .add_usage("a.A2", "b.B2")
            .add_usage("a.A1", "a.A2")
            .add_member_usage("b.B1", "run", "c.C1")
            .add_usage("b.B1", "b.B1")
            .add_class("Main");
        model
    }

    #[test]
    fn package_of_uses_last_dot() {
        assert_eq!(package_of("a.b.C"), "a.b");
        assert_eq!(package_of("Main"), UNNAMED_PACKAGE);
    }

    #[test]
    fn usage_targets_become_classes() {
        let model = sample();
        let classes: Vec<_> = model.classes().collect();
        assert_eq!(
            classes,
            vec!["Main", "a.A1", "a.A2", "b.B1", "b.B2", "c.C1"]
        );
    }

    #[test]
    fn package_graph_collects_using_classes() {
        let graph = sample().graph(Scope::Packages);
        let a = graph.node("a").unwrap();
        assert_eq!(a.dependencies().collect::<Vec<_>>(), vec!["b"]);
        let via: Vec<_> = a.provenance("b").unwrap().iter().cloned().collect();
        assert_eq!(via, vec!["a.A1", "a.A2"]);
        assert!(!graph.uses("a", "a"));
        assert!(graph.node(UNNAMED_PACKAGE).is_some());
        assert!(graph.node("c").is_some());
    }

    #[test]
    fn class_graph_prefers_members_as_provenance() {
        let graph = sample().graph(Scope::Classes);
        let b1 = graph.node("b.B1").unwrap();
        assert_eq!(b1.package(), "b");
        assert_eq!(
            b1.provenance("c.C1").unwrap().iter().collect::<Vec<_>>(),
            vec!["run"]
        );
        assert!(!b1.uses("b.B1"));
        let a1 = graph.node("a.A1").unwrap();
        assert_eq!(
            a1.provenance("b.B1").unwrap().iter().collect::<Vec<_>>(),
            vec!["a.A1"]
        );
        assert_eq!(graph.edge_count(), 4);
    }

    #[test]
    fn loads_from_json() {
        let model = Model::from_json_str(
            r#"{
                "classes": [
                    { "name": "a.A1", "uses": ["b.B1"] },
                    { "name": "b.B1", "members": { "run": ["c.C1"] } }
                ]
            }"#,
        )
        .unwrap();
        let graph = model.graph(Scope::Packages);
        assert!(graph.uses("a", "b"));
        assert!(graph.uses("b", "c"));
    }

    #[test]
    fn rejects_empty_class_name() {
        let result = Model::from_json_str(r#"{ "classes": [ { "name": "" } ] }"#);
        assert!(matches!(result, Err(ModelError::EmptyClassName { index: 0 })));
    }
}
