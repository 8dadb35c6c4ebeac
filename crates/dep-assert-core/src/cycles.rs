//! Dependency cycle detection (Tarjan's strongly connected components).

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::model::{is_nested, Graph};
use crate::types::DependencyMap;

#[derive(Debug, Clone, Copy)]
enum Mark {
    OnStack { index: usize, lowlink: usize },
    Settled,
}

struct Tarjan<'g> {
    graph: &'g Graph,
    next_index: usize,
    marks: HashMap<&'g str, Mark>,
    stack: Vec<&'g str>,
    components: Vec<BTreeSet<&'g str>>,
}

/// A node whose dependencies are being walked.
struct Frame<'g> {
    name: &'g str,
    dependencies: Vec<&'g str>,
    next: usize,
}

impl<'g> Tarjan<'g> {
    fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            next_index: 0,
            marks: HashMap::new(),
            stack: Vec::new(),
            components: Vec::new(),
        }
    }

    fn run(mut self) -> Vec<BTreeSet<&'g str>> {
        let graph = self.graph;
        for node in graph.nodes() {
            if !self.marks.contains_key(node.name()) {
                self.strong_connect(node.name());
            }
        }
        self.components
    }

    fn lower(&mut self, name: &str, value: usize) {
        if let Some(Mark::OnStack { lowlink, .. }) = self.marks.get_mut(name) {
            *lowlink = (*lowlink).min(value);
        }
    }

    fn enter(&mut self, name: &'g str) -> Frame<'g> {
        let index = self.next_index;
        self.next_index += 1;
        self.marks.insert(
            name,
            Mark::OnStack {
                index,
                lowlink: index,
            },
        );
        self.stack.push(name);

        let graph = self.graph;
        let dependencies = graph
            .node(name)
            .map(|node| node.dependencies().collect())
            .unwrap_or_default();
        Frame {
            name,
            dependencies,
            next: 0,
        }
    }

    fn leave(&mut self, name: &'g str) {
        let Some(Mark::OnStack { index, lowlink }) = self.marks.get(name).copied() else {
            return;
        };
        if index != lowlink {
            return;
        }
        let mut component = BTreeSet::new();
        while let Some(member) = self.stack.pop() {
            self.marks.insert(member, Mark::Settled);
            component.insert(member);
            if member == name {
                break;
            }
        }
        if component.len() > 1 {
            self.components.push(component);
        }
    }

    /// Depth-first walk from `root` on an explicit frame stack, so the
    /// depth of the graph never touches the call stack.
    fn strong_connect(&mut self, root: &'g str) {
        let mut frames = vec![self.enter(root)];
        while let Some(frame) = frames.last_mut() {
            let name = frame.name;
            if let Some(&dep) = frame.dependencies.get(frame.next) {
                frame.next += 1;
                match self.marks.get(dep).copied() {
                    None => {
                        let child = self.enter(dep);
                        frames.push(child);
                    }
                    Some(Mark::OnStack { index, .. }) => self.lower(name, index),
                    Some(Mark::Settled) => {}
                }
                continue;
            }

            frames.pop();
            self.leave(name);
            if let Some(parent) = frames.last() {
                if let Some(Mark::OnStack { lowlink, .. }) = self.marks.get(name).copied() {
                    self.lower(parent.name, lowlink);
                }
            }
        }
    }
}

/// Finds all dependency cycles of `graph`.
///
/// Each cycle is the sub-graph induced by one strongly connected component
/// with more than one member. Edges between a class and its nested classes
/// are not counted; with `allow_intra_package_cycles`, neither are edges
/// within one package. Cycles left without edges are dropped.
#[must_use]
pub fn find_cycles(graph: &Graph, allow_intra_package_cycles: bool) -> Vec<DependencyMap> {
    let components = Tarjan::new(graph).run();
    debug!(
        "Found {} strongly connected component(s) among {} {}",
        components.len(),
        graph.len(),
        graph.scope()
    );

    let mut cycles: Vec<DependencyMap> = components
        .iter()
        .map(|members| induced(graph, members, allow_intra_package_cycles))
        .filter(|cycle| !cycle.is_empty())
        .collect();
    cycles.sort();
    cycles
}

fn induced(graph: &Graph, members: &BTreeSet<&str>, allow_intra_package: bool) -> DependencyMap {
    let mut cycle = DependencyMap::new();
    for &from in members {
        let Some(node) = graph.node(from) else {
            continue;
        };
        for to in node.dependencies() {
            if !members.contains(to) || is_nested(from, to) {
                continue;
            }
            let same_package = graph
                .node(to)
                .is_some_and(|target| target.package() == node.package());
            if allow_intra_package && same_package {
                continue;
            }
            let vias = node.provenance(to).into_iter().flatten().cloned();
            cycle.insert(0, from, vias, to);
        }
    }
    cycle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Model, Scope};

    fn packages(edges: &[(&str, &str)]) -> Graph {
        let mut model = Model::new();
        for (from, to) in edges {
            model.add_usage(from, to);
        }
        model.graph(Scope::Packages)
    }

    #[test]
    fn dag_has_no_cycles() {
        let graph = packages(&[("a.A", "b.B"), ("b.B", "c.C"), ("a.A", "c.C")]);
        assert!(find_cycles(&graph, false).is_empty());
    }

    #[test]
    fn ring_is_one_cycle() {
        let graph = packages(&[("a.A", "b.B"), ("b.B", "c.C"), ("c.C", "a.A")]);
        let cycles = find_cycles(&graph, false);
        assert_eq!(cycles.len(), 1);
        assert_eq!(
            cycles[0].elements().into_iter().collect::<Vec<_>>(),
            vec!["a", "b", "c"]
        );
        assert_eq!(
            cycles[0],
            DependencyMap::new()
                .with(0, "a", ["a.A"], "b")
                .with(0, "b", ["b.B"], "c")
                .with(0, "c", ["c.C"], "a")
        );
    }

    #[test]
    fn separate_components_are_reported_separately() {
        let graph = packages(&[
            ("x.X", "y.Y"),
            ("y.Y", "x.X"),
            ("a.A", "b.B"),
            ("b.B", "a.A"),
            ("b.B", "x.X"),
        ]);
        let cycles = find_cycles(&graph, false);
        assert_eq!(cycles.len(), 2);
        assert!(cycles[0].contains("a", "b"));
        assert!(!cycles[0].contains("b", "x"));
        assert!(cycles[1].contains("x", "y"));
    }

    #[test]
    fn nested_classes_are_not_a_cycle() {
        let mut model = Model::new();
        model
            .add_usage("a.Outer", "a.Outer$Inner")
            .add_usage("a.Outer$Inner", "a.Outer");
        assert!(find_cycles(&model.graph(Scope::Classes), false).is_empty());
    }

    #[test]
    fn deep_chain_does_not_exhaust_the_stack() {
        const LEN: usize = 100_000;
        let mut model = Model::new();
        for i in 0..LEN {
            model.add_usage(&format!("p.C{i}"), &format!("p.C{}", i + 1));
        }
        let graph = model.graph(Scope::Classes);
        assert!(find_cycles(&graph, false).is_empty());

        model.add_usage(&format!("p.C{LEN}"), "p.C0");
        let graph = model.graph(Scope::Classes);
        let cycles = find_cycles(&graph, false);
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].elements().len(), LEN + 1);
        assert_eq!(cycles[0].len(), LEN + 1);
    }

    #[test]
    fn lowlink_propagates_through_nested_components() {
        // a → b → c → b, c → a: one component; d → e → d hangs off c.
        let graph = packages(&[
            ("a.A", "b.B"),
            ("b.B", "c.C"),
            ("c.C", "b.B"),
            ("c.C", "a.A"),
            ("c.C", "d.D"),
            ("d.D", "e.E"),
            ("e.E", "d.D"),
        ]);
        let cycles = find_cycles(&graph, false);
        let members: Vec<Vec<&str>> = cycles
            .iter()
            .map(|cycle| cycle.elements().into_iter().collect())
            .collect();
        assert_eq!(members, vec![vec!["a", "b", "c"], vec!["d", "e"]]);
    }

    #[test]
    fn intra_package_cycles_can_be_ignored() {
        let mut model = Model::new();
        model.add_usage("a.P", "a.Q").add_usage("a.Q", "a.P");
        let graph = model.graph(Scope::Classes);

        assert_eq!(find_cycles(&graph, false).len(), 1);
        assert!(find_cycles(&graph, true).is_empty());
    }
}
