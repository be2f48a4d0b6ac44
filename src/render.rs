//! ASCII rendering of roadmaps and resource lists.

use std::collections::{HashMap, HashSet};

use crate::models::{Edge, IndexedResource, Node, NodeId};

const EMPTY: char = '◇';
const NOT_STARTED: char = '○';
const IN_PROGRESS: char = '◐';
const DONE: char = '●';
const CYCLE: &str = "↺";

/// Completed vs. total resources of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

fn progress_symbol(progress: Progress) -> char {
    match progress {
        Progress { total: 0, .. } => EMPTY,
        Progress { done: 0, .. } => NOT_STARTED,
        Progress { done, total } if done >= total => DONE,
        _ => IN_PROGRESS,
    }
}

/// Render a roadmap DAG as an ASCII tree.
///
/// Nodes without incoming edges are roots; a node with several parents is
/// printed under each of them. Anything unreachable from a root (only
/// possible through a cycle) is printed as an extra root.
///
/// Example output:
/// ```text
/// ○ Basics [0/2]
/// ├── ● Arrays [3/3]
/// │   └── ◐ Sorting [1/4]
/// └── ◇ Recursion
/// ```
pub fn render_roadmap(
    nodes: &[Node],
    edges: &[Edge],
    progress: impl Fn(&Node) -> Progress,
) -> String {
    let by_id: HashMap<&NodeId, &Node> = nodes.iter().map(|n| (&n.id, n)).collect();
    let mut children: HashMap<&NodeId, Vec<&Node>> = HashMap::new();
    let mut has_parent: HashSet<&NodeId> = HashSet::new();
    for edge in edges {
        if let (Some(_), Some(target)) = (by_id.get(&edge.source), by_id.get(&edge.target)) {
            children.entry(&edge.source).or_default().push(*target);
            has_parent.insert(&edge.target);
        }
    }

    let mut renderer = Renderer {
        children,
        progress,
        rendered: HashSet::new(),
        output: String::new(),
    };
    for node in nodes.iter().filter(|n| !has_parent.contains(&n.id)) {
        renderer.render_node(node, "", true, true, &mut Vec::new());
    }
    for node in nodes {
        if !renderer.rendered.contains(&node.id) {
            renderer.render_node(node, "", true, true, &mut Vec::new());
        }
    }
    renderer.output
}

struct Renderer<'n, P> {
    children: HashMap<&'n NodeId, Vec<&'n Node>>,
    progress: P,
    rendered: HashSet<&'n NodeId>,
    output: String,
}

impl<'n, P: Fn(&Node) -> Progress> Renderer<'n, P> {
    fn label(&self, node: &Node) -> String {
        let progress = (self.progress)(node);
        let symbol = progress_symbol(progress);
        if progress.total == 0 {
            format!("{} {}", symbol, node.title)
        } else {
            format!("{} {} [{}/{}]", symbol, node.title, progress.done, progress.total)
        }
    }

    /// Recursively render a node and its children. `path` holds the
    /// ancestors of `node` so cycles terminate.
    fn render_node(
        &mut self,
        node: &'n Node,
        prefix: &str,
        is_last: bool,
        is_root: bool,
        path: &mut Vec<&'n NodeId>,
    ) {
        if !is_root {
            self.output.push_str(prefix);
            self.output.push_str(if is_last { "└── " } else { "├── " });
        }

        if path.contains(&&node.id) {
            self.output.push_str(&format!("{} {}\n", CYCLE, node.title));
            return;
        }

        let label = self.label(node);
        self.output.push_str(&label);
        self.output.push('\n');
        self.rendered.insert(&node.id);

        let child_prefix = if is_root {
            String::new()
        } else {
            let continuation = if is_last { "    " } else { "│   " };
            format!("{}{}", prefix, continuation)
        };

        let children = self.children.get(&node.id).cloned().unwrap_or_default();
        path.push(&node.id);
        for (i, child) in children.iter().enumerate() {
            let child_is_last = i == children.len() - 1;
            self.render_node(child, &child_prefix, child_is_last, false, path);
        }
        path.pop();
    }
}

/// Render a resource list with completion boxes, one line per resource.
pub fn render_resources(
    resources: &[IndexedResource],
    checked: impl Fn(&IndexedResource) -> Option<bool>,
) -> String {
    let mut output = String::new();
    for resource in resources {
        let mark = match checked(resource) {
            Some(true) => "[x]",
            Some(false) => "[ ]",
            None => "[?]",
        };
        output.push_str(&format!("{} {}. {}\n", mark, resource.index, resource.title));
    }
    output
}
