//! Arena-backed binary tree of category splits.

pub type NodeId = usize;

/// One split of a decision tree. Children are either both present or both absent.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryNode {
    pub key: String,
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
    pub split_var: i32,
    pub split_var_name: String,
    pub split_val: f64,
    pub significance_squared: f64,
}

impl CategoryNode {
    fn blank(key: String, parent: Option<NodeId>) -> Self {
        Self {
            key,
            parent,
            left: None,
            right: None,
            split_var: -999,
            split_var_name: String::new(),
            split_val: -999.0,
            significance_squared: -999.0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match (self.left, self.right) {
            (Some(l), Some(r)) => Some((l, r)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    nodes: Vec<CategoryNode>,
}

impl CategoryTree {
    /// A tree holding a single blank root.
    pub fn new() -> Self {
        Self {
            nodes: vec![CategoryNode::blank(String::new(), None)],
        }
    }

    pub const ROOT: NodeId = 0;

    pub fn root(&self) -> &CategoryNode {
        &self.nodes[Self::ROOT]
    }

    pub fn node(&self, id: NodeId) -> &CategoryNode {
        &self.nodes[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut CategoryNode {
        &mut self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryNode> {
        self.nodes.iter()
    }

    /// Creates both children of `id` with placeholder keys and returns (left, right).
    /// Calling it on a node that already has children returns the existing pair.
    pub fn spawn_children(&mut self, id: NodeId) -> (NodeId, NodeId) {
        if let Some(pair) = self.nodes[id].children() {
            return pair;
        }
        let base = self.nodes[id].key.clone();
        let left = self.nodes.len();
        self.nodes
            .push(CategoryNode::blank(format!("{}_left", base), Some(id)));
        let right = self.nodes.len();
        self.nodes
            .push(CategoryNode::blank(format!("{}_right", base), Some(id)));
        self.nodes[id].left = Some(left);
        self.nodes[id].right = Some(right);
        (left, right)
    }

    /// Ancestor chain from `id` up to and including the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut cur = id;
        while let Some(p) = self.nodes[cur].parent {
            chain.push(p);
            cur = p;
        }
        chain
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut best = 0;
        let mut stack = vec![(Self::ROOT, 1usize)];
        while let Some((id, d)) = stack.pop() {
            best = best.max(d);
            if let Some((l, r)) = self.nodes[id].children() {
                stack.push((l, d + 1));
                stack.push((r, d + 1));
            }
        }
        best
    }

    pub fn terminal_count(&self) -> usize {
        self.iter().filter(|n| n.is_terminal()).count()
    }

    /// Distinct split variables in first-use order.
    pub fn split_variables(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for n in self.iter().filter(|n| !n.is_terminal()) {
            if !names.contains(&n.split_var_name.as_str()) {
                names.push(&n.split_var_name);
            }
        }
        names
    }
}
