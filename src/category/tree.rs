//! Categories derived from a decision tree stored as nested XML elements.
//!
//! Every element is one node. Its first four attributes, in document order, are
//! the split variable index, the split variable name, the split threshold and
//! the squared significance of the split. An element with no child elements is
//! a leaf; otherwise it must have exactly two, left (`<=`) then right (`>`).

use super::node::{CategoryTree, NodeId};
use super::registry::CategoryMap;
use super::Categorizer;
use crate::error::{DfResult, DimuForgeError};
use crate::vars::VarSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Nesting beyond this is treated as a malformed description.
pub const MAX_TREE_DEPTH: usize = 64;

#[derive(Debug, Clone)]
pub struct TreeCategorizer {
    pub tree: CategoryTree,
    pub categories: CategoryMap,
}

struct SplitInfo {
    split_var: i32,
    split_var_name: String,
    split_val: f64,
    significance_squared: f64,
}

/// Replaces characters that are unsafe in a category key.
fn sanitize(s: &str) -> String {
    s.replace(' ', "").replace('.', "p").replace('-', "n")
}

/// `<var>_<val>` with the value printed to three decimals, e.g. `bdt_0p250`.
pub fn split_label(var: &str, val: f64) -> String {
    sanitize(&format!("{}_{:7.3}", var, val))
}

/// Leaf prefix built from the significance, e.g. `T_1p2345_`.
pub fn significance_label(significance_squared: f64) -> String {
    format!("T_{}_", sanitize(&format!("{:5.4}", significance_squared.sqrt())))
}

fn read_split(xnode: roxmltree::Node) -> DfResult<SplitInfo> {
    let values: Vec<&str> = xnode.attributes().map(|a| a.value()).take(4).collect();
    if values.len() < 4 {
        return Err(DimuForgeError::TreeFormat(format!(
            "<{}> at byte {} has {} attributes, expected 4",
            xnode.tag_name().name(),
            xnode.range().start,
            values.len()
        )));
    }

    let split_var = values[0].trim().parse::<i32>().map_err(|e| {
        DimuForgeError::TreeFormat(format!("bad split variable index '{}': {}", values[0], e))
    })?;
    let split_val = parse_f64(values[2], "split value")?;
    let significance_squared = parse_f64(values[3], "significance squared")?;

    Ok(SplitInfo {
        split_var,
        split_var_name: values[1].trim().to_string(),
        split_val,
        significance_squared,
    })
}

fn parse_f64(raw: &str, what: &str) -> DfResult<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| DimuForgeError::TreeFormat(format!("bad {} '{}': {}", what, raw, e)))
}

impl TreeCategorizer {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> DfResult<Self> {
        let path = path.as_ref();
        info!("🌳 Loading decision tree from {}", path.display());
        let text = fs::read_to_string(path)
            .map_err(|e| DimuForgeError::Xml(format!("reading {}: {}", path.display(), e)))?;
        Self::load_from_str(&text)
    }

    pub fn load_from_str(text: &str) -> DfResult<Self> {
        let doc = roxmltree::Document::parse(text)
            .map_err(|e| DimuForgeError::Xml(format!("parsing tree: {}", e)))?;

        let mut out = Self {
            tree: CategoryTree::new(),
            categories: CategoryMap::new(),
        };
        out.load_recursive(doc.root_element(), CategoryTree::ROOT, 1)?;
        out.assign_names();

        debug!(
            "Tree loaded: {} nodes, {} leaves, depth {}",
            out.tree.len(),
            out.tree.terminal_count(),
            out.tree.depth()
        );
        Ok(out)
    }

    fn load_recursive(&mut self, xnode: roxmltree::Node, id: NodeId, depth: usize) -> DfResult<()> {
        if depth > MAX_TREE_DEPTH {
            return Err(DimuForgeError::TreeFormat(format!(
                "tree deeper than {} levels",
                MAX_TREE_DEPTH
            )));
        }

        let split = read_split(xnode)?;
        let is_root = id == CategoryTree::ROOT;
        {
            let node = self.tree.node_mut(id);
            node.split_var = split.split_var;
            node.split_var_name = split.split_var_name;
            node.split_val = split.split_val;
            node.significance_squared = split.significance_squared;
        }

        let xchildren: Vec<roxmltree::Node> = xnode.children().filter(|n| n.is_element()).collect();
        match xchildren.as_slice() {
            [] => {
                let base = if is_root {
                    "root".to_string()
                } else {
                    self.tree.node(id).key.clone()
                };
                let key = format!("{}{}", significance_label(split.significance_squared), base);
                self.categories.register(&key, false, true);
                self.tree.node_mut(id).key = key;
                Ok(())
            }
            [xleft, xright] => {
                if is_root {
                    self.tree.node_mut(id).key = "root".to_string();
                }
                let parent_key = self.tree.node(id).key.clone();
                self.categories.register(&parent_key, false, false);

                let node = self.tree.node(id);
                let scut = split_label(&node.split_var_name, node.split_val);
                let (left, right) = self.tree.spawn_children(id);
                if is_root {
                    self.tree.node_mut(left).key = format!("lt_{}", scut);
                    self.tree.node_mut(right).key = format!("gt_{}", scut);
                } else {
                    self.tree.node_mut(left).key = format!("{}_lt_{}", parent_key, scut);
                    self.tree.node_mut(right).key = format!("{}_gt_{}", parent_key, scut);
                }

                self.load_recursive(*xleft, left, depth + 1)?;
                self.load_recursive(*xright, right, depth + 1)
            }
            other => Err(DimuForgeError::TreeFormat(format!(
                "node '{}' has {} children, expected 0 or 2",
                if is_root { "root" } else { self.tree.node(id).key.as_str() },
                other.len()
            ))),
        }
    }

    /// Leaves become c0, c1, ... in registration order; inner nodes below the root are hidden.
    fn assign_names(&mut self) {
        let mut next = 0;
        for c in self.categories.iter_mut() {
            if c.is_terminal {
                c.name = format!("c{}", next);
                next += 1;
            } else if c.key == "root" {
                c.name = c.key.clone();
            } else {
                c.name = c.key.clone();
                c.hide = true;
            }
        }
    }

    /// Nodes visited by an event, root first. `evaluate` walks the same route without collecting it.
    pub fn path(&self, vars: &VarSet) -> Vec<NodeId> {
        let mut visited = Vec::new();
        let mut id = CategoryTree::ROOT;
        loop {
            visited.push(id);
            let node = self.tree.node(id);
            match node.children() {
                None => return visited,
                Some((left, right)) => {
                    let x = vars.get_value(&node.split_var_name);
                    id = if x <= node.split_val { left } else { right };
                }
            }
        }
    }
}

impl Categorizer for TreeCategorizer {
    fn categories(&self) -> &CategoryMap {
        &self.categories
    }

    fn categories_mut(&mut self) -> &mut CategoryMap {
        &mut self.categories
    }

    fn evaluate(&mut self, vars: &VarSet) {
        let mut id = CategoryTree::ROOT;
        loop {
            let node = self.tree.node(id);
            self.categories.set(&node.key);
            match node.children() {
                None => return,
                Some((left, right)) => {
                    let x = vars.get_value(&node.split_var_name);
                    id = if x <= node.split_val { left } else { right };
                }
            }
        }
    }
}
