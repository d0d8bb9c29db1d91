//! Folder records and mailbox-tree flattening
//!
//! IMAP LIST responses name mailboxes by full hierarchical path. The
//! tool surface reports folders as an ordered flat sequence, parent
//! before children, so the paths are reassembled into a tree keyed by
//! the server-supplied delimiter and then flattened pre-order.

use serde::{Deserialize, Serialize};

/// One mailbox in the account's folder hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    /// Leaf name, e.g. `2024` for the path `Projects/2024`.
    pub name: String,
    /// Full hierarchical path as the server addresses it.
    pub path: String,
    /// Hierarchy delimiter reported by the server.
    pub delimiter: String,
    /// Protocol attributes from the LIST response (e.g. `\Noselect`).
    pub attributes: Vec<String>,
}

/// Mailbox hierarchy under construction from LIST responses.
#[derive(Debug, Default)]
pub(crate) struct FolderTree {
    roots: Vec<Node>,
}

#[derive(Debug)]
struct Node {
    name: String,
    delimiter: String,
    attributes: Vec<String>,
    children: Vec<Node>,
}

impl FolderTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one LIST entry by full path.
    ///
    /// Missing intermediate nodes are created with empty attributes;
    /// a later entry for the same path fills them in. First-seen order
    /// is preserved at every level.
    pub fn insert(&mut self, path: &str, delimiter: &str, attributes: Vec<String>) {
        let segments: Vec<&str> = if delimiter.is_empty() {
            vec![path]
        } else {
            path.split(delimiter).collect()
        };

        let mut nodes = &mut self.roots;
        for (depth, segment) in segments.iter().enumerate() {
            let last = depth + 1 == segments.len();
            let idx = nodes
                .iter()
                .position(|n| n.name == *segment)
                .unwrap_or_else(|| {
                    nodes.push(Node {
                        name: (*segment).to_string(),
                        delimiter: delimiter.to_string(),
                        attributes: Vec::new(),
                        children: Vec::new(),
                    });
                    nodes.len() - 1
                });
            if last {
                nodes[idx].attributes = attributes.clone();
            }
            nodes = &mut nodes[idx].children;
        }
    }

    /// Flatten the tree into folder records, pre-order, building each
    /// path by prefix concatenation.
    pub fn flatten(&self) -> Vec<Folder> {
        let mut folders = Vec::new();
        for node in &self.roots {
            flatten_into(node, "", &mut folders);
        }
        folders
    }
}

fn flatten_into(node: &Node, prefix: &str, out: &mut Vec<Folder>) {
    let path = if prefix.is_empty() {
        node.name.clone()
    } else {
        format!("{prefix}{}{}", node.delimiter, node.name)
    };

    out.push(Folder {
        name: node.name.clone(),
        path: path.clone(),
        delimiter: node.delimiter.clone(),
        attributes: node.attributes.clone(),
    });

    for child in &node.children {
        flatten_into(child, &path, out);
    }
}
