//! Node arena for AST storage.

use crate::node::{DeclContext, Node, NodeIndex};
use std::sync::Arc;
use tycomp_common::{Atom, Interner};

/// Arena-based storage for AST nodes.
/// Nodes are stored contiguously and referenced by index.
///
/// Trees are built bottom-up: when a node is added, each of its children
/// gets the new node recorded as its parent.
#[derive(Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    parents: Vec<NodeIndex>,
    names: Interner,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena {
            nodes: Vec::new(),
            parents: Vec::new(),
            names: Interner::new(),
        }
    }

    /// Add a node to the arena and return its index
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let index = NodeIndex(self.nodes.len() as u32);
        for child in node.children() {
            if let Some(parent) = self.parents.get_mut(child.0 as usize) {
                debug_assert!(parent.is_none(), "node {child:?} already has a parent");
                *parent = index;
            }
        }
        self.nodes.push(node);
        self.parents.push(NodeIndex::NONE);
        index
    }

    /// Get a node by index
    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    /// Parent of a node; NONE for roots and out-of-range indices.
    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        if index.is_none() {
            return NodeIndex::NONE;
        }
        self.parents
            .get(index.0 as usize)
            .copied()
            .unwrap_or(NodeIndex::NONE)
    }

    /// Iterate over the strict ancestors of a node, innermost first.
    pub fn ancestors(&self, index: NodeIndex) -> Ancestors<'_> {
        Ancestors {
            arena: self,
            current: self.parent(index),
        }
    }

    /// Innermost function, closure or source file enclosing `index`.
    /// A declaration context node encloses its body, not itself.
    pub fn enclosing_decl_context(&self, index: NodeIndex) -> Option<DeclContext> {
        self.ancestors(index)
            .find(|&(_, node)| node.is_decl_context())
            .map(|(idx, _)| DeclContext(idx))
    }

    /// Check whether `ancestor` is `index` or one of its ancestors.
    pub fn is_within(&self, index: NodeIndex, ancestor: NodeIndex) -> bool {
        index == ancestor || self.ancestors(index).any(|(idx, _)| idx == ancestor)
    }

    /// True if an `await` occurs under `index` without crossing into a
    /// nested closure or function.
    pub fn contains_await(&self, index: NodeIndex) -> bool {
        self.any_in_body(index, &|node| matches!(node, Node::Await { .. }))
    }

    /// True if a `return` occurs under `index` without crossing into a
    /// nested closure or function.
    pub fn contains_return(&self, index: NodeIndex) -> bool {
        self.any_in_body(index, &|node| matches!(node, Node::Return { .. }))
    }

    fn any_in_body(&self, index: NodeIndex, pred: &dyn Fn(&Node) -> bool) -> bool {
        let Some(node) = self.get(index) else {
            return false;
        };
        node.children().into_iter().any(|child| match self.get(child) {
            Some(child_node) if pred(child_node) => true,
            Some(child_node) if child_node.is_decl_context() => false,
            Some(_) => self.any_in_body(child, pred),
            None => false,
        })
    }

    /// Shared name interner for identifiers, labels and member names.
    pub fn names(&self) -> &Interner {
        &self.names
    }

    pub fn intern(&self, name: &str) -> Atom {
        self.names.intern(name)
    }

    pub fn name(&self, atom: Atom) -> Arc<str> {
        self.names.resolve(atom)
    }

    /// Get the number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the arena is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Iterator returned by [`NodeArena::ancestors`].
pub struct Ancestors<'a> {
    arena: &'a NodeArena,
    current: NodeIndex,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = (NodeIndex, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.current;
        let node = self.arena.get(idx)?;
        self.current = self.arena.parent(idx);
        Some((idx, node))
    }
}

#[cfg(test)]
#[path = "../tests/arena_tests.rs"]
mod arena_tests;
