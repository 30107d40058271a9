//! Syntax tree for tycomp.
//!
//! The solver and the completion layer only need a small, typed view of the
//! source: expressions (including the code-completion placeholder),
//! statements, and the declarations that introduce names and nominal types.
//! Nodes live in a `NodeArena` and are referenced by `NodeIndex`; every node
//! records its parent so context can be recovered by walking upwards.

mod arena;
mod builder;
mod node;

pub use arena::{Ancestors, NodeArena};
pub use node::{Arg, DeclContext, Node, NodeIndex, Param, TypeRef};
