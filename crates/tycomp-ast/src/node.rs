//! Node definitions.

use serde::Serialize;
use smallvec::SmallVec;
use tycomp_common::Atom;

/// Index of a node in a `NodeArena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Sentinel for "no node" (absent optional child, parent of the root).
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    #[inline]
    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    #[inline]
    pub fn is_some(self) -> bool {
        self != Self::NONE
    }
}

/// A written type annotation, lowered to a solver type on demand.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeRef {
    /// A builtin (`Int`, `String`, ...) or a declared nominal type.
    Named(Atom),
    /// `[Element]`
    Array(Box<TypeRef>),
    /// `(params) async -> result`
    Function {
        params: Vec<TypeRef>,
        result: Box<TypeRef>,
        is_async: bool,
    },
}

/// A function or closure parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    /// Argument label; `None` for `_`.
    pub label: Option<Atom>,
    pub name: Atom,
    /// Closure parameters may omit the annotation.
    pub ty: Option<TypeRef>,
}

/// A call argument.
#[derive(Clone, Debug, PartialEq)]
pub struct Arg {
    pub label: Option<Atom>,
    pub value: NodeIndex,
}

/// Syntax node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    // ---------------------------------------------------------------------
    // Expressions
    // ---------------------------------------------------------------------
    IntLiteral(i64),
    FloatLiteral(f64),
    StringLiteral(String),
    BoolLiteral(bool),
    /// `[a, b, c]`
    ArrayLiteral { elements: Vec<NodeIndex> },
    /// A reference to a local, parameter or global function by name.
    DeclRef { name: Atom },
    /// `base.name`
    MemberAccess { base: NodeIndex, name: Atom },
    /// `.name` with the base inferred from context.
    UnresolvedMember { name: Atom },
    /// `callee(label: value, ...)`
    Call { callee: NodeIndex, args: Vec<Arg> },
    /// `{ (params) async -> result in body }`
    Closure {
        params: Vec<Param>,
        result: Option<TypeRef>,
        is_async: bool,
        body: NodeIndex,
    },
    /// `await operand`
    Await { operand: NodeIndex },
    /// The completion placeholder. `base` is the receiver for `base.<cc>`
    /// (NONE for a bare position); `leading_dot` marks `.<cc>`.
    CodeCompletion { base: NodeIndex, leading_dot: bool },

    // ---------------------------------------------------------------------
    // Statements
    // ---------------------------------------------------------------------
    /// A braced statement list: function, closure and case bodies.
    Block { statements: Vec<NodeIndex> },
    /// `let name: ty = init`. `init` is NONE for stored struct properties.
    Let {
        name: Atom,
        ty: Option<TypeRef>,
        init: NodeIndex,
    },
    /// `return value` (value is NONE for a bare return).
    Return { value: NodeIndex },
    /// `switch subject { cases }`
    Switch {
        subject: NodeIndex,
        cases: Vec<NodeIndex>,
    },
    /// `case p1, p2: body`
    Case {
        patterns: Vec<NodeIndex>,
        body: NodeIndex,
    },

    // ---------------------------------------------------------------------
    // Declarations
    // ---------------------------------------------------------------------
    FuncDecl {
        name: Atom,
        params: Vec<Param>,
        result: Option<TypeRef>,
        is_async: bool,
        body: NodeIndex,
    },
    EnumDecl { name: Atom, cases: Vec<Atom> },
    /// Members are `Let` (stored properties) and `FuncDecl` (methods).
    StructDecl { name: Atom, members: Vec<NodeIndex> },
    SourceFile { statements: Vec<NodeIndex> },
}

impl Node {
    /// Direct children in source order, skipping absent ones.
    pub fn children(&self) -> SmallVec<[NodeIndex; 4]> {
        let mut children: SmallVec<[NodeIndex; 4]> = SmallVec::new();
        let mut push = |idx: NodeIndex| {
            if idx.is_some() {
                children.push(idx);
            }
        };
        match self {
            Node::IntLiteral(_)
            | Node::FloatLiteral(_)
            | Node::StringLiteral(_)
            | Node::BoolLiteral(_)
            | Node::DeclRef { .. }
            | Node::UnresolvedMember { .. }
            | Node::EnumDecl { .. } => {}
            Node::ArrayLiteral { elements } => elements.iter().copied().for_each(&mut push),
            Node::MemberAccess { base, .. } => push(*base),
            Node::Call { callee, args } => {
                push(*callee);
                args.iter().for_each(|arg| push(arg.value));
            }
            Node::Closure { body, .. } | Node::FuncDecl { body, .. } => push(*body),
            Node::Await { operand } => push(*operand),
            Node::CodeCompletion { base, .. } => push(*base),
            Node::Block { statements } | Node::SourceFile { statements } => {
                statements.iter().copied().for_each(&mut push)
            }
            Node::Let { init, .. } => push(*init),
            Node::Return { value } => push(*value),
            Node::Switch { subject, cases } => {
                push(*subject);
                cases.iter().copied().for_each(&mut push);
            }
            Node::Case { patterns, body } => {
                patterns.iter().copied().for_each(&mut push);
                push(*body);
            }
            Node::StructDecl { members, .. } => members.iter().copied().for_each(&mut push),
        }
        children
    }

    /// True for nodes that produce a value.
    pub fn is_expression(&self) -> bool {
        matches!(
            self,
            Node::IntLiteral(_)
                | Node::FloatLiteral(_)
                | Node::StringLiteral(_)
                | Node::BoolLiteral(_)
                | Node::ArrayLiteral { .. }
                | Node::DeclRef { .. }
                | Node::MemberAccess { .. }
                | Node::UnresolvedMember { .. }
                | Node::Call { .. }
                | Node::Closure { .. }
                | Node::Await { .. }
                | Node::CodeCompletion { .. }
        )
    }

    /// True for nodes that open a new declaration context.
    pub fn is_decl_context(&self) -> bool {
        matches!(
            self,
            Node::FuncDecl { .. } | Node::Closure { .. } | Node::SourceFile { .. }
        )
    }
}

/// A declaration context: the function, closure or source file whose body
/// encloses a node. Wraps the index of that node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct DeclContext(pub NodeIndex);

impl DeclContext {
    #[inline]
    pub fn node(self) -> NodeIndex {
        self.0
    }
}
