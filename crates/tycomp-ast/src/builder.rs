//! Convenience constructors for building trees.
//!
//! There is no parser in this workspace; hosts and tests assemble trees
//! bottom-up through these helpers. Names are interned on the way in.

use crate::arena::NodeArena;
use crate::node::{Arg, Node, NodeIndex, Param, TypeRef};

impl NodeArena {
    // =========================================================================
    // Types and parameters
    // =========================================================================

    pub fn named_type(&self, name: &str) -> TypeRef {
        TypeRef::Named(self.intern(name))
    }

    pub fn array_type(&self, element: TypeRef) -> TypeRef {
        TypeRef::Array(Box::new(element))
    }

    pub fn function_type(&self, params: Vec<TypeRef>, result: TypeRef, is_async: bool) -> TypeRef {
        TypeRef::Function {
            params,
            result: Box::new(result),
            is_async,
        }
    }

    /// Parameter with an argument label equal to its name.
    pub fn param(&self, name: &str, ty: Option<TypeRef>) -> Param {
        let name = self.intern(name);
        Param {
            label: Some(name),
            name,
            ty,
        }
    }

    /// Parameter written as `_ name: ty`.
    pub fn unlabeled_param(&self, name: &str, ty: Option<TypeRef>) -> Param {
        Param {
            label: None,
            name: self.intern(name),
            ty,
        }
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn int(&mut self, value: i64) -> NodeIndex {
        self.add(Node::IntLiteral(value))
    }

    pub fn float(&mut self, value: f64) -> NodeIndex {
        self.add(Node::FloatLiteral(value))
    }

    pub fn string(&mut self, value: &str) -> NodeIndex {
        self.add(Node::StringLiteral(value.to_string()))
    }

    pub fn boolean(&mut self, value: bool) -> NodeIndex {
        self.add(Node::BoolLiteral(value))
    }

    pub fn array(&mut self, elements: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::ArrayLiteral { elements })
    }

    pub fn decl_ref(&mut self, name: &str) -> NodeIndex {
        let name = self.intern(name);
        self.add(Node::DeclRef { name })
    }

    pub fn member(&mut self, base: NodeIndex, name: &str) -> NodeIndex {
        let name = self.intern(name);
        self.add(Node::MemberAccess { base, name })
    }

    pub fn unresolved_member(&mut self, name: &str) -> NodeIndex {
        let name = self.intern(name);
        self.add(Node::UnresolvedMember { name })
    }

    /// `callee(args)`; each argument is `(label, value)`.
    pub fn call(&mut self, callee: NodeIndex, args: Vec<(Option<&str>, NodeIndex)>) -> NodeIndex {
        let args = args
            .into_iter()
            .map(|(label, value)| Arg {
                label: label.map(|label| self.intern(label)),
                value,
            })
            .collect();
        self.add(Node::Call { callee, args })
    }

    pub fn closure(
        &mut self,
        params: Vec<Param>,
        result: Option<TypeRef>,
        is_async: bool,
        statements: Vec<NodeIndex>,
    ) -> NodeIndex {
        let body = self.block(statements);
        self.add(Node::Closure {
            params,
            result,
            is_async,
            body,
        })
    }

    pub fn await_expr(&mut self, operand: NodeIndex) -> NodeIndex {
        self.add(Node::Await { operand })
    }

    /// `base.<cc>`
    pub fn completion(&mut self, base: NodeIndex) -> NodeIndex {
        self.add(Node::CodeCompletion {
            base,
            leading_dot: false,
        })
    }

    /// `.<cc>`
    pub fn dot_completion(&mut self) -> NodeIndex {
        self.add(Node::CodeCompletion {
            base: NodeIndex::NONE,
            leading_dot: true,
        })
    }

    /// `<cc>` in a bare expression position.
    pub fn bare_completion(&mut self) -> NodeIndex {
        self.add(Node::CodeCompletion {
            base: NodeIndex::NONE,
            leading_dot: false,
        })
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn block(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::Block { statements })
    }

    pub fn let_stmt(&mut self, name: &str, ty: Option<TypeRef>, init: NodeIndex) -> NodeIndex {
        let name = self.intern(name);
        self.add(Node::Let { name, ty, init })
    }

    pub fn return_stmt(&mut self, value: NodeIndex) -> NodeIndex {
        self.add(Node::Return { value })
    }

    pub fn switch_stmt(&mut self, subject: NodeIndex, cases: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::Switch { subject, cases })
    }

    pub fn case(&mut self, patterns: Vec<NodeIndex>, statements: Vec<NodeIndex>) -> NodeIndex {
        let body = self.block(statements);
        self.add(Node::Case { patterns, body })
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn func(
        &mut self,
        name: &str,
        params: Vec<Param>,
        result: Option<TypeRef>,
        is_async: bool,
        statements: Vec<NodeIndex>,
    ) -> NodeIndex {
        let name = self.intern(name);
        let body = self.block(statements);
        self.add(Node::FuncDecl {
            name,
            params,
            result,
            is_async,
            body,
        })
    }

    pub fn enum_decl(&mut self, name: &str, cases: &[&str]) -> NodeIndex {
        let name = self.intern(name);
        let cases = cases.iter().map(|case| self.intern(case)).collect();
        self.add(Node::EnumDecl { name, cases })
    }

    /// `let name: ty` inside a struct body.
    pub fn stored_property(&mut self, name: &str, ty: TypeRef) -> NodeIndex {
        self.let_stmt(name, Some(ty), NodeIndex::NONE)
    }

    pub fn struct_decl(&mut self, name: &str, members: Vec<NodeIndex>) -> NodeIndex {
        let name = self.intern(name);
        self.add(Node::StructDecl { name, members })
    }

    pub fn source_file(&mut self, statements: Vec<NodeIndex>) -> NodeIndex {
        self.add(Node::SourceFile { statements })
    }
}
