//! Human-readable type rendering for completion details and diagnostics.

use crate::env::TypeEnvironment;
use crate::types::{FunctionShape, TypeData, TypeId};
use tycomp_common::limits::MAX_TYPE_DEPTH;

/// Renders `TypeId`s in source syntax: `[Int]`, `(by: Int) -> Int`,
/// `() async -> String`. Unbound type variables print as `$T<n>`.
pub struct TypeFormatter<'a> {
    env: &'a TypeEnvironment<'a>,
    depth: u32,
}

impl<'a> TypeFormatter<'a> {
    pub fn new(env: &'a TypeEnvironment<'a>) -> Self {
        TypeFormatter { env, depth: 0 }
    }

    pub fn format(&mut self, type_id: TypeId) -> String {
        if self.depth > MAX_TYPE_DEPTH {
            return "...".to_string();
        }
        self.depth += 1;
        let rendered = match self.env.interner().lookup(type_id) {
            None => format!("<invalid type {}>", type_id.0),
            Some(TypeData::Intrinsic(kind)) => kind.name().to_string(),
            Some(TypeData::Array(element)) => format!("[{}]", self.format(element)),
            Some(TypeData::Function(shape)) => self.format_function(&shape),
            Some(TypeData::Nominal(id)) => match self.env.nominal(id) {
                Some(info) => self.env.arena().name(info.name).to_string(),
                None => format!("<nominal {}>", id.0),
            },
            Some(TypeData::Var(var)) => format!("$T{}", var.0),
        };
        self.depth -= 1;
        rendered
    }

    fn format_function(&mut self, shape: &FunctionShape) -> String {
        let params: Vec<String> = shape
            .params
            .iter()
            .map(|param| {
                let ty = self.format(param.type_id);
                match param.label {
                    Some(label) => format!("{}: {ty}", self.env.arena().name(label)),
                    None => ty,
                }
            })
            .collect();
        let effects = if shape.is_async { " async" } else { "" };
        format!(
            "({}){effects} -> {}",
            params.join(", "),
            self.format(shape.result)
        )
    }
}
