//! Per-kind completion handlers.
//!
//! Each handler implements [`CompletionSolutionHandler`], keeping a
//! deduplicated list of what it learned from every solution, and turns
//! that list into completion items once solving is over.
//!
//! [`CompletionSolutionHandler`]: crate::callback::CompletionSolutionHandler

pub mod argument;
pub mod member_access;
pub mod unresolved_member;

pub use argument::{ArgumentHandler, ArgumentResult};
pub use member_access::{MemberAccessHandler, MemberAccessResult};
pub use unresolved_member::{UnresolvedMemberHandler, UnresolvedMemberResult};

use crate::results::{CompletionItem, CompletionItemKind, TypeRelation};
use rustc_hash::FxHashSet;
use tycomp_solver::{MemberKind, TypeEnvironment, TypeId};

/// `name(label:_:)` for a method with a function type, `name` otherwise.
pub(crate) fn member_label(env: &TypeEnvironment<'_>, name: &str, type_id: TypeId) -> String {
    let Some(shape) = env.interner().function_shape(type_id) else {
        return name.to_string();
    };
    let mut label = String::with_capacity(name.len() + 2);
    label.push_str(name);
    label.push('(');
    for param in &shape.params {
        match param.label {
            Some(atom) => label.push_str(&env.names().resolve(atom)),
            None => label.push('_'),
        }
        label.push(':');
    }
    label.push(')');
    label
}

/// Items for the enum cases of `type_id`, inserted with a leading dot.
pub(crate) fn enum_case_items(env: &TypeEnvironment<'_>, type_id: TypeId) -> Vec<CompletionItem> {
    let detail = env.format_type(type_id);
    env.members_of(type_id)
        .into_iter()
        .filter(|member| member.is_static && member.kind == MemberKind::EnumCase)
        .map(|member| {
            let name = env.names().resolve(member.name);
            CompletionItem::new(name.to_string(), CompletionItemKind::EnumMember)
                .with_detail(detail.clone())
                .with_insert_text(format!(".{name}"))
                .with_type_relation(TypeRelation::Convertible)
        })
        .collect()
}

/// Keep the first item for each label and detail.
pub(crate) fn dedup_items(items: &mut Vec<CompletionItem>) {
    let mut seen: FxHashSet<(String, Option<String>)> = FxHashSet::default();
    items.retain(|item| seen.insert((item.label.clone(), item.detail.clone())));
}
