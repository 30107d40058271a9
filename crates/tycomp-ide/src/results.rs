//! Completion items produced from handler results.

use tycomp_solver::TypeId;

/// The kind of a completion item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum CompletionItemKind {
    /// A stored or builtin property
    Property,
    /// An instance method
    Method,
    /// An enum case
    EnumMember,
    /// An argument label
    Parameter,
}

/// Sort priority categories. Lower strings appear first.
pub mod sort_priority {
    /// Argument labels for the parameter being completed.
    pub const ARGUMENT_LABEL: &str = "09";
    /// Items whose type converts to the expected type.
    pub const EXPECTED_TYPE: &str = "10";
    /// Members with no known relation to the expected type.
    pub const MEMBER: &str = "11";
    /// Members whose type is unrelated to a known expected type.
    pub const UNRELATED: &str = "12";
}

/// How an item's type relates to the type the context expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeRelation {
    Convertible,
    Unrelated,
    /// No expected type, or either side is unknown.
    Unknown,
}

impl TypeRelation {
    pub fn sort_text(self) -> &'static str {
        match self {
            TypeRelation::Convertible => sort_priority::EXPECTED_TYPE,
            TypeRelation::Unknown => sort_priority::MEMBER,
            TypeRelation::Unrelated => sort_priority::UNRELATED,
        }
    }
}

/// Relation of `item` to `expected`.
///
/// A body made of one expression may just as well be a statement whose
/// value is dropped, so a mismatch there is not held against the item.
pub fn compute_type_relation(
    item: TypeId,
    expected: Option<TypeId>,
    is_implicit_single_expression_return: bool,
) -> TypeRelation {
    let Some(expected) = expected else {
        return TypeRelation::Unknown;
    };
    if expected.is_hole() || item.is_hole() {
        return TypeRelation::Unknown;
    }
    if item == expected {
        TypeRelation::Convertible
    } else if is_implicit_single_expression_return {
        TypeRelation::Unknown
    } else {
        TypeRelation::Unrelated
    }
}

/// A completion item to be suggested to the user.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    /// The label to display in the completion list
    pub label: String,
    pub kind: CompletionItemKind,
    /// The item's type, formatted
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_text: Option<String>,
    /// Text to insert when the completion is accepted, if different from `label`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert_text: Option<String>,
    pub type_relation: TypeRelation,
    /// Using the item needs `await` but the context is not async.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub requires_async_context: bool,
}

impl CompletionItem {
    pub fn new(label: String, kind: CompletionItemKind) -> Self {
        Self {
            label,
            kind,
            detail: None,
            sort_text: None,
            insert_text: None,
            type_relation: TypeRelation::Unknown,
            requires_async_context: false,
        }
    }

    pub fn with_detail(mut self, detail: String) -> Self {
        self.detail = Some(detail);
        self
    }

    pub fn with_sort_text(mut self, sort_text: impl Into<String>) -> Self {
        self.sort_text = Some(sort_text.into());
        self
    }

    pub fn with_insert_text(mut self, insert_text: String) -> Self {
        self.insert_text = Some(insert_text);
        self
    }

    /// Set the type relation and the matching sort text.
    pub fn with_type_relation(mut self, relation: TypeRelation) -> Self {
        self.type_relation = relation;
        self.sort_text = Some(relation.sort_text().to_string());
        self
    }

    pub fn with_requires_async_context(mut self, requires: bool) -> Self {
        self.requires_async_context = requires;
        self
    }

    pub fn effective_sort_text(&self) -> &str {
        self.sort_text.as_deref().unwrap_or(sort_priority::MEMBER)
    }
}

/// Order items by sort text, then label.
pub fn sort_completion_items(items: &mut [CompletionItem]) {
    items.sort_by(|a, b| {
        a.effective_sort_text()
            .cmp(b.effective_sort_text())
            .then_with(|| a.label.cmp(&b.label))
            .then_with(|| a.detail.cmp(&b.detail))
    });
}

#[cfg(test)]
#[path = "../tests/results_tests.rs"]
mod results_tests;
