//! Code completion driven by the constraint solver.
//!
//! A completion request type checks the code around the completion point
//! and observes every solution the solver produces through a
//! [`TypeCheckCompletionCallback`]. A per-kind handler pulls what it needs
//! out of each solution (receiver types, contextual types, the parameter an
//! argument binds to) and later turns that into [`CompletionItem`]s.
//!
//! If the statement around the completion point has no solution at all,
//! the expression containing it is checked again on its own in relaxed
//! mode, so broken surrounding code still yields completions.

pub mod callback;
pub mod driver;
pub mod handlers;
pub mod locator;
pub mod options;
pub mod results;
pub mod tracing_config;
pub mod utils;

pub use callback::{CallbackState, CompletionSolutionHandler, TypeCheckCompletionCallback};
pub use driver::{CompletionResponse, TypeCheckOutcome, complete_at, typecheck_for_completion};
pub use handlers::{
    ArgumentHandler, ArgumentResult, MemberAccessHandler, MemberAccessResult,
    UnresolvedMemberHandler, UnresolvedMemberResult,
};
pub use locator::{CompletionContextFinder, CompletionKind};
pub use options::{AsyncMemberPolicy, CompletionOptions};
pub use results::{CompletionItem, CompletionItemKind, TypeRelation, sort_priority};
pub use utils::{
    get_pattern_match_type, get_type_for_completion, is_context_async,
    is_implicit_single_expression_return, nullable_types_equal,
};
