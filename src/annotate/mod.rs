//! Annotation
//!
//! Turns an indexed plan tree into human-readable explanations. Each
//! operator gets one annotation: scans and joins are costed against the
//! alternatives the index collected for the same relation or predicate,
//! and every recognized operator kind carries a tailored description.
//! Styling is structural ([`StyledText`] spans), with an HTML renderer
//! for interfaces that want markup.

mod dispatch;
mod rules;
mod text;

pub use dispatch::{annotate_node, annotate_plan, Annotation};
pub use text::{Span, Style, StyledText};
