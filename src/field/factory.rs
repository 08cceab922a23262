//! field construction by element kind

use super::{Field, FieldKind, FieldSpec};
use crate::dom::Document;
use crate::error::{Error, Result};

/// build the field variant matching the first element `spec.selector` finds
///
/// mixed selectors (say an input and a select) are treated entirely as the
/// kind of their first match.
pub fn create_field(document: &dyn Document, spec: FieldSpec) -> Result<Field> {
    let first = document
        .query_selector(&spec.selector)?
        .ok_or_else(|| Error::selector_not_found(&spec.selector))?;
    let kind = FieldKind::from(first.kind());
    Field::new(document, kind, spec)
}
