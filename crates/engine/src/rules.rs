//! Conditional-display and constraint-violation rules.
//!
//! Both are pure reads over live values and both fail soft: an unresolvable
//! condition never hides data, and validation annotates the render without
//! ever blocking a write.

use formkit_core::{InstanceId, ObjectArena, RefOrigin, Value};
use formkit_schema::FieldLayout;

/// Advisory validation outcome for one field, recomputed every render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationResult {
    /// Required annotation present and the reference is unassigned.
    pub missing_required: bool,
    /// Origin-constraint message, when violated.
    pub constraint: Option<String>,
}

/// Whether a field is visible under its ShowIf condition.
///
/// The condition name resolves against the innermost instance of `chain`,
/// falling back one structural level; anything unresolvable or non-boolean
/// leaves the field visible.
pub fn should_show(field: &FieldLayout, chain: &[InstanceId], arena: &ObjectArena) -> bool {
    let Some(condition) = &field.show_if else {
        return true;
    };
    match arena.resolve_in_chain(chain, condition) {
        Some(Value::Bool(flag)) => *flag,
        _ => true,
    }
}

/// Validate a field's current value.
pub fn validate(field: &FieldLayout, value: &Value, arena: &ObjectArena) -> ValidationResult {
    let missing_required = field.required.is_some() && value.is_unset_reference();

    let mut constraint = None;
    if let Some(Some(target)) = value.as_reference() {
        if let Some(object) = arena.get(target) {
            if field.assets_only && object.origin() == RefOrigin::Scene {
                constraint = Some("Only assets allowed!".to_string());
            } else if field.scene_only && object.origin() == RefOrigin::Asset {
                constraint = Some("Only scene objects allowed!".to_string());
            }
        }
    }

    ValidationResult {
        missing_required,
        constraint,
    }
}
