//! Live property values and their semantic kinds.
//!
//! Forms never touch concrete host types; every editable field is one of
//! these variants, and annotation applicability is decided against the
//! [`ValueKind`] a field declares (for collections, against the element
//! kind, since grouping and required-ness describe what a single slot
//! holds).

use crate::object::InstanceId;
use serde::{Deserialize, Serialize};

/// What a reference field points at.
///
/// The kind drives the two implicit-annotation rules of the layout
/// compiler: some kinds must be assigned to be usable, some carry a
/// built-in preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefKind {
    /// A plain scene object.
    Object,
    /// A reusable template asset.
    Prefab,
    /// A 2D image asset.
    Sprite,
    /// An audio asset.
    AudioClip,
    /// A raw text asset.
    TextAsset,
    /// A UI text element.
    UiText,
    /// A UI image element.
    UiImage,
    /// An animation controller.
    Animator,
}

impl RefKind {
    /// Kinds that are unusable while unassigned; the compiler synthesizes a
    /// Required annotation for them unless explicitly opted out.
    pub fn requires_assignment(self) -> bool {
        matches!(self, RefKind::Object | RefKind::UiText | RefKind::UiImage)
    }

    /// Kinds with a built-in preview; the compiler synthesizes a default
    /// Viewer annotation for them unless explicitly opted out.
    pub fn is_previewable(self) -> bool {
        matches!(
            self,
            RefKind::Sprite | RefKind::AudioClip | RefKind::Object | RefKind::Prefab | RefKind::TextAsset
        )
    }
}

/// Declared semantic kind of a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueKind {
    /// Boolean flag.
    Bool,
    /// Signed integer.
    Int,
    /// Floating-point number.
    Float,
    /// UTF-8 string.
    Str,
    /// Two-component vector (also the backing type of min/max ranges).
    Vec2,
    /// RGBA color.
    Color,
    /// Reference to an arena object of the given kind.
    Reference(RefKind),
    /// Homogeneous ordered collection of the element kind.
    List(Box<ValueKind>),
}

impl ValueKind {
    /// The kind a single slot of this field holds: the element kind for
    /// collections, the kind itself otherwise.
    pub fn element(&self) -> &ValueKind {
        match self {
            ValueKind::List(element) => element,
            other => other,
        }
    }

    /// Reference kind of a single slot, if this is (a collection of) a
    /// reference kind.
    pub fn ref_kind(&self) -> Option<RefKind> {
        match self.element() {
            ValueKind::Reference(kind) => Some(*kind),
            _ => None,
        }
    }

    /// Whether this field is a collection.
    pub fn is_list(&self) -> bool {
        matches!(self, ValueKind::List(_))
    }

    /// The unset/zero value of this kind.
    pub fn default_value(&self) -> Value {
        match self {
            ValueKind::Bool => Value::Bool(false),
            ValueKind::Int => Value::Int(0),
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Str => Value::Str(String::new()),
            ValueKind::Vec2 => Value::Vec2([0.0, 0.0]),
            ValueKind::Color => Value::Color([1.0, 1.0, 1.0, 1.0]),
            ValueKind::Reference(_) => Value::Reference(None),
            ValueKind::List(_) => Value::List(Vec::new()),
        }
    }
}

/// A live property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Floating-point number.
    Float(f64),
    /// UTF-8 string.
    Str(String),
    /// Two-component vector.
    Vec2([f32; 2]),
    /// RGBA color, components in `[0, 1]`.
    Color([f32; 4]),
    /// Reference to an arena object; `None` when unassigned.
    Reference(Option<InstanceId>),
    /// Ordered collection.
    List(Vec<Value>),
}

impl Value {
    /// Semantic kind of this value. List element kinds are reported from the
    /// first element and degrade to `Str` for empty collections; callers that
    /// need the declared element kind should consult the field schema.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Color(_) => ValueKind::Color,
            Value::Reference(_) => ValueKind::Reference(RefKind::Object),
            Value::List(items) => ValueKind::List(Box::new(
                items.first().map(Value::kind).unwrap_or(ValueKind::Str),
            )),
        }
    }

    /// Boolean content, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Numeric content, if this is an integer or float.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Int(value) => Some(*value as f64),
            Value::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// String content, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Reference target, if this is a reference.
    pub fn as_reference(&self) -> Option<Option<InstanceId>> {
        match self {
            Value::Reference(target) => Some(*target),
            _ => None,
        }
    }

    /// Collection content, if this is a collection.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// True for a reference with no target.
    pub fn is_unset_reference(&self) -> bool {
        matches!(self, Value::Reference(None))
    }

    /// The object a viewer would preview: the reference target, or the first
    /// element's target for collections of references.
    pub fn preview_target(&self) -> Option<InstanceId> {
        match self {
            Value::Reference(target) => *target,
            Value::List(items) => items.first().and_then(|item| item.as_reference()).flatten(),
            _ => None,
        }
    }
}
