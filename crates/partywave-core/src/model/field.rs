// Static field tables: one `FieldSpec` per editable attribute of an entity.
// Forms, detail views and list columns are all driven from these tables.

use super::EntityKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text { max_len: Option<usize> },
    Integer,
    Boolean,
    /// ISO-8601 timestamp on the wire, `YYYY-MM-DDTHH:MM` in forms.
    Instant,
    /// One of a fixed set of wire names.
    Enum(&'static [&'static str]),
    /// Single related entity, serialized as a nested object.
    Relation { target: EntityKind },
    /// Set of related entities, serialized as an array of nested objects.
    ManyRelation { target: EntityKind },
}

impl FieldKind {
    pub fn is_relation(&self) -> bool {
        matches!(
            self,
            FieldKind::Relation { .. } | FieldKind::ManyRelation { .. }
        )
    }

    /// Entity the relation points at, if this is a relation field.
    pub fn target(&self) -> Option<EntityKind> {
        match self {
            FieldKind::Relation { target } | FieldKind::ManyRelation { target } => Some(*target),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// camelCase wire name.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
    /// Shown as a column in list views.
    pub in_list: bool,
}

impl FieldSpec {
    pub const fn new(name: &'static str, label: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            label,
            kind,
            required: false,
            in_list: true,
        }
    }

    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Text { max_len: None })
    }

    pub const fn instant(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Instant)
    }

    pub const fn integer(name: &'static str, label: &'static str) -> Self {
        Self::new(name, label, FieldKind::Integer)
    }

    pub const fn relation(name: &'static str, label: &'static str, target: EntityKind) -> Self {
        Self::new(name, label, FieldKind::Relation { target })
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Hide from list columns; still shown in detail views and forms.
    pub const fn detail_only(mut self) -> Self {
        self.in_list = false;
        self
    }
}
