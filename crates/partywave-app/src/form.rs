// Create/edit form drafts: seeding, validation, type coercion and relation
// resolution.
//
// A draft holds one raw input per entry of the entity's field table. On
// submit the inputs are validated and coerced into JSON, merged over the
// record being edited, and handed to the request task as the payload.

use chrono::{DateTime, Utc};
use partywave_core::date::{default_form_datetime, parse_form_datetime, wire_to_form};
use partywave_core::model::{EntityId, EntityKind, FieldKind, FieldSpec};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Raw value of one form field as edited in the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    /// Text, integer and datetime fields.
    Text(String),
    Flag(bool),
    /// Enum wire name or related record id.
    Choice(Option<String>),
    /// Ids of the selected related records.
    Many(Vec<String>),
}

impl FieldInput {
    /// Blank input for a field of the given kind.
    pub fn empty(kind: FieldKind) -> FieldInput {
        match kind {
            FieldKind::Text { .. } | FieldKind::Integer | FieldKind::Instant => {
                FieldInput::Text(String::new())
            }
            FieldKind::Boolean => FieldInput::Flag(false),
            FieldKind::Enum(_) | FieldKind::Relation { .. } => FieldInput::Choice(None),
            FieldKind::ManyRelation { .. } => FieldInput::Many(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormDraft {
    pub kind: EntityKind,
    /// `None` for a record that has not been created yet.
    pub id: Option<EntityId>,
    /// Parallel to `kind.fields()`.
    pub inputs: Vec<FieldInput>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        FieldError {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Seeding
// ---------------------------------------------------------------------------

impl FormDraft {
    /// Draft for a new record. `defaults` is the entity's default JSON (for
    /// boolean defaults); datetime fields start at the beginning of today and
    /// required enums select their first value.
    pub fn new_record(kind: EntityKind, defaults: &Value, now: DateTime<Utc>) -> Self {
        let inputs = kind
            .fields()
            .iter()
            .map(|spec| match spec.kind {
                FieldKind::Boolean => {
                    FieldInput::Flag(defaults[spec.name].as_bool().unwrap_or(false))
                }
                FieldKind::Instant => FieldInput::Text(default_form_datetime(now)),
                FieldKind::Enum(values) if spec.required => {
                    FieldInput::Choice(values.first().map(|v| v.to_string()))
                }
                other => FieldInput::empty(other),
            })
            .collect();
        FormDraft {
            kind,
            id: None,
            inputs,
        }
    }

    /// Draft seeded from an existing record's JSON.
    pub fn from_record(kind: EntityKind, record: &Value) -> Self {
        let inputs = kind
            .fields()
            .iter()
            .map(|spec| {
                let value = &record[spec.name];
                match spec.kind {
                    FieldKind::Text { .. } => FieldInput::Text(match value {
                        Value::String(s) => s.clone(),
                        Value::Null => String::new(),
                        other => other.to_string(),
                    }),
                    FieldKind::Integer => FieldInput::Text(match value {
                        Value::Null => String::new(),
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    }),
                    FieldKind::Boolean => FieldInput::Flag(value.as_bool().unwrap_or(false)),
                    FieldKind::Instant => {
                        FieldInput::Text(value.as_str().map(wire_to_form).unwrap_or_default())
                    }
                    FieldKind::Enum(_) => FieldInput::Choice(value.as_str().map(str::to_string)),
                    FieldKind::Relation { .. } => FieldInput::Choice(id_string(&value["id"])),
                    FieldKind::ManyRelation { .. } => FieldInput::Many(
                        value
                            .as_array()
                            .map(|items| items.iter().filter_map(|i| id_string(&i["id"])).collect())
                            .unwrap_or_default(),
                    ),
                }
            })
            .collect();
        FormDraft {
            kind,
            id: serde_json::from_value(record["id"].clone()).ok(),
            inputs,
        }
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        self.kind.fields()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.name == name)
    }

    pub fn input(&self, name: &str) -> Option<&FieldInput> {
        self.position(name).and_then(|i| self.inputs.get(i))
    }

    pub fn input_mut(&mut self, name: &str) -> Option<&mut FieldInput> {
        let index = self.position(name)?;
        self.inputs.get_mut(index)
    }

    /// Replace a field's input; unknown names are ignored.
    pub fn set(&mut self, name: &str, input: FieldInput) {
        if let Some(slot) = self.input_mut(name) {
            *slot = input;
        }
    }
}

/// String form of a JSON id (number or string).
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

/// Label for a related record: its display field, falling back to the id.
pub fn record_label(target: EntityKind, record: &Value) -> String {
    let display = &record[target.display_field()];
    match display {
        Value::String(s) if !s.is_empty() => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => id_string(&record["id"]).unwrap_or_default(),
    }
}

/// Selectable `(id, label)` pairs for a relation field.
pub fn relation_options(target: EntityKind, records: &[Value]) -> Vec<(String, String)> {
    records
        .iter()
        .filter_map(|r| id_string(&r["id"]).map(|id| (id, record_label(target, r))))
        .collect()
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Validate and coerce `draft`, resolve relations against `references`
/// (the loaded records of each target kind), and merge the result over
/// `base`. Returns every field error at once.
pub fn build_payload(
    draft: &FormDraft,
    base: &Value,
    references: &dyn Fn(EntityKind) -> Vec<Value>,
) -> Result<Value, Vec<FieldError>> {
    let mut merged = match base {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };
    let mut errors = Vec::new();

    for (spec, input) in draft.fields().iter().zip(&draft.inputs) {
        match coerce_field(spec, input, references) {
            Ok(Some(value)) => {
                merged.insert(spec.name.to_string(), value);
            }
            Ok(None) => {
                merged.remove(spec.name);
            }
            Err(message) => errors.push(FieldError::new(spec.name, message)),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    match &draft.id {
        Some(id) => {
            merged.insert(
                "id".to_string(),
                serde_json::to_value(id).unwrap_or(Value::Null),
            );
        }
        None => {
            merged.remove("id");
        }
    }
    Ok(Value::Object(merged))
}

fn coerce_field(
    spec: &FieldSpec,
    input: &FieldInput,
    references: &dyn Fn(EntityKind) -> Vec<Value>,
) -> Result<Option<Value>, String> {
    const REQUIRED: &str = "This field is required.";

    match (spec.kind, input) {
        (FieldKind::Text { max_len }, FieldInput::Text(text)) => {
            if text.trim().is_empty() {
                return if spec.required {
                    Err(REQUIRED.into())
                } else {
                    Ok(None)
                };
            }
            if let Some(max) = max_len {
                if text.chars().count() > max {
                    return Err(format!("This field cannot be longer than {max} characters."));
                }
            }
            Ok(Some(Value::String(text.clone())))
        }
        (FieldKind::Integer, FieldInput::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                return if spec.required {
                    Err(REQUIRED.into())
                } else {
                    Ok(None)
                };
            }
            text.parse::<i64>()
                .map(|n| Some(Value::from(n)))
                .map_err(|_| "This field should be a number.".to_string())
        }
        (FieldKind::Boolean, FieldInput::Flag(flag)) => Ok(Some(Value::Bool(*flag))),
        (FieldKind::Instant, FieldInput::Text(text)) => {
            if text.trim().is_empty() {
                return if spec.required {
                    Err(REQUIRED.into())
                } else {
                    Ok(None)
                };
            }
            let dt = parse_form_datetime(text)
                .ok_or_else(|| "This field should be a date and time.".to_string())?;
            Ok(Some(Value::String(
                dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            )))
        }
        (FieldKind::Enum(values), FieldInput::Choice(choice)) => match choice {
            None => {
                if spec.required {
                    Err(REQUIRED.into())
                } else {
                    Ok(None)
                }
            }
            Some(v) if values.contains(&v.as_str()) => Ok(Some(Value::String(v.clone()))),
            Some(_) => Err(format!("This field should be one of: {}.", values.join(", "))),
        },
        (FieldKind::Relation { target }, FieldInput::Choice(choice)) => {
            let Some(id) = choice else {
                return if spec.required {
                    Err(REQUIRED.into())
                } else {
                    Ok(None)
                };
            };
            // An unresolved id counts as an empty select.
            let resolved = references(target)
                .into_iter()
                .find(|r| id_string(&r["id"]).as_deref() == Some(id.as_str()));
            if resolved.is_none() && spec.required {
                return Err(REQUIRED.into());
            }
            Ok(resolved)
        }
        (FieldKind::ManyRelation { target }, FieldInput::Many(ids)) => {
            let records = references(target);
            let selected: Vec<Value> = ids
                .iter()
                .filter_map(|id| {
                    records
                        .iter()
                        .find(|r| id_string(&r["id"]).as_deref() == Some(id.as_str()))
                        .cloned()
                })
                .collect();
            if selected.is_empty() && spec.required {
                return Err(REQUIRED.into());
            }
            Ok(Some(Value::Array(selected)))
        }
        _ => Err("Unexpected input for this field.".into()),
    }
}

/// Fields whose input differs between the seeded and the submitted draft,
/// with their coerced values taken from `payload`. A changed field that is
/// absent from the payload was cleared and maps to `null`.
pub fn changed_fields(seed: &FormDraft, draft: &FormDraft, payload: &Value) -> Map<String, Value> {
    draft
        .fields()
        .iter()
        .enumerate()
        .filter(|(i, _)| seed.inputs.get(*i) != draft.inputs.get(*i))
        .map(|(_, spec)| {
            let value = payload.get(spec.name).cloned().unwrap_or(Value::Null);
            (spec.name.to_string(), value)
        })
        .collect()
}
