// Snapshot builders: turn slice state into the plain view structs the TUI
// renders. Everything here works on erased JSON records.

use std::cmp::Ordering;

use partywave_core::date::display_wire_instant;
use partywave_core::model::{EntityId, EntityKind, FieldKind, FieldSpec, ListMode};
use partywave_core::pagination::total_pages;
use partywave_core::query::{SortOrder, SortState};
use serde_json::Value;

use crate::form::{record_label, relation_options, FieldError, FormDraft};
use crate::protocol::{
    Column, DeleteView, DetailView, FormView, HomeView, ListView, PaginationInfo, Row,
};
use crate::slice::SliceView;
use crate::store::Store;

/// Sort and page position of one entity list.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState {
    pub sort: SortState,
    /// Zero-based page; for infinite scroll the last page loaded.
    pub page: u32,
    pub size: u32,
}

impl ListState {
    pub fn new(size: u32) -> Self {
        ListState {
            sort: SortState::default(),
            page: 0,
            size,
        }
    }
}

// ---------------------------------------------------------------------------
// Value rendering
// ---------------------------------------------------------------------------

/// Text shown for one field of a record.
pub fn render_value(spec: &FieldSpec, value: &Value, date_format: &str) -> String {
    match (spec.kind, value) {
        (_, Value::Null) => String::new(),
        (FieldKind::Instant, Value::String(s)) => display_wire_instant(s, date_format),
        (FieldKind::Relation { target }, record @ Value::Object(_)) => record_label(target, record),
        (FieldKind::ManyRelation { target }, Value::Array(items)) => items
            .iter()
            .map(|r| record_label(target, r))
            .collect::<Vec<_>>()
            .join(", "),
        (_, Value::String(s)) => s.clone(),
        (_, other) => other.to_string(),
    }
}

fn record_id(record: &Value) -> Option<EntityId> {
    serde_json::from_value(record["id"].clone()).ok()
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Null, _) => Ordering::Less,
        (_, Value::Null) => Ordering::Greater,
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (x, y) => x.to_string().cmp(&y.to_string()),
    }
}

/// Client-side sort by `sort.field`, ties broken by id. Descending is the
/// exact reverse of ascending.
pub fn sort_records(records: &mut [Value], sort: &SortState) {
    records.sort_by(|a, b| {
        let ordering = if sort.field == "id" {
            record_id(a).cmp(&record_id(b))
        } else {
            compare_values(&a[sort.field.as_str()], &b[sort.field.as_str()])
                .then_with(|| record_id(a).cmp(&record_id(b)))
        };
        match sort.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

// ---------------------------------------------------------------------------
// Screens
// ---------------------------------------------------------------------------

pub fn home_view() -> HomeView {
    HomeView {
        entries: EntityKind::all().to_vec(),
    }
}

pub fn list_view(slice: &dyn SliceView, list: &ListState, date_format: &str) -> ListView {
    let kind = slice.kind();
    let specs: Vec<&FieldSpec> = kind.fields().iter().filter(|f| f.in_list).collect();

    let mut columns = vec![Column {
        field: "id".to_string(),
        label: "ID".to_string(),
    }];
    columns.extend(specs.iter().map(|f| Column {
        field: f.name.to_string(),
        label: f.label.to_string(),
    }));

    let mut records = slice.entities_json();
    if kind.list_mode() == ListMode::Sorted {
        sort_records(&mut records, &list.sort);
    }

    let rows: Vec<Row> = records
        .iter()
        .map(|record| {
            let id = record_id(record);
            let mut cells = vec![id.as_ref().map(|i| i.to_string()).unwrap_or_default()];
            cells.extend(
                specs
                    .iter()
                    .map(|spec| render_value(spec, &record[spec.name], date_format)),
            );
            Row { id, cells }
        })
        .collect();

    let total_items = slice.total_items();
    let mode = kind.list_mode();
    let pagination = PaginationInfo {
        mode,
        page: list.page,
        size: list.size,
        total_items,
        total_pages: if mode.is_paged() {
            total_pages(total_items, list.size)
        } else {
            u32::from(total_items > 0)
        },
        has_more: slice.links().has_more(list.page),
    };

    let empty_banner = (rows.is_empty() && !slice.loading())
        .then(|| format!("No {} found", kind.title()));

    ListView {
        kind,
        columns,
        rows,
        sort: list.sort.clone(),
        pagination,
        empty_banner,
    }
}

pub fn detail_view(slice: &dyn SliceView, id: &EntityId, date_format: &str) -> DetailView {
    let kind = slice.kind();
    let record = slice.entity_json();
    let loaded = record_id(&record).as_ref() == Some(id);

    let fields = if loaded {
        let mut fields = vec![("ID".to_string(), id.to_string())];
        fields.extend(kind.fields().iter().map(|spec| {
            (
                spec.label.to_string(),
                render_value(spec, &record[spec.name], date_format),
            )
        }));
        fields
    } else {
        Vec::new()
    };

    let not_found = match slice.error_message() {
        Some(message) if !loaded => Some(format!(
            "{} {id} could not be loaded: {message}",
            kind.singular()
        )),
        _ => None,
    };

    DetailView {
        kind,
        id: id.clone(),
        fields,
        not_found,
    }
}

pub fn form_view(
    store: &Store,
    kind: EntityKind,
    id: Option<EntityId>,
    errors: Vec<FieldError>,
    seed: Option<FormDraft>,
) -> FormView {
    let options = kind
        .fields()
        .iter()
        .map(|spec| match spec.kind {
            FieldKind::Enum(values) => values
                .iter()
                .map(|v| (v.to_string(), v.to_string()))
                .collect(),
            FieldKind::Relation { target } | FieldKind::ManyRelation { target } => {
                relation_options(target, &store.slice(target).entities_json())
            }
            _ => Vec::new(),
        })
        .collect();

    FormView {
        kind,
        id,
        fields: kind.fields().to_vec(),
        options,
        errors,
        seed,
    }
}

pub fn delete_view(slice: &dyn SliceView, id: &EntityId) -> DeleteView {
    let kind = slice.kind();
    let record = slice.entity_json();
    let label = if record_id(&record).as_ref() == Some(id) && kind.display_field() != "id" {
        format!(" ({})", record_label(kind, &record))
    } else {
        String::new()
    };
    DeleteView {
        kind,
        id: id.clone(),
        question: format!(
            "Are you sure you want to delete {} {id}{label}?",
            kind.singular()
        ),
    }
}
