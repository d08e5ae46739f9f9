use serde::{de::DeserializeOwned, Serialize};

/// How a form field is rendered and converted into the request payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Date,
    TextArea,
    Password,
    Checkbox,
    Select(OptionSource),
}

/// Where the choices of a select field come from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionSource {
    Static(&'static [(&'static str, &'static str)]),
    Faculties,
    Programs,
    Classes,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Optional,
    Always,
    /// Required when creating, may be left empty when editing
    OnCreate,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: Requirement,
    /// Parsed from the string input into an integer (empty becomes null)
    pub integer: bool,
    /// Rendered read-only when editing an existing record
    pub locked_on_edit: bool,
    pub default: &'static str,
    pub hint: Option<&'static str>,
    /// Lower bound for integer fields
    pub min: Option<i64>,
}

impl FieldSpec {
    pub const fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            required: Requirement::Optional,
            integer: false,
            locked_on_edit: false,
            default: "",
            hint: None,
            min: None,
        }
    }

    pub const fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = Requirement::Always;
        self
    }

    pub const fn required_on_create(mut self) -> Self {
        self.required = Requirement::OnCreate;
        self
    }

    pub const fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    pub const fn locked_on_edit(mut self) -> Self {
        self.locked_on_edit = true;
        self
    }

    pub const fn default_value(mut self, default: &'static str) -> Self {
        self.default = default;
        self
    }

    pub const fn hint(mut self, hint: &'static str) -> Self {
        self.hint = Some(hint);
        self
    }

    pub const fn min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }
}

/// A displayed column; `value` resolves the cell text that is shown and searched
pub struct Column<R> {
    pub header: &'static str,
    pub value: fn(&R) -> String,
}

/// Everything the generic CRUD pages need to know about one entity
pub struct EntitySchema<R> {
    /// Page heading, e.g. "Quản lý Khoa"
    pub title: &'static str,
    pub list_title: &'static str,
    /// Browser-facing route, e.g. "/faculties"
    pub route: &'static str,
    /// Backend resource path, e.g. "/faculties"
    pub endpoint: &'static str,
    pub query_key: &'static str,
    /// Used in the delete confirmation, e.g. "khoa"
    pub noun: &'static str,
    pub fields: &'static [FieldSpec],
    pub columns: Vec<Column<R>>,
    /// Optional per-row link rendered after the data columns
    pub row_link: Option<RowLink<R>>,
}

pub struct RowLink<R> {
    pub header: &'static str,
    pub text: &'static str,
    pub href: fn(&R) -> String,
}

impl<R> EntitySchema<R> {
    /// Rows whose resolved column values contain `query`, ignoring case.
    /// An empty query keeps every row.
    pub fn filter<'a>(&self, rows: &'a [R], query: &str) -> Vec<&'a R> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return rows.iter().collect();
        }

        rows.iter()
            .filter(|row| {
                self.columns
                    .iter()
                    .any(|col| (col.value)(row).to_lowercase().contains(&needle))
            })
            .collect()
    }
}

/// An entity managed through the generic CRUD pages
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Write shape sent on create/update
    type Input: Serialize + DeserializeOwned + Send + Sync;

    fn schema() -> EntitySchema<Self>;

    fn id(&self) -> i64;

    /// Human name used in confirmations
    fn label(&self) -> String;
}

pub(crate) fn opt(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

pub(crate) fn opt_num<T: ToString>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct Row {
        name: String,
        code: String,
    }

    fn schema() -> EntitySchema<Row> {
        EntitySchema {
            title: "Rows",
            list_title: "Rows",
            route: "/rows",
            endpoint: "/rows",
            query_key: "rows",
            noun: "row",
            fields: &[],
            columns: vec![
                Column {
                    header: "Code",
                    value: |r: &Row| r.code.clone(),
                },
                Column {
                    header: "Name",
                    value: |r: &Row| r.name.clone(),
                },
            ],
            row_link: None,
        }
    }

    fn rows() -> Vec<Row> {
        vec![
            Row {
                name: "Khoa CNTT".to_string(),
                code: "CNTT".to_string(),
            },
            Row {
                name: "Khoa Kinh Te".to_string(),
                code: "KT".to_string(),
            },
        ]
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let rows = rows();
        let shown = schema().filter(&rows, "kinh");
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].name, "Khoa Kinh Te");
    }

    #[test]
    fn test_filter_matches_any_column() {
        let rows = rows();
        let shown = schema().filter(&rows, "cntt");
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].code, "CNTT");
    }

    #[test]
    fn test_empty_query_keeps_everything() {
        let rows = rows();
        assert_eq!(schema().filter(&rows, "  ").len(), 2);
        assert_eq!(schema().filter(&rows, "khoa").len(), 2);
        assert!(schema().filter(&rows, "xyz").is_empty());
    }
}
