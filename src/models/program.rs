use serde::{Deserialize, Serialize};

use super::schema::{opt, Column, EntitySchema, FieldKind, FieldSpec, OptionSource, Resource};

/// Degree program within a faculty
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub faculty_id: Option<i64>,
    /// Joined by the backend for display
    #[serde(default, skip_serializing)]
    pub faculty_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramInput {
    pub code: String,
    pub name: String,
    pub faculty_id: i64,
    #[serde(default)]
    pub description: Option<String>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("code", "Mã chương trình").required(),
    FieldSpec::text("name", "Tên chương trình").required(),
    FieldSpec::text("faculty_id", "Khoa")
        .kind(FieldKind::Select(OptionSource::Faculties))
        .required()
        .integer(),
    FieldSpec::text("description", "Mô tả").kind(FieldKind::TextArea),
];

impl Resource for Program {
    type Input = ProgramInput;

    fn schema() -> EntitySchema<Self> {
        EntitySchema {
            title: "Quản lý Chương trình",
            list_title: "Danh sách chương trình",
            route: "/programs",
            endpoint: "/programs",
            query_key: "programs",
            noun: "chương trình",
            fields: FIELDS,
            columns: vec![
                Column {
                    header: "Mã chương trình",
                    value: |p: &Program| p.code.clone(),
                },
                Column {
                    header: "Tên chương trình",
                    value: |p: &Program| p.name.clone(),
                },
                Column {
                    header: "Khoa",
                    value: |p: &Program| opt(&p.faculty_name),
                },
            ],
            row_link: None,
        }
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
