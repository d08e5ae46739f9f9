use serde::{Deserialize, Serialize};

use super::schema::{opt, Column, EntitySchema, FieldKind, FieldSpec, OptionSource, Resource};

/// Administrative student cohort
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub program_id: Option<i64>,
    #[serde(default)]
    pub faculty_id: Option<i64>,
    #[serde(default)]
    pub cohort: Option<String>,
    #[serde(default, skip_serializing)]
    pub program_name: Option<String>,
    #[serde(default, skip_serializing)]
    pub faculty_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassInput {
    pub code: String,
    pub name: String,
    pub program_id: i64,
    pub faculty_id: i64,
    #[serde(default)]
    pub cohort: Option<String>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("code", "Mã lớp").required(),
    FieldSpec::text("name", "Tên lớp").required(),
    FieldSpec::text("program_id", "Chương trình")
        .kind(FieldKind::Select(OptionSource::Programs))
        .required()
        .integer(),
    FieldSpec::text("faculty_id", "Khoa")
        .kind(FieldKind::Select(OptionSource::Faculties))
        .required()
        .integer(),
    FieldSpec::text("cohort", "Khóa học"),
];

impl Resource for Class {
    type Input = ClassInput;

    fn schema() -> EntitySchema<Self> {
        EntitySchema {
            title: "Quản lý Lớp",
            list_title: "Danh sách lớp",
            route: "/classes",
            endpoint: "/classes",
            query_key: "classes",
            noun: "lớp",
            fields: FIELDS,
            columns: vec![
                Column {
                    header: "Mã lớp",
                    value: |c: &Class| c.code.clone(),
                },
                Column {
                    header: "Tên lớp",
                    value: |c: &Class| c.name.clone(),
                },
                Column {
                    header: "Chương trình",
                    value: |c: &Class| opt(&c.program_name),
                },
                Column {
                    header: "Khoa",
                    value: |c: &Class| opt(&c.faculty_name),
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
