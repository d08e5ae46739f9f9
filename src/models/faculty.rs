use serde::{Deserialize, Serialize};

use super::schema::{opt, Column, EntitySchema, FieldKind, FieldSpec, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faculty {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyInput {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("code", "Mã khoa").required(),
    FieldSpec::text("name", "Tên khoa").required(),
    FieldSpec::text("description", "Mô tả").kind(FieldKind::TextArea),
];

impl Resource for Faculty {
    type Input = FacultyInput;

    fn schema() -> EntitySchema<Self> {
        EntitySchema {
            title: "Quản lý Khoa",
            list_title: "Danh sách khoa",
            route: "/faculties",
            endpoint: "/faculties",
            query_key: "faculties",
            noun: "khoa",
            fields: FIELDS,
            columns: vec![
                Column {
                    header: "Mã khoa",
                    value: |f: &Faculty| f.code.clone(),
                },
                Column {
                    header: "Tên khoa",
                    value: |f: &Faculty| f.name.clone(),
                },
                Column {
                    header: "Mô tả",
                    value: |f: &Faculty| opt(&f.description),
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
