use serde::{Deserialize, Serialize};

use super::schema::{opt, Column, EntitySchema, FieldKind, FieldSpec, Resource};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub credits: i64,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseInput {
    pub code: String,
    pub name: String,
    pub credits: i64,
    #[serde(default)]
    pub description: Option<String>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("code", "Mã học phần").required(),
    FieldSpec::text("name", "Tên học phần").required(),
    FieldSpec::text("credits", "Số tín chỉ")
        .kind(FieldKind::Number)
        .required()
        .integer()
        .min(1),
    FieldSpec::text("description", "Mô tả").kind(FieldKind::TextArea),
];

impl Resource for Course {
    type Input = CourseInput;

    fn schema() -> EntitySchema<Self> {
        EntitySchema {
            title: "Quản lý Học phần",
            list_title: "Danh sách học phần",
            route: "/courses",
            endpoint: "/courses",
            query_key: "courses",
            noun: "học phần",
            fields: FIELDS,
            columns: vec![
                Column {
                    header: "Mã học phần",
                    value: |c: &Course| c.code.clone(),
                },
                Column {
                    header: "Tên học phần",
                    value: |c: &Course| c.name.clone(),
                },
                Column {
                    header: "Số tín chỉ",
                    value: |c: &Course| c.credits.to_string(),
                },
                Column {
                    header: "Mô tả",
                    value: |c: &Course| opt(&c.description),
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
