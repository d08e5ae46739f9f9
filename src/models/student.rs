use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::schema::{
    opt, Column, EntitySchema, FieldKind, FieldSpec, OptionSource, Resource,
};

const GENDERS: &[(&str, &str)] = &[("Nam", "Nam"), ("Nữ", "Nữ")];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    pub id: i64,
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub program_id: Option<i64>,
    /// Date or timestamp as sent by the backend
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default, skip_serializing)]
    pub class_code: Option<String>,
    #[serde(default, skip_serializing)]
    pub program_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentInput {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub class_id: Option<i64>,
    #[serde(default)]
    pub program_id: Option<i64>,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("code", "Mã SV").required(),
    FieldSpec::text("name", "Họ tên").required(),
    FieldSpec::text("email", "Email").kind(FieldKind::Email),
    FieldSpec::text("phone", "SĐT"),
    FieldSpec::text("class_id", "Lớp")
        .kind(FieldKind::Select(OptionSource::Classes))
        .integer(),
    FieldSpec::text("program_id", "Chương trình")
        .kind(FieldKind::Select(OptionSource::Programs))
        .integer(),
    FieldSpec::text("birth_date", "Ngày sinh").kind(FieldKind::Date),
    FieldSpec::text("gender", "Giới tính").kind(FieldKind::Select(OptionSource::Static(GENDERS))),
    FieldSpec::text("address", "Địa chỉ").kind(FieldKind::TextArea),
];

impl Resource for Student {
    type Input = StudentInput;

    fn schema() -> EntitySchema<Self> {
        EntitySchema {
            title: "Quản lý Sinh viên",
            list_title: "Danh sách sinh viên",
            route: "/students",
            endpoint: "/students",
            query_key: "students",
            noun: "sinh viên",
            fields: FIELDS,
            columns: vec![
                Column {
                    header: "Mã SV",
                    value: |s: &Student| s.code.clone(),
                },
                Column {
                    header: "Họ tên",
                    value: |s: &Student| s.name.clone(),
                },
                Column {
                    header: "Lớp",
                    value: |s: &Student| opt(&s.class_code),
                },
                Column {
                    header: "Chương trình",
                    value: |s: &Student| opt(&s.program_name),
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
