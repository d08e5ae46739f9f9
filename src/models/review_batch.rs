use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::schema::{opt, Column, EntitySchema, FieldKind, FieldSpec, OptionSource, Resource, RowLink};

/// Lifecycle status of a review batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchStatus {
    #[default]
    Draft,
    Open,
    Closed,
}

impl BatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchStatus::Draft => "draft",
            BatchStatus::Open => "open",
            BatchStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const STATUSES: &[(&str, &str)] = &[("draft", "Draft"), ("open", "Open"), ("closed", "Closed")];

/// Time-boxed batch of credit-transfer evaluations (đợt xét)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewBatch {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub status: BatchStatus,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewBatchInput {
    pub name: String,
    #[serde(default)]
    pub academic_year: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub status: BatchStatus,
    #[serde(default)]
    pub description: Option<String>,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("name", "Tên đợt").required(),
    FieldSpec::text("academic_year", "Năm học"),
    FieldSpec::text("term", "Học kỳ"),
    FieldSpec::text("start_date", "Ngày bắt đầu").kind(FieldKind::Date),
    FieldSpec::text("end_date", "Ngày kết thúc").kind(FieldKind::Date),
    FieldSpec::text("status", "Trạng thái")
        .kind(FieldKind::Select(OptionSource::Static(STATUSES)))
        .required()
        .default_value("draft"),
    FieldSpec::text("description", "Mô tả").kind(FieldKind::TextArea),
];

impl Resource for ReviewBatch {
    type Input = ReviewBatchInput;

    fn schema() -> EntitySchema<Self> {
        EntitySchema {
            title: "Quản lý Đợt xét",
            list_title: "Danh sách đợt xét",
            route: "/review-batches",
            endpoint: "/review-batches",
            query_key: "review-batches",
            noun: "đợt xét",
            fields: FIELDS,
            columns: vec![
                Column {
                    header: "Tên đợt",
                    value: |b: &ReviewBatch| b.name.clone(),
                },
                Column {
                    header: "Năm học",
                    value: |b: &ReviewBatch| opt(&b.academic_year),
                },
                Column {
                    header: "Học kỳ",
                    value: |b: &ReviewBatch| opt(&b.term),
                },
                Column {
                    header: "Trạng thái",
                    value: |b: &ReviewBatch| b.status.to_string(),
                },
            ],
            row_link: Some(RowLink {
                header: "Xem chi tiết",
                text: "Chuyển điểm",
                href: |b: &ReviewBatch| format!("/transfer-review/{}", b.id),
            }),
        }
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> String {
        self.name.clone()
    }
}
