use std::fmt;

use serde::{Deserialize, Serialize};

/// A display-only number as the backend sent it. NUMERIC columns may arrive
/// as JSON strings (`"8.50"`), so anything is accepted and shown verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Figure {
    Number(serde_json::Number),
    Text(String),
    Other(serde_json::Value),
}

impl fmt::Display for Figure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Figure::Number(n) => write!(f, "{}", n),
            Figure::Text(s) => f.write_str(s),
            Figure::Other(v) => write!(f, "{}", v),
        }
    }
}

/// One student's mapping from a source course/grade to a target course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRow {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub batch_id: Option<i64>,
    #[serde(default)]
    pub student_code: Option<String>,
    #[serde(default)]
    pub student_name: Option<String>,
    #[serde(default)]
    pub source_course_code: Option<String>,
    #[serde(default)]
    pub source_course_name: Option<String>,
    #[serde(default)]
    pub source_credits: Option<Figure>,
    #[serde(default)]
    pub target_course_code: Option<String>,
    #[serde(default)]
    pub target_course_name: Option<String>,
    #[serde(default)]
    pub target_credits: Option<Figure>,
    #[serde(default)]
    pub transferred_grade: Option<Figure>,
    #[serde(default)]
    pub name_mismatch: bool,
    #[serde(default)]
    pub credit_mismatch: bool,
    #[serde(default)]
    pub course_verified: bool,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Validity of a transfer row, derived from the backend's flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStatus {
    Valid,
    Error,
    Unclassified,
}

impl RowStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RowStatus::Valid => "Hợp lệ",
            RowStatus::Error => "Có lỗi",
            RowStatus::Unclassified => "Chưa xác định",
        }
    }

    pub fn css_class(&self) -> &'static str {
        match self {
            RowStatus::Valid => "row-valid",
            RowStatus::Error => "row-error",
            RowStatus::Unclassified => "row-unknown",
        }
    }
}

impl TransferRow {
    pub fn status(&self) -> RowStatus {
        if self.name_mismatch || self.credit_mismatch || !self.course_verified {
            return RowStatus::Error;
        }
        if self.course_verified && !self.name_mismatch && !self.credit_mismatch {
            return RowStatus::Valid;
        }
        RowStatus::Unclassified
    }
}
