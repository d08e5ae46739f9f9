use std::fmt;

use serde::{Deserialize, Serialize};

use super::schema::{opt, Column, EntitySchema, FieldKind, FieldSpec, OptionSource, Resource};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Staff,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Staff => "staff",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const ROLES: &[(&str, &str)] = &[
    ("user", "User (Sinh viên/GV)"),
    ("staff", "Staff (Giáo vụ)"),
    ("admin", "Admin (Quản trị)"),
];

/// Account managed by administrators. The password is write-only and never
/// read back from the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub faculty_id: Option<i64>,
    #[serde(default, skip_serializing)]
    pub faculty_name: Option<String>,
    #[serde(default)]
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInput {
    pub username: String,
    /// Omitted on update to keep the current password
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub display_name: String,
    #[serde(default)]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub faculty_id: Option<i64>,
    pub is_active: bool,
}

const FIELDS: &[FieldSpec] = &[
    FieldSpec::text("username", "Tên đăng nhập")
        .required()
        .locked_on_edit(),
    FieldSpec::text("password", "Mật khẩu")
        .kind(FieldKind::Password)
        .required_on_create()
        .hint("Để trống nếu không đổi"),
    FieldSpec::text("display_name", "Họ và tên").required(),
    FieldSpec::text("email", "Email").kind(FieldKind::Email),
    FieldSpec::text("role", "Vai trò")
        .kind(FieldKind::Select(OptionSource::Static(ROLES)))
        .required()
        .default_value("user"),
    FieldSpec::text("faculty_id", "Khoa / Đơn vị")
        .kind(FieldKind::Select(OptionSource::Faculties))
        .integer(),
    FieldSpec::text("is_active", "Kích hoạt tài khoản này")
        .kind(FieldKind::Checkbox)
        .default_value("true"),
];

impl Resource for User {
    type Input = UserInput;

    fn schema() -> EntitySchema<Self> {
        EntitySchema {
            title: "Quản lý Người dùng",
            list_title: "Danh sách người dùng",
            route: "/users",
            endpoint: "/users",
            query_key: "users",
            noun: "người dùng",
            fields: FIELDS,
            columns: vec![
                Column {
                    header: "Tên đăng nhập",
                    value: |u: &User| u.username.clone(),
                },
                Column {
                    header: "Họ tên",
                    value: |u: &User| u.display_name.clone(),
                },
                Column {
                    header: "Vai trò",
                    value: |u: &User| u.role.to_string(),
                },
                Column {
                    header: "Đơn vị (Khoa)",
                    value: |u: &User| {
                        u.faculty_name
                            .clone()
                            .unwrap_or_else(|| "-- Hệ thống --".to_string())
                    },
                },
                Column {
                    header: "Trạng thái",
                    value: |u: &User| {
                        (if u.is_active { "Hoạt động" } else { "Đã khóa" }).to_string()
                    },
                },
                Column {
                    header: "Email",
                    value: |u: &User| opt(&u.email),
                },
            ],
            row_link: None,
        }
    }

    fn id(&self) -> i64 {
        self.id
    }

    fn label(&self) -> String {
        self.display_name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_never_read_back() {
        let user: User = serde_json::from_str(
            r#"{"id":3,"username":"gv01","display_name":"GV","password":"x","role":"staff","is_active":true}"#,
        )
        .unwrap();
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(user.role, Role::Staff);
    }

    #[test]
    fn test_empty_password_is_omitted_from_update() {
        let input = UserInput {
            username: "gv01".to_string(),
            password: None,
            display_name: "GV".to_string(),
            email: None,
            role: Role::User,
            faculty_id: None,
            is_active: true,
        };
        let json = serde_json::to_string(&input).unwrap();
        assert!(!json.contains("password"));
    }
}
