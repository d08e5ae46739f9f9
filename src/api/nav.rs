use crate::api::middleware::session::SessionContext;
use crate::models::Role;

pub struct MenuItem {
    pub label: &'static str,
    pub path: &'static str,
    pub color: &'static str,
    /// Roles allowed to see the item; empty means every role
    pub roles: &'static [Role],
}

impl MenuItem {
    pub fn visible_to(&self, role: Role) -> bool {
        self.roles.is_empty() || self.roles.contains(&role)
    }
}

pub const MENU: &[MenuItem] = &[
    MenuItem {
        label: "Quản lý Khoa",
        path: "/faculties",
        color: "blue",
        roles: &[],
    },
    MenuItem {
        label: "Quản lý Chương trình",
        path: "/programs",
        color: "green",
        roles: &[],
    },
    MenuItem {
        label: "Quản lý Học phần",
        path: "/courses",
        color: "purple",
        roles: &[],
    },
    MenuItem {
        label: "Quản lý Lớp",
        path: "/classes",
        color: "orange",
        roles: &[],
    },
    MenuItem {
        label: "Quản lý Sinh viên",
        path: "/students",
        color: "pink",
        roles: &[],
    },
    MenuItem {
        label: "Quản lý Đợt xét",
        path: "/review-batches",
        color: "indigo",
        roles: &[],
    },
    MenuItem {
        label: "Chuyển điểm",
        path: "/transfer-review",
        color: "red",
        roles: &[],
    },
    MenuItem {
        label: "Import Excel",
        path: "/import",
        color: "teal",
        roles: &[Role::Admin, Role::Staff],
    },
    MenuItem {
        label: "Quản lý Người dùng",
        path: "/users",
        color: "slate",
        roles: &[Role::Admin],
    },
];

pub fn visible_menu(role: Role) -> Vec<&'static MenuItem> {
    MENU.iter().filter(|item| item.visible_to(role)).collect()
}

/// Navbar data rendered by the base layout
pub struct NavView {
    pub display_name: String,
    pub current_path: String,
}

impl NavView {
    pub fn new(ctx: &SessionContext, current_path: &str) -> Self {
        Self {
            display_name: ctx.display_name(),
            current_path: current_path.to_string(),
        }
    }

    pub fn is_active(&self, path: &str) -> bool {
        self.current_path == path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(role: Role) -> Vec<&'static str> {
        visible_menu(role).iter().map(|item| item.path).collect()
    }

    #[test]
    fn test_admin_sees_everything() {
        assert_eq!(paths(Role::Admin).len(), MENU.len());
    }

    #[test]
    fn test_staff_sees_import_but_not_users() {
        let paths = paths(Role::Staff);
        assert!(paths.contains(&"/import"));
        assert!(!paths.contains(&"/users"));
    }

    #[test]
    fn test_plain_user_sees_shared_items_only() {
        let paths = paths(Role::User);
        assert!(paths.contains(&"/faculties"));
        assert!(paths.contains(&"/transfer-review"));
        assert!(!paths.contains(&"/import"));
        assert!(!paths.contains(&"/users"));
    }
}
