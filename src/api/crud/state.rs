use super::form::FormState;
use crate::models::schema::FieldSpec;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(i64),
}

/// Result of a create/update call against the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Saved,
    Failed(String),
}

/// Page state shared by every entity page.
///
/// ```text
/// Listing -> Creating | Editing -> Submitting -> Listing            (saved)
///                                             -> Creating | Editing (failed)
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrudState {
    Listing,
    Creating {
        form: FormState,
        error: Option<String>,
    },
    Editing {
        id: i64,
        form: FormState,
        error: Option<String>,
    },
    Submitting {
        mode: EditorMode,
        form: FormState,
    },
}

impl CrudState {
    /// Opens an empty editor with the schema defaults
    pub fn open_new(self, fields: &[FieldSpec]) -> Self {
        CrudState::Creating {
            form: FormState::defaults(fields),
            error: None,
        }
    }

    pub fn open_edit(self, id: i64, form: FormState) -> Self {
        CrudState::Editing {
            id,
            form,
            error: None,
        }
    }

    /// Moves an open editor into `Submitting`; other states are unchanged
    pub fn submit(self) -> Self {
        match self {
            CrudState::Creating { form, .. } => CrudState::Submitting {
                mode: EditorMode::Create,
                form,
            },
            CrudState::Editing { id, form, .. } => CrudState::Submitting {
                mode: EditorMode::Edit(id),
                form,
            },
            other => other,
        }
    }

    /// Resolves a submission. A failure reopens the editor with the submitted
    /// values and the message.
    pub fn finish(self, outcome: Outcome) -> Self {
        match (self, outcome) {
            (CrudState::Submitting { .. }, Outcome::Saved) => CrudState::Listing,
            (CrudState::Submitting { mode, form }, Outcome::Failed(message)) => match mode {
                EditorMode::Create => CrudState::Creating {
                    form,
                    error: Some(message),
                },
                EditorMode::Edit(id) => CrudState::Editing {
                    id,
                    form,
                    error: Some(message),
                },
            },
            (other, _) => other,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            CrudState::Creating { error, .. } | CrudState::Editing { error, .. } => {
                error.as_deref()
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIELDS: &[FieldSpec] = &[
        FieldSpec::text("code", "Mã").required(),
        FieldSpec::text("status", "Trạng thái").default_value("draft"),
    ];

    fn form_of(state: &CrudState) -> Option<&FormState> {
        match state {
            CrudState::Creating { form, .. } | CrudState::Editing { form, .. } => Some(form),
            _ => None,
        }
    }

    fn filled() -> FormState {
        FormState::from_submission(
            FIELDS,
            vec![
                ("code".to_string(), "K01".to_string()),
                ("status".to_string(), "open".to_string()),
            ],
        )
    }

    #[test]
    fn test_open_new_resets_to_defaults() {
        let state = CrudState::Listing.open_new(FIELDS);
        let form = form_of(&state).unwrap();
        assert_eq!(form.get("code"), "");
        assert_eq!(form.get("status"), "draft");
        assert!(state.error().is_none());
    }

    #[test]
    fn test_successful_save_returns_to_listing() {
        let state = CrudState::Listing
            .open_edit(7, filled())
            .submit()
            .finish(Outcome::Saved);
        assert_eq!(state, CrudState::Listing);
        assert!(form_of(&state).is_none());
    }

    #[test]
    fn test_failed_save_keeps_values_and_message() {
        let state = CrudState::Creating {
            form: filled(),
            error: None,
        }
        .submit()
        .finish(Outcome::Failed("Mã khoa đã tồn tại".to_string()));

        match &state {
            CrudState::Creating { form, error } => {
                assert_eq!(form, &filled());
                assert_eq!(error.as_deref(), Some("Mã khoa đã tồn tại"));
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_failed_edit_reopens_same_record() {
        let state = CrudState::Listing
            .open_edit(7, filled())
            .submit()
            .finish(Outcome::Failed("x".to_string()));
        assert!(matches!(state, CrudState::Editing { id: 7, .. }));
    }

    #[test]
    fn test_finish_outside_submission_is_ignored() {
        assert_eq!(CrudState::Listing.finish(Outcome::Saved), CrudState::Listing);
    }
}
