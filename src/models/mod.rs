// Models module - Backend record shapes and entity schemas

pub mod auth;
pub mod class;
pub mod course;
pub mod faculty;
pub mod import;
pub mod program;
pub mod review_batch;
pub mod schema;
pub mod student;
pub mod transfer_row;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, UserProfile};
pub use class::Class;
pub use course::Course;
pub use faculty::Faculty;
pub use import::{ImportKind, ImportReport};
pub use program::Program;
pub use review_batch::{BatchStatus, ReviewBatch};
pub use schema::{EntitySchema, Resource};
pub use student::Student;
pub use transfer_row::{Figure, RowStatus, TransferRow};
pub use user::{Role, User};
