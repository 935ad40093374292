pub mod date;
pub mod error;
pub mod file_ops;
pub mod path;

pub use error::{AppError, AppResult, FieldError, ValidationErrors};
pub use file_ops::{CleanupReport, FileStore, LocalFileStore};
