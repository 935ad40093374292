//! Studylib - studieorganisatör för ämnen, skannade anteckningar,
//! resultat, betygsskala och veckoschema.

pub mod db;
pub mod models;
pub mod services;
pub mod utils;

// Re-exports
pub use db::Database;
pub use models::*;
