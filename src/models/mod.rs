pub mod subject;
pub mod image;
pub mod mark;
pub mod grading;
pub mod schedule;
pub mod config;
pub mod validation;

pub use subject::*;
pub use image::*;
pub use mark::*;
pub use grading::*;
pub use schedule::*;
pub use config::*;
