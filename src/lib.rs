pub mod api;
pub mod config;
pub mod database;
pub mod errors;
pub mod exercise_service;
pub mod grading;
pub mod lesson_service;
pub mod logging;
pub mod models;


pub use database::Database;
pub use errors::*;
pub use exercise_service::ExerciseService;
pub use lesson_service::LessonService;
pub use models::*;
