use anyhow::Result;
use uuid::Uuid;

use crate::database::Database;
use crate::models::*;

// Import logging macros
use crate::{log_service_start, log_service_success};

/// Minimal lesson surface: enough to root the Section -> Question tree and to
/// validate lesson references. Course and enrollment concerns live elsewhere.
#[derive(Clone)]
pub struct LessonService {
    db: Database,
}

impl LessonService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create_lesson(&self, request: CreateLessonRequest) -> Result<Lesson> {
        if request.code.trim().is_empty() {
            return Err(anyhow::anyhow!("Lesson code cannot be empty"));
        }
        if request.title.trim().is_empty() {
            return Err(anyhow::anyhow!("Lesson title cannot be empty"));
        }

        // Lesson codes are the stable external handle; collisions are a
        // conflict, not an update.
        if self.db.get_lesson_by_code(&request.code).await?.is_some() {
            return Err(anyhow::anyhow!(
                "Lesson with code '{}' already exists",
                request.code
            ));
        }

        log_service_start!("lesson_service", "create_lesson");
        let lesson = self.db.create_lesson(request).await?;
        log_service_success!("lesson_service", "create_lesson", "lesson created");

        Ok(lesson)
    }

    pub async fn get_lesson(&self, id: Uuid) -> Result<Option<Lesson>> {
        self.db.get_lesson(id).await
    }

    pub async fn get_all_lessons(&self) -> Result<Vec<Lesson>> {
        self.db.get_all_lessons().await
    }

    pub async fn delete_lesson(&self, id: Uuid) -> Result<bool> {
        self.db.delete_lesson(id).await
    }
}
