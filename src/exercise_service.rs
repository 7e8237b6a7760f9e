use anyhow::Result;
use uuid::Uuid;

use crate::database::Database;
use crate::grading;
use crate::models::*;

// Import logging macros
use crate::{log_service_start, log_service_success, log_service_warn};

#[derive(Clone)]
pub struct ExerciseService {
    db: Database,
}

impl ExerciseService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    // Section operations
    pub async fn create_section(&self, request: CreateSectionRequest) -> Result<Section> {
        validate_title(&request.title)?;
        validate_estimated_time(request.estimated_time)?;

        // The lesson is the root of the tree; refuse to attach sections to one
        // that does not exist.
        if self.db.get_lesson(request.lesson_id).await?.is_none() {
            return Err(anyhow::anyhow!(
                "Lesson with id '{}' not found",
                request.lesson_id
            ));
        }

        log_service_start!("exercise_service", "create_section", lesson_id = request.lesson_id);
        let section = self.db.create_section(request).await?;
        log_service_success!(
            "exercise_service",
            "create_section",
            section_id = section.id,
            "section created"
        );

        Ok(section)
    }

    pub async fn get_section(&self, id: Uuid) -> Result<Option<Section>> {
        self.db.get_section(id).await
    }

    pub async fn get_all_sections(&self) -> Result<Vec<Section>> {
        self.db.get_all_sections().await
    }

    pub async fn get_sections_by_lesson(&self, lesson_id: Uuid) -> Result<Vec<Section>> {
        self.db.get_sections_by_lesson(lesson_id).await
    }

    pub async fn get_section_with_questions(
        &self,
        id: Uuid,
    ) -> Result<Option<SectionWithQuestions>> {
        let section = match self.db.get_section(id).await? {
            Some(section) => section,
            None => return Ok(None),
        };

        let questions = self.db.get_questions_by_section(id).await?;
        Ok(Some(SectionWithQuestions { section, questions }))
    }

    pub async fn update_section(
        &self,
        id: Uuid,
        request: UpdateSectionRequest,
    ) -> Result<Option<Section>> {
        if let Some(ref title) = request.title {
            validate_title(title)?;
        }
        validate_estimated_time(request.estimated_time)?;

        self.db.update_section(id, request).await
    }

    pub async fn delete_section(&self, id: Uuid) -> Result<bool> {
        self.db.delete_section(id).await
    }

    // Question operations
    pub async fn create_question(&self, request: CreateQuestionRequest) -> Result<Question> {
        validate_question_text(&request.question_text)?;
        validate_points(request.points)?;

        if self.db.get_section(request.section_id).await?.is_none() {
            return Err(anyhow::anyhow!(
                "Section with id '{}' not found",
                request.section_id
            ));
        }

        self.db.create_question(request).await
    }

    /// Create a batch of questions one by one. A failing item is recorded and
    /// skipped; earlier successes stay in place, there is no rollback.
    pub async fn create_questions_bulk(
        &self,
        requests: Vec<CreateQuestionRequest>,
    ) -> Result<BulkCreateOutcome> {
        log_service_start!(
            "exercise_service",
            "create_questions_bulk",
            question_count = requests.len()
        );

        let mut outcome = BulkCreateOutcome {
            created: Vec::new(),
            failed: Vec::new(),
        };

        for (index, request) in requests.into_iter().enumerate() {
            match self.create_question(request).await {
                Ok(question) => outcome.created.push(question),
                Err(e) => outcome.failed.push(BulkQuestionError {
                    index,
                    error: e.to_string(),
                }),
            }
        }

        if outcome.failed.is_empty() {
            log_service_success!(
                "exercise_service",
                "create_questions_bulk",
                question_count = outcome.created.len(),
                "bulk create finished"
            );
        } else {
            log_service_warn!(
                "exercise_service",
                "create_questions_bulk",
                format!(
                    "{} of {} questions failed",
                    outcome.failed.len(),
                    outcome.created.len() + outcome.failed.len()
                )
            );
        }

        Ok(outcome)
    }

    pub async fn get_question(&self, id: Uuid) -> Result<Option<Question>> {
        self.db.get_question(id).await
    }

    pub async fn get_all_questions(&self) -> Result<Vec<Question>> {
        self.db.get_all_questions().await
    }

    pub async fn get_questions_by_section(&self, section_id: Uuid) -> Result<Vec<Question>> {
        self.db.get_questions_by_section(section_id).await
    }

    pub async fn update_question(
        &self,
        id: Uuid,
        request: UpdateQuestionRequest,
    ) -> Result<Option<Question>> {
        if let Some(ref question_text) = request.question_text {
            validate_question_text(question_text)?;
        }
        validate_points(request.points)?;

        self.db.update_question(id, request).await
    }

    pub async fn delete_question(&self, id: Uuid) -> Result<bool> {
        self.db.delete_question(id).await
    }

    // Aggregation
    pub async fn recompute_section_totals(&self, section_id: Uuid) -> Result<()> {
        self.db.recompute_section_totals(section_id).await
    }

    // Composed reads
    pub async fn get_lesson_exercises(&self, lesson_id: Uuid) -> Result<Option<LessonExercises>> {
        let lesson = match self.db.get_lesson(lesson_id).await? {
            Some(lesson) => lesson,
            None => return Ok(None),
        };

        let sections = self.db.get_sections_by_lesson(lesson_id).await?;

        let mut composed = Vec::with_capacity(sections.len());
        let mut total_questions: i64 = 0;
        let mut total_points: i64 = 0;

        for section in sections {
            let questions = self.db.get_questions_by_section(section.id).await?;
            total_questions += questions.len() as i64;
            total_points += section.total_points;
            composed.push(SectionWithQuestions { section, questions });
        }

        Ok(Some(LessonExercises {
            lesson,
            total_sections: composed.len() as i64,
            total_questions,
            total_points,
            sections: composed,
        }))
    }

    // Grading
    /// Grade a word-bank submission addressed by (section, question). Returns
    /// None when the question does not exist, lives in a different section, or
    /// is not a word-bank question.
    pub async fn submit_word_bank(
        &self,
        section_id: Uuid,
        question_id: Uuid,
        submission: WordBankSubmission,
    ) -> Result<Option<WordBankVerdict>> {
        tracing::debug!(
            section_id = %section_id,
            question_id = %question_id,
            learner_id = %submission.learner_id,
            selected_count = submission.selected_word_ids.len(),
            "Grading word bank submission"
        );

        let question = match self.db.get_question(question_id).await? {
            Some(question) => question,
            None => return Ok(None),
        };

        if question.section_id != section_id {
            return Ok(None);
        }

        Ok(grading::grade_word_bank(
            &question,
            &submission.selected_word_ids,
        ))
    }
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(anyhow::anyhow!("Section title cannot be empty"));
    }
    Ok(())
}

fn validate_question_text(question_text: &str) -> Result<()> {
    if question_text.trim().is_empty() {
        return Err(anyhow::anyhow!("Question text cannot be empty"));
    }
    Ok(())
}

fn validate_points(points: Option<i64>) -> Result<()> {
    if let Some(points) = points {
        if points < 1 {
            return Err(anyhow::anyhow!("Question points must be at least 1"));
        }
    }
    Ok(())
}

fn validate_estimated_time(estimated_time: Option<i64>) -> Result<()> {
    if let Some(estimated_time) = estimated_time {
        if estimated_time < 0 {
            return Err(anyhow::anyhow!(
                "Estimated time must be a non-negative number of minutes"
            ));
        }
    }
    Ok(())
}
