use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    errors::{classify_database_error, ApiError, ErrorContext},
    exercise_service::ExerciseService,
    lesson_service::LessonService,
    models::*,
};

// Import logging macros
use crate::{log_api_error, log_api_start, log_api_success, log_api_warn};

#[derive(Clone)]
pub struct AppState {
    pub exercise_service: ExerciseService,
    pub lesson_service: LessonService,
}

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

// Lesson endpoints
pub async fn create_lesson(
    State(state): State<AppState>,
    Json(request): Json<CreateLessonRequest>,
) -> Result<Json<ApiResponse<Lesson>>, (StatusCode, Json<ApiResponse<()>>)> {
    info!(code = %request.code, "Creating lesson");

    let code = request.code.clone();
    match state.lesson_service.create_lesson(request).await {
        Ok(lesson) => {
            info!(lesson_id = %lesson.id, code = %lesson.code, "Lesson created successfully");
            Ok(Json(ApiResponse::success(lesson)))
        }
        Err(e) => {
            let classified_error = classify_database_error(&e);
            let context = ErrorContext::new("create_lesson", "lesson").with_id(&code);
            Err(classified_error.to_response_with_context(context))
        }
    }
}

pub async fn get_lesson(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Lesson>>, (StatusCode, Json<ApiResponse<()>>)> {
    log_api_start!("get_lesson", lesson_id = id);

    match state.lesson_service.get_lesson(id).await {
        Ok(Some(lesson)) => {
            log_api_success!("get_lesson", lesson_id = id, "lesson retrieved successfully");
            Ok(Json(ApiResponse::success(lesson)))
        }
        Ok(None) => {
            log_api_warn!("get_lesson", lesson_id = id, "lesson not found");
            let error = ApiError::NotFound(format!("Lesson with ID '{}' not found", id));
            let context = ErrorContext::new("get_lesson", "lesson").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
        Err(e) => {
            log_api_error!("get_lesson", lesson_id = id, error = e, "database error retrieving lesson");
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("get_lesson", "lesson").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn get_all_lessons(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Lesson>>>, (StatusCode, Json<ApiResponse<()>>)> {
    debug!("Getting all lessons");

    match state.lesson_service.get_all_lessons().await {
        Ok(lessons) => {
            debug!(lesson_count = lessons.len(), "All lessons retrieved successfully");
            Ok(Json(ApiResponse::success(lessons)))
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("get_all_lessons", "lesson");
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn delete_lesson(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<bool>>, (StatusCode, Json<ApiResponse<()>>)> {
    info!(lesson_id = %id, "Deleting lesson");

    match state.lesson_service.delete_lesson(id).await {
        Ok(deleted) => {
            if deleted {
                info!(lesson_id = %id, "Lesson deleted successfully");
                Ok(Json(ApiResponse::success(true)))
            } else {
                let error = ApiError::NotFound(format!("Lesson with ID '{}' not found", id));
                let context = ErrorContext::new("delete_lesson", "lesson").with_id(&id.to_string());
                Err(error.to_response_with_context(context))
            }
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("delete_lesson", "lesson").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

// Section endpoints
pub async fn create_section(
    State(state): State<AppState>,
    Json(request): Json<CreateSectionRequest>,
) -> Result<Json<ApiResponse<Section>>, (StatusCode, Json<ApiResponse<()>>)> {
    info!(
        lesson_id = %request.lesson_id,
        section_type = request.section_type.as_str(),
        "Creating section"
    );

    let lesson_id = request.lesson_id;
    match state.exercise_service.create_section(request).await {
        Ok(section) => {
            info!(
                section_id = %section.id,
                lesson_id = %section.lesson_id,
                "Section created successfully"
            );
            Ok(Json(ApiResponse::success(section)))
        }
        Err(e) => {
            let classified_error = classify_database_error(&e);
            let context =
                ErrorContext::new("create_section", "section").with_id(&lesson_id.to_string());
            Err(classified_error.to_response_with_context(context))
        }
    }
}

pub async fn get_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Section>>, (StatusCode, Json<ApiResponse<()>>)> {
    log_api_start!("get_section", section_id = id);

    match state.exercise_service.get_section(id).await {
        Ok(Some(section)) => {
            log_api_success!("get_section", section_id = id, "section retrieved successfully");
            Ok(Json(ApiResponse::success(section)))
        }
        Ok(None) => {
            log_api_warn!("get_section", section_id = id, "section not found");
            let error = ApiError::NotFound(format!("Section with ID '{}' not found", id));
            let context = ErrorContext::new("get_section", "section").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
        Err(e) => {
            log_api_error!("get_section", section_id = id, error = e, "database error retrieving section");
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("get_section", "section").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn get_all_sections(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Section>>>, (StatusCode, Json<ApiResponse<()>>)> {
    debug!("Getting all sections");

    match state.exercise_service.get_all_sections().await {
        Ok(sections) => {
            debug!(section_count = sections.len(), "All sections retrieved successfully");
            Ok(Json(ApiResponse::success(sections)))
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("get_all_sections", "section");
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn get_sections_by_lesson(
    State(state): State<AppState>,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Section>>>, (StatusCode, Json<ApiResponse<()>>)> {
    debug!(lesson_id = %lesson_id, "Getting sections for lesson");

    match state.exercise_service.get_sections_by_lesson(lesson_id).await {
        Ok(sections) => {
            debug!(
                lesson_id = %lesson_id,
                section_count = sections.len(),
                "Sections retrieved for lesson"
            );
            Ok(Json(ApiResponse::success(sections)))
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("get_sections_by_lesson", "section")
                .with_id(&lesson_id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn get_section_with_questions(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SectionWithQuestions>>, (StatusCode, Json<ApiResponse<()>>)> {
    log_api_start!("get_section_with_questions", section_id = id);

    match state.exercise_service.get_section_with_questions(id).await {
        Ok(Some(section)) => {
            log_api_success!(
                "get_section_with_questions",
                section_id = id,
                "section with questions retrieved"
            );
            Ok(Json(ApiResponse::success(section)))
        }
        Ok(None) => {
            log_api_warn!("get_section_with_questions", section_id = id, "section not found");
            let error = ApiError::NotFound(format!("Section with ID '{}' not found", id));
            let context =
                ErrorContext::new("get_section_with_questions", "section").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context =
                ErrorContext::new("get_section_with_questions", "section").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn update_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSectionRequest>,
) -> Result<Json<ApiResponse<Section>>, (StatusCode, Json<ApiResponse<()>>)> {
    info!(section_id = %id, "Updating section");

    match state.exercise_service.update_section(id, request).await {
        Ok(Some(section)) => {
            info!(section_id = %id, "Section updated successfully");
            Ok(Json(ApiResponse::success(section)))
        }
        Ok(None) => {
            let error = ApiError::NotFound(format!("Section with ID '{}' not found", id));
            let context = ErrorContext::new("update_section", "section").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
        Err(e) => {
            let classified_error = classify_database_error(&e);
            let context = ErrorContext::new("update_section", "section").with_id(&id.to_string());
            Err(classified_error.to_response_with_context(context))
        }
    }
}

pub async fn delete_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<bool>>, (StatusCode, Json<ApiResponse<()>>)> {
    info!(section_id = %id, "Deleting section");

    match state.exercise_service.delete_section(id).await {
        Ok(deleted) => {
            if deleted {
                info!(section_id = %id, "Section deleted successfully");
                Ok(Json(ApiResponse::success(true)))
            } else {
                let error = ApiError::NotFound(format!("Section with ID '{}' not found", id));
                let context =
                    ErrorContext::new("delete_section", "section").with_id(&id.to_string());
                Err(error.to_response_with_context(context))
            }
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("delete_section", "section").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn get_section_types() -> Json<ApiResponse<Vec<SectionType>>> {
    Json(ApiResponse::success(SectionType::all().to_vec()))
}

// Question endpoints
pub async fn create_question(
    State(state): State<AppState>,
    Json(request): Json<CreateQuestionRequest>,
) -> Result<Json<ApiResponse<Question>>, (StatusCode, Json<ApiResponse<()>>)> {
    info!(
        section_id = %request.section_id,
        question_type = request.payload.kind(),
        "Creating question"
    );

    let section_id = request.section_id;
    match state.exercise_service.create_question(request).await {
        Ok(question) => {
            info!(
                question_id = %question.id,
                section_id = %question.section_id,
                "Question created successfully"
            );
            Ok(Json(ApiResponse::success(question)))
        }
        Err(e) => {
            let classified_error = classify_database_error(&e);
            let context =
                ErrorContext::new("create_question", "question").with_id(&section_id.to_string());
            Err(classified_error.to_response_with_context(context))
        }
    }
}

pub async fn create_questions_bulk(
    State(state): State<AppState>,
    Json(requests): Json<Vec<CreateQuestionRequest>>,
) -> Result<Json<ApiResponse<BulkCreateOutcome>>, (StatusCode, Json<ApiResponse<()>>)> {
    log_api_start!("create_questions_bulk");

    match state.exercise_service.create_questions_bulk(requests).await {
        Ok(outcome) => {
            log_api_success!(
                "create_questions_bulk",
                count = outcome.created.len(),
                "bulk create completed"
            );
            Ok(Json(ApiResponse::success(outcome)))
        }
        Err(e) => {
            log_api_error!("create_questions_bulk", error = e, "bulk create failed");
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("create_questions_bulk", "question");
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn get_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Question>>, (StatusCode, Json<ApiResponse<()>>)> {
    log_api_start!("get_question", question_id = id);

    match state.exercise_service.get_question(id).await {
        Ok(Some(question)) => {
            log_api_success!("get_question", question_id = id, "question retrieved successfully");
            Ok(Json(ApiResponse::success(question)))
        }
        Ok(None) => {
            log_api_warn!("get_question", question_id = id, "question not found");
            let error = ApiError::NotFound(format!("Question with ID '{}' not found", id));
            let context = ErrorContext::new("get_question", "question").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
        Err(e) => {
            log_api_error!("get_question", question_id = id, error = e, "database error retrieving question");
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("get_question", "question").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn get_all_questions(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Question>>>, (StatusCode, Json<ApiResponse<()>>)> {
    debug!("Getting all questions");

    match state.exercise_service.get_all_questions().await {
        Ok(questions) => {
            debug!(question_count = questions.len(), "All questions retrieved successfully");
            Ok(Json(ApiResponse::success(questions)))
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("get_all_questions", "question");
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn get_questions_by_section(
    State(state): State<AppState>,
    Path(section_id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<Question>>>, (StatusCode, Json<ApiResponse<()>>)> {
    debug!(section_id = %section_id, "Getting questions for section");

    match state.exercise_service.get_questions_by_section(section_id).await {
        Ok(questions) => {
            debug!(
                section_id = %section_id,
                question_count = questions.len(),
                "Questions retrieved for section"
            );
            Ok(Json(ApiResponse::success(questions)))
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("get_questions_by_section", "question")
                .with_id(&section_id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

pub async fn update_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateQuestionRequest>,
) -> Result<Json<ApiResponse<Question>>, (StatusCode, Json<ApiResponse<()>>)> {
    info!(question_id = %id, "Updating question");

    match state.exercise_service.update_question(id, request).await {
        Ok(Some(question)) => {
            info!(question_id = %id, "Question updated successfully");
            Ok(Json(ApiResponse::success(question)))
        }
        Ok(None) => {
            let error = ApiError::NotFound(format!("Question with ID '{}' not found", id));
            let context = ErrorContext::new("update_question", "question").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
        Err(e) => {
            let classified_error = classify_database_error(&e);
            let context = ErrorContext::new("update_question", "question").with_id(&id.to_string());
            Err(classified_error.to_response_with_context(context))
        }
    }
}

pub async fn delete_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<bool>>, (StatusCode, Json<ApiResponse<()>>)> {
    info!(question_id = %id, "Deleting question");

    match state.exercise_service.delete_question(id).await {
        Ok(deleted) => {
            if deleted {
                info!(question_id = %id, "Question deleted successfully");
                Ok(Json(ApiResponse::success(true)))
            } else {
                let error = ApiError::NotFound(format!("Question with ID '{}' not found", id));
                let context =
                    ErrorContext::new("delete_question", "question").with_id(&id.to_string());
                Err(error.to_response_with_context(context))
            }
        }
        Err(e) => {
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("delete_question", "question").with_id(&id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

// Exercise composition endpoints
pub async fn get_lesson_exercises(
    State(state): State<AppState>,
    Path(lesson_id): Path<Uuid>,
) -> Result<Json<ApiResponse<LessonExercises>>, (StatusCode, Json<ApiResponse<()>>)> {
    log_api_start!("get_lesson_exercises", lesson_id = lesson_id);

    match state.exercise_service.get_lesson_exercises(lesson_id).await {
        Ok(Some(exercises)) => {
            log_api_success!(
                "get_lesson_exercises",
                lesson_id = lesson_id,
                "lesson exercises retrieved"
            );
            Ok(Json(ApiResponse::success(exercises)))
        }
        Ok(None) => {
            log_api_warn!("get_lesson_exercises", lesson_id = lesson_id, "lesson not found");
            let error = ApiError::NotFound(format!("Lesson with ID '{}' not found", lesson_id));
            let context = ErrorContext::new("get_lesson_exercises", "lesson")
                .with_id(&lesson_id.to_string());
            Err(error.to_response_with_context(context))
        }
        Err(e) => {
            log_api_error!("get_lesson_exercises", lesson_id = lesson_id, error = e, "database error composing lesson exercises");
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("get_lesson_exercises", "lesson")
                .with_id(&lesson_id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

// Submission endpoints
pub async fn submit_word_bank(
    State(state): State<AppState>,
    Path((id, question_id)): Path<(Uuid, Uuid)>,
    Json(submission): Json<WordBankSubmission>,
) -> Result<Json<ApiResponse<WordBankVerdict>>, (StatusCode, Json<ApiResponse<()>>)> {
    log_api_start!("submit_word_bank", question_id = question_id);

    match state
        .exercise_service
        .submit_word_bank(id, question_id, submission)
        .await
    {
        Ok(Some(verdict)) => {
            log_api_success!("submit_word_bank", question_id = question_id, "submission graded");
            Ok(Json(ApiResponse::success(verdict)))
        }
        Ok(None) => {
            log_api_warn!(
                "submit_word_bank",
                question_id = question_id,
                "word bank question not found in section"
            );
            let error = ApiError::NotFound(format!(
                "Word bank question with ID '{}' not found",
                question_id
            ));
            let context = ErrorContext::new("submit_word_bank", "question")
                .with_id(&question_id.to_string())
                .with_user_message("Word bank question not found");
            Err(error.to_response_with_context(context))
        }
        Err(e) => {
            log_api_error!("submit_word_bank", question_id = question_id, error = e, "database error grading submission");
            let error = ApiError::DatabaseError(e);
            let context = ErrorContext::new("submit_word_bank", "question")
                .with_id(&question_id.to_string());
            Err(error.to_response_with_context(context))
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Lesson routes
        .route("/api/lessons", post(create_lesson))
        .route("/api/lessons", get(get_all_lessons))
        .route("/api/lessons/:id", get(get_lesson))
        .route("/api/lessons/:id", delete(delete_lesson))

        // Section routes
        .route("/api/sections", post(create_section))
        .route("/api/sections", get(get_all_sections))
        .route("/api/section-types", get(get_section_types))
        .route("/api/sections/lesson/:lesson_id", get(get_sections_by_lesson))
        .route("/api/sections/:id", get(get_section))
        .route("/api/sections/:id", put(update_section))
        .route("/api/sections/:id", delete(delete_section))
        .route("/api/sections/:id/with-questions", get(get_section_with_questions))

        // Question routes
        .route("/api/questions", post(create_question))
        .route("/api/questions", get(get_all_questions))
        .route("/api/questions/bulk", post(create_questions_bulk))
        .route("/api/questions/section/:section_id", get(get_questions_by_section))
        .route("/api/questions/:id", get(get_question))
        .route("/api/questions/:id", put(update_question))
        .route("/api/questions/:id", delete(delete_question))

        // Exercise composition and grading routes
        .route("/api/exercises/lesson/:lesson_id", get(get_lesson_exercises))
        .route("/api/sections/:id/questions/:question_id/submit", post(submit_word_bank))

        .with_state(state)
}

#[cfg(test)]
pub fn create_app(state: AppState) -> Router {
    create_router(state)
}
