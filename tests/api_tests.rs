use axum::http::StatusCode;
use axum_test::TestServer;
use exercise_backend::{api::*, Database, ExerciseService, LessonService};
use serde_json::{json, Value};
use uuid::Uuid;

async fn create_test_server() -> TestServer {
    let db = Database::new("sqlite::memory:").await.unwrap();
    let app_state = AppState {
        exercise_service: ExerciseService::new(db.clone()),
        lesson_service: LessonService::new(db),
    };

    let app = create_router(app_state);
    TestServer::new(app).unwrap()
}

async fn create_test_lesson(server: &TestServer, code: &str) -> String {
    let response = server
        .post("/api/lessons")
        .json(&json!({
            "code": code,
            "title": format!("Lesson {}", code),
            "description": null
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_test_section(server: &TestServer, lesson_id: &str) -> String {
    let response = server
        .post("/api/sections")
        .json(&json!({
            "lesson_id": lesson_id,
            "section_type": "practice",
            "title": "Word Bank Practice",
            "order_index": 3,
            "estimated_time": 3
        }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    body["data"]["id"].as_str().unwrap().to_string()
}

fn grammar_question_body(section_id: &str, points: i64) -> Value {
    json!({
        "section_id": section_id,
        "question_text": "Choose the correct form",
        "question_type": "grammar",
        "points": points,
        "grammar_topic": "Present Simple",
        "options": ["go", "goes"],
        "answer": "go"
    })
}

#[tokio::test]
async fn test_api_create_lesson() {
    let server = create_test_server().await;

    let response = server
        .post("/api/lessons")
        .json(&json!({
            "code": "A1-L1",
            "title": "Greetings",
            "description": "Basic greetings"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["code"], "A1-L1");
    assert_eq!(body["data"]["title"], "Greetings");
    assert_eq!(body["data"]["status"], "ACTIVE");
}

#[tokio::test]
async fn test_api_duplicate_lesson_code_conflict() {
    let server = create_test_server().await;

    create_test_lesson(&server, "A1-L1").await;

    let response = server
        .post("/api/lessons")
        .json(&json!({
            "code": "A1-L1",
            "title": "Duplicate",
            "description": null
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("already exists"));
}

#[tokio::test]
async fn test_api_get_nonexistent_lesson() {
    let server = create_test_server().await;

    let response = server
        .get(&format!("/api/lessons/{}", Uuid::new_v4()))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_api_create_section_with_defaults() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;

    let response = server
        .post("/api/sections")
        .json(&json!({
            "lesson_id": lesson_id,
            "section_type": "vocab",
            "title": "Vocabulary"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["section_type"], "vocab");
    assert_eq!(body["data"]["order_index"], 0);
    assert_eq!(body["data"]["estimated_time"], 0);
    assert_eq!(body["data"]["total_points"], 0);
    assert_eq!(body["data"]["status"], "ACTIVE");
}

#[tokio::test]
async fn test_api_create_section_unknown_lesson() {
    let server = create_test_server().await;

    let response = server
        .post("/api/sections")
        .json(&json!({
            "lesson_id": Uuid::new_v4(),
            "section_type": "vocab",
            "title": "Orphan"
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_section_types_listing() {
    let server = create_test_server().await;

    let response = server.get("/api/section-types").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    let types = body["data"].as_array().unwrap();
    assert_eq!(types.len(), 8);
    assert!(types.contains(&json!("practice")));
    assert!(types.contains(&json!("video_grammar")));
    assert!(types.contains(&json!("speaking")));
}

#[tokio::test]
async fn test_api_update_section_cannot_set_total_points() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    // total_points in the payload is not part of the update contract and is
    // silently dropped
    let response = server
        .put(&format!("/api/sections/{}", section_id))
        .json(&json!({
            "title": "Renamed",
            "total_points": 999
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["title"], "Renamed");
    assert_eq!(body["data"]["total_points"], 0);
}

#[tokio::test]
async fn test_api_create_question_envelope() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    let response = server
        .post("/api/questions")
        .json(&json!({
            "section_id": section_id,
            "question_text": "Arrange the words to form a correct greeting",
            "question_type": "word_bank",
            "difficulty": "easy",
            "points": 1,
            "word_bank": [
                {"id": "1", "name": "you"},
                {"id": "2", "name": "do"},
                {"id": "3", "name": "How"}
            ],
            "answer": "How do you",
            "correct_word_ids": ["3", "2", "1"]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["question_type"], "word_bank");
    assert_eq!(body["data"]["difficulty"], "easy");
    assert_eq!(body["data"]["points"], 1);
    assert_eq!(body["data"]["status"], "ACTIVE");
    assert_eq!(body["data"]["word_bank"].as_array().unwrap().len(), 3);
    assert_eq!(body["data"]["answer"], "How do you");
}

#[tokio::test]
async fn test_api_practice_alias_maps_to_word_bank() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    // Legacy clients send "practice"; the canonical type in responses is
    // "word_bank"
    let response = server
        .post("/api/questions")
        .json(&json!({
            "section_id": section_id,
            "question_text": "Arrange the words",
            "question_type": "practice",
            "word_bank": [{"id": "1", "name": "hello"}],
            "answer": "hello",
            "correct_word_ids": ["1"]
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["question_type"], "word_bank");
}

#[tokio::test]
async fn test_api_question_defaults() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    let response = server
        .post("/api/questions")
        .json(&json!({
            "section_id": section_id,
            "question_text": "Choose the correct form",
            "question_type": "grammar",
            "grammar_topic": "Present Simple",
            "options": ["go", "goes"],
            "answer": "go"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["points"], 1); // default
    assert_eq!(body["data"]["order_index"], 0);
    assert_eq!(body["data"]["difficulty"], "medium");
}

#[tokio::test]
async fn test_api_question_validation_errors() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    // Zero points
    let mut body = grammar_question_body(&section_id, 0);
    let response = server.post("/api/questions").json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);

    // Blank question text
    body = grammar_question_body(&section_id, 1);
    body["question_text"] = json!("   ");
    let response = server.post("/api/questions").json(&body).await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_bulk_create_reports_partial_failure() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    let response = server
        .post("/api/questions/bulk")
        .json(&json!([
            grammar_question_body(&section_id, 2),
            grammar_question_body(&Uuid::new_v4().to_string(), 2),
            grammar_question_body(&section_id, 3)
        ]))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["created"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["failed"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["failed"][0]["index"], 1);

    // The surviving creations already flowed into the section total
    let section_response = server.get(&format!("/api/sections/{}", section_id)).await;
    let section_body: Value = section_response.json();
    assert_eq!(section_body["data"]["total_points"], 5);
}

#[tokio::test]
async fn test_api_delete_question_updates_total() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    let first = server
        .post("/api/questions")
        .json(&grammar_question_body(&section_id, 2))
        .await;
    first.assert_status_ok();

    let second = server
        .post("/api/questions")
        .json(&grammar_question_body(&section_id, 3))
        .await;
    second.assert_status_ok();
    let second_body: Value = second.json();
    let second_id = second_body["data"]["id"].as_str().unwrap();

    let section_response = server.get(&format!("/api/sections/{}", section_id)).await;
    let section_body: Value = section_response.json();
    assert_eq!(section_body["data"]["total_points"], 5);

    let delete_response = server.delete(&format!("/api/questions/{}", second_id)).await;
    delete_response.assert_status_ok();
    let delete_body: Value = delete_response.json();
    assert_eq!(delete_body["data"], true);

    let section_response = server.get(&format!("/api/sections/{}", section_id)).await;
    let section_body: Value = section_response.json();
    assert_eq!(section_body["data"]["total_points"], 2);
}

#[tokio::test]
async fn test_api_update_question_points() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    let create_response = server
        .post("/api/questions")
        .json(&grammar_question_body(&section_id, 2))
        .await;
    create_response.assert_status_ok();
    let create_body: Value = create_response.json();
    let question_id = create_body["data"]["id"].as_str().unwrap();

    let update_response = server
        .put(&format!("/api/questions/{}", question_id))
        .json(&json!({ "points": 7 }))
        .await;
    update_response.assert_status_ok();
    let update_body: Value = update_response.json();
    assert_eq!(update_body["data"]["points"], 7);

    let section_response = server.get(&format!("/api/sections/{}", section_id)).await;
    let section_body: Value = section_response.json();
    assert_eq!(section_body["data"]["total_points"], 7);
}

#[tokio::test]
async fn test_api_update_nonexistent_question() {
    let server = create_test_server().await;

    let response = server
        .put(&format!("/api/questions/{}", Uuid::new_v4()))
        .json(&json!({ "points": 7 }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_get_questions_by_section() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    server
        .post("/api/questions")
        .json(&grammar_question_body(&section_id, 1))
        .await
        .assert_status_ok();
    server
        .post("/api/questions")
        .json(&grammar_question_body(&section_id, 2))
        .await
        .assert_status_ok();

    let response = server
        .get(&format!("/api/questions/section/{}", section_id))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // Unknown section simply has no questions
    let response = server
        .get(&format!("/api/questions/section/{}", Uuid::new_v4()))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_api_section_with_questions() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    server
        .post("/api/questions")
        .json(&grammar_question_body(&section_id, 2))
        .await
        .assert_status_ok();

    let response = server
        .get(&format!("/api/sections/{}/with-questions", section_id))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    // Section fields are flattened next to the questions array
    assert_eq!(body["data"]["id"], section_id.as_str());
    assert_eq!(body["data"]["title"], "Word Bank Practice");
    assert_eq!(body["data"]["total_points"], 2);
    assert_eq!(body["data"]["questions"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_api_lesson_exercises_overview() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    server
        .post("/api/questions")
        .json(&grammar_question_body(&section_id, 2))
        .await
        .assert_status_ok();
    server
        .post("/api/questions")
        .json(&grammar_question_body(&section_id, 3))
        .await
        .assert_status_ok();

    let response = server
        .get(&format!("/api/exercises/lesson/{}", lesson_id))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"]["lesson"]["id"], lesson_id.as_str());
    assert_eq!(body["data"]["total_sections"], 1);
    assert_eq!(body["data"]["total_questions"], 2);
    assert_eq!(body["data"]["total_points"], 5);
    assert_eq!(body["data"]["sections"][0]["questions"].as_array().unwrap().len(), 2);

    let missing = server
        .get(&format!("/api/exercises/lesson/{}", Uuid::new_v4()))
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_submit_word_bank_flow() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    let create_response = server
        .post("/api/questions")
        .json(&json!({
            "section_id": section_id,
            "question_text": "Arrange the words to form a correct greeting",
            "question_type": "word_bank",
            "points": 1,
            "word_bank": [
                {"id": "1", "name": "you"},
                {"id": "2", "name": "do"},
                {"id": "3", "name": "How"}
            ],
            "answer": "How do you",
            "correct_word_ids": ["3", "2", "1"]
        }))
        .await;
    create_response.assert_status_ok();
    let create_body: Value = create_response.json();
    let question_id = create_body["data"]["id"].as_str().unwrap();

    let correct = server
        .post(&format!(
            "/api/sections/{}/questions/{}/submit",
            section_id, question_id
        ))
        .json(&json!({
            "learner_id": "learner-1",
            "selected_word_ids": ["3", "2", "1"]
        }))
        .await;
    correct.assert_status_ok();
    let correct_body: Value = correct.json();
    assert_eq!(correct_body["data"]["is_correct"], true);
    assert_eq!(correct_body["data"]["points_awarded"], 1);

    let wrong = server
        .post(&format!(
            "/api/sections/{}/questions/{}/submit",
            section_id, question_id
        ))
        .json(&json!({
            "learner_id": "learner-1",
            "selected_word_ids": ["1"]
        }))
        .await;
    wrong.assert_status_ok();
    let wrong_body: Value = wrong.json();
    assert_eq!(wrong_body["data"]["is_correct"], false);
    assert_eq!(wrong_body["data"]["points_awarded"], 0);

    let missing = server
        .post(&format!(
            "/api/sections/{}/questions/{}/submit",
            section_id,
            Uuid::new_v4()
        ))
        .json(&json!({
            "learner_id": "learner-1",
            "selected_word_ids": ["3"]
        }))
        .await;
    missing.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_api_delete_lesson_cascades() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    let delete_response = server.delete(&format!("/api/lessons/{}", lesson_id)).await;
    delete_response.assert_status_ok();

    let section_response = server.get(&format!("/api/sections/{}", section_id)).await;
    section_response.assert_status(StatusCode::NOT_FOUND);

    let list_response = server
        .get(&format!("/api/sections/lesson/{}", lesson_id))
        .await;
    list_response.assert_status_ok();
    let list_body: Value = list_response.json();
    assert_eq!(list_body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_api_missing_fields() {
    let server = create_test_server().await;

    // Missing "title"
    let response = server
        .post("/api/sections")
        .json(&json!({
            "lesson_id": Uuid::new_v4(),
            "section_type": "vocab"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_api_unknown_question_type() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;
    let section_id = create_test_section(&server, &lesson_id).await;

    let response = server
        .post("/api/questions")
        .json(&json!({
            "section_id": section_id,
            "question_text": "Write an essay",
            "question_type": "essay"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_api_non_json_body() {
    let server = create_test_server().await;

    let response = server.post("/api/lessons").text("not json").await;

    response.assert_status(StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[tokio::test]
async fn test_api_response_structure() {
    let server = create_test_server().await;
    let lesson_id = create_test_lesson(&server, "A1-L1").await;

    let response = server.get(&format!("/api/lessons/{}", lesson_id)).await;
    response.assert_status_ok();
    let body: Value = response.json();

    assert!(body.get("success").is_some());
    assert!(body.get("data").is_some());
    assert!(body.get("error").is_some());
    assert_eq!(body["success"], true);
    assert!(body["error"].is_null());

    let lesson = &body["data"];
    assert!(lesson.get("id").is_some());
    assert!(lesson.get("code").is_some());
    assert!(lesson.get("created_at").is_some());
    assert!(lesson.get("updated_at").is_some());
}
