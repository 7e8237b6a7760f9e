use anyhow::{anyhow, Result};
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::models::*;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url).await?;
        let db = Database { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS lessons (
                id TEXT PRIMARY KEY,
                code TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'ACTIVE',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS exercise_sections (
                id TEXT PRIMARY KEY,
                lesson_id TEXT NOT NULL,
                section_type TEXT NOT NULL,
                title TEXT NOT NULL,
                description TEXT,
                order_index INTEGER NOT NULL DEFAULT 0,
                total_points INTEGER NOT NULL DEFAULT 0,
                estimated_time INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'ACTIVE',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (lesson_id) REFERENCES lessons(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        // One wide table for all question types; type-specific columns stay
        // NULL for the variants that do not use them. List and object values
        // are JSON-encoded TEXT.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS questions (
                id TEXT PRIMARY KEY,
                section_id TEXT NOT NULL,
                question_type TEXT NOT NULL,
                question_text TEXT NOT NULL,
                difficulty TEXT NOT NULL DEFAULT 'medium',
                points INTEGER NOT NULL DEFAULT 1,
                order_index INTEGER NOT NULL DEFAULT 0,
                status TEXT NOT NULL DEFAULT 'ACTIVE',
                explanation TEXT,
                word TEXT,
                pronunciation TEXT,
                definition TEXT,
                examples TEXT,
                options TEXT,
                answer TEXT,
                grammar_topic TEXT,
                video_url TEXT,
                video_title TEXT,
                audio_url TEXT,
                transcript TEXT,
                passage TEXT,
                word_bank TEXT,
                correct_word_ids TEXT,
                hints TEXT,
                sample_answer TEXT,
                rubric TEXT,
                evaluation_criteria TEXT,
                topic_area TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (section_id) REFERENCES exercise_sections(id) ON DELETE CASCADE
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_exercise_sections_lesson ON exercise_sections(lesson_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_questions_section ON questions(section_id)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    // Lesson operations
    pub async fn create_lesson(&self, request: CreateLessonRequest) -> Result<Lesson> {
        let now = Utc::now();
        let lesson = Lesson {
            id: Uuid::new_v4(),
            code: request.code,
            title: request.title,
            description: request.description,
            status: Status::Active,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO lessons (id, code, title, description, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(lesson.id.to_string())
        .bind(&lesson.code)
        .bind(&lesson.title)
        .bind(&lesson.description)
        .bind(lesson.status.as_str())
        .bind(lesson.created_at.to_rfc3339())
        .bind(lesson.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(lesson)
    }

    pub async fn get_lesson(&self, id: Uuid) -> Result<Option<Lesson>> {
        let row = sqlx::query("SELECT * FROM lessons WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_lesson(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_lesson_by_code(&self, code: &str) -> Result<Option<Lesson>> {
        let row = sqlx::query("SELECT * FROM lessons WHERE code = ?1")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_lesson(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_all_lessons(&self) -> Result<Vec<Lesson>> {
        let rows = sqlx::query("SELECT * FROM lessons ORDER BY created_at ASC, rowid ASC")
            .fetch_all(&self.pool)
            .await?;

        let mut lessons = Vec::new();
        for row in rows {
            lessons.push(self.row_to_lesson(&row)?);
        }

        Ok(lessons)
    }

    pub async fn delete_lesson(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM questions
            WHERE section_id IN (SELECT id FROM exercise_sections WHERE lesson_id = ?1)
            "#,
        )
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM exercise_sections WHERE lesson_id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM lessons WHERE id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    // Section operations
    pub async fn create_section(&self, request: CreateSectionRequest) -> Result<Section> {
        let now = Utc::now();
        let section = Section {
            id: Uuid::new_v4(),
            lesson_id: request.lesson_id,
            section_type: request.section_type,
            title: request.title,
            description: request.description,
            order_index: request.order_index.unwrap_or(0),
            total_points: 0,
            estimated_time: request.estimated_time.unwrap_or(0),
            status: Status::Active,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO exercise_sections (id, lesson_id, section_type, title, description,
                             order_index, total_points, estimated_time, status, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(section.id.to_string())
        .bind(section.lesson_id.to_string())
        .bind(section.section_type.as_str())
        .bind(&section.title)
        .bind(&section.description)
        .bind(section.order_index)
        .bind(section.total_points)
        .bind(section.estimated_time)
        .bind(section.status.as_str())
        .bind(section.created_at.to_rfc3339())
        .bind(section.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(section)
    }

    pub async fn get_section(&self, id: Uuid) -> Result<Option<Section>> {
        let row = sqlx::query("SELECT * FROM exercise_sections WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_section(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_all_sections(&self) -> Result<Vec<Section>> {
        let rows =
            sqlx::query("SELECT * FROM exercise_sections ORDER BY order_index ASC, rowid ASC")
                .fetch_all(&self.pool)
                .await?;

        self.rows_to_sections(rows)
    }

    pub async fn get_sections_by_lesson(&self, lesson_id: Uuid) -> Result<Vec<Section>> {
        let rows = sqlx::query(
            "SELECT * FROM exercise_sections WHERE lesson_id = ?1 ORDER BY order_index ASC, rowid ASC",
        )
        .bind(lesson_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        self.rows_to_sections(rows)
    }

    pub async fn update_section(
        &self,
        id: Uuid,
        request: UpdateSectionRequest,
    ) -> Result<Option<Section>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT * FROM exercise_sections WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await?;

        let existing = match row {
            Some(row) => self.row_to_section(&row)?,
            None => return Ok(None),
        };

        let updated = Section {
            id: existing.id,
            lesson_id: existing.lesson_id,
            section_type: request.section_type.unwrap_or(existing.section_type),
            title: request.title.unwrap_or(existing.title),
            description: request.description.or(existing.description),
            order_index: request.order_index.unwrap_or(existing.order_index),
            total_points: existing.total_points,
            estimated_time: request.estimated_time.unwrap_or(existing.estimated_time),
            status: request.status.unwrap_or(existing.status),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };

        // total_points is deliberately not written here; only the aggregate
        // recompute path may touch it.
        sqlx::query(
            r#"
            UPDATE exercise_sections
            SET section_type = ?1, title = ?2, description = ?3, order_index = ?4,
                estimated_time = ?5, status = ?6, updated_at = ?7
            WHERE id = ?8
            "#,
        )
        .bind(updated.section_type.as_str())
        .bind(&updated.title)
        .bind(&updated.description)
        .bind(updated.order_index)
        .bind(updated.estimated_time)
        .bind(updated.status.as_str())
        .bind(updated.updated_at.to_rfc3339())
        .bind(updated.id.to_string())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(updated))
    }

    pub async fn delete_section(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM questions WHERE section_id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM exercise_sections WHERE id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }

    // Question operations
    pub async fn create_question(&self, request: CreateQuestionRequest) -> Result<Question> {
        let now = Utc::now();
        let question = Question {
            id: Uuid::new_v4(),
            section_id: request.section_id,
            question_text: request.question_text,
            difficulty: request.difficulty.unwrap_or_default(),
            points: request.points.unwrap_or(1),
            order_index: request.order_index.unwrap_or(0),
            status: Status::Active,
            explanation: request.explanation,
            payload: request.payload,
            created_at: now,
            updated_at: now,
        };

        let columns = PayloadColumns::from_payload(&question.payload)?;
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO questions (id, section_id, question_type, question_text, difficulty,
                             points, order_index, status, explanation,
                             word, pronunciation, definition, examples, options, answer,
                             grammar_topic, video_url, video_title, audio_url, transcript,
                             passage, word_bank, correct_word_ids, hints, sample_answer,
                             rubric, evaluation_criteria, topic_area, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15,
                    ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30)
            "#,
        )
        .bind(question.id.to_string())
        .bind(question.section_id.to_string())
        .bind(question.payload.kind())
        .bind(&question.question_text)
        .bind(question.difficulty.as_str())
        .bind(question.points)
        .bind(question.order_index)
        .bind(question.status.as_str())
        .bind(&question.explanation)
        .bind(&columns.word)
        .bind(&columns.pronunciation)
        .bind(&columns.definition)
        .bind(&columns.examples)
        .bind(&columns.options)
        .bind(&columns.answer)
        .bind(&columns.grammar_topic)
        .bind(&columns.video_url)
        .bind(&columns.video_title)
        .bind(&columns.audio_url)
        .bind(&columns.transcript)
        .bind(&columns.passage)
        .bind(&columns.word_bank)
        .bind(&columns.correct_word_ids)
        .bind(&columns.hints)
        .bind(&columns.sample_answer)
        .bind(&columns.rubric)
        .bind(&columns.evaluation_criteria)
        .bind(&columns.topic_area)
        .bind(question.created_at.to_rfc3339())
        .bind(question.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await?;

        Self::recompute_totals_tx(&mut tx, question.section_id, &now.to_rfc3339()).await?;
        tx.commit().await?;

        Ok(question)
    }

    pub async fn get_question(&self, id: Uuid) -> Result<Option<Question>> {
        let row = sqlx::query("SELECT * FROM questions WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_question(&row)?)),
            None => Ok(None),
        }
    }

    pub async fn get_all_questions(&self) -> Result<Vec<Question>> {
        let rows = sqlx::query("SELECT * FROM questions ORDER BY order_index ASC, rowid ASC")
            .fetch_all(&self.pool)
            .await?;

        self.rows_to_questions(rows)
    }

    pub async fn get_questions_by_section(&self, section_id: Uuid) -> Result<Vec<Question>> {
        let rows = sqlx::query(
            "SELECT * FROM questions WHERE section_id = ?1 ORDER BY order_index ASC, rowid ASC",
        )
        .bind(section_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        self.rows_to_questions(rows)
    }

    pub async fn update_question(
        &self,
        id: Uuid,
        request: UpdateQuestionRequest,
    ) -> Result<Option<Question>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT * FROM questions WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await?;

        let existing = match row {
            Some(row) => self.row_to_question(&row)?,
            None => return Ok(None),
        };

        // The aggregate only depends on points and status; other fields can
        // change without touching the section row.
        let needs_recompute = request.points.is_some_and(|p| p != existing.points)
            || request.status.is_some_and(|s| s != existing.status);

        let now = Utc::now();
        let updated = Question {
            id: existing.id,
            section_id: existing.section_id,
            question_text: request.question_text.unwrap_or(existing.question_text),
            difficulty: request.difficulty.unwrap_or(existing.difficulty),
            points: request.points.unwrap_or(existing.points),
            order_index: request.order_index.unwrap_or(existing.order_index),
            status: request.status.unwrap_or(existing.status),
            explanation: request.explanation.or(existing.explanation),
            payload: request.payload.unwrap_or(existing.payload),
            created_at: existing.created_at,
            updated_at: now,
        };

        let columns = PayloadColumns::from_payload(&updated.payload)?;

        sqlx::query(
            r#"
            UPDATE questions
            SET question_type = ?1, question_text = ?2, difficulty = ?3, points = ?4,
                order_index = ?5, status = ?6, explanation = ?7,
                word = ?8, pronunciation = ?9, definition = ?10, examples = ?11,
                options = ?12, answer = ?13, grammar_topic = ?14, video_url = ?15,
                video_title = ?16, audio_url = ?17, transcript = ?18, passage = ?19,
                word_bank = ?20, correct_word_ids = ?21, hints = ?22, sample_answer = ?23,
                rubric = ?24, evaluation_criteria = ?25, topic_area = ?26, updated_at = ?27
            WHERE id = ?28
            "#,
        )
        .bind(updated.payload.kind())
        .bind(&updated.question_text)
        .bind(updated.difficulty.as_str())
        .bind(updated.points)
        .bind(updated.order_index)
        .bind(updated.status.as_str())
        .bind(&updated.explanation)
        .bind(&columns.word)
        .bind(&columns.pronunciation)
        .bind(&columns.definition)
        .bind(&columns.examples)
        .bind(&columns.options)
        .bind(&columns.answer)
        .bind(&columns.grammar_topic)
        .bind(&columns.video_url)
        .bind(&columns.video_title)
        .bind(&columns.audio_url)
        .bind(&columns.transcript)
        .bind(&columns.passage)
        .bind(&columns.word_bank)
        .bind(&columns.correct_word_ids)
        .bind(&columns.hints)
        .bind(&columns.sample_answer)
        .bind(&columns.rubric)
        .bind(&columns.evaluation_criteria)
        .bind(&columns.topic_area)
        .bind(updated.updated_at.to_rfc3339())
        .bind(updated.id.to_string())
        .execute(&mut *tx)
        .await?;

        if needs_recompute {
            Self::recompute_totals_tx(&mut tx, updated.section_id, &now.to_rfc3339()).await?;
        }

        tx.commit().await?;
        Ok(Some(updated))
    }

    pub async fn delete_question(&self, id: Uuid) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query("SELECT section_id FROM questions WHERE id = ?1")
            .bind(id.to_string())
            .fetch_optional(&mut *tx)
            .await?;

        let section_id = match row {
            Some(row) => Uuid::parse_str(&row.get::<String, _>("section_id"))?,
            None => return Ok(false),
        };

        sqlx::query("DELETE FROM questions WHERE id = ?1")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        Self::recompute_totals_tx(&mut tx, section_id, &Utc::now().to_rfc3339()).await?;
        tx.commit().await?;

        Ok(true)
    }

    // Aggregation
    /// Recompute a section's total_points from its ACTIVE questions. Safe to
    /// call any number of times; fails if the section row no longer exists.
    pub async fn recompute_section_totals(&self, section_id: Uuid) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        Self::recompute_totals_tx(&mut conn, section_id, &Utc::now().to_rfc3339()).await
    }

    async fn recompute_totals_tx(
        conn: &mut sqlx::SqliteConnection,
        section_id: Uuid,
        now: &str,
    ) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE exercise_sections
            SET total_points = (
                    SELECT COALESCE(SUM(points), 0)
                    FROM questions
                    WHERE section_id = ?1 AND status = 'ACTIVE'
                ),
                updated_at = ?2
            WHERE id = ?1
            "#,
        )
        .bind(section_id.to_string())
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(anyhow!("Section with id '{}' not found", section_id));
        }

        Ok(())
    }

    // Row mapping
    fn row_to_lesson(&self, row: &SqliteRow) -> Result<Lesson> {
        let status_raw: String = row.get("status");
        Ok(Lesson {
            id: Uuid::parse_str(&row.get::<String, _>("id"))?,
            code: row.get("code"),
            title: row.get("title"),
            description: row.get("description"),
            status: Status::parse(&status_raw)
                .ok_or_else(|| anyhow!("invalid status '{}' stored for lesson", status_raw))?,
            created_at: chrono::DateTime::parse_from_rfc3339(&row.get::<String, _>("created_at"))?
                .with_timezone(&Utc),
            updated_at: chrono::DateTime::parse_from_rfc3339(&row.get::<String, _>("updated_at"))?
                .with_timezone(&Utc),
        })
    }

    fn rows_to_sections(&self, rows: Vec<SqliteRow>) -> Result<Vec<Section>> {
        let mut sections = Vec::new();
        for row in rows {
            sections.push(self.row_to_section(&row)?);
        }

        Ok(sections)
    }

    fn row_to_section(&self, row: &SqliteRow) -> Result<Section> {
        let section_type_raw: String = row.get("section_type");
        let status_raw: String = row.get("status");
        Ok(Section {
            id: Uuid::parse_str(&row.get::<String, _>("id"))?,
            lesson_id: Uuid::parse_str(&row.get::<String, _>("lesson_id"))?,
            section_type: SectionType::parse(&section_type_raw).ok_or_else(|| {
                anyhow!("invalid section_type '{}' stored for section", section_type_raw)
            })?,
            title: row.get("title"),
            description: row.get("description"),
            order_index: row.get("order_index"),
            total_points: row.get("total_points"),
            estimated_time: row.get("estimated_time"),
            status: Status::parse(&status_raw)
                .ok_or_else(|| anyhow!("invalid status '{}' stored for section", status_raw))?,
            created_at: chrono::DateTime::parse_from_rfc3339(&row.get::<String, _>("created_at"))?
                .with_timezone(&Utc),
            updated_at: chrono::DateTime::parse_from_rfc3339(&row.get::<String, _>("updated_at"))?
                .with_timezone(&Utc),
        })
    }

    fn rows_to_questions(&self, rows: Vec<SqliteRow>) -> Result<Vec<Question>> {
        let mut questions = Vec::new();
        for row in rows {
            questions.push(self.row_to_question(&row)?);
        }

        Ok(questions)
    }

    fn row_to_question(&self, row: &SqliteRow) -> Result<Question> {
        let question_type: String = row.get("question_type");
        let payload = match question_type.as_str() {
            "vocab" => QuestionPayload::Vocab {
                word: text_column(row, "word")?,
                pronunciation: text_column(row, "pronunciation")?,
                definition: text_column(row, "definition")?,
                examples: json_column(row, "examples")?,
                answer: json_column(row, "answer")?,
            },
            "grammar" => QuestionPayload::Grammar {
                grammar_topic: text_column(row, "grammar_topic")?,
                options: json_column(row, "options")?,
                answer: json_column(row, "answer")?,
            },
            "word_bank" => QuestionPayload::WordBank {
                word_bank: json_column(row, "word_bank")?,
                answer: json_column(row, "answer")?,
                correct_word_ids: json_column(row, "correct_word_ids")?,
            },
            "video_grammar" => QuestionPayload::VideoGrammar {
                video_url: text_column(row, "video_url")?,
                video_title: text_column(row, "video_title")?,
                grammar_topic: text_column(row, "grammar_topic")?,
                options: json_column(row, "options")?,
                answer: json_column(row, "answer")?,
            },
            "listening" => QuestionPayload::Listening {
                audio_url: text_column(row, "audio_url")?,
                options: optional_json_column(row, "options")?,
                answer: json_column(row, "answer")?,
                transcript: row.get("transcript"),
            },
            "reading" => QuestionPayload::Reading {
                passage: text_column(row, "passage")?,
                options: json_column(row, "options")?,
                answer: json_column(row, "answer")?,
            },
            "writing" => QuestionPayload::Writing {
                hints: json_column(row, "hints")?,
                sample_answer: text_column(row, "sample_answer")?,
                rubric: json_column(row, "rubric")?,
            },
            "speaking" => QuestionPayload::Speaking {
                topic_area: text_column(row, "topic_area")?,
                evaluation_criteria: json_column(row, "evaluation_criteria")?,
            },
            other => return Err(anyhow!("unknown question_type '{}' stored for question", other)),
        };

        let difficulty_raw: String = row.get("difficulty");
        let status_raw: String = row.get("status");

        Ok(Question {
            id: Uuid::parse_str(&row.get::<String, _>("id"))?,
            section_id: Uuid::parse_str(&row.get::<String, _>("section_id"))?,
            question_text: row.get("question_text"),
            difficulty: Difficulty::parse(&difficulty_raw).ok_or_else(|| {
                anyhow!("invalid difficulty '{}' stored for question", difficulty_raw)
            })?,
            points: row.get("points"),
            order_index: row.get("order_index"),
            status: Status::parse(&status_raw)
                .ok_or_else(|| anyhow!("invalid status '{}' stored for question", status_raw))?,
            explanation: row.get("explanation"),
            payload,
            created_at: chrono::DateTime::parse_from_rfc3339(&row.get::<String, _>("created_at"))?
                .with_timezone(&Utc),
            updated_at: chrono::DateTime::parse_from_rfc3339(&row.get::<String, _>("updated_at"))?
                .with_timezone(&Utc),
        })
    }
}

/// Nullable per-type column values for one questions row.
#[derive(Default)]
struct PayloadColumns {
    word: Option<String>,
    pronunciation: Option<String>,
    definition: Option<String>,
    examples: Option<String>,
    options: Option<String>,
    answer: Option<String>,
    grammar_topic: Option<String>,
    video_url: Option<String>,
    video_title: Option<String>,
    audio_url: Option<String>,
    transcript: Option<String>,
    passage: Option<String>,
    word_bank: Option<String>,
    correct_word_ids: Option<String>,
    hints: Option<String>,
    sample_answer: Option<String>,
    rubric: Option<String>,
    evaluation_criteria: Option<String>,
    topic_area: Option<String>,
}

impl PayloadColumns {
    fn from_payload(payload: &QuestionPayload) -> Result<Self> {
        let mut columns = PayloadColumns::default();

        match payload {
            QuestionPayload::Vocab {
                word,
                pronunciation,
                definition,
                examples,
                answer,
            } => {
                columns.word = Some(word.clone());
                columns.pronunciation = Some(pronunciation.clone());
                columns.definition = Some(definition.clone());
                columns.examples = Some(serde_json::to_string(examples)?);
                columns.answer = Some(serde_json::to_string(answer)?);
            }
            QuestionPayload::Grammar {
                grammar_topic,
                options,
                answer,
            } => {
                columns.grammar_topic = Some(grammar_topic.clone());
                columns.options = Some(serde_json::to_string(options)?);
                columns.answer = Some(serde_json::to_string(answer)?);
            }
            QuestionPayload::WordBank {
                word_bank,
                answer,
                correct_word_ids,
            } => {
                columns.word_bank = Some(serde_json::to_string(word_bank)?);
                columns.answer = Some(serde_json::to_string(answer)?);
                columns.correct_word_ids = Some(serde_json::to_string(correct_word_ids)?);
            }
            QuestionPayload::VideoGrammar {
                video_url,
                video_title,
                grammar_topic,
                options,
                answer,
            } => {
                columns.video_url = Some(video_url.clone());
                columns.video_title = Some(video_title.clone());
                columns.grammar_topic = Some(grammar_topic.clone());
                columns.options = Some(serde_json::to_string(options)?);
                columns.answer = Some(serde_json::to_string(answer)?);
            }
            QuestionPayload::Listening {
                audio_url,
                options,
                answer,
                transcript,
            } => {
                columns.audio_url = Some(audio_url.clone());
                columns.options = match options {
                    Some(options) => Some(serde_json::to_string(options)?),
                    None => None,
                };
                columns.answer = Some(serde_json::to_string(answer)?);
                columns.transcript = transcript.clone();
            }
            QuestionPayload::Reading {
                passage,
                options,
                answer,
            } => {
                columns.passage = Some(passage.clone());
                columns.options = Some(serde_json::to_string(options)?);
                columns.answer = Some(serde_json::to_string(answer)?);
            }
            QuestionPayload::Writing {
                hints,
                sample_answer,
                rubric,
            } => {
                columns.hints = Some(serde_json::to_string(hints)?);
                columns.sample_answer = Some(sample_answer.clone());
                columns.rubric = Some(serde_json::to_string(rubric)?);
            }
            QuestionPayload::Speaking {
                topic_area,
                evaluation_criteria,
            } => {
                columns.topic_area = Some(topic_area.clone());
                columns.evaluation_criteria = Some(serde_json::to_string(evaluation_criteria)?);
            }
        }

        Ok(columns)
    }
}

fn text_column(row: &SqliteRow, column: &str) -> Result<String> {
    row.get::<Option<String>, _>(column)
        .ok_or_else(|| anyhow!("questions.{} is missing for this question type", column))
}

fn json_column<T: serde::de::DeserializeOwned>(row: &SqliteRow, column: &str) -> Result<T> {
    let raw = text_column(row, column)?;
    serde_json::from_str(&raw).map_err(|e| anyhow!("questions.{} holds invalid JSON: {}", column, e))
}

fn optional_json_column<T: serde::de::DeserializeOwned>(
    row: &SqliteRow,
    column: &str,
) -> Result<Option<T>> {
    match row.get::<Option<String>, _>(column) {
        Some(raw) => Ok(Some(
            serde_json::from_str(&raw)
                .map_err(|e| anyhow!("questions.{} holds invalid JSON: {}", column, e))?,
        )),
        None => Ok(None),
    }
}
