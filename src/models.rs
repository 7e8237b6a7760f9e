use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "ACTIVE")]
    Active,
    #[serde(rename = "INACTIVE")]
    Inactive,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Active => "ACTIVE",
            Status::Inactive => "INACTIVE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ACTIVE" => Some(Status::Active),
            "INACTIVE" => Some(Status::Inactive),
            _ => None,
        }
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Active
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Medium
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Vocab,
    Grammar,
    Practice,
    VideoGrammar,
    Listening,
    Writing,
    Reading,
    Speaking,
}

impl SectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Vocab => "vocab",
            SectionType::Grammar => "grammar",
            SectionType::Practice => "practice",
            SectionType::VideoGrammar => "video_grammar",
            SectionType::Listening => "listening",
            SectionType::Writing => "writing",
            SectionType::Reading => "reading",
            SectionType::Speaking => "speaking",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "vocab" => Some(SectionType::Vocab),
            "grammar" => Some(SectionType::Grammar),
            "practice" => Some(SectionType::Practice),
            "video_grammar" => Some(SectionType::VideoGrammar),
            "listening" => Some(SectionType::Listening),
            "writing" => Some(SectionType::Writing),
            "reading" => Some(SectionType::Reading),
            "speaking" => Some(SectionType::Speaking),
            _ => None,
        }
    }

    pub fn all() -> [SectionType; 8] {
        [
            SectionType::Vocab,
            SectionType::Grammar,
            SectionType::Practice,
            SectionType::VideoGrammar,
            SectionType::Listening,
            SectionType::Writing,
            SectionType::Reading,
            SectionType::Speaking,
        ]
    }
}

/// Word-bank tile identifiers arrive as JSON numbers or strings depending on
/// the client; both forms address the same tile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WordId {
    Num(i64),
    Text(String),
}

impl WordId {
    /// Canonical string form used for grading comparisons and tile lookup,
    /// so numeric 1 and string "1" resolve to the same tile.
    pub fn canonical(&self) -> String {
        match self {
            WordId::Num(n) => n.to_string(),
            WordId::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordId::Num(n) => write!(f, "{}", n),
            WordId::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordTile {
    pub id: WordId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerValue {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    pub grammar: i64,
    pub vocabulary: i64,
    pub coherence: i64,
    pub total: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationCriteria {
    pub pronunciation: i64,
    pub fluency: i64,
    pub grammar: i64,
    pub vocabulary: i64,
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: Uuid,
    pub code: String, // unique human-readable identifier, e.g. "A1-L3"
    pub title: String,
    pub description: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub section_type: SectionType,
    pub title: String,
    pub description: Option<String>,
    pub order_index: i64,
    pub total_points: i64, // derived: sum of points over ACTIVE questions
    pub estimated_time: i64, // minutes
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-type question content. The `question_type` tag selects the variant;
/// `practice` is accepted as a legacy alias for `word_bank`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "question_type", rename_all = "snake_case")]
pub enum QuestionPayload {
    Vocab {
        word: String,
        pronunciation: String,
        definition: String,
        examples: Vec<String>,
        answer: String,
    },
    Grammar {
        grammar_topic: String,
        options: Vec<String>,
        answer: String,
    },
    #[serde(alias = "practice")]
    WordBank {
        word_bank: Vec<WordTile>,
        answer: String,
        correct_word_ids: Vec<WordId>,
    },
    VideoGrammar {
        video_url: String,
        video_title: String,
        grammar_topic: String,
        options: Vec<String>,
        answer: String,
    },
    Listening {
        audio_url: String,
        options: Option<Vec<String>>,
        answer: AnswerValue,
        transcript: Option<String>,
    },
    Reading {
        passage: String,
        options: Vec<String>,
        answer: String,
    },
    Writing {
        hints: Vec<String>,
        sample_answer: String,
        rubric: Rubric,
    },
    Speaking {
        topic_area: String,
        evaluation_criteria: EvaluationCriteria,
    },
}

impl QuestionPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            QuestionPayload::Vocab { .. } => "vocab",
            QuestionPayload::Grammar { .. } => "grammar",
            QuestionPayload::WordBank { .. } => "word_bank",
            QuestionPayload::VideoGrammar { .. } => "video_grammar",
            QuestionPayload::Listening { .. } => "listening",
            QuestionPayload::Reading { .. } => "reading",
            QuestionPayload::Writing { .. } => "writing",
            QuestionPayload::Speaking { .. } => "speaking",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub section_id: Uuid,
    pub question_text: String,
    pub difficulty: Difficulty,
    pub points: i64,
    pub order_index: i64,
    pub status: Status,
    pub explanation: Option<String>,
    #[serde(flatten)]
    pub payload: QuestionPayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLessonRequest {
    pub code: String,
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSectionRequest {
    pub lesson_id: Uuid,
    pub section_type: SectionType,
    pub title: String,
    pub description: Option<String>,
    pub order_index: Option<i64>,
    pub estimated_time: Option<i64>,
}

// total_points is derived and deliberately absent here; clients cannot set it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSectionRequest {
    pub section_type: Option<SectionType>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub order_index: Option<i64>,
    pub estimated_time: Option<i64>,
    pub status: Option<Status>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateQuestionRequest {
    pub section_id: Uuid,
    pub question_text: String,
    pub difficulty: Option<Difficulty>,
    pub points: Option<i64>,
    pub order_index: Option<i64>,
    pub explanation: Option<String>,
    #[serde(flatten)]
    pub payload: QuestionPayload,
}

// payload is not flattened here: a flattened Option of a tagged enum does not
// deserialize reliably, and replacement-or-keep is clearer as an explicit field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateQuestionRequest {
    pub question_text: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub points: Option<i64>,
    pub order_index: Option<i64>,
    pub status: Option<Status>,
    pub explanation: Option<String>,
    pub payload: Option<QuestionPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordBankSubmission {
    pub learner_id: String, // external identity, opaque here
    pub selected_word_ids: Vec<WordId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordBankVerdict {
    pub success: bool,
    pub is_correct: bool,
    pub message: String,
    pub selected_answer: String,
    pub correct_answer: String,
    pub attempt_count: i64,
    pub points_awarded: i64,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkQuestionError {
    pub index: usize,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreateOutcome {
    pub created: Vec<Question>,
    pub failed: Vec<BulkQuestionError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionWithQuestions {
    #[serde(flatten)]
    pub section: Section,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonExercises {
    pub lesson: Lesson,
    pub sections: Vec<SectionWithQuestions>,
    pub total_sections: i64,
    pub total_questions: i64,
    pub total_points: i64,
}
