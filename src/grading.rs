use crate::models::{Question, QuestionPayload, WordBankVerdict, WordId, WordTile};

pub const CORRECT_MESSAGE: &str = "Correct!";
pub const INCORRECT_MESSAGE: &str = "Incorrect. Try again!";

/// Order-insensitive comparison of the learner's tile selection against the
/// stored correct set. Ids are canonicalized to strings and sorted, so
/// [3, 2, 1] matches ["1", "2", "3"] and duplicates must match count-for-count.
pub fn selection_matches(selected: &[WordId], correct: &[WordId]) -> bool {
    let mut submitted: Vec<String> = selected.iter().map(WordId::canonical).collect();
    let mut expected: Vec<String> = correct.iter().map(WordId::canonical).collect();
    submitted.sort();
    expected.sort();
    submitted == expected
}

/// Rebuild the sentence the learner actually arranged, in submission order.
/// Ids with no matching tile contribute an empty fragment; the join keeps the
/// resulting gap visible rather than silently dropping the position.
pub fn reconstruct_answer(selected: &[WordId], tiles: &[WordTile]) -> String {
    selected
        .iter()
        .map(|id| {
            let id = id.canonical();
            tiles
                .iter()
                .find(|tile| tile.id.canonical() == id)
                .map(|tile| tile.name.as_str())
                .unwrap_or("")
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Grade a word-bank submission against its question. Returns None when the
/// question is not a word-bank question; grading never persists anything, so
/// each call reports attempt 1.
pub fn grade_word_bank(question: &Question, selected_word_ids: &[WordId]) -> Option<WordBankVerdict> {
    let (word_bank, answer, correct_word_ids) = match &question.payload {
        QuestionPayload::WordBank {
            word_bank,
            answer,
            correct_word_ids,
        } => (word_bank, answer, correct_word_ids),
        _ => return None,
    };

    let is_correct = selection_matches(selected_word_ids, correct_word_ids);
    let message = if is_correct {
        CORRECT_MESSAGE
    } else {
        INCORRECT_MESSAGE
    };

    Some(WordBankVerdict {
        success: true,
        is_correct,
        message: message.to_string(),
        selected_answer: reconstruct_answer(selected_word_ids, word_bank),
        correct_answer: answer.clone(),
        attempt_count: 1,
        points_awarded: if is_correct { question.points } else { 0 },
        explanation: question.explanation.clone(),
    })
}
