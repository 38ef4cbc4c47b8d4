use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Cleaned answers are cut to this many characters before judging.
const MAX_CLEAN_LEN: usize = 22;

/// `(max length, allowed edits)`: the first row whose length fits either
/// string decides the verdict.
const STRICTNESS: [(usize, usize); 4] = [(9, 0), (14, 1), (19, 2), (22, 3)];

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));
static PUNCTUATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\d\s]").expect("punctuation pattern is valid"));
static FILLER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s(a|an|the|of|in|for|to|as|at|be)\s").expect("filler pattern is valid")
});

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriviaQuestion {
    pub question: String,
    pub answer: String,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub answer_image_url: Option<String>,
}

impl TriviaQuestion {
    pub fn new(
        category: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            category: category.into(),
            image_url: None,
            answer_image_url: None,
        }
    }

    /// A question with a blank prompt or answer cannot be played.
    pub fn is_playable(&self) -> bool {
        !self.question.trim().is_empty() && !self.answer.trim().is_empty()
    }

    pub fn is_answer_correct(&self, guess: &str) -> bool {
        if self.answer == guess {
            return true;
        }

        let clean_answer = clean(&self.answer);
        let clean_guess = clean(guess);
        if clean_answer == clean_guess {
            return true;
        }

        judge(
            char_len(&clean_answer),
            char_len(&clean_guess),
            levenshtein(&clean_answer, &clean_guess),
        ) || judge(
            char_len(&self.answer),
            char_len(guess),
            levenshtein(&self.answer, guess),
        )
    }

    /// The answer with every letter and digit hidden except each word's first.
    pub fn hint(&self) -> String {
        let mut at_word_start = true;
        self.answer
            .chars()
            .map(|ch| {
                if ch.is_whitespace() {
                    at_word_start = true;
                    return ch;
                }

                let first = at_word_start;
                at_word_start = false;
                if !first && ch.is_alphanumeric() { '_' } else { ch }
            })
            .collect()
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn clean(raw: &str) -> String {
    let padded = format!(" {} ", raw.to_lowercase());
    let collapsed = WHITESPACE_RE.replace_all(&padded, " ");
    let stripped = PUNCTUATION_RE.replace_all(&collapsed, "");
    let unfilled = FILLER_RE.replace_all(&stripped, " ");

    unfilled.trim().chars().take(MAX_CLEAN_LEN).collect()
}

fn judge(answer_len: usize, guess_len: usize, distance: usize) -> bool {
    STRICTNESS
        .iter()
        .find(|(max_len, _)| answer_len <= *max_len || guess_len <= *max_len)
        .is_some_and(|(_, allowed)| distance <= *allowed)
}

fn levenshtein(left: &str, right: &str) -> usize {
    let left: Vec<char> = left.chars().collect();
    let right: Vec<char> = right.chars().collect();

    if left.is_empty() {
        return right.len();
    }
    if right.is_empty() {
        return left.len();
    }

    let mut previous: Vec<usize> = (0..=right.len()).collect();
    let mut current = vec![0; right.len() + 1];

    for (i, left_ch) in left.iter().enumerate() {
        current[0] = i + 1;
        for (j, right_ch) in right.iter().enumerate() {
            let substitution = previous[j] + usize::from(left_ch != right_ch);
            current[j + 1] = substitution
                .min(previous[j + 1] + 1)
                .min(current[j] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[right.len()]
}

#[cfg(test)]
mod tests {
    use super::{TriviaQuestion, clean, judge, levenshtein};

    fn question(answer: &str) -> TriviaQuestion {
        TriviaQuestion::new("General", "Q?", answer)
    }

    #[test]
    fn cleaning_drops_case_punctuation_and_filler_words() {
        assert_eq!(clean("The Beatles!"), "beatles");
        assert_eq!(clean("  Lord   of the  Rings "), "lord the rings");
        assert_eq!(clean("A Tale of Two Cities, Volume One"), "tale two cities volume");
    }

    #[test]
    fn levenshtein_distances() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn strictness_grows_with_length() {
        assert!(!judge(9, 9, 1));
        assert!(judge(12, 13, 1));
        assert!(!judge(12, 13, 2));
        assert!(judge(18, 30, 2));
        assert!(judge(22, 22, 3));
        assert!(!judge(30, 30, 0));
    }

    #[test]
    fn accepts_exact_clean_and_near_guesses() {
        let q = question("The Beatles");
        assert!(q.is_answer_correct("The Beatles"));
        assert!(q.is_answer_correct("beatles"));
        assert!(!q.is_answer_correct("beetles"));

        let q = question("Leonardo da Vinci");
        assert!(q.is_answer_correct("leonardo da vinchi"));
        assert!(!q.is_answer_correct("michelangelo"));
    }

    #[test]
    fn short_answers_need_exact_matches() {
        let q = question("Paris");
        assert!(q.is_answer_correct("paris"));
        assert!(!q.is_answer_correct("pariss"));
        assert!(!q.is_answer_correct(""));
    }

    #[test]
    fn hint_keeps_first_letter_of_each_word() {
        assert_eq!(question("Leonardo da Vinci").hint(), "L_______ d_ V____");
        assert_eq!(question("R2-D2").hint(), "R_-__");
        assert_eq!(question("42").hint(), "4_");
    }

    #[test]
    fn blank_questions_are_not_playable() {
        assert!(!TriviaQuestion::new("c", " ", "a").is_playable());
        assert!(!TriviaQuestion::new("c", "q", "").is_playable());
        assert!(TriviaQuestion::new("c", "q", "a").is_playable());
    }
}
