use std::collections::HashSet;
use std::path::Path;

use anyhow::Context as _;
use rand::seq::IteratorRandom;

use crate::question::TriviaQuestion;

/// Immutable question bank shared by every running game.
#[derive(Clone, Debug, Default)]
pub struct QuestionPool {
    questions: Vec<TriviaQuestion>,
}

impl QuestionPool {
    /// Load questions from a JSON array on disk.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read trivia questions from {}", path.display()))?;
        let questions: Vec<TriviaQuestion> = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse trivia questions in {}", path.display()))?;

        Ok(Self { questions })
    }

    pub fn from_questions(questions: Vec<TriviaQuestion>) -> Self {
        Self { questions }
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Pick a random question whose index is not in `asked`. Once every
    /// question has been asked the exclusion is ignored.
    pub fn random_question(&self, asked: &HashSet<usize>) -> Option<(usize, &TriviaQuestion)> {
        let mut rng = rand::thread_rng();

        self.questions
            .iter()
            .enumerate()
            .filter(|(index, _)| !asked.contains(index))
            .choose(&mut rng)
            .or_else(|| self.questions.iter().enumerate().choose(&mut rng))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::QuestionPool;
    use crate::question::TriviaQuestion;

    fn pool(size: usize) -> QuestionPool {
        QuestionPool::from_questions(
            (0..size)
                .map(|n| TriviaQuestion::new("General", format!("Q{n}"), format!("A{n}")))
                .collect(),
        )
    }

    #[test]
    fn never_repeats_until_exhausted() {
        let pool = pool(4);
        let mut asked = HashSet::new();

        for _ in 0..4 {
            let (index, _) = pool.random_question(&asked).unwrap();
            assert!(asked.insert(index), "question {index} asked twice");
        }

        assert!(pool.random_question(&asked).is_some());
    }

    #[test]
    fn empty_pool_yields_nothing() {
        assert!(QuestionPool::default().random_question(&HashSet::new()).is_none());
    }

    #[test]
    fn parses_question_file_format() {
        let raw = r#"[{"question":"Q","answer":"A","category":"C","image_url":"https://x/y.png"}]"#;
        let questions: Vec<TriviaQuestion> = serde_json::from_str(raw).unwrap();
        assert_eq!(questions[0].image_url.as_deref(), Some("https://x/y.png"));
        assert_eq!(questions[0].answer_image_url, None);
    }
}
