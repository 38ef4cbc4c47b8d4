use std::collections::{BTreeSet, HashMap};

use tokio::sync::RwLock;

pub const MIN_POLL_OPTIONS: usize = 2;
pub const MAX_POLL_OPTIONS: usize = 10;
/// Prefix of the vote buttons' custom ids; the suffix is the 1-based option.
pub const POLL_BUTTON_PREFIX: &str = "pollbutton:";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PollType {
    /// One vote per user, final.
    #[default]
    SingleAnswer,
    /// One vote per user, may be changed.
    AllowChange,
    /// Any number of options per user, toggled.
    MultiAnswer,
    /// Reported when no poll is running.
    PollEnded,
}

#[derive(Clone, Debug)]
pub struct Poll {
    pub question: String,
    pub options: Vec<String>,
    pub poll_type: PollType,
    pub channel_id: u64,
    pub message_id: u64,
    votes: HashMap<u64, BTreeSet<usize>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OptionResult {
    pub option: String,
    pub votes: usize,
    pub percent: f64,
}

impl Poll {
    pub fn new(question: String, options: Vec<String>, poll_type: PollType) -> Self {
        Self {
            question,
            options,
            poll_type,
            channel_id: 0,
            message_id: 0,
            votes: HashMap::new(),
        }
    }

    /// Apply a vote for the zero-based `index`. Returns whether it was accepted.
    pub fn vote(&mut self, user_id: u64, index: usize) -> bool {
        if index >= self.options.len() {
            return false;
        }

        let choices = self.votes.entry(user_id).or_default();
        match self.poll_type {
            PollType::SingleAnswer => {
                if !choices.is_empty() {
                    return false;
                }
                choices.insert(index)
            }
            PollType::AllowChange => {
                if choices.contains(&index) {
                    return false;
                }
                choices.clear();
                choices.insert(index)
            }
            PollType::MultiAnswer => {
                if choices.remove(&index) {
                    return false;
                }
                choices.insert(index)
            }
            PollType::PollEnded => false,
        }
    }

    pub fn total_votes(&self) -> usize {
        self.votes.values().map(BTreeSet::len).sum()
    }

    pub fn results(&self) -> Vec<OptionResult> {
        let total = self.total_votes();
        self.options
            .iter()
            .enumerate()
            .map(|(index, option)| {
                let votes = self
                    .votes
                    .values()
                    .filter(|choices| choices.contains(&index))
                    .count();
                let percent = if total == 0 {
                    0.0
                } else {
                    votes as f64 * 100.0 / total as f64
                };
                OptionResult {
                    option: option.clone(),
                    votes,
                    percent,
                }
            })
            .collect()
    }
}

/// Split `question;option1;option2;...` into its parts.
pub fn parse_poll_input(raw: &str) -> Option<(String, Vec<String>)> {
    let mut parts = raw
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned);

    let question = parts.next()?;
    let options: Vec<String> = parts.collect();

    (MIN_POLL_OPTIONS..=MAX_POLL_OPTIONS)
        .contains(&options.len())
        .then_some((question, options))
}

/// Running polls, one per guild.
#[derive(Debug, Default)]
pub struct PollRegistry {
    polls: RwLock<HashMap<u64, Poll>>,
}

impl PollRegistry {
    /// Register a poll. Returns `false` when the guild already has one.
    pub async fn create(&self, guild_id: u64, poll: Poll) -> bool {
        let mut polls = self.polls.write().await;
        if polls.contains_key(&guild_id) {
            return false;
        }
        polls.insert(guild_id, poll);
        true
    }

    pub async fn set_message(&self, guild_id: u64, channel_id: u64, message_id: u64) {
        if let Some(poll) = self.polls.write().await.get_mut(&guild_id) {
            poll.channel_id = channel_id;
            poll.message_id = message_id;
        }
    }

    pub async fn try_vote(&self, guild_id: u64, index: usize, user_id: u64) -> (bool, PollType) {
        let mut polls = self.polls.write().await;
        let Some(poll) = polls.get_mut(&guild_id) else {
            return (false, PollType::PollEnded);
        };

        (poll.vote(user_id, index), poll.poll_type)
    }

    pub async fn end(&self, guild_id: u64) -> Option<Poll> {
        self.polls.write().await.remove(&guild_id)
    }
}

/// Parse a vote button id into a zero-based option index.
pub fn parse_poll_button(custom_id: &str) -> Option<usize> {
    custom_id
        .strip_prefix(POLL_BUTTON_PREFIX)?
        .parse::<usize>()
        .ok()?
        .checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::{Poll, PollRegistry, PollType, parse_poll_button, parse_poll_input};

    fn poll(poll_type: PollType) -> Poll {
        Poll::new(
            "Best pet?".to_owned(),
            vec!["cat".to_owned(), "dog".to_owned(), "fish".to_owned()],
            poll_type,
        )
    }

    #[test]
    fn single_answer_refuses_second_vote() {
        let mut poll = poll(PollType::SingleAnswer);
        assert!(poll.vote(1, 0));
        assert!(!poll.vote(1, 1));
        assert!(!poll.vote(1, 0));
        assert!(poll.vote(2, 1));
        assert_eq!(poll.total_votes(), 2);
    }

    #[test]
    fn allow_change_moves_the_vote() {
        let mut poll = poll(PollType::AllowChange);
        assert!(poll.vote(1, 0));
        assert!(!poll.vote(1, 0));
        assert!(poll.vote(1, 2));

        let results = poll.results();
        assert_eq!(results[0].votes, 0);
        assert_eq!(results[2].votes, 1);
    }

    #[test]
    fn multi_answer_toggles_options() {
        let mut poll = poll(PollType::MultiAnswer);
        assert!(poll.vote(1, 0));
        assert!(poll.vote(1, 1));
        assert!(!poll.vote(1, 0), "second press removes the vote");
        assert_eq!(poll.total_votes(), 1);
        assert!(poll.vote(1, 0));
        assert_eq!(poll.total_votes(), 2);
    }

    #[test]
    fn out_of_range_votes_are_refused() {
        let mut poll = poll(PollType::MultiAnswer);
        assert!(!poll.vote(1, 3));
    }

    #[test]
    fn results_report_percentages() {
        let mut poll = poll(PollType::SingleAnswer);
        poll.vote(1, 0);
        poll.vote(2, 0);
        poll.vote(3, 1);
        poll.vote(4, 2);

        let results = poll.results();
        assert_eq!(results[0].votes, 2);
        assert!((results[0].percent - 50.0).abs() < f64::EPSILON);
        assert!((results[1].percent - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn parses_input_and_buttons() {
        assert_eq!(
            parse_poll_input("Lunch? ; pizza; ;sushi"),
            Some((
                "Lunch?".to_owned(),
                vec!["pizza".to_owned(), "sushi".to_owned()]
            ))
        );
        assert_eq!(parse_poll_input("Only a question;one"), None);
        assert_eq!(parse_poll_button("pollbutton:3"), Some(2));
        assert_eq!(parse_poll_button("pollbutton:0"), None);
        assert_eq!(parse_poll_button("other:1"), None);
    }

    #[tokio::test]
    async fn registry_reports_ended_polls() {
        let registry = PollRegistry::default();
        assert_eq!(registry.try_vote(1, 0, 5).await, (false, PollType::PollEnded));

        assert!(registry.create(1, poll(PollType::SingleAnswer)).await);
        assert!(!registry.create(1, poll(PollType::MultiAnswer)).await);
        assert_eq!(registry.try_vote(1, 0, 5).await, (true, PollType::SingleAnswer));

        let ended = registry.end(1).await.unwrap();
        assert_eq!(ended.total_votes(), 1);
        assert_eq!(registry.try_vote(1, 0, 5).await, (false, PollType::PollEnded));
    }
}
