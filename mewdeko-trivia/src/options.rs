use std::time::Duration;

pub const MIN_QUESTION_TIMER_SECS: u64 = 10;
pub const MAX_QUESTION_TIMER_SECS: u64 = 300;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TriviaOptions {
    /// Skip editing the hint into the question halfway through a round.
    pub no_hint: bool,
    /// Points needed to win. Zero plays until stopped.
    pub win_requirement: u32,
    /// Seconds each question stays open.
    pub question_timer: u64,
    /// Consecutive unanswered questions before the game stops. Zero never stops.
    pub timeout: u32,
}

impl Default for TriviaOptions {
    fn default() -> Self {
        Self {
            no_hint: false,
            win_requirement: 10,
            question_timer: 30,
            timeout: 10,
        }
    }
}

impl TriviaOptions {
    /// Clamp the question timer into its supported range.
    pub fn normalized(mut self) -> Self {
        self.question_timer = self
            .question_timer
            .clamp(MIN_QUESTION_TIMER_SECS, MAX_QUESTION_TIMER_SECS);
        self
    }

    /// Length of each half of a round; the hint is shown between them.
    pub fn half_round(&self) -> Duration {
        Duration::from_millis(self.question_timer.saturating_mul(1000) / 2)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::TriviaOptions;

    #[test]
    fn timer_is_clamped() {
        let low = TriviaOptions {
            question_timer: 1,
            ..Default::default()
        }
        .normalized();
        assert_eq!(low.question_timer, 10);

        let high = TriviaOptions {
            question_timer: 9_000,
            ..Default::default()
        }
        .normalized();
        assert_eq!(high.question_timer, 300);
        assert_eq!(high.half_round(), Duration::from_secs(150));
    }
}
