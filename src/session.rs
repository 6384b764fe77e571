use crate::words::WordPool;
use std::time::SystemTime;

/// Countdown length for a standard session.
pub const SESSION_SECS: u64 = 60;

#[derive(Clone, Debug, Copy, PartialEq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// One timed run over a word pool. The driver feeds it a submitted word
/// per space press and one `tick` per elapsed second; everything else is
/// derived.
///
/// The session is Active until either the cursor reaches the end of the
/// pool or the countdown hits zero, after which it must be treated as
/// read-only.
#[derive(Debug)]
pub struct TypingSession {
    pub words: WordPool,
    pub cursor: usize,
    pub started_at: SystemTime,
    pub seconds_remaining: u64,
    pub correct_words: usize,
    pub correct_chars: usize,
    pub cpm_corrected: f64,
    pub wpm: f64,
}

impl TypingSession {
    pub fn new(words: WordPool) -> Self {
        Self::with_seconds(words, SESSION_SECS)
    }

    pub fn with_seconds(words: WordPool, seconds: u64) -> Self {
        Self {
            words,
            cursor: 0,
            started_at: SystemTime::now(),
            seconds_remaining: seconds,
            correct_words: 0,
            correct_chars: 0,
            cpm_corrected: 0.0,
            wpm: 0.0,
        }
    }

    pub fn current_word(&self) -> Option<&str> {
        self.words.get(self.cursor)
    }

    /// True once the pool is exhausted or the countdown reached zero.
    /// A session over an empty pool is ended from the start.
    pub fn is_ended(&self) -> bool {
        self.cursor == self.words.len() || self.seconds_remaining == 0
    }

    /// Score `typed` against the current word and advance to the next one.
    ///
    /// Character credit is positional, up to the shorter of the two
    /// strings; extra typed characters earn nothing and cost nothing.
    /// Word credit requires full equality, length included. The cursor
    /// advances either way.
    ///
    /// Precondition: the session is Active. Calling this after the
    /// session ended is a caller error.
    pub fn submit_word(&mut self, typed: &str) -> Outcome {
        debug_assert!(!self.is_ended(), "submit_word on an ended session");

        let outcome = match self.words.get(self.cursor) {
            Some(actual) => {
                self.correct_chars += positional_matches(typed, actual);
                if typed == actual {
                    self.correct_words += 1;
                    Outcome::Correct
                } else {
                    Outcome::Incorrect
                }
            }
            None => Outcome::Incorrect,
        };

        self.cursor = (self.cursor + 1).min(self.words.len());
        self.refresh_metrics();
        outcome
    }

    /// Advance the countdown by one second, floored at zero. Driven by the
    /// external timer; does not touch the character or word counters.
    pub fn tick(&mut self) -> u64 {
        self.seconds_remaining = self.seconds_remaining.saturating_sub(1);
        self.seconds_remaining
    }

    /// Per-character marks for an in-progress entry against the current
    /// word, for display. Only overlapping positions are marked.
    pub fn entry_marks(&self, typed: &str) -> Vec<Outcome> {
        match self.current_word() {
            Some(actual) => typed
                .chars()
                .zip(actual.chars())
                .map(|(t, a)| {
                    if t == a {
                        Outcome::Correct
                    } else {
                        Outcome::Incorrect
                    }
                })
                .collect(),
            None => Vec::new(),
        }
    }

    // Metric base is wall clock since construction, not tick count. The
    // one-second floor keeps the division sane right after start.
    fn refresh_metrics(&mut self) {
        let elapsed = self.started_at.elapsed().unwrap_or_default();
        let elapsed_mins = (elapsed.as_secs_f64() / 60.0).max(1.0 / 60.0);
        self.cpm_corrected = self.correct_chars as f64 / elapsed_mins;
        self.wpm = self.cpm_corrected / 5.0;
    }
}

/// Positions where `typed` and `actual` agree, counted over the shorter
/// of the two.
pub fn positional_matches(typed: &str, actual: &str) -> usize {
    typed
        .chars()
        .zip(actual.chars())
        .filter(|(t, a)| t == a)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn pool(list: &[&str]) -> WordPool {
        WordPool::from_words(list.iter().map(|w| w.to_string()).collect())
    }

    #[test]
    fn test_new_session_initial_state() {
        let session = TypingSession::new(pool(&["cat", "dog"]));

        assert_eq!(session.cursor, 0);
        assert_eq!(session.seconds_remaining, SESSION_SECS);
        assert_eq!(session.correct_words, 0);
        assert_eq!(session.correct_chars, 0);
        assert_eq!(session.cpm_corrected, 0.0);
        assert_eq!(session.wpm, 0.0);
        assert!(!session.is_ended());
        assert_eq!(session.current_word(), Some("cat"));
    }

    #[test]
    fn test_scenario_two_word_run() {
        // "cat" exactly, then "dig" against "dog".
        let mut session = TypingSession::new(pool(&["cat", "dog"]));

        assert_eq!(session.submit_word("cat"), Outcome::Correct);
        assert_eq!(session.correct_chars, 3);
        assert_eq!(session.correct_words, 1);
        assert_eq!(session.cursor, 1);
        assert!(!session.is_ended());

        // d and g line up, i does not
        assert_eq!(session.submit_word("dig"), Outcome::Incorrect);
        assert_eq!(session.correct_chars, 5);
        assert_eq!(session.correct_words, 1);
        assert_eq!(session.cursor, 2);
        assert!(session.is_ended());
    }

    #[test]
    fn test_same_length_near_miss() {
        let mut session = TypingSession::new(pool(&["cat"]));

        assert_eq!(session.submit_word("cot"), Outcome::Incorrect);
        assert_eq!(session.correct_chars, 2);
        assert_eq!(session.correct_words, 0);
    }

    #[test]
    fn test_prefix_is_not_a_correct_word() {
        let mut session = TypingSession::new(pool(&["cats"]));

        // all three positions match but the lengths differ
        assert_eq!(session.submit_word("cat"), Outcome::Incorrect);
        assert_eq!(session.correct_chars, 3);
        assert_eq!(session.correct_words, 0);
    }

    #[test]
    fn test_overtyping_earns_no_extra_credit() {
        let mut session = TypingSession::new(pool(&["cat"]));

        assert_eq!(session.submit_word("catalog"), Outcome::Incorrect);
        assert_eq!(session.correct_chars, 3);
        assert_eq!(session.correct_words, 0);
    }

    #[test]
    fn test_empty_entry_advances_without_credit() {
        let mut session = TypingSession::new(pool(&["cat", "dog"]));

        assert_eq!(session.submit_word(""), Outcome::Incorrect);
        assert_eq!(session.correct_chars, 0);
        assert_eq!(session.cursor, 1);
    }

    #[test]
    fn test_positional_matches_bounds() {
        assert_eq!(positional_matches("cot", "cat"), 2);
        assert_eq!(positional_matches("tac", "cat"), 1);
        assert_eq!(positional_matches("", "cat"), 0);
        assert_eq!(positional_matches("cat", ""), 0);
        // never more than the shorter length
        assert!(positional_matches("catalog", "cat") <= 3);
    }

    #[test]
    fn test_empty_pool_is_instantly_ended() {
        let session = TypingSession::new(pool(&[]));

        assert!(session.is_ended());
        assert_eq!(session.cursor, 0);
        assert_eq!(session.current_word(), None);
    }

    #[test]
    #[should_panic(expected = "submit_word on an ended session")]
    fn test_submit_after_end_is_a_caller_error() {
        let mut session = TypingSession::new(pool(&["cat"]));
        session.submit_word("cat");
        session.submit_word("dog");
    }

    #[test]
    fn test_countdown_runs_to_zero_and_ends() {
        let mut session = TypingSession::new(pool(&["cat", "dog"]));

        for expected in (0..SESSION_SECS).rev() {
            assert_eq!(session.tick(), expected);
        }
        assert_eq!(session.seconds_remaining, 0);
        assert!(session.is_ended());

        // a stray extra tick stays floored at zero
        assert_eq!(session.tick(), 0);
    }

    #[test]
    fn test_tick_does_not_touch_counters() {
        let mut session = TypingSession::new(pool(&["cat"]));
        session.submit_word("cax");

        let chars_before = session.correct_chars;
        let cpm_before = session.cpm_corrected;
        session.tick();

        assert_eq!(session.correct_chars, chars_before);
        assert_eq!(session.cpm_corrected, cpm_before);
    }

    #[test]
    fn test_metrics_floor_right_after_start() {
        // elapsed is microseconds here, so the 1/60 min floor applies and
        // cpm comes out as chars-per-tick-second times sixty
        let mut session = TypingSession::new(pool(&["cat"]));
        session.submit_word("cat");

        assert!((session.cpm_corrected - 180.0).abs() < 1e-6);
        assert!((session.wpm - 36.0).abs() < 1e-6);
    }

    #[test]
    fn test_metrics_use_wall_clock_base() {
        let mut session = TypingSession::new(pool(&["cat", "dog"]));
        session.started_at -= Duration::from_secs(30);

        session.submit_word("cat");

        // 3 chars over half a minute, give or take test overhead
        assert!(session.cpm_corrected > 5.5 && session.cpm_corrected < 6.5);
    }

    #[test]
    fn test_cpm_is_always_five_times_wpm() {
        let mut session = TypingSession::new(pool(&["cat", "dog", "fish"]));

        for typed in ["cat", "dxg", "fish"] {
            session.submit_word(typed);
            assert!((session.cpm_corrected - 5.0 * session.wpm).abs() < 1e-9);
        }
    }

    #[test]
    fn test_counters_are_monotone() {
        let mut session = TypingSession::new(pool(&["cat", "dog", "fish"]));
        let mut last_chars = 0;
        let mut last_words = 0;

        for typed in ["cat", "zzz", "fish"] {
            session.submit_word(typed);
            assert!(session.correct_chars >= last_chars);
            assert!(session.correct_words >= last_words);
            last_chars = session.correct_chars;
            last_words = session.correct_words;
        }
    }

    #[test]
    fn test_entry_marks_overlap_only() {
        let session = TypingSession::new(pool(&["cat"]));

        assert_eq!(
            session.entry_marks("co"),
            vec![Outcome::Correct, Outcome::Incorrect]
        );
        // marks never extend past the word
        assert_eq!(session.entry_marks("catalog").len(), 3);
        assert!(session.entry_marks("").is_empty());
    }

    #[test]
    fn test_entry_marks_on_ended_session_are_empty() {
        let session = TypingSession::new(pool(&[]));
        assert!(session.entry_marks("cat").is_empty());
    }

    #[test]
    fn test_accented_words_match_by_char() {
        let mut session = TypingSession::new(pool(&["não"]));

        assert_eq!(session.submit_word("nao"), Outcome::Incorrect);
        assert_eq!(session.correct_chars, 2);
    }
}
