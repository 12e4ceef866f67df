use std::time::{Duration, Instant};

/// Delay between typed characters
pub const TYPE_DELAY: Duration = Duration::from_millis(100);

/// Delay between deleted characters
pub const DELETE_DELAY: Duration = Duration::from_millis(50);

/// Pause on a fully typed phrase before deleting it
pub const HOLD_DELAY: Duration = Duration::from_millis(2000);

/// Pause on empty text before typing the next phrase
pub const NEXT_PHRASE_DELAY: Duration = Duration::from_millis(500);

/// Pause before the first character appears
pub const START_DELAY: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    Deleting,
}

/// Types each phrase out, holds it, deletes it and moves to the next,
/// wrapping around forever.
///
/// `tick` advances one step and returns how long to wait before the next
/// one. `poll` drives `tick` from a clock.
#[derive(Debug, Clone)]
pub struct Typewriter {
    phrases: Vec<String>,
    phrase: usize,
    chars: usize,
    phase: Phase,
    text: String,
    next_at: Option<Instant>,
}

impl Typewriter {
    pub fn new<I, S>(phrases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
            phrase: 0,
            chars: 0,
            phase: Phase::Typing,
            text: String::new(),
            next_at: None,
        }
    }

    /// Currently visible text
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase
    }

    /// Advance one step. Returns the delay until the next step.
    pub fn tick(&mut self) -> Duration {
        let Some(current) = self.phrases.get(self.phrase) else {
            return HOLD_DELAY;
        };
        let len = current.chars().count();

        let mut delay = match self.phase {
            Phase::Deleting => {
                self.chars = self.chars.saturating_sub(1);
                DELETE_DELAY
            }
            Phase::Typing => {
                self.chars = (self.chars + 1).min(len);
                TYPE_DELAY
            }
        };
        self.text = current.chars().take(self.chars).collect();

        if self.phase == Phase::Typing && self.chars == len {
            delay = HOLD_DELAY;
            self.phase = Phase::Deleting;
        } else if self.phase == Phase::Deleting && self.chars == 0 {
            self.phase = Phase::Typing;
            self.phrase = (self.phrase + 1) % self.phrases.len();
            delay = NEXT_PHRASE_DELAY;
        }

        delay
    }

    /// Step if a step is due at `now`. The first call only schedules the
    /// first step after `START_DELAY`. Returns whether a step was taken.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_at {
            None => {
                self.next_at = Some(now + START_DELAY);
                false
            }
            Some(due) if now >= due => {
                let delay = self.tick();
                self.next_at = Some(now + delay);
                true
            }
            Some(_) => false,
        }
    }

    /// When the next step is due, once polling has started
    pub fn next_due(&self) -> Option<Instant> {
        self.next_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle_timing() {
        let mut tw = Typewriter::new(["ab", "c"]);

        assert_eq!(tw.tick(), TYPE_DELAY);
        assert_eq!(tw.text(), "a");
        assert_eq!(tw.tick(), HOLD_DELAY);
        assert_eq!(tw.text(), "ab");
        assert_eq!(tw.phase(), Phase::Deleting);

        assert_eq!(tw.tick(), DELETE_DELAY);
        assert_eq!(tw.text(), "a");
        assert_eq!(tw.tick(), NEXT_PHRASE_DELAY);
        assert_eq!(tw.text(), "");
        assert_eq!(tw.phrase_index(), 1);

        assert_eq!(tw.tick(), HOLD_DELAY);
        assert_eq!(tw.text(), "c");
    }

    #[test]
    fn test_wraps_to_first_phrase() {
        let mut tw = Typewriter::new(["x"]);
        tw.tick(); // "x", hold
        tw.tick(); // "", next phrase
        assert_eq!(tw.phrase_index(), 0);
        assert_eq!(tw.phase(), Phase::Typing);
        tw.tick();
        assert_eq!(tw.text(), "x");
    }

    #[test]
    fn test_multibyte_phrases() {
        let mut tw = Typewriter::new(["héé"]);
        tw.tick();
        tw.tick();
        assert_eq!(tw.text(), "hé");
    }

    #[test]
    fn test_empty_phrase_does_not_stall() {
        let mut tw = Typewriter::new(["", "b"]);
        assert_eq!(tw.tick(), HOLD_DELAY);
        assert_eq!(tw.tick(), NEXT_PHRASE_DELAY);
        assert_eq!(tw.phrase_index(), 1);
    }

    #[test]
    fn test_no_phrases() {
        let mut tw = Typewriter::new(Vec::<String>::new());
        assert_eq!(tw.tick(), HOLD_DELAY);
        assert_eq!(tw.text(), "");
    }

    #[test]
    fn test_poll_schedule() {
        let start = Instant::now();
        let mut tw = Typewriter::new(["hi"]);

        assert!(!tw.poll(start));
        assert_eq!(tw.next_due(), Some(start + START_DELAY));
        assert!(!tw.poll(start + Duration::from_millis(999)));

        let first = start + START_DELAY;
        assert!(tw.poll(first));
        assert_eq!(tw.text(), "h");
        assert_eq!(tw.next_due(), Some(first + TYPE_DELAY));
    }
}
