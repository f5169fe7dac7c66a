//! Timer modes and their fixed durations

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub const WORK_SECONDS: u64 = 25 * 60;
pub const SHORT_BREAK_SECONDS: u64 = 5 * 60;
pub const LONG_BREAK_SECONDS: u64 = 15 * 60;

/// Longest accepted duration for any mode (one week)
pub const MAX_DURATION_SECONDS: u64 = 7 * 24 * 60 * 60;

/// The three phases a Pomodoro cycle moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub const ALL: [TimerMode; 3] = [TimerMode::Work, TimerMode::ShortBreak, TimerMode::LongBreak];

    /// Default duration of the mode in seconds
    pub fn nominal_duration(&self) -> u64 {
        match self {
            TimerMode::Work => WORK_SECONDS,
            TimerMode::ShortBreak => SHORT_BREAK_SECONDS,
            TimerMode::LongBreak => LONG_BREAK_SECONDS,
        }
    }

    /// Mode entered automatically once a run of this mode completes
    pub fn next(&self) -> TimerMode {
        match self {
            TimerMode::Work => TimerMode::ShortBreak,
            TimerMode::ShortBreak | TimerMode::LongBreak => TimerMode::Work,
        }
    }

    /// Theme color token for the progress ring and the active mode button
    pub fn color(&self) -> &'static str {
        match self {
            TimerMode::Work => "#472525",
            TimerMode::ShortBreak => "#4c9195",
            TimerMode::LongBreak => "#457ca3",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Work => "work",
            TimerMode::ShortBreak => "short_break",
            TimerMode::LongBreak => "long_break",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Work => "Work",
            TimerMode::ShortBreak => "Short break",
            TimerMode::LongBreak => "Long break",
        }
    }
}

impl fmt::Display for TimerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "work" | "pomodoro" => Ok(TimerMode::Work),
            "short_break" | "short-break" | "shortBreak" => Ok(TimerMode::ShortBreak),
            "long_break" | "long-break" | "longBreak" => Ok(TimerMode::LongBreak),
            other => Err(format!("Unknown timer mode: {}", other)),
        }
    }
}

/// Per-mode durations in seconds, fixed for the lifetime of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeDurations {
    pub work: u64,
    pub short_break: u64,
    pub long_break: u64,
}

impl ModeDurations {
    pub fn for_mode(&self, mode: TimerMode) -> u64 {
        match mode {
            TimerMode::Work => self.work,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }

    /// Bring every duration into `1..=MAX_DURATION_SECONDS`
    pub fn clamped(self) -> Self {
        let clamp = |secs: u64| secs.clamp(1, MAX_DURATION_SECONDS);
        Self {
            work: clamp(self.work),
            short_break: clamp(self.short_break),
            long_break: clamp(self.long_break),
        }
    }
}

impl Default for ModeDurations {
    fn default() -> Self {
        Self {
            work: WORK_SECONDS,
            short_break: SHORT_BREAK_SECONDS,
            long_break: LONG_BREAK_SECONDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_cycle() {
        assert_eq!(TimerMode::Work.next(), TimerMode::ShortBreak);
        assert_eq!(TimerMode::ShortBreak.next(), TimerMode::Work);
        assert_eq!(TimerMode::LongBreak.next(), TimerMode::Work);
    }

    #[test]
    fn test_default_durations_match_modes() {
        let durations = ModeDurations::default();
        for mode in TimerMode::ALL {
            assert_eq!(durations.for_mode(mode), mode.nominal_duration());
        }
        assert_eq!(durations.work, 1500);
        assert_eq!(durations.short_break, 300);
        assert_eq!(durations.long_break, 900);
    }

    #[test]
    fn test_clamped_durations() {
        let durations = ModeDurations {
            work: u64::MAX,
            short_break: 0,
            long_break: 900,
        }
        .clamped();
        assert_eq!(durations.work, MAX_DURATION_SECONDS);
        assert_eq!(durations.short_break, 1);
        assert_eq!(durations.long_break, 900);
        assert_eq!(ModeDurations::default().clamped(), ModeDurations::default());
    }

    #[test]
    fn test_parse_accepts_widget_names() {
        assert_eq!("pomodoro".parse::<TimerMode>(), Ok(TimerMode::Work));
        assert_eq!("shortBreak".parse::<TimerMode>(), Ok(TimerMode::ShortBreak));
        assert_eq!("long-break".parse::<TimerMode>(), Ok(TimerMode::LongBreak));
        assert!("nap".parse::<TimerMode>().is_err());
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&TimerMode::ShortBreak).unwrap();
        assert_eq!(json, "\"short_break\"");
    }
}
