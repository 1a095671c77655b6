//! Countdown arithmetic and alert ("hinge") tiers.

/// Warning state derived from the seconds left on the clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertTier {
    Calm,
    /// Pulse + tick cue.
    Warning,
    /// Stronger visual cue, tick cue continues.
    Critical,
    /// Clock ran out; terminal.
    Expired,
}

impl AlertTier {
    /// Every class a tier may add to the game container.
    pub const ALL_CLASSES: [&'static str; 3] = ["hinge-10", "hinge-50", "hinge-100"];

    pub fn class_name(self) -> Option<&'static str> {
        match self {
            AlertTier::Calm => None,
            AlertTier::Warning => Some("hinge-10"),
            AlertTier::Critical => Some("hinge-50"),
            AlertTier::Expired => Some("hinge-100"),
        }
    }

    /// Whether the timer pulses and the tick cue plays.
    pub fn pulses(self) -> bool {
        matches!(self, AlertTier::Warning | AlertTier::Critical)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Thresholds {
    pub warning: i32,
    pub critical: i32,
}

impl Thresholds {
    pub fn tier(&self, time_left: i32) -> AlertTier {
        if time_left <= 0 {
            AlertTier::Expired
        } else if time_left <= self.critical {
            AlertTier::Critical
        } else if time_left <= self.warning {
            AlertTier::Warning
        } else {
            AlertTier::Calm
        }
    }
}

/// Result of one countdown step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    /// Seconds to display for this step.
    pub shown: i32,
    pub tier: AlertTier,
}

/// Apply one countdown step to `time_left`: report the current value and its
/// tier, then decrement unless the clock already expired.
pub fn step(time_left: &mut i32, thresholds: &Thresholds) -> Tick {
    let shown = *time_left;
    let tier = thresholds.tier(shown);
    if tier != AlertTier::Expired {
        *time_left -= 1;
    }
    Tick { shown, tier }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: Thresholds = Thresholds { warning: 15, critical: 5 };

    #[test]
    fn tiers_escalate_at_thresholds() {
        assert_eq!(T.tier(60), AlertTier::Calm);
        assert_eq!(T.tier(16), AlertTier::Calm);
        assert_eq!(T.tier(15), AlertTier::Warning);
        assert_eq!(T.tier(6), AlertTier::Warning);
        assert_eq!(T.tier(5), AlertTier::Critical);
        assert_eq!(T.tier(1), AlertTier::Critical);
        assert_eq!(T.tier(0), AlertTier::Expired);
        assert_eq!(T.tier(-3), AlertTier::Expired);
    }

    #[test]
    fn sixty_steps_reach_expiry_once() {
        let mut left = 60;
        let first = step(&mut left, &T);
        assert_eq!(first, Tick { shown: 60, tier: AlertTier::Calm });
        let mut expired_at = None;
        for i in 1..=61 {
            let t = step(&mut left, &T);
            if t.tier == AlertTier::Expired && expired_at.is_none() {
                expired_at = Some(i);
            }
        }
        assert_eq!(expired_at, Some(60));
        assert_eq!(left, 0);
    }

    #[test]
    fn pulse_only_in_warning_tiers() {
        assert!(!AlertTier::Calm.pulses());
        assert!(AlertTier::Warning.pulses());
        assert!(AlertTier::Critical.pulses());
        assert!(!AlertTier::Expired.pulses());
        assert_eq!(AlertTier::Calm.class_name(), None);
        assert_eq!(AlertTier::Expired.class_name(), Some("hinge-100"));
    }
}
