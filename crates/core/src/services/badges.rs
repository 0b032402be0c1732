//! Streak badge catalogue.

use serde::Serialize;
use serde_json::Value;

/// A badge users earn by keeping a streak.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeDefinition {
    /// Stable key stored in user stats.
    pub key: &'static str,
    pub label: &'static str,
    /// Streak length that unlocks the badge on display.
    pub days: i32,
    pub hint: &'static str,
    pub story: &'static str,
    /// Image asset slug.
    pub image: &'static str,
}

/// Every badge, in unlock order.
pub const BADGES: [BadgeDefinition; 4] = [
    BadgeDefinition {
        key: "streak3",
        label: "The Spark",
        days: 2,
        hint: "Upload 2 days in a row",
        story: "Growth, fresh starts, and the green light of a new journey.",
        image: "the_spark",
    },
    BadgeDefinition {
        key: "streak7",
        label: "The Steady",
        days: 7,
        hint: "Upload 7 days in a row",
        story: "Consistency, calm momentum, and the rhythm of showing up.",
        image: "the_steady",
    },
    BadgeDefinition {
        key: "streak30",
        label: "The Dedicated",
        days: 30,
        hint: "Upload 30 days in a row",
        story: "Commitment, focus, and steady progress through the long haul.",
        image: "the_dedicated",
    },
    BadgeDefinition {
        key: "streak365",
        label: "The Legend",
        days: 365,
        hint: "Upload 365 days in a row",
        story: "Endurance, mastery, and a year of growth.",
        image: "the_legend",
    },
];

/// Flags written to user stats when a streak reaches each length.
pub const STREAK_BADGE_THRESHOLDS: [(&str, i32); 4] = [
    ("streak3", 3),
    ("streak7", 7),
    ("streak30", 30),
    ("streak365", 365),
];

/// Resolve a badge from its key, its label, or an image path.
#[must_use]
pub fn parse_badge_key(value: &str) -> Option<&'static str> {
    if let Some(badge) = BADGES.iter().find(|b| b.key == value) {
        return Some(badge.key);
    }

    let normalized = value.to_lowercase();
    if let Some(badge) = BADGES.iter().find(|b| b.label.to_lowercase() == normalized) {
        return Some(badge.key);
    }

    BADGES
        .iter()
        .find(|b| normalized.contains(b.image))
        .map(|b| b.key)
}

/// A badge and whether the user has it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeStatus {
    #[serde(flatten)]
    pub badge: BadgeDefinition,
    pub unlocked: bool,
}

/// Badge states for a user with `current_streak` and the stored flags.
#[must_use]
pub fn badge_statuses(current_streak: i32, flags: &Value) -> Vec<BadgeStatus> {
    BADGES
        .iter()
        .map(|badge| {
            let flagged = flags
                .get(badge.key)
                .and_then(Value::as_bool)
                .unwrap_or(false);
            BadgeStatus {
                badge: *badge,
                unlocked: flagged || current_streak >= badge.days,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_badge_key() {
        assert_eq!(parse_badge_key("streak7"), Some("streak7"));
        assert_eq!(parse_badge_key("the legend"), Some("streak365"));
        assert_eq!(parse_badge_key("/badges/the_dedicated.png"), Some("streak30"));
        assert_eq!(parse_badge_key("streak9"), None);
    }

    #[test]
    fn test_unlock_by_streak_or_flag() {
        let statuses = badge_statuses(2, &json!({ "streak30": true }));
        let unlocked: Vec<&str> = statuses
            .iter()
            .filter(|s| s.unlocked)
            .map(|s| s.badge.key)
            .collect();
        assert_eq!(unlocked, vec!["streak3", "streak30"]);
    }
}
