//! Classification vocabularies the model must pick from.
//!
//! Both enums parse leniently: anything outside the vocabulary falls back
//! to the default bucket instead of failing the turn.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of schedule item being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    #[default]
    Event,
    Task,
    Appointment,
    Reminder,
}

impl ItemType {
    pub const ALL: [ItemType; 4] = [
        ItemType::Event,
        ItemType::Task,
        ItemType::Appointment,
        ItemType::Reminder,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Event => "event",
            ItemType::Task => "task",
            ItemType::Appointment => "appointment",
            ItemType::Reminder => "reminder",
        }
    }

    /// Parse case-insensitively, falling back to [`ItemType::Event`].
    pub fn parse_lenient(s: &str) -> Self {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == needle)
            .unwrap_or_default()
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|t| t.as_str().to_string()).collect()
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Life area a schedule item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Work,
    Personal,
    Health,
    Finance,
    Errand,
    #[default]
    General,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Work,
        Category::Personal,
        Category::Health,
        Category::Finance,
        Category::Errand,
        Category::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Work => "work",
            Category::Personal => "personal",
            Category::Health => "health",
            Category::Finance => "finance",
            Category::Errand => "errand",
            Category::General => "general",
        }
    }

    /// Parse case-insensitively, falling back to [`Category::General`].
    pub fn parse_lenient(s: &str) -> Self {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .unwrap_or_default()
    }

    pub fn names() -> Vec<String> {
        Self::ALL.iter().map(|c| c.as_str().to_string()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
