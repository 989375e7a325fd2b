use chrono::{DateTime, Utc};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub id: String,
    pub title: String,
    pub completed_at: DateTime<Utc>,
}

/// Completions keyed by ISO date, in the order the goals API sent them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalsPerDay(pub Vec<(String, Vec<CompletionRecord>)>);

impl GoalsPerDay {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, Vec<CompletionRecord>)> {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for GoalsPerDay {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedDays;

        impl<'de> Visitor<'de> for OrderedDays {
            type Value = GoalsPerDay;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of date to completion list")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut days = Vec::with_capacity(access.size_hint().unwrap_or(7));
                while let Some((date, records)) = access.next_entry()? {
                    days.push((date, records));
                }
                Ok(GoalsPerDay(days))
            }
        }

        deserializer.deserialize_map(OrderedDays)
    }
}

impl Serialize for GoalsPerDay {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (date, records) in &self.0 {
            map.serialize_entry(date, records)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryAggregate {
    pub completed: u64,
    #[serde(alias = "total")]
    pub total_goals: u64,
    #[serde(default)]
    pub goals_per_day: Option<GoalsPerDay>,
}

/// `GET /summary` answers either with the aggregate itself or wrapped in `summary`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SummaryEnvelope {
    Wrapped { summary: SummaryAggregate },
    Bare(SummaryAggregate),
}

impl SummaryEnvelope {
    pub fn into_inner(self) -> SummaryAggregate {
        match self {
            Self::Wrapped { summary } => summary,
            Self::Bare(summary) => summary,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingGoal {
    pub id: String,
    pub title: String,
    pub desired_weekly_frequency: u32,
    #[serde(default)]
    pub completion_count: u32,
}

impl PendingGoal {
    pub fn is_done_for_week(&self) -> bool {
        self.completion_count >= self.desired_weekly_frequency
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PendingGoalsEnvelope {
    #[serde(rename_all = "camelCase")]
    Wrapped { pending_goals: Vec<PendingGoal> },
    Bare(Vec<PendingGoal>),
}

impl PendingGoalsEnvelope {
    pub fn into_inner(self) -> Vec<PendingGoal> {
        match self {
            Self::Wrapped { pending_goals } => pending_goals,
            Self::Bare(goals) => goals,
        }
    }
}

/// Body of the completion endpoints, both upstream and on our own JSON/form routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalIdRequest {
    pub goal_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGoalRequest {
    pub title: String,
    pub desired_weekly_frequency: u32,
}
