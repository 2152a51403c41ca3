use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum VacancyStatus {
    #[default]
    None,
    Draft,
    Active,
    Inactive,
}

impl VacancyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            VacancyStatus::None => "none",
            VacancyStatus::Draft => "draft",
            VacancyStatus::Active => "active",
            VacancyStatus::Inactive => "inactive",
        }
    }
}

impl fmt::Display for VacancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VacancyStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(VacancyStatus::None),
            "draft" => Ok(VacancyStatus::Draft),
            "active" => Ok(VacancyStatus::Active),
            "inactive" => Ok(VacancyStatus::Inactive),
            other => Err(Error::InvalidEnum {
                kind: "vacancy status",
                value: other.to_string(),
            }),
        }
    }
}

impl Serialize for VacancyStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for VacancyStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Skill {
    pub title: String,
    #[serde(default)]
    pub important: bool,
}

impl Skill {
    pub fn new(title: impl Into<String>, important: bool) -> Self {
        Self {
            title: title.into(),
            important,
        }
    }
}

/// Reads a JSON array, treating `null` as an empty list.
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// A vacancy header together with the skill list it owns.
///
/// The skill list is written as a unit and read back without a guaranteed
/// order: callers should compare it as a set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vacancy {
    pub id: Uuid,
    #[serde(rename = "templateID")]
    pub template_id: Uuid,
    pub title: String,
    pub status: VacancyStatus,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub area: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub department: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub skills: Vec<Skill>,
    #[serde(deserialize_with = "null_as_empty")]
    pub duties: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub requirements: Vec<String>,
    pub experience: u32,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}
