use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::vacancy::{Vacancy, VacancyStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VacancySummary {
    pub id: Uuid,
    pub title: String,
    pub status: VacancyStatus,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub area: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub department: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListVacanciesResponse {
    pub items: Vec<VacancySummary>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl From<Vacancy> for VacancySummary {
    fn from(value: Vacancy) -> Self {
        Self {
            id: value.id,
            title: value.title,
            status: value.status,
            area: value.area,
            department: value.department,
            created: value.created,
            updated: value.updated,
        }
    }
}

impl From<Vec<Vacancy>> for ListVacanciesResponse {
    fn from(value: Vec<Vacancy>) -> Self {
        let items: Vec<VacancySummary> = value.into_iter().map(Into::into).collect();
        let token = items.last().map(|item| item.id.to_string());
        Self { items, token }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_is_last_item_id() {
        let first = Vacancy {
            id: Uuid::new_v4(),
            ..Default::default()
        };
        let last = Vacancy {
            id: Uuid::new_v4(),
            ..Default::default()
        };
        let response = ListVacanciesResponse::from(vec![first, last.clone()]);
        assert_eq!(response.items.len(), 2);
        assert_eq!(response.token, Some(last.id.to_string()));
    }

    #[test]
    fn empty_list_omits_token() {
        let response = ListVacanciesResponse::from(Vec::new());
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value, serde_json::json!({ "items": [] }));
    }
}
