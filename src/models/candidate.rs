use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::Error;
use crate::models::vacancy::null_as_empty;

macro_rules! text_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $text:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        pub enum $name {
            #[default]
            None,
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $name::None => "none",
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    "" | "none" => Ok($name::None),
                    $($text => Ok($name::$variant),)+
                    other => Err(Error::InvalidEnum {
                        kind: $kind,
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

text_enum!(Gender, "gender", {
    Male => "male",
    Female => "female",
});

text_enum!(EducationLevel, "education level", {
    Secondary => "secondary",
    SpecialSecondary => "specialSecondary",
    UnfinishedHigher => "unfinishedHigher",
    Higher => "higher",
    Bachelor => "bachelor",
    Master => "master",
    Candidate => "candidate",
    Doctor => "doctor",
});

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub title: String,
    pub year: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Experience {
    pub title: String,
    pub description: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub specialization: String,
    pub gender: Gender,
    pub birth_date: Option<DateTime<Utc>>,
    pub area: String,
    pub salary: u32,
    pub education_level: EducationLevel,
    #[serde(deserialize_with = "null_as_empty")]
    pub education: Vec<Education>,
    #[serde(deserialize_with = "null_as_empty")]
    pub experience: Vec<Experience>,
    #[serde(deserialize_with = "null_as_empty")]
    pub languages: Vec<String>,
    #[serde(deserialize_with = "null_as_empty")]
    pub skills: Vec<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn gender_from_str() {
        assert_eq!("".parse::<Gender>().unwrap(), Gender::None);
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!("female".parse::<Gender>().unwrap(), Gender::Female);
        assert!(matches!(
            "other".parse::<Gender>(),
            Err(Error::InvalidEnum { kind: "gender", .. })
        ));
    }

    #[test]
    fn education_level_uses_camel_case_labels() {
        assert_eq!(
            "unfinishedHigher".parse::<EducationLevel>().unwrap(),
            EducationLevel::UnfinishedHigher
        );
        assert_eq!(EducationLevel::SpecialSecondary.as_str(), "specialSecondary");
        assert!("unfinished_higher".parse::<EducationLevel>().is_err());
    }

    #[test]
    fn candidate_wire_names() {
        let candidate: Candidate = serde_json::from_value(json!({
            "name": "Alice",
            "gender": "female",
            "educationLevel": "master",
            "birthDate": "1990-04-01T00:00:00Z",
            "education": [{ "title": "MSU", "year": 2012 }],
            "experience": [{
                "title": "Yandex",
                "start": "2012-09-01T00:00:00Z",
                "end": null,
            }],
            "languages": null,
        }))
        .unwrap();

        assert_eq!(candidate.gender, Gender::Female);
        assert_eq!(candidate.education_level, EducationLevel::Master);
        let birth = Utc.with_ymd_and_hms(1990, 4, 1, 0, 0, 0).unwrap();
        assert_eq!(candidate.birth_date, Some(birth));
        assert_eq!(
            candidate.experience[0].start,
            Some(Utc.with_ymd_and_hms(2012, 9, 1, 0, 0, 0).unwrap())
        );
        assert_eq!(candidate.experience[0].end, None);
        assert!(candidate.languages.is_empty());

        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(value["educationLevel"], "master");
        assert_eq!(value["education"][0]["year"], 2012);
        assert_eq!(value["birthDate"], "1990-04-01T00:00:00Z");
    }
}
