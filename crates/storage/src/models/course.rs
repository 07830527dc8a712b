use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One of the three fixed meal stages
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    sqlx::Type,
    ToSchema,
)]
#[sqlx(type_name = "course", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Course {
    Voor,
    Hoofd,
    Na,
}

impl Course {
    pub const ALL: [Course; 3] = [Course::Voor, Course::Hoofd, Course::Na];

    /// Tag used in duel identifiers and the `course` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Voor => "voor",
            Self::Hoofd => "hoofd",
            Self::Na => "na",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Voor => "Voorgerecht",
            Self::Hoofd => "Hoofdgerecht",
            Self::Na => "Nagerecht",
        }
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Course {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "voor" => Ok(Self::Voor),
            "hoofd" => Ok(Self::Hoofd),
            "na" => Ok(Self::Na),
            other => Err(format!(
                "unknown course '{}', expected one of voor, hoofd, na",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_tag() {
        for course in Course::ALL {
            assert_eq!(course.as_str().parse::<Course>().unwrap(), course);
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        assert!("starter".parse::<Course>().is_err());
    }

    #[test]
    fn test_serde_uses_lowercase_tag() {
        let json = serde_json::to_string(&Course::Hoofd).unwrap();
        assert_eq!(json, "\"hoofd\"");
    }
}
