use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::Course;

#[derive(Debug, Clone, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateDishRequest {
    pub category: Course,

    #[validate(length(min = 1, max = 255))]
    pub name: String,

    #[validate(length(max = 255))]
    #[serde(default)]
    pub subtitle: String,

    #[serde(default)]
    pub ingredients: String,

    #[serde(default)]
    pub preparation: String,

    #[validate(length(max = 2048))]
    #[serde(default)]
    pub image_url: String,
}

/// Partial update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate, ToSchema)]
pub struct UpdateDishRequest {
    pub category: Option<Course>,

    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[validate(length(max = 255))]
    pub subtitle: Option<String>,

    pub ingredients: Option<String>,

    pub preparation: Option<String>,

    #[validate(length(max = 2048))]
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct DishFilter {
    pub category: Option<Course>,
}

/// Catalog size per course
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DishStats {
    pub voor: i64,
    pub hoofd: i64,
    pub na: i64,
    pub total: i64,
}

impl DishStats {
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (Course, i64)>,
    {
        let mut stats = Self::default();
        for (course, count) in counts {
            match course {
                Course::Voor => stats.voor += count,
                Course::Hoofd => stats.hoofd += count,
                Course::Na => stats.na += count,
            }
            stats.total += count;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_counts() {
        let stats = DishStats::from_counts([(Course::Voor, 4), (Course::Na, 2)]);
        assert_eq!(stats.voor, 4);
        assert_eq!(stats.hoofd, 0);
        assert_eq!(stats.total, 6);
    }

    #[test]
    fn test_create_requires_name() {
        let req: CreateDishRequest =
            serde_json::from_str(r#"{"category":"hoofd","name":""}"#).unwrap();
        assert!(req.validate().is_err());
        assert!(req.subtitle.is_empty());
    }
}
