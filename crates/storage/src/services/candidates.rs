use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Course, Dish, UserMenuWithDishes};

/// Distinct dishes eligible for voting, per course
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CandidateSet {
    pub voor: Vec<Dish>,
    pub hoofd: Vec<Dish>,
    pub na: Vec<Dish>,
}

impl CandidateSet {
    pub fn get(&self, course: Course) -> &[Dish] {
        match course {
            Course::Voor => &self.voor,
            Course::Hoofd => &self.hoofd,
            Course::Na => &self.na,
        }
    }

    fn get_mut(&mut self, course: Course) -> &mut Vec<Dish> {
        match course {
            Course::Voor => &mut self.voor,
            Course::Hoofd => &mut self.hoofd,
            Course::Na => &mut self.na,
        }
    }

    /// True once at least one course has candidates
    pub fn is_loaded(&self) -> bool {
        Course::ALL.iter().any(|c| !self.get(*c).is_empty())
    }

    pub fn find(&self, course: Course, dish_id: Uuid) -> Option<&Dish> {
        self.get(course).iter().find(|d| d.id == dish_id)
    }
}

/// Collect the candidates of every course from the submitted menus.
///
/// Dishes are deduplicated by id. The position of a dish is the one of its
/// first occurrence while its value is the last one seen.
pub fn extract_candidates(menus: &[UserMenuWithDishes]) -> CandidateSet {
    let mut set = CandidateSet::default();

    for course in Course::ALL {
        let mut positions: HashMap<Uuid, usize> = HashMap::new();
        let target = set.get_mut(course);

        for dish in menus.iter().filter_map(|m| m.slot(course)) {
            match positions.get(&dish.id) {
                Some(&idx) => {
                    if let Some(existing) = target.get_mut(idx) {
                        *existing = dish.clone();
                    }
                }
                None => {
                    positions.insert(dish.id, target.len());
                    target.push(dish.clone());
                }
            }
        }
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{dish, menu};

    #[test]
    fn test_extracts_distinct_dishes_per_course() {
        let s1 = dish(Course::Voor, 1, "Soep");
        let s2 = dish(Course::Voor, 2, "Carpaccio");
        let m1 = dish(Course::Hoofd, 10, "Stoofvlees");
        let d1 = dish(Course::Na, 20, "Tiramisu");

        let menus = vec![
            menu("anna", &s1, &m1, &d1),
            menu("bram", &s2, &m1, &d1),
            menu("cees", &s1, &m1, &d1),
        ];

        let set = extract_candidates(&menus);

        assert_eq!(set.voor, vec![s1, s2]);
        assert_eq!(set.hoofd, vec![m1]);
        assert_eq!(set.na, vec![d1]);
    }

    #[test]
    fn test_last_seen_value_keeps_first_position() {
        let first = dish(Course::Voor, 1, "Old name");
        let other = dish(Course::Voor, 2, "Other");
        let mut renamed = first.clone();
        renamed.name = "New name".to_string();
        let m = dish(Course::Hoofd, 10, "Main");
        let d = dish(Course::Na, 20, "Dessert");

        let menus = vec![
            menu("anna", &first, &m, &d),
            menu("bram", &other, &m, &d),
            menu("cees", &renamed, &m, &d),
        ];

        let set = extract_candidates(&menus);
        assert_eq!(set.voor.len(), 2);
        assert_eq!(set.voor[0].name, "New name");
        assert_eq!(set.voor[1].id, other.id);
    }

    #[test]
    fn test_missing_slots_and_no_menus() {
        let empty = extract_candidates(&[]);
        assert!(!empty.is_loaded());

        let s = dish(Course::Voor, 1, "Soep");
        let m = dish(Course::Hoofd, 10, "Main");
        let d = dish(Course::Na, 20, "Dessert");
        let mut partial = menu("anna", &s, &m, &d);
        partial.main = None;

        let set = extract_candidates(&[partial]);
        assert!(set.is_loaded());
        assert!(set.hoofd.is_empty());
        assert_eq!(set.find(Course::Na, d.id), Some(&d));
    }
}
