use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AccessorError, AccessorResult};
use crate::resource::{ResourceCategory, ResourceView};

/// Conjunctive resource filter. Every `None` field imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceQuery {
    #[serde(default)]
    pub category: Option<ResourceCategory>,
    #[serde(default)]
    pub warehouse: Option<String>,
    /// Inclusive lower diameter bound.
    #[serde(default)]
    pub min_diameter: Option<f64>,
    /// Inclusive upper diameter bound.
    #[serde(default)]
    pub max_diameter: Option<f64>,
    #[serde(default)]
    pub pitch: Option<f64>,
    #[serde(default)]
    pub center_to_center: Option<f64>,
    #[serde(default)]
    pub model: Option<String>,
    /// Availability window; must be given together with `end`.
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
}

impl ResourceQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn category(mut self, category: ResourceCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn warehouse(mut self, warehouse: impl Into<String>) -> Self {
        self.warehouse = Some(warehouse.into());
        self
    }

    pub fn diameter_between(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_diameter = min;
        self.max_diameter = max;
        self
    }

    pub fn pitch(mut self, pitch: f64) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn center_to_center(mut self, distance: f64) -> Self {
        self.center_to_center = Some(distance);
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn available_between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// The availability window, if one was requested.
    pub fn window(&self) -> AccessorResult<Option<(NaiveDate, NaiveDate)>> {
        match (self.start, self.end) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(AccessorError::MissingPair {
                given: "start",
                missing: "end",
            }),
            (None, Some(_)) => Err(AccessorError::MissingPair {
                given: "end",
                missing: "start",
            }),
            (Some(start), Some(end)) => {
                if end < start {
                    return Err(AccessorError::InvalidDateRange { start, end });
                }
                Ok(Some((start, end)))
            }
        }
    }

    /// Evaluates every predicate except the availability window.
    pub fn matches(&self, resource: &ResourceView) -> bool {
        if let Some(category) = self.category {
            if resource.category != Some(category) {
                return false;
            }
        }
        if !text_matches(self.warehouse.as_deref(), resource.warehouse.as_deref()) {
            return false;
        }
        if !text_matches(self.model.as_deref(), resource.model.as_deref()) {
            return false;
        }
        if self.min_diameter.is_some() || self.max_diameter.is_some() {
            let Some(diameter) = resource.diameter else {
                return false;
            };
            if self.min_diameter.is_some_and(|min| diameter < min)
                || self.max_diameter.is_some_and(|max| diameter > max)
            {
                return false;
            }
        }
        number_matches(self.pitch, resource.pitch)
            && number_matches(self.center_to_center, resource.center_to_center)
    }
}

fn text_matches(wanted: Option<&str>, actual: Option<&str>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual == Some(wanted),
    }
}

fn number_matches(wanted: Option<f64>, actual: Option<f64>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => actual == Some(wanted),
    }
}

/// Closed-interval overlap: intervals that only touch still overlap.
pub fn intervals_overlap(
    start: NaiveDate,
    end: NaiveDate,
    other_start: NaiveDate,
    other_end: NaiveDate,
) -> bool {
    start <= other_end && end >= other_start
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn view(diameter: Option<f64>) -> ResourceView {
        ResourceView {
            id: 1,
            name: "R".into(),
            category: Some(ResourceCategory::Tastatore),
            warehouse: Some("WH1".into()),
            model: None,
            pitch: None,
            center_to_center: None,
            diameter,
            max: None,
            notes: None,
        }
    }

    #[test]
    fn touching_intervals_overlap() {
        assert!(intervals_overlap(d(2025, 1, 1), d(2025, 1, 10), d(2025, 1, 10), d(2025, 1, 20)));
        assert!(intervals_overlap(d(2025, 1, 10), d(2025, 1, 20), d(2025, 1, 1), d(2025, 1, 10)));
        assert!(!intervals_overlap(d(2025, 1, 1), d(2025, 1, 9), d(2025, 1, 10), d(2025, 1, 20)));
    }

    #[test]
    fn window_requires_both_ends() {
        let err = ResourceQuery::new().window();
        assert!(matches!(err, Ok(None)));
        let mut q = ResourceQuery::new();
        q.end = Some(d(2025, 1, 1));
        assert!(matches!(
            q.window(),
            Err(AccessorError::MissingPair { given: "end", missing: "start" })
        ));
        let q = ResourceQuery::new().available_between(d(2025, 2, 1), d(2025, 1, 1));
        assert!(matches!(q.window(), Err(AccessorError::InvalidDateRange { .. })));
    }

    #[test]
    fn diameter_bounds_are_inclusive_and_exclude_unset() {
        let q = ResourceQuery::new().diameter_between(Some(10.0), Some(20.0));
        assert!(q.matches(&view(Some(10.0))));
        assert!(q.matches(&view(Some(20.0))));
        assert!(!q.matches(&view(Some(20.5))));
        assert!(!q.matches(&view(None)));
        assert!(ResourceQuery::new().matches(&view(None)));
    }

    #[test]
    fn string_predicates_are_case_sensitive() {
        assert!(ResourceQuery::new().warehouse("WH1").matches(&view(None)));
        assert!(!ResourceQuery::new().warehouse("wh1").matches(&view(None)));
        assert!(!ResourceQuery::new().model("M1").matches(&view(None)));
    }
}
