use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::AccessorError;
use crate::fields::{self, Attribute, DecodedFields};
use crate::host::RecordId;

/// Tooling family stored in the resource category slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceCategory {
    /// Probe.
    Tastatore,
    /// Spindle.
    Mandrino,
    /// Mask (carries pitch and center-to-center distance).
    Maschera,
    /// Head.
    Testa,
    /// Generator.
    Generatore,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 5] = [
        ResourceCategory::Tastatore,
        ResourceCategory::Mandrino,
        ResourceCategory::Maschera,
        ResourceCategory::Testa,
        ResourceCategory::Generatore,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::Tastatore => "Tastatore",
            ResourceCategory::Mandrino => "Mandrino",
            ResourceCategory::Maschera => "Maschera",
            ResourceCategory::Testa => "Testa",
            ResourceCategory::Generatore => "Generatore",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceCategory {
    type Err = AccessorError;

    /// Exact, case-sensitive match against the stored spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| AccessorError::InvalidCategory(s.to_string()))
    }
}

/// Read view over a host resource record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceView {
    pub id: RecordId,
    pub name: String,
    /// `None` when the slot is empty or holds text outside the category set.
    pub category: Option<ResourceCategory>,
    pub warehouse: Option<String>,
    pub model: Option<String>,
    pub pitch: Option<f64>,
    pub center_to_center: Option<f64>,
    pub diameter: Option<f64>,
    pub max: Option<f64>,
    pub notes: Option<String>,
}

impl ResourceView {
    pub(crate) fn from_fields(id: RecordId, name: String, decoded: &DecodedFields) -> Self {
        let category = fields::decoded_text(decoded, Attribute::Category).and_then(|text| {
            match text.parse::<ResourceCategory>() {
                Ok(category) => Some(category),
                Err(_) => {
                    tracing::warn!(
                        resource = id,
                        category = %text,
                        "resource has an unrecognized category"
                    );
                    None
                }
            }
        });
        Self {
            id,
            name,
            category,
            warehouse: fields::decoded_text(decoded, Attribute::Warehouse),
            model: fields::decoded_text(decoded, Attribute::Model),
            pitch: fields::decoded_number(decoded, Attribute::Pitch),
            center_to_center: fields::decoded_number(decoded, Attribute::CenterToCenter),
            diameter: fields::decoded_number(decoded, Attribute::Diameter),
            max: fields::decoded_number(decoded, Attribute::Max),
            notes: fields::decoded_text(decoded, Attribute::Note),
        }
    }
}

/// Input for appending a resource. `category` is checked against
/// [`ResourceCategory`] when the resource is created; whether the numeric
/// fields make sense for that category is left to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewResource {
    pub name: String,
    pub category: String,
    pub warehouse: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_to_center: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewResource {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        warehouse: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            warehouse: warehouse.into(),
            diameter: None,
            pitch: None,
            center_to_center: None,
            model: None,
            max: None,
            note: None,
        }
    }

    pub fn with_diameter(mut self, diameter: f64) -> Self {
        self.diameter = Some(diameter);
        self
    }

    pub fn with_pitch(mut self, pitch: f64) -> Self {
        self.pitch = Some(pitch);
        self
    }

    pub fn with_center_to_center(mut self, distance: f64) -> Self {
        self.center_to_center = Some(distance);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parsing_is_exact() {
        assert_eq!("Maschera".parse::<ResourceCategory>().unwrap(), ResourceCategory::Maschera);
        assert!(matches!(
            "maschera".parse::<ResourceCategory>(),
            Err(AccessorError::InvalidCategory(text)) if text == "maschera"
        ));
        assert!("Invalid".parse::<ResourceCategory>().is_err());
    }
}
