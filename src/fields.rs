//! Field mapper: the single source of truth for which custom slot carries
//! which semantic attribute.
//!
//! | attribute        | task  | resource |
//! |------------------|-------|----------|
//! | warehouse        | Text1 | Text1    |
//! | manager          | Text2 |          |
//! | category         |       | Text2    |
//! | model            |       | Text3    |
//! | pitch            |       | Number1  |
//! | center_to_center |       | Number2  |
//! | diameter         |       | Number3  |
//! | max              |       | Number4  |
//! | note             |       | Notes    |
//!
//! Everything here is pure: records are read through [`FieldSource`], so the
//! mapping can be exercised on plain maps without a host.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{AccessorError, AccessorResult};
use crate::host::document::RecordFields;
use crate::host::{EntityKind, FieldValue, HostField};
use crate::resource::ResourceCategory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Warehouse,
    Manager,
    Category,
    Model,
    Pitch,
    CenterToCenter,
    Diameter,
    Max,
    Note,
}

impl Attribute {
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Warehouse => "warehouse",
            Attribute::Manager => "manager",
            Attribute::Category => "category",
            Attribute::Model => "model",
            Attribute::Pitch => "pitch",
            Attribute::CenterToCenter => "center_to_center",
            Attribute::Diameter => "diameter",
            Attribute::Max => "max",
            Attribute::Note => "note",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "warehouse" => Some(Attribute::Warehouse),
            "manager" => Some(Attribute::Manager),
            "category" => Some(Attribute::Category),
            "model" => Some(Attribute::Model),
            "pitch" => Some(Attribute::Pitch),
            "center_to_center" | "center-to-center" => Some(Attribute::CenterToCenter),
            "diameter" => Some(Attribute::Diameter),
            "max" => Some(Attribute::Max),
            "note" | "notes" => Some(Attribute::Note),
            _ => None,
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const TASK_SLOTS: &[(Attribute, HostField)] = &[
    (Attribute::Warehouse, HostField::Text1),
    (Attribute::Manager, HostField::Text2),
];

const RESOURCE_SLOTS: &[(Attribute, HostField)] = &[
    (Attribute::Warehouse, HostField::Text1),
    (Attribute::Category, HostField::Text2),
    (Attribute::Model, HostField::Text3),
    (Attribute::Pitch, HostField::Number1),
    (Attribute::CenterToCenter, HostField::Number2),
    (Attribute::Diameter, HostField::Number3),
    (Attribute::Max, HostField::Number4),
    (Attribute::Note, HostField::Notes),
];

/// Attributes declared for an entity, paired with their slot.
pub fn slots(entity: EntityKind) -> &'static [(Attribute, HostField)] {
    match entity {
        EntityKind::Task => TASK_SLOTS,
        EntityKind::Resource => RESOURCE_SLOTS,
    }
}

pub fn slot_for(entity: EntityKind, attribute: Attribute) -> AccessorResult<HostField> {
    slots(entity)
        .iter()
        .find(|(attr, _)| *attr == attribute)
        .map(|(_, slot)| *slot)
        .ok_or_else(|| AccessorError::UnknownAttribute {
            entity,
            attribute: attribute.as_str().to_string(),
        })
}

/// Translates a semantic value into the slot and raw value to write.
///
/// `Empty` is accepted for every attribute and clears the slot. Category text
/// must name one of the [`ResourceCategory`] variants.
pub fn encode(
    entity: EntityKind,
    attribute: Attribute,
    value: FieldValue,
) -> AccessorResult<(HostField, FieldValue)> {
    let slot = slot_for(entity, attribute)?;
    match &value {
        FieldValue::Empty => {}
        FieldValue::Number(n) if slot.is_numeric() => {
            if !n.is_finite() {
                return Err(AccessorError::InvalidValue {
                    attribute,
                    reason: format!("{n} is not a finite number"),
                });
            }
        }
        FieldValue::Text(text) if !slot.is_numeric() => {
            if attribute == Attribute::Category {
                text.parse::<ResourceCategory>()?;
            }
        }
        other => {
            return Err(AccessorError::InvalidValue {
                attribute,
                reason: format!("{other:?} does not fit slot {slot}"),
            });
        }
    }
    Ok((slot, value))
}

/// Same as [`encode`] with the attribute given by name.
pub fn encode_named(
    entity: EntityKind,
    name: &str,
    value: FieldValue,
) -> AccessorResult<(HostField, FieldValue)> {
    let attribute = Attribute::from_name(name).ok_or_else(|| AccessorError::UnknownAttribute {
        entity,
        attribute: name.to_string(),
    })?;
    encode(entity, attribute, value)
}

/// Anything that can hand out raw slot values.
pub trait FieldSource {
    fn slot_value(&self, field: HostField) -> FieldValue;
}

impl FieldSource for RecordFields {
    fn slot_value(&self, field: HostField) -> FieldValue {
        self.get(&field).cloned().unwrap_or_default()
    }
}

pub type DecodedFields = BTreeMap<Attribute, FieldValue>;

/// Reads every declared slot of `entity` off `record`. Unset slots and empty
/// text are left out of the result; whitespace and a stored zero are kept.
pub fn decode(entity: EntityKind, record: &impl FieldSource) -> DecodedFields {
    let mut out = DecodedFields::new();
    for (attribute, slot) in slots(entity) {
        let value = match record.slot_value(*slot) {
            FieldValue::Text(text) if text.is_empty() => continue,
            FieldValue::Text(text) if !slot.is_numeric() => FieldValue::Text(text),
            FieldValue::Number(n) if slot.is_numeric() => FieldValue::Number(n),
            _ => continue,
        };
        out.insert(*attribute, value);
    }
    out
}

pub(crate) fn decoded_text(fields: &DecodedFields, attribute: Attribute) -> Option<String> {
    fields
        .get(&attribute)
        .and_then(FieldValue::as_text)
        .map(ToOwned::to_owned)
}

pub(crate) fn decoded_number(fields: &DecodedFields, attribute: Attribute) -> Option<f64> {
    fields.get(&attribute).and_then(FieldValue::as_number)
}
