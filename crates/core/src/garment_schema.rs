//! Garment type schema.
//!
//! Maps a garment type code to the measurement fields an operator must fill
//! in for that kind of garment. The codes are legacy identifiers that were
//! historically written as bitwise-OR combinations of category flags; they
//! are looked up as opaque keys in [`GARMENT_TYPE_FIELDS`], never decomposed
//! bit by bit.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Measurement fields
// ---------------------------------------------------------------------------

/// A measurement input on the garment entry sub-form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementField {
    Bust,
    Waist,
    Hip,
    Arm,
    Length,
    Foot,
}

/// Every measurement field, in form order.
pub const ALL_MEASUREMENT_FIELDS: [MeasurementField; 6] = [
    MeasurementField::Bust,
    MeasurementField::Waist,
    MeasurementField::Hip,
    MeasurementField::Arm,
    MeasurementField::Length,
    MeasurementField::Foot,
];

impl MeasurementField {
    /// Short name, e.g. `"bust"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bust => "bust",
            Self::Waist => "waist",
            Self::Hip => "hip",
            Self::Arm => "arm",
            Self::Length => "length",
            Self::Foot => "foot",
        }
    }

    /// Parse a short field name.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        ALL_MEASUREMENT_FIELDS
            .into_iter()
            .find(|field| field.as_str() == name)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Unknown measurement field '{name}'. Must be one of: bust, waist, hip, arm, length, foot"
                ))
            })
    }

    /// Key used for this field in a serialized garment entry (`cloth_bust`, ...).
    pub fn wire_key(self) -> &'static str {
        match self {
            Self::Bust => "cloth_bust",
            Self::Waist => "cloth_waist",
            Self::Hip => "cloth_hip",
            Self::Arm => "cloth_arm",
            Self::Length => "cloth_length",
            Self::Foot => "cloth_foot",
        }
    }
}

// ---------------------------------------------------------------------------
// Type code table
// ---------------------------------------------------------------------------

use MeasurementField::{Arm, Bust, Foot, Hip, Length, Waist};

/// Garment type code as transmitted to the intake service.
pub type GarmentTypeCode = u32;

/// Explicit `(code, fields)` table. Codes missing from the table enable no
/// measurement fields.
pub const GARMENT_TYPE_FIELDS: &[(GarmentTypeCode, &[MeasurementField])] = &[
    (0x0001 | 0x0002, &[Bust, Arm, Waist, Length]),
    (0x0001 | 0x0020, &[Bust, Arm, Waist, Hip, Length]),
    (0x0001, &[Bust, Arm]),
    (0x0004, &[Bust, Arm]),
    (0x0080, &[Bust, Arm]),
    (0x0400, &[Bust, Arm]),
    (0x0002, &[Waist, Length]),
    (0x0200, &[Waist, Hip, Length]),
    (0x0008, &[Foot]),
    (0x0040, &[Waist]),
    (0x0010, &[]),
    (0x0020, &[]),
    (0x0100, &[]),
];

/// Measurement fields relevant to a garment type, in display order.
///
/// Total over all codes: anything not in [`GARMENT_TYPE_FIELDS`] yields an
/// empty slice.
pub fn fields_for(code: GarmentTypeCode) -> &'static [MeasurementField] {
    GARMENT_TYPE_FIELDS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, fields)| *fields)
        .unwrap_or(&[])
}

/// Whether the code appears in the schema table.
pub fn is_known_type(code: GarmentTypeCode) -> bool {
    GARMENT_TYPE_FIELDS.iter().any(|(known, _)| *known == code)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn combined_codes_map_to_their_own_field_sets() {
        assert_eq!(fields_for(0x0003), &[Bust, Arm, Waist, Length]);
        assert_eq!(fields_for(0x0021), &[Bust, Arm, Waist, Hip, Length]);
    }

    #[test]
    fn upper_body_codes_share_bust_and_arm() {
        for code in [0x0001, 0x0004, 0x0080, 0x0400] {
            assert_eq!(fields_for(code), &[Bust, Arm], "code {code:#06x}");
        }
    }

    #[test]
    fn single_field_groups() {
        assert_eq!(fields_for(0x0002), &[Waist, Length]);
        assert_eq!(fields_for(0x0200), &[Waist, Hip, Length]);
        assert_eq!(fields_for(0x0008), &[Foot]);
        assert_eq!(fields_for(0x0040), &[Waist]);
    }

    #[test]
    fn listed_codes_without_measurements_are_empty() {
        for code in [0x0010, 0x0020, 0x0100] {
            assert!(is_known_type(code));
            assert!(fields_for(code).is_empty());
        }
    }

    #[test]
    fn unknown_codes_are_empty() {
        for code in [0, 0x0005, 0x0022, 0x0800, 0x0003 | 0x0200, u32::MAX] {
            assert!(!is_known_type(code));
            assert!(fields_for(code).is_empty(), "code {code:#06x}");
        }
    }

    #[test]
    fn combination_is_not_the_union_of_its_bits() {
        // 0x0020 alone enables nothing, yet 0x0001 | 0x0020 adds waist, hip and length.
        let union: HashSet<_> = fields_for(0x0001)
            .iter()
            .chain(fields_for(0x0020))
            .copied()
            .collect();
        let combined: HashSet<_> = fields_for(0x0021).iter().copied().collect();
        assert_ne!(union, combined);
    }

    #[test]
    fn table_has_no_duplicate_codes() {
        let codes: HashSet<_> = GARMENT_TYPE_FIELDS.iter().map(|(code, _)| *code).collect();
        assert_eq!(codes.len(), GARMENT_TYPE_FIELDS.len());
    }

    #[test]
    fn field_names_parse_back() {
        for field in ALL_MEASUREMENT_FIELDS {
            assert_eq!(MeasurementField::parse(field.as_str()).unwrap(), field);
        }
        assert!(MeasurementField::parse("shoulder").is_err());
    }
}
