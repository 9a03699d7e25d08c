//! Address validation shared by the single-address endpoint and every batch row.
//!
//! Rules:
//! - `Alamat` (street) is required and must be at least 3 characters long
//! - `Daerah` (district) is optional, empty string permitted
//! - `Negeri` (region) is required and must be at least 3 characters long
//!
//! Fields are checked in that order and the first violation is reported.
use crate::models::{AddressInput, AddressRecord};
use serde::{Serialize, Serializer};
use std::fmt;

pub const MIN_STREET_LENGTH: usize = 3;
pub const MIN_REGION_LENGTH: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    Street,
    Region,
}

impl AddressField {
    /// Column name used in the batch CSV and in validation messages.
    pub fn name(&self) -> &'static str {
        match self {
            AddressField::Street => "Alamat",
            AddressField::Region => "Negeri",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationReason {
    /// Absent or empty.
    Missing,
    TooShort { min: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: AddressField,
    pub reason: ValidationReason,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reason {
            ValidationReason::Missing => write!(f, "\"{}\" is required", self.field.name()),
            ValidationReason::TooShort { min } => write!(
                f,
                "\"{}\" length must be at least {} characters long",
                self.field.name(),
                min
            ),
        }
    }
}

/// A validation failure tied to a 1-based data row of the batch input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowError {
    pub row: usize,
    #[serde(rename = "message", serialize_with = "serialize_display")]
    pub error: ValidationError,
}

fn serialize_display<S: Serializer>(error: &ValidationError, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(error)
}

fn required(
    value: Option<&str>,
    field: AddressField,
    min: usize,
) -> Result<String, ValidationError> {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => {
            return Err(ValidationError {
                field,
                reason: ValidationReason::Missing,
            })
        }
    };

    if value.chars().count() < min {
        return Err(ValidationError {
            field,
            reason: ValidationReason::TooShort { min },
        });
    }

    Ok(value.to_string())
}

/// Validate a candidate address, returning the normalized record.
///
/// Pure: no I/O, no logging.
pub fn validate_address(input: &AddressInput) -> Result<AddressRecord, ValidationError> {
    let street = required(
        input.street.as_deref(),
        AddressField::Street,
        MIN_STREET_LENGTH,
    )?;
    let district = input.district.clone().unwrap_or_default();
    let region = required(
        input.region.as_deref(),
        AddressField::Region,
        MIN_REGION_LENGTH,
    )?;

    Ok(AddressRecord {
        street,
        district,
        region,
    })
}

/// Validate every row, collecting all failures instead of stopping at the first one.
pub fn validate_rows(rows: &[AddressInput]) -> Result<Vec<AddressRecord>, Vec<RowError>> {
    let mut records = Vec::with_capacity(rows.len());
    let mut errors = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        match validate_address(row) {
            Ok(record) => records.push(record),
            Err(error) => errors.push(RowError {
                row: idx + 1,
                error,
            }),
        }
    }

    if errors.is_empty() {
        Ok(records)
    } else {
        Err(errors)
    }
}
