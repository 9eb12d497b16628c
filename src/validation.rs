// 📐 Form Validation
// Field presence, plate format and slot format, checked before the registry is touched

use crate::entry::{leading_integer, Entry, EntryForm};
use crate::plate::is_valid_license_plate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("All fields must be filled!")]
    MissingField { field: &'static str },

    #[error("License Plate must be AAA-1234 for Private Vehicles and AA-12345 for Private Motorcycles")]
    InvalidLicensePlate { plate: String },

    #[error("Slot number must be a positive whole number")]
    InvalidSlotNumber { slot: String },
}

/// Validate raw form input and build an [`Entry`] from it.
///
/// Checks run in order: presence of every field, plate format, slot format.
/// Values are trimmed before checking and stored trimmed.
pub fn validate_form(form: &EntryForm) -> Result<Entry, FormError> {
    for (field, value) in form.fields() {
        if value.trim().is_empty() {
            return Err(FormError::MissingField { field });
        }
    }

    let plate = form.license_plate.trim();
    if !is_valid_license_plate(plate) {
        return Err(FormError::InvalidLicensePlate {
            plate: plate.to_string(),
        });
    }

    let slot = form.slot_number.trim();
    if !is_positive_integer(slot) {
        return Err(FormError::InvalidSlotNumber {
            slot: slot.to_string(),
        });
    }

    Ok(Entry::new(
        form.owner.trim(),
        form.vehicle.trim(),
        plate,
        form.entry_date.trim(),
        slot,
    ))
}

fn is_positive_integer(text: &str) -> bool {
    text.chars().all(|c| c.is_ascii_digit()) && matches!(leading_integer(text), Some(n) if n >= 1)
}
