// 🅿️ Parking Entry - one registration record
//
// Entries are values: created after validation, added to the registry,
// removed by license plate. Nothing mutates an entry in place.

use serde::{Deserialize, Serialize};

/// A registered vehicle occupying a slot.
///
/// Field names follow the persisted layout (`licensePlate`, `entryDate`,
/// `slotNumber`) and every field is text, the slot number included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub owner: String,
    pub vehicle: String,
    pub license_plate: String,
    pub entry_date: String,
    pub slot_number: String,
}

impl Entry {
    pub fn new(
        owner: impl Into<String>,
        vehicle: impl Into<String>,
        license_plate: impl Into<String>,
        entry_date: impl Into<String>,
        slot_number: impl Into<String>,
    ) -> Self {
        Entry {
            owner: owner.into(),
            vehicle: vehicle.into(),
            license_plate: license_plate.into(),
            entry_date: entry_date.into(),
            slot_number: slot_number.into(),
        }
    }

    /// Numeric value of the slot number, read the way a lenient integer
    /// parser would: leading whitespace skipped, leading digits taken,
    /// anything after them ignored. `None` when there are no leading digits.
    pub fn slot_value(&self) -> Option<u64> {
        leading_integer(&self.slot_number)
    }

    /// Field values in table order
    pub fn fields(&self) -> [&str; 5] {
        [
            &self.owner,
            &self.vehicle,
            &self.license_plate,
            &self.entry_date,
            &self.slot_number,
        ]
    }
}

/// Raw form input before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EntryForm {
    pub owner: String,
    pub vehicle: String,
    pub license_plate: String,
    pub entry_date: String,
    pub slot_number: String,
}

impl EntryForm {
    pub fn fields(&self) -> [(&'static str, &str); 5] {
        [
            ("owner", &self.owner),
            ("vehicle", &self.vehicle),
            ("licensePlate", &self.license_plate),
            ("entryDate", &self.entry_date),
            ("slotNumber", &self.slot_number),
        ]
    }
}

impl From<Entry> for EntryForm {
    fn from(entry: Entry) -> Self {
        EntryForm {
            owner: entry.owner,
            vehicle: entry.vehicle,
            license_plate: entry.license_plate,
            entry_date: entry.entry_date,
            slot_number: entry.slot_number,
        }
    }
}

pub(crate) fn leading_integer(text: &str) -> Option<u64> {
    let digits: String = text
        .trim_start()
        .trim_start_matches('+')
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        None
    } else {
        digits.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_field_names() {
        let entry = Entry::new("Jane", "Civic", "ABC-1234", "2024-01-01", "1");
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["owner"], "Jane");
        assert_eq!(json["licensePlate"], "ABC-1234");
        assert_eq!(json["entryDate"], "2024-01-01");
        assert_eq!(json["slotNumber"], "1", "Slot number is stored as text");
    }

    #[test]
    fn test_slot_value_lenient_parse() {
        let mut entry = Entry::new("Jane", "Civic", "ABC-1234", "2024-01-01", "5");
        assert_eq!(entry.slot_value(), Some(5));

        entry.slot_number = " 12b".to_string();
        assert_eq!(entry.slot_value(), Some(12));

        entry.slot_number = "007".to_string();
        assert_eq!(entry.slot_value(), Some(7));

        entry.slot_number = "A1".to_string();
        assert_eq!(entry.slot_value(), None);
    }

    #[test]
    fn test_form_deserializes_with_missing_fields() {
        let form: EntryForm = serde_json::from_str(r#"{"owner":"Jane"}"#).unwrap();
        assert_eq!(form.owner, "Jane");
        assert!(form.license_plate.is_empty());
    }
}
