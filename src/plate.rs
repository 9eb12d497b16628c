// 🚗 License Plate Formats
// Two accepted shapes: AAA-1234 (private vehicles) and AA-12345 (private motorcycles)

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static VEHICLE_PLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}-[0-9]{4}$").expect("static plate pattern"));

static MOTORCYCLE_PLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}-[0-9]{5}$").expect("static plate pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlateKind {
    /// Three letters, hyphen, four digits
    PrivateVehicle,

    /// Two letters, hyphen, five digits
    PrivateMotorcycle,
}

impl PlateKind {
    /// Detect which format a plate follows. The whole string must match.
    pub fn detect(plate: &str) -> Option<PlateKind> {
        if VEHICLE_PLATE.is_match(plate) {
            Some(PlateKind::PrivateVehicle)
        } else if MOTORCYCLE_PLATE.is_match(plate) {
            Some(PlateKind::PrivateMotorcycle)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PlateKind::PrivateVehicle => "Private Vehicle",
            PlateKind::PrivateMotorcycle => "Private Motorcycle",
        }
    }

    pub fn example(&self) -> &'static str {
        match self {
            PlateKind::PrivateVehicle => "AAA-1234",
            PlateKind::PrivateMotorcycle => "AA-12345",
        }
    }
}

pub fn is_valid_license_plate(plate: &str) -> bool {
    PlateKind::detect(plate).is_some()
}
