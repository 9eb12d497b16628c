// 🧩 Presentation Adapter
//
// Typed event handlers that front ends call instead of touching the registry
// directly: submit a form, click delete on a row, type into the search box.
// Each handler returns plain data (alerts and rows) for the caller to render.

use crate::entry::{Entry, EntryForm};
use crate::registry::Registry;
use crate::store::KeyValueStore;
use crate::validation::{validate_form, FormError};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

/// How long a front end keeps an alert on screen
pub const ALERT_TTL: Duration = Duration::from_secs(3);

pub const MSG_ADDED: &str = "Vehicle successfully added to the parking lot";
pub const MSG_REMOVED: &str = "Vehicle successfully removed from the parking lot list";

// ============================================================================
// ALERTS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Danger,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    pub fn success(message: impl Into<String>) -> Self {
        Alert {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Alert {
            kind: AlertKind::Danger,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == AlertKind::Success
    }
}

// ============================================================================
// SUBMISSION
// ============================================================================

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Invalid(#[from] FormError),

    #[error("Slot number is already taken. Choose a different slot.")]
    SlotTaken { slot: String },

    #[error("Could not save the parking lot list")]
    Storage(anyhow::Error),
}

/// Validate a form, check its slot, and add it to the registry.
///
/// This is the whole submit path without any presentation concerns.
pub fn submit_entry<S: KeyValueStore>(
    registry: &mut Registry<S>,
    form: &EntryForm,
) -> Result<Entry, SubmitError> {
    let entry = validate_form(form)?;

    if registry.is_slot_taken(&entry.slot_number) {
        return Err(SubmitError::SlotTaken {
            slot: entry.slot_number,
        });
    }

    registry
        .add(entry.clone())
        .map_err(SubmitError::Storage)?;

    Ok(entry)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub alert: Alert,
    /// The stored entry when the submission was accepted
    pub accepted: Option<Entry>,
    /// Slot number to pre-fill for the next entry
    pub next_slot: u64,
}

// ============================================================================
// ADAPTER
// ============================================================================

pub struct ParkingAdapter<S: KeyValueStore> {
    registry: Registry<S>,
    search: String,
}

impl<S: KeyValueStore> ParkingAdapter<S> {
    pub fn new(registry: Registry<S>) -> Self {
        ParkingAdapter {
            registry,
            search: String::new(),
        }
    }

    pub fn on_submit(&mut self, form: &EntryForm) -> SubmitOutcome {
        let (alert, accepted) = match submit_entry(&mut self.registry, form) {
            Ok(entry) => (Alert::success(MSG_ADDED), Some(entry)),
            Err(err) => {
                if let SubmitError::Storage(cause) = &err {
                    tracing::error!(error = %cause, "failed to save entry");
                }
                (Alert::danger(err.to_string()), None)
            }
        };

        SubmitOutcome {
            alert,
            accepted,
            next_slot: self.registry.next_slot_number(),
        }
    }

    pub fn on_delete_click(&mut self, license_plate: &str) -> Alert {
        match self.registry.remove(license_plate) {
            Ok(_) => Alert::success(MSG_REMOVED),
            Err(err) => {
                tracing::error!(plate = %license_plate, error = %err, "failed to remove entry");
                Alert::danger(SubmitError::Storage(err).to_string())
            }
        }
    }

    /// Remember the search text and return the rows that stay visible
    pub fn on_search_input(&mut self, text: &str) -> Vec<Entry> {
        self.search = text.to_string();
        self.visible_entries()
    }

    pub fn visible_entries(&self) -> Vec<Entry> {
        self.registry.search(&self.search)
    }

    pub fn search_text(&self) -> &str {
        &self.search
    }

    pub fn suggested_slot(&self) -> u64 {
        self.registry.next_slot_number()
    }

    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    pub fn into_registry(self) -> Registry<S> {
        self.registry
    }
}
