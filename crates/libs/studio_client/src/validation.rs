use crate::notify::{Notification, Notifier};
use chrono::NaiveDate;
use common_types::CreateReservation;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// Client-side validation failure, with one message per broken rule.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .messages.join("; "))]
pub struct ValidationFailure {
    pub messages: Vec<String>,
}

impl ValidationFailure {
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }
}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| format!("{field} is invalid"), ToString::to_string)
                })
            })
            .collect();
        messages.sort();
        Self { messages }
    }
}

/// Runs the derived rules and surfaces a failure as a warning right away.
pub fn check<T: Validate>(value: &T, notifier: &dyn Notifier) -> Result<(), ValidationFailure> {
    value.validate().map_err(|errors| {
        let failure = ValidationFailure::from(errors);
        notifier.notify(Notification::warning(failure.to_string()));
        failure
    })
}

/// Booking rules beyond field presence: no dates in the past and a time
/// range that ends after it starts.
pub fn check_reservation(
    reservation: &CreateReservation,
    today: NaiveDate,
    notifier: &dyn Notifier,
) -> Result<(), ValidationFailure> {
    let mut messages = match reservation.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => ValidationFailure::from(errors).messages,
    };
    if reservation.event_date < today {
        messages.push("Event date cannot be in the past".to_owned());
    }
    if reservation.end_time <= reservation.start_time {
        messages.push("End time must be after start time".to_owned());
    }
    if messages.is_empty() {
        return Ok(());
    }
    let failure = ValidationFailure { messages };
    notifier.notify(Notification::warning(failure.to_string()));
    Err(failure)
}
