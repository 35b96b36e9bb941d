use chrono::{DateTime, Utc};

use crate::error::{Result, WellbeingError};

/// Checks applied to caller input before anything is written
#[derive(Debug, Copy, Clone)]
pub struct InputValidator;

impl InputValidator {
    /// Validate a user id used to namespace keys
    pub fn validate_user_id(user_id: &str) -> Result<()> {
        Self::validate_key_segment("User id", user_id)
    }

    /// Validate a therapist id used as the third key segment of a chat transcript
    pub fn validate_counterpart_id(therapist_id: &str) -> Result<()> {
        Self::validate_key_segment("Therapist id", therapist_id)
    }

    fn validate_key_segment(label: &str, value: &str) -> Result<()> {
        if value.trim().is_empty() {
            return Err(invalid(format!("{label} cannot be empty")));
        }

        if value.contains(':') {
            return Err(invalid(format!("{label} cannot contain ':'")));
        }

        if value.contains('\0') || value.contains('\n') || value.contains('\r') {
            return Err(invalid(format!("{label} contains invalid characters")));
        }

        Ok(())
    }

    /// Mood intensity must be 1 to 10
    pub fn validate_intensity(intensity: u8) -> Result<()> {
        if !(1..=10).contains(&intensity) {
            return Err(invalid(format!("Intensity must be between 1 and 10, got {intensity}")));
        }
        Ok(())
    }

    /// Session rating must be 1 to 5
    pub fn validate_rating(rating: u8) -> Result<()> {
        if !(1..=5).contains(&rating) {
            return Err(invalid(format!("Rating must be between 1 and 5, got {rating}")));
        }
        Ok(())
    }

    /// Titles of journal entries and custom activities
    pub fn validate_title(title: &str) -> Result<()> {
        if title.trim().is_empty() {
            return Err(invalid("Title cannot be empty".to_string()));
        }

        if title.chars().count() > 200 {
            return Err(invalid("Title too long (max 200 characters)".to_string()));
        }

        Ok(())
    }

    /// Message bodies for direct and community chat
    pub fn validate_message(message: &str) -> Result<()> {
        if message.trim().is_empty() {
            return Err(invalid("Message cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Validate date range
    pub fn validate_date_range(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Result<()> {
        if let (Some(start_date), Some(end_date)) = (start, end) {
            if start_date > end_date {
                return Err(invalid("Start date must be before end date".to_string()));
            }
        }
        Ok(())
    }
}

fn invalid(message: String) -> WellbeingError {
    WellbeingError::InvalidInput(message)
}
