use serde::Serialize;

/// Minimum trimmed length of every free-text flow field.
pub const MIN_FIELD_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Collects field errors for one input record.
#[derive(Debug, Default)]
pub struct Checker {
    errors: Vec<FieldError>,
}

impl Checker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires at least [`MIN_FIELD_LEN`] characters after trimming.
    pub fn text(&mut self, field: &'static str, value: &str, message: &str) -> &mut Self {
        if value.trim().chars().count() < MIN_FIELD_LEN {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    pub fn push(&mut self, error: FieldError) -> &mut Self {
        self.errors.push(error);
        self
    }

    pub fn finish(&mut self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_and_blank_values_fail() {
        let result = Checker::new()
            .text("a", "long enough text", "a too short")
            .text("b", "   short  ", "b too short")
            .text("c", "", "c too short")
            .finish();
        let errors = result.unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, ["b", "c"]);
        assert_eq!(errors[0].message, "b too short");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert!(Checker::new().text("t", "28°C 45°C!", "m").finish().is_ok());
        assert!(Checker::new().text("t", "°°°°°", "m").finish().is_err());
    }
}
