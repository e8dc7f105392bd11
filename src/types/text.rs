use inquire::validator::{StringValidator, Validation};

/// Names only count as present once surrounding whitespace is removed.
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

#[derive(Clone)]
pub struct ValidatorNonEmpty {}

impl StringValidator for ValidatorNonEmpty {
    fn validate(&self, input: &str) -> Result<Validation, inquire::CustomUserError> {
        if is_blank(input) {
            return Ok(Validation::Invalid("Empty string not allowed".into()));
        }
        Ok(Validation::Valid)
    }
}
