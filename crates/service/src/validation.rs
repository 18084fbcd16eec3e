//! Length checks shared by the services.
//!
//! Minimums are measured on the trimmed value, maximums on the raw value, and
//! lengths count characters rather than bytes. The first violated rule is
//! reported; later rules are not evaluated.

use configs::{LengthBounds, Limits};
use models::recipe::RecipeFields;

use crate::errors::ServiceError;

pub fn char_len(s: &str) -> usize { s.chars().count() }

fn too_short(value: &str, bounds: LengthBounds) -> bool { char_len(value.trim()) < bounds.min }

fn too_long(value: &str, bounds: LengthBounds) -> bool { char_len(value) > bounds.max }

/// Recipe fields: every minimum (name, ingredients, directions) is checked
/// before any maximum, in that field order.
pub fn validate_recipe_fields(fields: &RecipeFields, limits: &Limits) -> Result<(), ServiceError> {
    let checks = [
        ("Recipe name", fields.name.as_str(), limits.recipe_name),
        ("Ingredients", fields.ingredients.as_str(), limits.ingredients),
        ("Directions", fields.directions.as_str(), limits.directions),
    ];
    for (label, value, bounds) in checks {
        if too_short(value, bounds) {
            return Err(ServiceError::Validation(format!("{label} must be at least {} characters", bounds.min)));
        }
    }
    for (label, value, bounds) in checks {
        if too_long(value, bounds) {
            return Err(ServiceError::Validation(format!("{label} must be at most {} characters", bounds.max)));
        }
    }
    Ok(())
}

/// Registration input: presence, then username/password minimums, then maximums.
pub fn validate_credentials(username: &str, password: &str, limits: &Limits) -> Result<(), String> {
    if username.is_empty() || password.is_empty() {
        return Err("Username and password are required".into());
    }
    if char_len(username) < limits.username.min {
        return Err(format!("Username must be at least {} characters long", limits.username.min));
    }
    if char_len(password) < limits.password.min {
        return Err(format!("Password must be at least {} characters long", limits.password.min));
    }
    if char_len(username) > limits.username.max {
        return Err(format!("Username must be at most {} characters long", limits.username.max));
    }
    if char_len(password) > limits.password.max {
        return Err(format!("Password must be at most {} characters long", limits.password.max));
    }
    Ok(())
}

/// Comment body: returns the trimmed content to store.
pub fn validate_comment<'a>(content: &'a str, bounds: LengthBounds) -> Result<&'a str, ServiceError> {
    let trimmed = content.trim();
    if trimmed.is_empty() || char_len(trimmed) < bounds.min {
        return Err(ServiceError::Validation(format!("Comment must be at least {} characters", bounds.min.max(1))));
    }
    if char_len(content) > bounds.max {
        return Err(ServiceError::Validation(format!("Comment must be at most {} characters", bounds.max)));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> Limits {
        Limits {
            recipe_name: LengthBounds::new(3, 10),
            ingredients: LengthBounds::new(3, 10),
            directions: LengthBounds::new(3, 10),
            comment: LengthBounds::new(2, 5),
            ..Limits::default()
        }
    }

    fn fields(name: &str, ingredients: &str, directions: &str) -> RecipeFields {
        RecipeFields { name: name.into(), ingredients: ingredients.into(), directions: directions.into(), category_id: 1 }
    }

    fn message(r: Result<(), ServiceError>) -> String {
        match r {
            Err(ServiceError::Validation(m)) => m,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn valid_fields_pass() {
        assert!(validate_recipe_fields(&fields("Soup", "water", "boil"), &limits()).is_ok());
    }

    #[test]
    fn minimum_uses_trimmed_length() {
        let m = message(validate_recipe_fields(&fields("  ab  ", "water", "boil"), &limits()));
        assert!(m.starts_with("Recipe name must be at least 3"), "{m}");
    }

    #[test]
    fn maximum_uses_untrimmed_length() {
        // 8 visible chars padded to 12 raw
        let m = message(validate_recipe_fields(&fields("  Pancake!  ", "water", "boil"), &limits()));
        assert!(m.starts_with("Recipe name must be at most 10"), "{m}");
    }

    #[test]
    fn minimums_are_reported_before_maximums() {
        let m = message(validate_recipe_fields(&fields("a very long name", "water", "x"), &limits()));
        assert!(m.starts_with("Directions must be at least"), "{m}");
    }

    #[test]
    fn first_failing_field_wins() {
        let m = message(validate_recipe_fields(&fields("x", "y", "z"), &limits()));
        assert!(m.starts_with("Recipe name"), "{m}");
    }

    #[test]
    fn lengths_count_characters() {
        assert!(validate_recipe_fields(&fields("crème brû", "water", "boil"), &limits()).is_ok());
    }

    #[test]
    fn credential_rule_order() {
        let l = Limits { username: LengthBounds::new(3, 5), password: LengthBounds::new(4, 6), ..Limits::default() };
        assert_eq!(validate_credentials("", "pw", &l).unwrap_err(), "Username and password are required");
        assert!(validate_credentials("ab", "p", &l).unwrap_err().starts_with("Username must be at least"));
        assert!(validate_credentials("abc", "p", &l).unwrap_err().starts_with("Password must be at least"));
        assert!(validate_credentials("abcdef", "passwordlong", &l).unwrap_err().starts_with("Username must be at most"));
        assert!(validate_credentials("abc", "passwordlong", &l).unwrap_err().starts_with("Password must be at most"));
        assert!(validate_credentials("abc", "pass", &l).is_ok());
    }

    #[test]
    fn comment_is_trimmed_and_bounded() {
        let b = limits().comment;
        assert_eq!(validate_comment("  hi  ", LengthBounds::new(2, 10)).unwrap(), "hi");
        assert!(validate_comment("   ", b).is_err());
        assert!(validate_comment(" a ", b).is_err());
        // raw length counts the padding
        assert!(validate_comment(" abcd ", b).is_err());
        assert_eq!(validate_comment("abcd", b).unwrap(), "abcd");
    }
}
