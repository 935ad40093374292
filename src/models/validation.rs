//! Gemensamma hjälpfunktioner för formulärvalidering

use crate::utils::error::ValidationErrors;

/// Kontrollera att trimmad text har 1..=max tecken
pub fn check_text(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    max: usize,
    message: &str,
) {
    let len = value.trim().chars().count();
    if len == 0 || len > max {
        errors.add(field, message);
    }
}

/// Tolka ett heltal från formulärtext
pub fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Tolka ett ändligt decimaltal från formulärtext
pub fn parse_number(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Tolka ett positivt heltal, registrera fel annars
pub fn positive_int(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    message: &str,
) -> i64 {
    match parse_int(value) {
        Some(n) if n > 0 => n,
        _ => {
            errors.add(field, message);
            0
        }
    }
}

/// Trimma och gör tomma strängar till None
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_int(" 12 "), Some(12));
        assert_eq!(parse_int("12.5"), None);
        assert_eq!(parse_number("12.5"), Some(12.5));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("abc"), None);
    }

    #[test]
    fn test_check_text_counts_characters() {
        let mut errors = ValidationErrors::new();
        check_text(&mut errors, "name", "   ", 5, "tomt");
        check_text(&mut errors, "teacher", "Åsa Öberg", 9, "för långt");
        assert!(errors.has("name"));
        assert!(!errors.has("teacher"));
    }
}
