/// Truncate a string to at most `max_len` characters, adding an ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None or blank
pub fn format_optional(value: Option<&str>, default: &str) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => default.to_string(),
    }
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if let Ok(d) = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        d.format("%b %d, %Y").to_string()
    } else if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f") {
        // Naive timestamps as the backend writes created_at
        dt.format("%b %d, %Y").to_string()
    } else {
        date.to_string()
    }
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hello", 10), "Hello");
        assert_eq!(truncate("Hello World", 8), "Hello...");
        assert_eq!(truncate("Hi", 2), "Hi");
        assert_eq!(truncate("Zertifikät über", 5), "Ze...");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(Some("AWS"), "-"), "AWS");
        assert_eq!(format_optional(Some("  "), "-"), "-");
        assert_eq!(format_optional(None, "-"), "-");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-05"), "Mar 05, 2024");
        assert_eq!(format_date("2024-03-05T10:20:30Z"), "Mar 05, 2024");
        assert_eq!(format_date("2024-03-05T10:20:30.123456"), "Mar 05, 2024");
        assert_eq!(format_date("soon"), "soon");
    }

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Amazon Web Services", "web"));
        assert!(!contains_ignore_case("Azure", "aws"));
    }
}
