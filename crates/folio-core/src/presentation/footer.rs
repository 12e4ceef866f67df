/// Replace the first four-digit run in a copyright line with `year`.
/// Lines without a `©` are returned unchanged.
pub fn stamp_year(text: &str, year: i32) -> String {
    if !text.contains('©') {
        return text.to_string();
    }

    let bytes = text.as_bytes();
    let start = (0..bytes.len().saturating_sub(3))
        .find(|&i| bytes[i..i + 4].iter().all(u8::is_ascii_digit));

    match start {
        Some(i) => format!("{}{}{}", &text[..i], year, &text[i + 4..]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_year() {
        assert_eq!(stamp_year("© 2023 Jane Doe", 2026), "© 2026 Jane Doe");
        assert_eq!(stamp_year("Copyright © Jane, 1999-2001", 2026), "Copyright © Jane, 2026-2001");
    }

    #[test]
    fn test_stamp_year_leaves_other_text() {
        assert_eq!(stamp_year("Built in 2023", 2026), "Built in 2023");
        assert_eq!(stamp_year("© Jane Doe", 2026), "© Jane Doe");
        assert_eq!(stamp_year("©", 2026), "©");
    }
}
