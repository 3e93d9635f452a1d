use std::collections::HashSet;

/// Sentence used when nothing is marked visited
pub const EMPTY_DESCRIPTION: &str = "World map. No countries visited yet.";

/// Human-readable summary of the visited set for non-visual consumers.
///
/// Codes are sorted so the description is deterministic regardless of the
/// set's internal iteration order.
pub fn describe(visited: &HashSet<String>) -> String {
    if visited.is_empty() {
        return EMPTY_DESCRIPTION.to_string();
    }

    let mut codes: Vec<&str> = visited.iter().map(String::as_str).collect();
    codes.sort_unstable();
    format!(
        "World map. {} visited: {}.",
        if codes.len() == 1 {
            "1 country".to_string()
        } else {
            format!("{} countries", codes.len())
        },
        codes.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(codes: &[&str]) -> HashSet<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_empty_set_uses_fixed_sentence() {
        assert_eq!(describe(&set(&[])), EMPTY_DESCRIPTION);
    }

    #[test]
    fn test_order_independent() {
        assert_eq!(describe(&set(&["FR", "DE"])), describe(&set(&["DE", "FR"])));
    }

    #[test]
    fn test_codes_sorted_ascending() {
        let text = describe(&set(&["US", "DE", "FR"]));
        assert!(text.contains("DE, FR, US"));
    }

    #[test]
    fn test_contains_every_code() {
        let text = describe(&set(&["US"]));
        assert!(text.contains("US"));
        assert!(text.contains("1 country"));
    }
}
