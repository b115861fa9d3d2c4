use crate::models::TodoStats;

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use todo_core::formatting::format_count;
///
/// assert_eq!(format_count(7), "7");
/// assert_eq!(format_count(1234567), "1,234,567");
/// ```
pub fn format_count(value: usize) -> String {
    group_thousands(&value.to_string())
}

/// Pluralise `noun` for `count`, TodoMVC style.
///
/// # Examples
///
/// ```
/// use todo_core::formatting::pluralize;
///
/// assert_eq!(pluralize(1, "item"), "1 item");
/// assert_eq!(pluralize(0, "item"), "0 items");
/// ```
pub fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", format_count(count), noun)
    } else {
        format!("{} {}s", format_count(count), noun)
    }
}

/// The "N items left" counter shown under every todo list.
pub fn items_left(active: usize) -> String {
    format!("{} left", pluralize(active, "item"))
}

/// One-line summary of the list counts, e.g. `"3 total · 2 active · 1 completed (33%)"`.
pub fn format_stats(stats: &TodoStats) -> String {
    format!(
        "{} total · {} active · {} completed ({:.0}%)",
        format_count(stats.total),
        format_count(stats.active),
        format_count(stats.completed),
        stats.percent_complete()
    )
}

/// Truncate `text` to at most `max_chars` characters, adding `…` when cut.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── format_count / pluralize ─────────────────────────────────────────────

    #[test]
    fn test_format_count_grouping() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(1, "todo"), "1 todo");
        assert_eq!(pluralize(2, "todo"), "2 todos");
        assert_eq!(pluralize(0, "todo"), "0 todos");
    }

    #[test]
    fn test_items_left() {
        assert_eq!(items_left(1), "1 item left");
        assert_eq!(items_left(3), "3 items left");
    }

    #[test]
    fn test_format_stats() {
        let stats = TodoStats {
            total: 4,
            active: 3,
            completed: 1,
        };
        assert_eq!(format_stats(&stats), "4 total · 3 active · 1 completed (25%)");
    }

    // ── truncate ─────────────────────────────────────────────────────────────

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly", 7), "exactly");
        assert_eq!(truncate("Buy milk and eggs", 8), "Buy mil…");
        assert_eq!(truncate("héllo wörld", 5), "héll…");
        assert_eq!(truncate("abc", 0), "");
    }
}
