/// Shorten a scenario label for an axis tick.
///
/// Labels of the form `Name (details)` keep only `Name`.
pub fn tick_label(label: &str, max_len: usize) -> String {
    let name = label.split(" (").next().unwrap_or(label).trim();
    truncate_label(name, max_len)
}

pub fn truncate_label(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Upper bound of a value axis: 10% headroom, never collapsed to zero
pub fn axis_max(max_value: f64) -> f64 {
    if max_value.is_finite() && max_value > 0.0 {
        max_value * 1.1
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_label_drops_details() {
        assert_eq!(tick_label("Scenario A (3 agents, 10 min avg service)", 20), "Scenario A");
        assert_eq!(tick_label("plain", 20), "plain");
    }

    #[test]
    fn truncate_label_adds_ellipsis() {
        assert_eq!(truncate_label("hello", 10), "hello");
        assert_eq!(truncate_label("abcdefghijklmnopqrstuvwxyz", 8), "abcde...");
    }

    #[test]
    fn axis_max_has_headroom() {
        assert!((axis_max(10.0) - 11.0).abs() < 1e-9);
        assert_eq!(axis_max(0.0), 1.0);
        assert_eq!(axis_max(f64::NAN), 1.0);
    }
}
