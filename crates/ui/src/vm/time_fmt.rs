/// Countdown display, `MM:SS` with minutes zero-padded (and allowed past 99).
#[must_use]
pub fn format_countdown(remaining_secs: u32) -> String {
    format!("{:02}:{:02}", remaining_secs / 60, remaining_secs % 60)
}

/// Accumulated study time as `Xh Ym`, always showing both parts.
#[must_use]
pub fn format_study_time(total_secs: u64) -> String {
    let minutes = total_secs / 60;
    format!("{}h {}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_pads_both_parts() {
        assert_eq!(format_countdown(3600), "60:00");
        assert_eq!(format_countdown(299), "04:59");
        assert_eq!(format_countdown(0), "00:00");
    }

    #[test]
    fn study_time_uses_hours_and_minutes() {
        assert_eq!(format_study_time(0), "0h 0m");
        assert_eq!(format_study_time(95), "0h 1m");
        assert_eq!(format_study_time(5_400), "1h 30m");
    }
}
