use chrono::{NaiveTime, Timelike};

/// Tolka en lektionstid som "10:20 PM", "10:20:00 PM" eller "14:30"
pub fn parse_class_time(s: &str) -> Option<NaiveTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    let mut parts = s.split_whitespace();
    let time_part = parts.next()?;
    let modifier = parts.next().map(|m| m.to_uppercase());

    let mut fields = time_part.split(':');
    let mut hours: u32 = fields.next()?.parse().ok()?;
    let minutes: u32 = fields.next().map_or(Some(0), |m| m.parse().ok())?;
    let seconds: u32 = fields.next().map_or(Some(0), |m| m.parse().ok())?;

    match modifier.as_deref() {
        Some("PM") if hours < 12 => hours += 12,
        Some("AM") if hours == 12 => hours = 0,
        Some("AM" | "PM") | None => {}
        Some(_) => return None,
    }

    NaiveTime::from_hms_opt(hours, minutes, seconds)
}

/// Formatera en tid som "h:mm AM/PM"
pub fn format_class_time(time: NaiveTime) -> String {
    let (is_pm, hour12) = time.hour12();
    format!(
        "{}:{:02} {}",
        hour12,
        time.minute(),
        if is_pm { "PM" } else { "AM" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_parse_class_time() {
        assert_eq!(parse_class_time("10:20 PM"), Some(hm(22, 20)));
        assert_eq!(parse_class_time("10:20:00 am"), Some(hm(10, 20)));
        assert_eq!(parse_class_time("12:05 AM"), Some(hm(0, 5)));
        assert_eq!(parse_class_time("12:05 PM"), Some(hm(12, 5)));
        assert_eq!(parse_class_time("14:30"), Some(hm(14, 30)));
        assert_eq!(parse_class_time(""), None);
        assert_eq!(parse_class_time("25:00"), None);
        assert_eq!(parse_class_time("9:00 XM"), None);
    }

    #[test]
    fn test_format_class_time() {
        assert_eq!(format_class_time(hm(22, 5)), "10:05 PM");
        assert_eq!(format_class_time(hm(0, 30)), "12:30 AM");
    }
}
