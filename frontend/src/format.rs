use chrono::{DateTime, NaiveDate, NaiveDateTime};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

pub fn format_with_commas(value: i64) -> String {
    let is_negative = value < 0;
    let s = value.unsigned_abs().to_string().chars().rev().collect::<Vec<char>>();
    let mut out = Vec::new();
    for (i, ch) in s.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(*ch);
    }
    let formatted: String = out.into_iter().rev().collect();
    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}

/// Whole-unit amount with thousands grouping, e.g. `12,500 RWF`.
pub fn format_currency(amount: f64, currency: &str) -> String {
    let rounded = if amount.is_finite() { amount.round() as i64 } else { 0 };
    format!("{} {}", format_with_commas(rounded), currency)
}

pub fn format_count(count: u64) -> String {
    format_with_commas(i64::try_from(count).unwrap_or(i64::MAX))
}

/// `mobile_money_transfer` -> `Mobile Money Transfer`.
///
/// Only the first ASCII alphanumeric of each word is touched; the rest of
/// the word keeps its case.
pub fn title_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut at_word_start = true;
    for ch in key.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        let is_word = ch.is_ascii_alphanumeric();
        if is_word && at_word_start {
            out.push(ch.to_ascii_uppercase());
        } else {
            out.push(ch);
        }
        at_word_start = !is_word;
    }
    out
}

pub fn format_category(category: Option<&str>) -> String {
    match category {
        Some(key) if !key.is_empty() => title_case(key),
        _ => "-".to_string(),
    }
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for pattern in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, pattern) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Table date, e.g. `Mar 5, 2024, 02:30 PM`. Unparseable input is shown as-is.
pub fn format_date(raw: Option<&str>) -> String {
    match raw {
        None => "-".to_string(),
        Some(raw) if raw.is_empty() => "-".to_string(),
        Some(raw) => match parse_timestamp(raw) {
            Some(dt) => dt.format("%b %-d, %Y, %I:%M %p").to_string(),
            None => raw.to_string(),
        },
    }
}

/// Numeric date used in the detected-file list, e.g. `3/5/2024`.
pub fn format_short_date(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(dt) => dt.format("%-m/%-d/%Y").to_string(),
        None => raw.to_string(),
    }
}

pub fn month_label(year: i32, month: u32) -> String {
    match month.checked_sub(1).and_then(|i| MONTH_NAMES.get(i as usize)) {
        Some(name) => format!("{} {}", name, year),
        None => format!("{:02}/{}", month, year),
    }
}

/// Human-readable size in base-1024 units with at most two decimals.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1u64;
    while unit + 1 < SIZE_UNITS.len() && bytes >= divisor * 1024 {
        divisor *= 1024;
        unit += 1;
    }

    let value = format!("{:.2}", bytes as f64 / divisor as f64);
    let value = value.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", value, SIZE_UNITS[unit])
}

/// Renders a chart value the way a JS number prints: no trailing `.0`.
pub fn format_plain_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Tooltip text for one slice of a distribution chart.
pub fn share_label(label: &str, value: f64, total: f64) -> String {
    let percentage = if total > 0.0 {
        format!("{:.1}", value / total * 100.0)
    } else {
        "0".to_string()
    };
    format!("{}: {} ({}%)", label, format_plain_number(value), percentage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commas_group_thousands() {
        assert_eq!(format_with_commas(0), "0");
        assert_eq!(format_with_commas(999), "999");
        assert_eq!(format_with_commas(1_000), "1,000");
        assert_eq!(format_with_commas(-1_234_567), "-1,234,567");
    }

    #[test]
    fn currency_rounds_to_whole_units() {
        assert_eq!(format_currency(12_500.0, "RWF"), "12,500 RWF");
        assert_eq!(format_currency(1_499.5, "RWF"), "1,500 RWF");
        assert_eq!(format_currency(0.0, "RWF"), "0 RWF");
        assert_eq!(format_currency(f64::NAN, "RWF"), "0 RWF");
    }

    #[test]
    fn category_keys_become_labels() {
        assert_eq!(title_case("mobile_money_transfer"), "Mobile Money Transfer");
        assert_eq!(title_case("Airtime"), "Airtime");
        assert_eq!(title_case("bank_deposit_2"), "Bank Deposit 2");
        assert_eq!(format_category(Some("")), "-");
        assert_eq!(format_category(None), "-");
    }

    #[test]
    fn dates_render_in_table_format() {
        assert_eq!(
            format_date(Some("2024-03-05T14:30:00")),
            "Mar 5, 2024, 02:30 PM"
        );
        assert_eq!(
            format_date(Some("2024-03-05T09:05:00+02:00")),
            "Mar 5, 2024, 09:05 AM"
        );
        assert_eq!(format_date(Some("2024-12-31")), "Dec 31, 2024, 12:00 AM");
        assert_eq!(format_date(Some("yesterday")), "yesterday");
        assert_eq!(format_date(None), "-");
    }

    #[test]
    fn short_date_for_detected_files() {
        assert_eq!(format_short_date("2024-03-05T14:30:00.123456"), "3/5/2024");
    }

    #[test]
    fn month_labels() {
        assert_eq!(month_label(2024, 1), "Jan 2024");
        assert_eq!(month_label(2023, 12), "Dec 2023");
        assert_eq!(month_label(2023, 13), "13/2023");
        assert_eq!(month_label(2023, 0), "00/2023");
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(16 * 1024 * 1024), "16 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(5 * 1024 * 1024 * 1024 * 1024), "5120 GB");
    }

    #[test]
    fn share_label_handles_zero_total() {
        assert_eq!(share_label("Airtime", 1.0, 3.0), "Airtime: 1 (33.3%)");
        assert_eq!(share_label("Airtime", 0.0, 0.0), "Airtime: 0 (0%)");
    }
}
