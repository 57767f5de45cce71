use chrono::NaiveDateTime;

/// Formats a datetime the way the target dialect expects date parameters:
/// `yyyy-MM-dd HH:mm:ss`.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn mysql_datetime_format() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(13, 5, 7)
            .unwrap();
        assert_eq!(format_datetime(&dt), "2024-03-09 13:05:07");
    }
}
