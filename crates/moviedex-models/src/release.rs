use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A release date as published upstream, which may be only partially known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReleaseDate {
    Year(i32),
    YearMonth(i32, u32),
    Full(NaiveDate),
}

impl ReleaseDate {
    /// Parse "YYYY", "YYYY-MM" or "YYYY-MM-DD". Empty or malformed input is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let parts: Vec<&str> = raw.split('-').collect();
        match parts.as_slice() {
            [year] if year.len() == 4 => year.parse().ok().map(ReleaseDate::Year),
            [year, month] if year.len() == 4 => {
                let year: i32 = year.parse().ok()?;
                let month: u32 = month.parse().ok()?;
                (1..=12).contains(&month).then_some(ReleaseDate::YearMonth(year, month))
            }
            [_, _, _] => NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(ReleaseDate::Full),
            _ => None,
        }
    }

    pub fn year(&self) -> i32 {
        match self {
            ReleaseDate::Year(year) | ReleaseDate::YearMonth(year, _) => *year,
            ReleaseDate::Full(date) => date.year(),
        }
    }

    /// Long human form, e.g. "May 18, 2023". Partial dates render what is known.
    pub fn format_long(&self) -> String {
        match self {
            ReleaseDate::Year(year) => year.to_string(),
            ReleaseDate::YearMonth(year, month) => NaiveDate::from_ymd_opt(*year, *month, 1)
                .map(|d| d.format("%B %Y").to_string())
                .unwrap_or_else(|| year.to_string()),
            ReleaseDate::Full(date) => date.format("%B %-d, %Y").to_string(),
        }
    }
}

impl fmt::Display for ReleaseDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseDate::Year(year) => write!(f, "{:04}", year),
            ReleaseDate::YearMonth(year, month) => write!(f, "{:04}-{:02}", year, month),
            ReleaseDate::Full(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for ReleaseDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ReleaseDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        ReleaseDate::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid release date: {:?}", raw)))
    }
}

/// Year label for listings, "Unknown" when the date is absent.
pub fn year_label(date: Option<&ReleaseDate>) -> String {
    date.map(|d| d.year().to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

/// Format a runtime in minutes as "2h 35m", "45m" or "2h".
pub fn format_runtime(minutes: Option<u32>) -> String {
    let minutes = match minutes {
        Some(m) if m > 0 => m,
        _ => return "Unknown".to_string(),
    };

    let hours = minutes / 60;
    let mins = minutes % 60;
    match (hours, mins) {
        (0, m) => format!("{}m", m),
        (h, 0) => format!("{}h", h),
        (h, m) => format!("{}h {}m", h, m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_dates() {
        assert_eq!(ReleaseDate::parse("2008"), Some(ReleaseDate::Year(2008)));
        assert_eq!(ReleaseDate::parse("2008-07"), Some(ReleaseDate::YearMonth(2008, 7)));
        assert_eq!(
            ReleaseDate::parse("2008-07-18"),
            NaiveDate::from_ymd_opt(2008, 7, 18).map(ReleaseDate::Full)
        );
    }

    #[test]
    fn test_parse_rejects_empty_and_malformed() {
        assert_eq!(ReleaseDate::parse(""), None);
        assert_eq!(ReleaseDate::parse("   "), None);
        assert_eq!(ReleaseDate::parse("2008-13"), None);
        assert_eq!(ReleaseDate::parse("2008-02-30"), None);
        assert_eq!(ReleaseDate::parse("soon"), None);
    }

    #[test]
    fn test_format_long() {
        assert_eq!(ReleaseDate::parse("2023-05-18").unwrap().format_long(), "May 18, 2023");
        assert_eq!(ReleaseDate::parse("2023-05").unwrap().format_long(), "May 2023");
        assert_eq!(ReleaseDate::parse("2023").unwrap().format_long(), "2023");
    }

    #[test]
    fn test_display_round_trips_through_serde() {
        let date = ReleaseDate::parse("1999-03").unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert_eq!(json, "\"1999-03\"");
        let back: ReleaseDate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, date);
    }

    #[test]
    fn test_year_label() {
        assert_eq!(year_label(None), "Unknown");
        assert_eq!(year_label(ReleaseDate::parse("1977-05-25").as_ref()), "1977");
    }

    #[test]
    fn test_format_runtime() {
        assert_eq!(format_runtime(Some(155)), "2h 35m");
        assert_eq!(format_runtime(Some(45)), "45m");
        assert_eq!(format_runtime(Some(120)), "2h");
        assert_eq!(format_runtime(Some(0)), "Unknown");
        assert_eq!(format_runtime(None), "Unknown");
    }
}
