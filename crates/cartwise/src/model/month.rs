//! Calendar month domain and the month filter option.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A calendar month, ordered January through December.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Month; 12] = [
        Month::January,
        Month::February,
        Month::March,
        Month::April,
        Month::May,
        Month::June,
        Month::July,
        Month::August,
        Month::September,
        Month::October,
        Month::November,
        Month::December,
    ];

    /// Full English month name.
    pub fn name(&self) -> &'static str {
        match self {
            Month::January => "January",
            Month::February => "February",
            Month::March => "March",
            Month::April => "April",
            Month::May => "May",
            Month::June => "June",
            Month::July => "July",
            Month::August => "August",
            Month::September => "September",
            Month::October => "October",
            Month::November => "November",
            Month::December => "December",
        }
    }

    /// 1-based month number.
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    /// Zero-based position in [`Month::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Month from its 1-based number.
    pub fn from_number(n: u32) -> Option<Month> {
        n.checked_sub(1)
            .and_then(|i| Month::ALL.get(i as usize))
            .copied()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Month {
    type Err = String;

    /// Accepts full names, three-letter abbreviations (any case) or `1`..`12`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(n) = trimmed.parse::<u32>() {
            return Month::from_number(n).ok_or_else(|| format!("Unknown month: {}", s));
        }
        Month::ALL
            .iter()
            .find(|m| {
                m.name().eq_ignore_ascii_case(trimmed)
                    || (trimmed.len() == 3 && m.name()[..3].eq_ignore_ascii_case(trimmed))
            })
            .copied()
            .ok_or_else(|| format!("Unknown month: {}", s))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Month filter option; `Any` disables month filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    Any,
    Only(Month),
}

impl MonthFilter {
    /// Whether a rule's month passes this filter.
    ///
    /// A rule without a month only passes `Any`.
    pub fn accepts(&self, month: Option<Month>) -> bool {
        match self {
            MonthFilter::Any => true,
            MonthFilter::Only(wanted) => month == Some(*wanted),
        }
    }
}

impl fmt::Display for MonthFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthFilter::Any => f.write_str("Any"),
            MonthFilter::Only(m) => write!(f, "{}", m),
        }
    }
}

impl FromStr for MonthFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("any") || trimmed.eq_ignore_ascii_case("all")
        {
            Ok(MonthFilter::Any)
        } else {
            trimmed.parse().map(MonthFilter::Only)
        }
    }
}

impl Serialize for MonthFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MonthFilter {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_order() {
        assert!(Month::January < Month::March);
        assert!(Month::November < Month::December);
        assert_eq!(Month::ALL[2], Month::March);
        assert_eq!(Month::March.index(), 2);
        assert_eq!(Month::December.number(), 12);
    }

    #[test]
    fn test_parse_month() {
        assert_eq!("March".parse::<Month>().unwrap(), Month::March);
        assert_eq!("march".parse::<Month>().unwrap(), Month::March);
        assert_eq!("Sep".parse::<Month>().unwrap(), Month::September);
        assert_eq!("12".parse::<Month>().unwrap(), Month::December);
        assert!("Smarch".parse::<Month>().is_err());
        assert!("13".parse::<Month>().is_err());
        assert!("0".parse::<Month>().is_err());
    }

    #[test]
    fn test_month_filter() {
        assert_eq!("Any".parse::<MonthFilter>().unwrap(), MonthFilter::Any);
        assert_eq!(
            "June".parse::<MonthFilter>().unwrap(),
            MonthFilter::Only(Month::June)
        );
        assert!(MonthFilter::Any.accepts(None));
        assert!(MonthFilter::Only(Month::June).accepts(Some(Month::June)));
        assert!(!MonthFilter::Only(Month::June).accepts(Some(Month::July)));
        assert!(!MonthFilter::Only(Month::June).accepts(None));
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&Month::April).unwrap();
        assert_eq!(json, "\"April\"");
        let filter: MonthFilter = serde_json::from_str("\"Any\"").unwrap();
        assert_eq!(filter, MonthFilter::Any);
    }
}
