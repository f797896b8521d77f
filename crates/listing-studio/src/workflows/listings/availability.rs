//! Weekday and night tokens used to seed listing availability.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Night a guest may stay, ordered Monday through Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NightToken {
    MondayNight,
    TuesdayNight,
    WednesdayNight,
    ThursdayNight,
    FridayNight,
    SaturdayNight,
    SundayNight,
}

/// Day a guest may check in or out, ordered Monday through Sunday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DayToken {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl NightToken {
    pub const ALL: [NightToken; 7] = [
        NightToken::MondayNight,
        NightToken::TuesdayNight,
        NightToken::WednesdayNight,
        NightToken::ThursdayNight,
        NightToken::FridayNight,
        NightToken::SaturdayNight,
        NightToken::SundayNight,
    ];

    pub const fn wire_name(self) -> &'static str {
        match self {
            NightToken::MondayNight => "monday-night",
            NightToken::TuesdayNight => "tuesday-night",
            NightToken::WednesdayNight => "wednesday-night",
            NightToken::ThursdayNight => "thursday-night",
            NightToken::FridayNight => "friday-night",
            NightToken::SaturdayNight => "saturday-night",
            NightToken::SundayNight => "sunday-night",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            NightToken::MondayNight => "Monday Night",
            NightToken::TuesdayNight => "Tuesday Night",
            NightToken::WednesdayNight => "Wednesday Night",
            NightToken::ThursdayNight => "Thursday Night",
            NightToken::FridayNight => "Friday Night",
            NightToken::SaturdayNight => "Saturday Night",
            NightToken::SundayNight => "Sunday Night",
        }
    }

    /// The night that starts on the given day.
    pub const fn day(self) -> DayToken {
        match self {
            NightToken::MondayNight => DayToken::Monday,
            NightToken::TuesdayNight => DayToken::Tuesday,
            NightToken::WednesdayNight => DayToken::Wednesday,
            NightToken::ThursdayNight => DayToken::Thursday,
            NightToken::FridayNight => DayToken::Friday,
            NightToken::SaturdayNight => DayToken::Saturday,
            NightToken::SundayNight => DayToken::Sunday,
        }
    }

    pub const fn single_letter(self) -> char {
        self.day().single_letter()
    }
}

impl DayToken {
    pub const ALL: [DayToken; 7] = [
        DayToken::Monday,
        DayToken::Tuesday,
        DayToken::Wednesday,
        DayToken::Thursday,
        DayToken::Friday,
        DayToken::Saturday,
        DayToken::Sunday,
    ];

    pub const fn wire_name(self) -> &'static str {
        match self {
            DayToken::Monday => "monday",
            DayToken::Tuesday => "tuesday",
            DayToken::Wednesday => "wednesday",
            DayToken::Thursday => "thursday",
            DayToken::Friday => "friday",
            DayToken::Saturday => "saturday",
            DayToken::Sunday => "sunday",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            DayToken::Monday => "Monday",
            DayToken::Tuesday => "Tuesday",
            DayToken::Wednesday => "Wednesday",
            DayToken::Thursday => "Thursday",
            DayToken::Friday => "Friday",
            DayToken::Saturday => "Saturday",
            DayToken::Sunday => "Sunday",
        }
    }

    pub const fn single_letter(self) -> char {
        match self {
            DayToken::Monday => 'M',
            DayToken::Tuesday | DayToken::Thursday => 'T',
            DayToken::Wednesday => 'W',
            DayToken::Friday => 'F',
            DayToken::Saturday | DayToken::Sunday => 'S',
        }
    }
}

impl fmt::Display for NightToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl fmt::Display for DayToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown availability token '{0}'")]
pub struct UnknownToken(pub String);

impl FromStr for NightToken {
    type Err = UnknownToken;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        NightToken::ALL
            .into_iter()
            .find(|token| token.wire_name() == normalized)
            .ok_or_else(|| UnknownToken(raw.to_string()))
    }
}

impl FromStr for DayToken {
    type Err = UnknownToken;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        DayToken::ALL
            .into_iter()
            .find(|token| token.wire_name() == normalized)
            .ok_or_else(|| UnknownToken(raw.to_string()))
    }
}

/// Every night of the week, Monday first.
pub fn all_night_tokens() -> [NightToken; 7] {
    NightToken::ALL
}

/// Every day of the week, Monday first.
pub fn all_day_tokens() -> [DayToken; 7] {
    DayToken::ALL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_sets_cover_the_week_in_order() {
        let nights = all_night_tokens();
        let days = all_day_tokens();
        assert_eq!(nights.len(), 7);
        assert_eq!(days.len(), 7);
        assert_eq!(nights[0], NightToken::MondayNight);
        assert_eq!(days[6], DayToken::Sunday);
        for (night, day) in nights.iter().zip(days.iter()) {
            assert_eq!(night.day(), *day);
        }
    }

    #[test]
    fn wire_names_match_serde_representation() {
        for night in NightToken::ALL {
            let json = serde_json::to_string(&night).expect("serialize night");
            assert_eq!(json, format!("\"{}\"", night.wire_name()));
        }
        for day in DayToken::ALL {
            let json = serde_json::to_string(&day).expect("serialize day");
            assert_eq!(json, format!("\"{}\"", day.wire_name()));
        }
    }

    #[test]
    fn parses_wire_names_case_insensitively() {
        assert_eq!(
            " Friday-Night ".parse::<NightToken>(),
            Ok(NightToken::FridayNight)
        );
        assert_eq!("sunday".parse::<DayToken>(), Ok(DayToken::Sunday));
        assert_eq!(
            "funday".parse::<DayToken>(),
            Err(UnknownToken("funday".to_string()))
        );
    }
}
