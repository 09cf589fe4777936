//! Human-readable duration formatting
//!
//! Renders a time span using its two coarsest non-zero units, in English or German.
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: German unit labels, `Language` selector shared with reminder wording
//! - 1.0.0: Initial English-only formatter

use chrono::Duration;

/// Output language for durations and notification wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    German,
}

impl Language {
    /// Resolve a language selector such as `en`, `de`, `german`.
    ///
    /// Unknown selectors fall back to English rather than failing.
    pub fn from_selector(selector: &str) -> Self {
        match selector.trim().to_lowercase().as_str() {
            "de" | "ger" | "german" | "deutsch" => Language::German,
            _ => Language::English,
        }
    }
}

struct Unit {
    singular: &'static str,
    plural: &'static str,
}

struct Units {
    day: Unit,
    hour: Unit,
    minute: Unit,
}

const ENGLISH: Units = Units {
    day: Unit { singular: "day", plural: "days" },
    hour: Unit { singular: "hour", plural: "hours" },
    minute: Unit { singular: "minute", plural: "minutes" },
};

const GERMAN: Units = Units {
    day: Unit { singular: "Tag", plural: "Tage" },
    hour: Unit { singular: "Stunde", plural: "Stunden" },
    minute: Unit { singular: "Minute", plural: "Minuten" },
};

fn units(lang: Language) -> &'static Units {
    match lang {
        Language::English => &ENGLISH,
        Language::German => &GERMAN,
    }
}

fn count(value: i64, unit: &Unit) -> String {
    let label = if value == 1 { unit.singular } else { unit.plural };
    format!("{value} {label}")
}

/// Format a span as `"X days [Y hours]"`, `"X hours [Y minutes]"` or `"X minutes"`.
///
/// The secondary unit is omitted when it is zero. Negative spans yield an empty string.
pub fn format_duration(span: Duration, lang: Language) -> String {
    if span < Duration::zero() {
        return String::new();
    }

    let u = units(lang);
    let total_minutes = span.num_minutes();
    let total_hours = span.num_hours();
    let days = total_hours / 24;
    let hours = total_hours % 24;
    let minutes = total_minutes % 60;

    if days >= 1 {
        if hours == 0 {
            count(days, &u.day)
        } else {
            format!("{} {}", count(days, &u.day), count(hours, &u.hour))
        }
    } else if total_hours >= 1 {
        if minutes == 0 {
            count(total_hours, &u.hour)
        } else {
            format!("{} {}", count(total_hours, &u.hour), count(minutes, &u.minute))
        }
    } else {
        count(total_minutes, &u.minute)
    }
}
