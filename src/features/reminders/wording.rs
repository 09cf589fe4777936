//! Announcement and reminder texts
//!
//! - **Version**: 1.1.0
//! - **Since**: 0.2.0
//!
//! ## Changelog
//! - 1.1.0: English wording alongside German
//! - 1.0.0: German announcement and reminder texts

use crate::core::duration::{format_duration, Language};
use crate::core::truncate_for_message;
use crate::features::reminders::store::Reminder;
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

/// `dd.mm. HH:MM` in the display timezone, used in log lines
pub fn format_instant(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%d.%m. %H:%M").to_string()
}

fn round_to_seconds(span: Duration) -> Duration {
    Duration::seconds((span.num_milliseconds() + 500).div_euclid(1000))
}

/// Posted once when an event is created
pub fn announcement(event_url: &str, lang: Language) -> String {
    let headline = match lang {
        Language::German => "Neues Event wurde erstellt",
        Language::English => "New event created",
    };
    format!("**{headline}** \n\n@everyone\n\n{event_url}")
}

/// Reminder text for a due reminder, relative to `now`
pub fn reminder_message(reminder: &Reminder, now: DateTime<Utc>, tz: Tz, lang: Language) -> String {
    let body = if reminder.is_immediate {
        match lang {
            Language::German => format!("Event '{}' startet JETZT!", reminder.event_name),
            Language::English => format!("Event '{}' starts NOW!", reminder.event_name),
        }
    } else {
        let local = reminder.start_time.with_timezone(&tz);
        let date = local.format("%d.%m.");
        let time = local.format("%H:%M");
        let remaining = round_to_seconds(reminder.start_time - now).max(Duration::zero());
        let remaining = format_duration(remaining, lang);

        match lang {
            Language::German => format!(
                "Event '{}' startet am {date} um {time}! (in {remaining})",
                reminder.event_name
            ),
            Language::English => format!(
                "Event '{}' starts on {date} at {time}! (in {remaining})",
                reminder.event_name
            ),
        }
    };

    truncate_for_message(&format!(
        "**Reminder** \n\n@everyone\n\n{body}\n\n{}",
        reminder.event_url
    ))
}
