// src/normalize/datetime.rs
//! Vendor timer text ("12/01 23h30", "Demain 08h15", "Aujourd'hui 20:45", "21h00")
//! → absolute second-precision timestamps, relative to a caller-supplied "now".

use std::sync::LazyLock;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Timelike};
use regex::{Captures, Regex};

type Resolve = fn(&Captures<'_>, NaiveDateTime) -> Option<NaiveDateTime>;

struct DatePattern {
    name: &'static str,
    re: Regex,
    resolve: Resolve,
}

impl DatePattern {
    fn new(name: &'static str, re: &str, resolve: Resolve) -> Self {
        let re = Regex::new(re).expect("date pattern must be valid");
        Self { name, re, resolve }
    }
}

/// Evaluated top to bottom; the first regex that matches decides, even if its
/// numbers then turn out to be out of range.
static PATTERNS: LazyLock<Vec<DatePattern>> = LazyLock::new(|| {
    vec![
        DatePattern::new(
            "day_month",
            r"(\d{1,2})/(\d{1,2})\s+(\d{1,2})[h:](\d{2})",
            |c, now| {
                let day = num(c, 1)?;
                let month = num(c, 2)?;
                at(NaiveDate::from_ymd_opt(now.year(), month, day)?, num(c, 3)?, num(c, 4)?)
            },
        ),
        // Tomorrow whether the clock time is before or after now.
        DatePattern::new(
            "tomorrow",
            r"Demain\s+(\d{1,2})[h:](\d{2})",
            |c, now| at(now.date().checked_add_days(Days::new(1))?, num(c, 1)?, num(c, 2)?),
        ),
        DatePattern::new(
            "today",
            r"(?:Aujourd['’]hui|Auj\.)\s+(\d{1,2})[h:](\d{2})",
            |c, now| at(now.date(), num(c, 1)?, num(c, 2)?),
        ),
        DatePattern::new(
            "clock",
            r"(\d{1,2})[h:](\d{2})",
            |c, now| at(now.date(), num(c, 1)?, num(c, 2)?),
        ),
        // Live cards show a status instead of a time. Resolves to the same
        // value as the no-match fallback; kept so the debug log names the case.
        DatePattern::new("live", r"(?i)\b(?:en\s+)?direct\b", |_, now| Some(truncate_to_seconds(now))),
    ]
});

fn num(c: &Captures<'_>, i: usize) -> Option<u32> {
    c.get(i)?.as_str().parse().ok()
}

fn at(date: NaiveDate, hour: u32, minute: u32) -> Option<NaiveDateTime> {
    date.and_hms_opt(hour, minute, 0)
}

/// Resolve raw timer text against `now`. `None` when the text is absent/blank,
/// nothing matches, or the matched numbers do not form a real date/time.
pub fn normalize_datetime(text: Option<&str>, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }
    for p in PATTERNS.iter() {
        if let Some(caps) = p.re.captures(text) {
            let out = (p.resolve)(&caps, now);
            if out.is_none() {
                logd!("timer {text:?}: pattern {} matched but gave no valid date", p.name);
            }
            return out;
        }
    }
    logd!("timer {text:?}: no pattern matched");
    None
}

pub fn truncate_to_seconds(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}

/// `YYYY-MM-DDTHH:MM:SS`, the `dateTime` field.
pub fn iso_timestamp(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// `YYYY-MM-DD HH:MM:SS`, the form used inside match keys.
pub fn display_timestamp(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}
