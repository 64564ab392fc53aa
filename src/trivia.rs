//! "Did you know?" astronomy facts shown above the gallery.
//!
//! The fact rotates by calendar day, so a page built twice on the same day
//! shows the same fact.

use chrono::{Datelike, NaiveDate};

pub const DEFAULT_FACTS: &[&str] = &[
    "A day on Venus is longer than a year on Venus.",
    "Neutron stars can spin hundreds of times per second.",
    "There are more trees on Earth than stars in the Milky Way (estimated).",
    "The International Space Station travels at about 28,000 km/h.",
    "Light from the Sun takes about 8 minutes to reach Earth.",
];

/// Pick the fact for a given day. Returns `None` for an empty list.
pub fn pick_fact<S: AsRef<str>>(facts: &[S], day: NaiveDate) -> Option<&str> {
    if facts.is_empty() {
        return None;
    }
    let idx = day.num_days_from_ce().unsigned_abs() as usize % facts.len();
    Some(facts[idx].as_ref())
}

pub fn format_fact(fact: &str) -> String {
    format!("Did you know? {fact}")
}
