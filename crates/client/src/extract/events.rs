//! Event listing extraction from Eventbrite search pages.
//!
//! A listing page carries two parallel sequences: event cards (name and
//! location) and calendar blocks (when). They are paired by position.
//!
//! Calendar text comes in two shapes:
//! - `Sat, Apr 18, 3:00 PM` for events further out
//! - `Today at 6:00 PM` / `Tomorrow at 5:30 PM` for the next two days
//!
//! The short form resolves to tomorrow's date only when the word is
//! `Tomorrow`; every other word resolves to `today`.

use std::sync::LazyLock;

use chrono::{Days, NaiveDate};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use super::clean_text;
use citycmp_core::EventRecord;
use citycmp_core::records::{CITY_NOT_AVAILABLE, LOCATION_NOT_AVAILABLE, STATE_NOT_AVAILABLE};

static CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article.eds-media-card-content").expect("invalid selector"));
static NAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.eds-event-card__formatted-name--is-clamped").expect("invalid selector"));
static SUB_CONTENT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.eds-media-card-content__sub-content").expect("invalid selector"));
static LOCATION_LINE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.card-text--truncated__one").expect("invalid selector"));
static CALENDAR_BLOCK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.search-event-card-square-image").expect("invalid selector"));
static CALENDAR_TEXT: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div.eds-text-color--primary-brand.eds-text-bs").expect("invalid selector")
});
static RELATIVE_DAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(\w+)\s+at\s+(.*?)\s*$").expect("invalid regex"));

/// When an event happens, as listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    pub day: String,
    pub date: String,
    pub time: String,
}

/// Parse listing calendar text relative to `today`.
pub fn parse_calendar(text: &str, today: NaiveDate) -> Schedule {
    let tokens: Vec<&str> = text.split(',').map(str::trim).collect();

    if tokens.len() >= 2 {
        return Schedule {
            day: tokens[0].to_string(),
            date: tokens[1].to_string(),
            time: tokens.get(2..).map(|rest| rest.join(", ")).unwrap_or_default(),
        };
    }

    let (word, time) = match RELATIVE_DAY.captures(text) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (String::new(), String::new()),
    };

    let date = if word.eq_ignore_ascii_case("tomorrow") {
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    } else {
        today
    };

    Schedule { day: date.format("%a").to_string(), date: date.format("%b %d").to_string(), time }
}

/// Venue, city and state from a card's location line.
fn parse_location(line: Option<String>) -> (String, String, String) {
    let Some(line) = line else {
        return (LOCATION_NOT_AVAILABLE.into(), CITY_NOT_AVAILABLE.into(), STATE_NOT_AVAILABLE.into());
    };

    match line.split_once('•') {
        Some((venue, place)) => {
            let (city, state) = match place.trim().split_once(',') {
                Some((city, state)) => (city.trim().to_string(), state.trim().to_string()),
                None => (place.trim().to_string(), STATE_NOT_AVAILABLE.to_string()),
            };
            (venue.trim().to_string(), city, state)
        }
        None => (line, CITY_NOT_AVAILABLE.into(), STATE_NOT_AVAILABLE.into()),
    }
}

fn location_line(card: &ElementRef) -> Option<String> {
    let sub = card.select(&SUB_CONTENT).next()?;
    let line = sub.select(&LOCATION_LINE).next()?;
    Some(clean_text(line.text())).filter(|text| !text.is_empty())
}

/// Extract every event on one listing page.
pub fn extract_events(html: &str, today: NaiveDate) -> Vec<EventRecord> {
    let document = Html::parse_document(html);

    let schedules: Vec<Schedule> = document
        .select(&CALENDAR_BLOCK)
        .map(|block| {
            block
                .select(&CALENDAR_TEXT)
                .next()
                .map(|text| parse_calendar(&clean_text(text.text()), today))
                .unwrap_or_default()
        })
        .collect();

    let cards: Vec<ElementRef> = document.select(&CARD).collect();
    if cards.len() != schedules.len() {
        tracing::warn!(cards = cards.len(), calendars = schedules.len(), "event cards and calendars differ in count");
    }

    let mut events = Vec::with_capacity(cards.len());
    for (idx, card) in cards.iter().enumerate() {
        let name = match card.select(&NAME).next().map(|n| clean_text(n.text())) {
            Some(name) if !name.is_empty() => name,
            _ => {
                tracing::warn!(card = idx, "skipping event card without a name");
                continue;
            }
        };

        let (location, city, state) = parse_location(location_line(card));
        let schedule = schedules.get(idx).cloned().unwrap_or_default();

        events.push(EventRecord {
            name,
            location,
            city,
            state,
            day: schedule.day,
            date: schedule.date,
            time: schedule.time,
        });
    }

    events
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        // a Thursday
        NaiveDate::from_ymd_opt(2020, 4, 16).unwrap()
    }

    fn card(name: Option<&str>, location: Option<&str>) -> String {
        let name = name
            .map(|n| {
                format!(
                    r#"<div class="eds-event-card__formatted-name--is-clamped eds-event-card__formatted-name--is-clamped-three eds-text-weight--heavy" role="presentation">{n}</div>"#
                )
            })
            .unwrap_or_default();
        let location = location
            .map(|l| {
                format!(
                    r#"<div class="eds-media-card-content__sub-content"><div class="card-text--truncated__one">{l}</div></div>"#
                )
            })
            .unwrap_or_default();
        format!(
            r#"<article class="eds-l-pad-all-4 eds-media-card-content eds-media-card-content--list">{name}{location}</article>"#
        )
    }

    fn calendar(text: &str) -> String {
        format!(
            r#"<div class="search-event-card-square-image"><div class="eds-text-color--primary-brand eds-l-pad-bot-1 eds-text-weight--heavy eds-text-bs">{text}</div></div>"#
        )
    }

    fn page(cards: &[String], calendars: &[String]) -> String {
        format!("<html><body><ul>{}</ul><ul>{}</ul></body></html>", cards.concat(), calendars.concat())
    }

    #[test]
    fn test_parse_calendar_full_form() {
        let schedule = parse_calendar("Sat, Apr 18, 3:00 PM", today());
        assert_eq!(schedule, Schedule { day: "Sat".into(), date: "Apr 18".into(), time: "3:00 PM".into() });
    }

    #[test]
    fn test_parse_calendar_today() {
        let schedule = parse_calendar("Today at 6:00 PM", today());
        assert_eq!(schedule, Schedule { day: "Thu".into(), date: "Apr 16".into(), time: "6:00 PM".into() });
    }

    #[test]
    fn test_parse_calendar_tomorrow() {
        let schedule = parse_calendar("Tomorrow at 5:30 PM", today());
        assert_eq!(schedule, Schedule { day: "Fri".into(), date: "Apr 17".into(), time: "5:30 PM".into() });
    }

    #[test]
    fn test_parse_calendar_tomorrow_crosses_month() {
        let end_of_month = NaiveDate::from_ymd_opt(2020, 4, 30).unwrap();
        let schedule = parse_calendar("tomorrow at 9:00 AM", end_of_month);
        assert_eq!(schedule.date, "May 01");
    }

    #[test]
    fn test_parse_calendar_unknown_word_is_today() {
        let schedule = parse_calendar("Tonight at 8:00 PM", today());
        assert_eq!(schedule.date, "Apr 16");
        assert_eq!(schedule.time, "8:00 PM");
    }

    #[test]
    fn test_parse_calendar_unparsable_text() {
        let schedule = parse_calendar("Happening now", today());
        assert_eq!(schedule, Schedule { day: "Thu".into(), date: "Apr 16".into(), time: String::new() });
    }

    #[test]
    fn test_parse_calendar_two_tokens() {
        let schedule = parse_calendar("Sat, Apr 18", today());
        assert_eq!(schedule.time, "");
        assert_eq!(schedule.date, "Apr 18");
    }

    #[test]
    fn test_parse_location_full() {
        let parsed = parse_location(Some("Brightmoor Christian Church • Novi, MI".into()));
        assert_eq!(parsed, ("Brightmoor Christian Church".into(), "Novi".into(), "MI".into()));
    }

    #[test]
    fn test_parse_location_venue_only() {
        let parsed = parse_location(Some("Fisherman's Landing Launch and Campground".into()));
        assert_eq!(parsed.0, "Fisherman's Landing Launch and Campground");
        assert_eq!(parsed.1, CITY_NOT_AVAILABLE);
        assert_eq!(parsed.2, STATE_NOT_AVAILABLE);
    }

    #[test]
    fn test_parse_location_missing() {
        let parsed = parse_location(None);
        assert_eq!(parsed.0, LOCATION_NOT_AVAILABLE);
    }

    #[test]
    fn test_extract_events_pairs_cards_and_calendars() {
        let html = page(
            &[
                card(Some("Drag Queen Bingo"), Some("The Bus Stop Bar &amp; Grille • Birch Run, MI")),
                card(Some("Spring Fishing"), Some("Fisherman's Landing")),
            ],
            &[calendar("Thu, Apr 16, 8:00 PM"), calendar("Tomorrow at 5:30 PM")],
        );

        let events = extract_events(&html, today());
        assert_eq!(events.len(), 2);

        assert_eq!(
            events[0],
            EventRecord {
                name: "Drag Queen Bingo".into(),
                location: "The Bus Stop Bar & Grille".into(),
                city: "Birch Run".into(),
                state: "MI".into(),
                day: "Thu".into(),
                date: "Apr 16".into(),
                time: "8:00 PM".into(),
            }
        );
        assert_eq!(events[1].city, CITY_NOT_AVAILABLE);
        assert_eq!(events[1].date, "Apr 17");
    }

    #[test]
    fn test_extract_events_skips_nameless_cards() {
        let html = page(
            &[card(None, Some("Somewhere • Lansing, MI")), card(Some("Concert"), None)],
            &[calendar("Sat, Apr 18, 3:00 PM"), calendar("Sun, Apr 19, 1:00 PM")],
        );

        let events = extract_events(&html, today());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Concert");
        assert_eq!(events[0].location, LOCATION_NOT_AVAILABLE);
        assert_eq!(events[0].day, "Sun");
    }

    #[test]
    fn test_extract_events_missing_calendar_leaves_schedule_empty() {
        let html = page(&[card(Some("Concert"), None)], &[]);
        let events = extract_events(&html, today());
        assert_eq!(events.len(), 1);
        assert!(events[0].day.is_empty());
        assert!(events[0].time.is_empty());
    }

    #[test]
    fn test_extract_events_empty_page() {
        assert!(extract_events("<html><body></body></html>", today()).is_empty());
        assert!(extract_events("", today()).is_empty());
    }
}
