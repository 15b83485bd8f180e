use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::{Europe::Madrid, Tz};
use iff_parser::ics::{Calendar, Event};
use iff_parser::{format_description, parse_day, parse_session_fields, EventRecord, Site};
use log::{info, warn};
use tokio::time;
use url::Url;

use crate::fetch::Fetch;

pub const BASE_URL: &str = "https://platform.internetfreedomfestival.org";
pub const PRODUCT_ID: &str = "-//Paul & Ian (www.fluidkeys.com)//Updated hourly from IFF website/";
pub const CALENDAR_NAME: &str = "IFF 2019 program";

pub const DOWNLOAD_FAILED: &str = "[error downloading session description]";
pub const INTERPRET_FAILED: &str = "[error interpreting session description]";

const TIME_ZONE: Tz = Madrid;

pub struct DayPage {
    pub url: String,
    pub date: NaiveDate,
}

impl DayPage {
    fn midnight(&self) -> Option<DateTime<Tz>> {
        TIME_ZONE.from_local_datetime(&self.date.into()).earliest()
    }
}

pub fn site() -> Result<Site> {
    let base_url = Url::parse(BASE_URL).context("Invalid base URL")?;
    Ok(Site::new(base_url, "2019-", "internetfreedomfestival.org"))
}

/// The festival ran April 1st to 5th, published as days 6 to 10.
pub fn day_pages() -> Vec<DayPage> {
    (6..=10)
        .zip(1..=5)
        .filter_map(|(day, date)| {
            Some(DayPage {
                url: format!("{BASE_URL}/en/IFF2019/public/schedule/custom?day={day}"),
                date: NaiveDate::from_ymd_opt(2019, 4, date)?,
            })
        })
        .collect()
}

/// Scrapes every day page in order and enriches each event with its session
/// description. Only a failing day page aborts the run.
pub async fn collect_events<F: Fetch>(
    fetcher: &F,
    site: &Site,
    days: &[DayPage],
    delay: Duration,
) -> Result<Vec<EventRecord>> {
    let mut events = Vec::new();

    for (idx, day) in days.iter().enumerate() {
        if idx > 0 {
            time::sleep(delay).await;
        }

        info!("Scraping {}", day.url);
        let html = fetcher
            .fetch(&day.url)
            .await
            .with_context(|| format!("Failed to fetch day page {}", day.url))?;

        let midnight = day
            .midnight()
            .with_context(|| format!("No local midnight on {}", day.date))?;

        for mut event in parse_day(&html, midnight, site) {
            info!(
                "{} | {} - {} @ {}",
                event.title,
                event.start.format("%H:%M"),
                event.end.format("%H:%M"),
                event.location
            );

            event.description = describe(fetcher, &event).await;
            events.push(event);
        }
    }

    Ok(events)
}

/// Fetches and formats the event's session page. Failures degrade to a
/// placeholder text; events without a session page get no description.
pub async fn describe<F: Fetch>(fetcher: &F, event: &EventRecord) -> Option<String> {
    if !event.has_detail_page() {
        return None;
    }

    let html = match fetcher.fetch(&event.url).await {
        Ok(html) => html,
        Err(err) => {
            warn!("No description for `{}`: {err}", event.title);
            return Some(DOWNLOAD_FAILED.to_string());
        }
    };

    match parse_session_fields(&html) {
        Ok(fields) => Some(format_description(&fields)),
        Err(err) => {
            warn!("No description for `{}`: {err} ({})", event.title, event.url);
            Some(INTERPRET_FAILED.to_string())
        }
    }
}

pub fn build_calendar(site: &Site, events: &[EventRecord], stamp: DateTime<Utc>) -> Calendar {
    let mut calendar = Calendar::new(PRODUCT_ID, CALENDAR_NAME);

    for record in events {
        let mut event = Event::new(uid(site, record), stamp);
        event.set_start(record.start);
        event.set_end(record.end);
        event.set_location(&record.location);
        event.set_summary(&record.title);

        if let Some(description) = &record.description {
            event.set_description(description);
        }

        if record.has_detail_page() {
            event.set_url(&record.url);
        }

        if let Some(track) = &record.track {
            event.add_category(track);
        }

        calendar.add_event(event);
    }

    calendar
}

/// Records without a session page are identified by start time and title.
fn uid(site: &Site, record: &EventRecord) -> String {
    if !record.id.is_empty() {
        return record.id.clone();
    }

    format!(
        "{}_{}@{}",
        record.start.format("%Y%m%dT%H%M%S"),
        record.title.replace(' ', "-"),
        site.uid_domain
    )
}
