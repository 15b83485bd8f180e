use std::fmt;

use chrono::{DateTime, TimeZone, Utc};

use super::Property;

const VERSION: &str = "2.0";
const METHOD: &str = "REQUEST";

/// A `VCALENDAR` with its events, in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Calendar {
    product_id: String,
    name: String,
    events: Vec<Event>,
}

/// A `VEVENT`. Built up first, then handed to [`Calendar::add_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    uid: String,
    stamp: DateTime<Utc>,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
    location: Option<String>,
    description: Option<String>,
    summary: Option<String>,
    url: Option<String>,
    categories: Vec<String>,
}

impl Calendar {
    pub fn new(product_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            events: Vec::new(),
        }
    }

    /// Appends an event. Duplicate UIDs are not rejected here.
    pub fn add_event(&mut self, event: Event) -> usize {
        self.events.push(event);
        self.events.len() - 1
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn properties(&self) -> Vec<Property> {
        vec![
            Property::fixed("VERSION", VERSION),
            Property::fixed("PRODID", escape_text(&self.product_id)),
            Property::fixed("METHOD", METHOD),
            Property::fixed("NAME", escape_text(&self.name)),
            Property::fixed("X-WR-CALNAME", escape_text(&self.name)),
        ]
    }

    /// The full calendar in its folded, CRLF-terminated wire form.
    pub fn serialize(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Property::fixed("BEGIN", "VCALENDAR"))?;
        for property in self.properties() {
            write!(f, "{property}")?;
        }

        for event in &self.events {
            write!(f, "{}", Property::fixed("BEGIN", "VEVENT"))?;
            for property in event.properties() {
                write!(f, "{property}")?;
            }
            write!(f, "{}", Property::fixed("END", "VEVENT"))?;
        }

        write!(f, "{}", Property::fixed("END", "VCALENDAR"))
    }
}

impl Event {
    pub fn new<Tz: TimeZone>(uid: impl Into<String>, stamp: DateTime<Tz>) -> Self {
        Self {
            uid: uid.into(),
            stamp: stamp.with_timezone(&Utc),
            start: None,
            end: None,
            location: None,
            description: None,
            summary: None,
            url: None,
            categories: Vec::new(),
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn set_stamp<Tz: TimeZone>(&mut self, stamp: DateTime<Tz>) {
        self.stamp = stamp.with_timezone(&Utc);
    }

    pub fn set_start<Tz: TimeZone>(&mut self, start: DateTime<Tz>) {
        self.start = Some(start.with_timezone(&Utc));
    }

    pub fn set_end<Tz: TimeZone>(&mut self, end: DateTime<Tz>) {
        self.end = Some(end.with_timezone(&Utc));
    }

    pub fn set_location(&mut self, location: impl Into<String>) {
        self.location = Some(location.into());
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = Some(description.into());
    }

    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = Some(summary.into());
    }

    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = Some(url.into());
    }

    pub fn add_category(&mut self, category: impl Into<String>) {
        self.categories.push(category.into());
    }

    /// Properties in emission order; unset fields are left out.
    pub fn properties(&self) -> Vec<Property> {
        let mut properties = vec![
            Property::fixed("UID", escape_text(&self.uid)),
            Property::fixed("DTSTAMP", format_utc(&self.stamp)),
        ];

        let times = [("DTSTART", &self.start), ("DTEND", &self.end)];
        for (name, time) in times {
            if let Some(time) = time {
                properties.push(Property::fixed(name, format_utc(time)));
            }
        }

        let texts = [
            ("LOCATION", &self.location),
            ("DESCRIPTION", &self.description),
            ("SUMMARY", &self.summary),
        ];
        for (name, text) in texts {
            if let Some(text) = text {
                properties.push(Property::fixed(name, escape_text(text)));
            }
        }

        if let Some(url) = &self.url {
            properties.push(Property::fixed("URL", url.as_str()));
        }

        if !self.categories.is_empty() {
            let categories = self
                .categories
                .iter()
                .map(|category| escape_text(category))
                .collect::<Vec<_>>()
                .join(",");
            properties.push(Property::fixed("CATEGORIES", categories));
        }

        properties
    }
}

fn format_utc(time: &DateTime<Utc>) -> String {
    time.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escapes a TEXT value: `\`, `;` and `,` get a backslash, line breaks
/// become `\n`.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\\' => escaped.push_str(r"\\"),
            ';' => escaped.push_str(r"\;"),
            ',' => escaped.push_str(r"\,"),
            '\r' => {
                chars.next_if_eq(&'\n');
                escaped.push_str(r"\n");
            }
            '\n' => escaped.push_str(r"\n"),
            _ => escaped.push(ch),
        }
    }

    escaped
}
