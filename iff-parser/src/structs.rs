use chrono::DateTime;
use chrono_tz::Tz;
use url::Url;

#[cfg(feature = "serde")]
use serde::Serialize;

/// One scheduled session as listed on a day page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub location: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub track: Option<String>,
    pub url: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub description: Option<String>,
}

impl EventRecord {
    /// Whether the record links to a detail page that can be enriched.
    #[must_use]
    pub fn has_detail_page(&self) -> bool {
        !self.url.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

/// Where the schedule lives and how its session identifiers are namespaced.
#[derive(Debug, Clone)]
pub struct Site {
    pub base_url: Url,
    pub uid_prefix: String,
    pub uid_domain: String,
}

impl Site {
    pub fn new(base_url: Url, uid_prefix: impl Into<String>, uid_domain: impl Into<String>) -> Self {
        Self {
            base_url,
            uid_prefix: uid_prefix.into(),
            uid_domain: uid_domain.into(),
        }
    }

    /// Resolves a link found on a page against the site's base URL.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        self.base_url.join(href.trim()).ok()
    }

    /// `<prefix><last non-empty path segment>@<domain>`
    pub fn uid_for(&self, url: &Url) -> String {
        let segment = url
            .path_segments()
            .and_then(|segments| segments.filter(|segment| !segment.is_empty()).last())
            .unwrap_or_default();

        format!("{}{}@{}", self.uid_prefix, segment, self.uid_domain)
    }
}
