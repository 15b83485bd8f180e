use chrono::DateTime;
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use crate::{resolve_time_window, EventRecord, SessionParseError, Site, SkipReason};

macro_rules! selector {
    ($query:expr) => {{
        static SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse($query).unwrap());
        &SELECTOR
    }};
}

/// Extracts every event of one day page, logging and dropping the blocks that
/// cannot be turned into a record.
pub fn parse_day<S: AsRef<str>>(html: S, midnight: DateTime<Tz>, site: &Site) -> Vec<EventRecord> {
    extract_blocks(html, midnight, site)
        .into_iter()
        .filter_map(|block| {
            block
                .map_err(|reason| log::warn!("Skipping event block: {reason}"))
                .ok()
        })
        .collect()
}

/// Extracts one outcome per event block, in page order.
///
/// Both `event_block` and `special_event_block` divs are considered.
pub fn extract_blocks<S: AsRef<str>>(
    html: S,
    midnight: DateTime<Tz>,
    site: &Site,
) -> Vec<Result<EventRecord, SkipReason>> {
    let html = Html::parse_document(html.as_ref());

    html.select(selector!(r#"div[class*="event_block"]"#))
        .map(|block| parse_event_block(block, midnight, site))
        .collect()
}

fn parse_event_block(
    element: ElementRef,
    midnight: DateTime<Tz>,
    site: &Site,
) -> Result<EventRecord, SkipReason> {
    let title = element
        .select(selector!("h5"))
        .next()
        .map(|heading| collapse_whitespace(&text_of(heading)))
        .filter(|title| !title.is_empty())
        .ok_or(SkipReason::MissingRequiredField("title"))?;

    let time_text = labelled_info(element, selector!("i.fa-clock-o"))
        .ok_or(SkipReason::MissingRequiredField("time"))?;
    let window = resolve_time_window(&time_text, midnight)?;

    let location = labelled_info(element, selector!("i.fa-map-marker")).unwrap_or_default();
    let track = labelled_info(element, selector!("i.fa-pencil-square-o"));

    let link = element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| ancestor.value().name() == "a")
        .and_then(|anchor| anchor.value().attr("href"))
        .and_then(|href| site.resolve(href));

    let (id, url) = match link {
        Some(url) => (site.uid_for(&url), url.to_string()),
        None => (String::new(), String::new()),
    };

    Ok(EventRecord {
        id,
        title,
        start: window.start,
        end: window.end,
        location,
        track,
        url,
        description: None,
    })
}

/// Text of the element holding the given icon, e.g.
/// `<div><i class="fa fa-map-marker"></i> Theater </div>`.
fn labelled_info(element: ElementRef, icon: &Selector) -> Option<String> {
    let holder = element
        .select(icon)
        .next()?
        .parent()
        .and_then(ElementRef::wrap)?;

    Some(text_of(holder).trim().to_string())
}

fn text_of(element: ElementRef) -> String {
    element.text().collect()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reads the label/text pairs of a session detail page, in page order.
///
/// ```html
/// <dl class="session_details">
///   <dt>Description</dt><dd>...</dd>
///   <dt>Speakers</dt><dd>...</dd>
/// </dl>
/// ```
pub fn parse_session_fields<S: AsRef<str>>(
    html: S,
) -> Result<Vec<(String, String)>, SessionParseError> {
    let html = Html::parse_document(html.as_ref());

    let labels = html
        .select(selector!("dl.session_details > dt"))
        .map(|label| collapse_whitespace(&text_of(label)))
        .collect::<Vec<_>>();

    let values = html
        .select(selector!("dl.session_details > dd"))
        .map(|value| collapse_whitespace(&text_of(value)))
        .collect::<Vec<_>>();

    if labels.len() != values.len() {
        return Err(SessionParseError::MismatchedFields {
            labels: labels.len(),
            values: values.len(),
        });
    }

    if labels.is_empty() {
        return Err(SessionParseError::NoFields);
    }

    Ok(labels.into_iter().zip(values).collect())
}
