use chrono::{DateTime, NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::{Europe::Madrid, Tz};
use url::Url;

use iff_parser::ics::{unfold, Calendar, Event, Property, MAX_LINE_OCTETS};
use iff_parser::{extract_blocks, format_description, parse_day, parse_session_fields, Site};

const DAY_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>IFF 2019 schedule</title></head>
<body>
<div class="container schedule">
  <div class="row">
    <div class="col-md-11 special_event_block">
      <div class="row"><h5 class="session_titles">IFF Opening Ceremony</h5></div>
      <div class="row">
        <div class="col-md-2"><i class="fa fa-clock-o" aria-hidden="true"></i> 11:30 - 12:30PM</div>
        <div class="col-md-2"><i class="fa fa-map-marker" aria-hidden="true"></i> La Plaza</div>
      </div>
    </div>
  </div>
  <div class="row">
    <a href="/en/IFF2019/public/schedule/session/412">
      <div class="col-md-5 event_block">
        <div class="row">
          <h5 class="session_titles">The double edge of "Fake News": Disinformation and attacks on the media</h5>
        </div>
        <div class="row">
          <div class="col-md-3 session_info"><i class="fa fa-clock-o" aria-hidden="true"></i> 02:45 - 03:45PM (1.0h) </div>
        </div>
        <div class="row">
          <div class="col-md-3 session_info"><i class="fa fa-pencil-square-o" aria-hidden="true"></i>
          Journalism, Media and Comms
          </div>
        </div>
        <div class="row">
          <div class="col-md-3 session_info"><i class="fa fa-map-marker" aria-hidden="true"></i> Theater </div>
        </div>
      </div>
    </a>
    <a href="/en/IFF2019/public/schedule/session/413">
      <div class="col-md-5 event_block">
        <div class="row"><h5 class="session_titles">Community meetup</h5></div>
        <div class="row">
          <div class="col-md-3 session_info"><i class="fa fa-clock-o" aria-hidden="true"></i> TBD </div>
        </div>
      </div>
    </a>
    <a href="/en/IFF2019/public/schedule/session/414">
      <div class="col-md-5 event_block">
        <div class="row"><h5 class="session_titles">Morning coffee with the organisers</h5></div>
        <div class="row">
          <div class="col-md-3 session_info"><i class="fa fa-clock-o" aria-hidden="true"></i> 09:00 - 11:00AM (2.0h)</div>
        </div>
        <div class="row">
          <div class="col-md-3 session_info"><i class="fa fa-map-marker" aria-hidden="true"></i> Sala Europa </div>
        </div>
      </div>
    </a>
  </div>
</div>
</body>
</html>"#;

const SESSION_PAGE: &str = r#"<html><body>
<h3>The double edge of "Fake News"</h3>
<dl class="session_details">
  <dt>Description</dt>
  <dd><p>How disinformation campaigns are used against journalists,
      and what newsrooms can do about it.</p></dd>
  <dt>Speakers</dt>
  <dd>María José, Ahmed</dd>
  <dt>Language</dt>
  <dd>English / Español</dd>
</dl>
</body></html>"#;

fn site() -> Site {
    Site::new(
        Url::parse("https://platform.internetfreedomfestival.org").unwrap(),
        "2019-",
        "internetfreedomfestival.org",
    )
}

fn april_first() -> DateTime<Tz> {
    Madrid
        .from_local_datetime(&NaiveDate::from_ymd_opt(2019, 4, 1).unwrap().into())
        .unwrap()
}

#[test]
fn day_page_yields_events_in_page_order() {
    let events = parse_day(DAY_PAGE, april_first(), &site());

    let summary = events
        .iter()
        .map(|event| {
            (
                event.title.as_str(),
                event.start.hour(),
                event.start.minute(),
                event.end.hour(),
                event.end.minute(),
            )
        })
        .collect::<Vec<_>>();

    assert_eq!(
        summary,
        vec![
            ("IFF Opening Ceremony", 11, 30, 12, 30),
            (
                "The double edge of \"Fake News\": Disinformation and attacks on the media",
                14,
                45,
                15,
                45
            ),
            ("Morning coffee with the organisers", 9, 0, 11, 0),
        ]
    );

    assert_eq!(events[1].id, "2019-412@internetfreedomfestival.org");
    assert_eq!(
        events[1].url,
        "https://platform.internetfreedomfestival.org/en/IFF2019/public/schedule/session/412"
    );
    assert_eq!(events[2].track, None);
    assert_eq!(events[2].location, "Sala Europa");
}

#[test]
fn unresolvable_time_is_reported_not_defaulted() {
    let outcomes = extract_blocks(DAY_PAGE, april_first(), &site());

    assert_eq!(outcomes.len(), 4);
    assert!(outcomes[2].is_err());
    assert!(!parse_day(DAY_PAGE, april_first(), &site())
        .iter()
        .any(|event| event.title == "Community meetup"));
}

#[test]
fn session_page_becomes_description() {
    let fields = parse_session_fields(SESSION_PAGE).unwrap();

    assert_eq!(
        format_description(&fields),
        "Description: How disinformation campaigns are used against journalists, \
         and what newsrooms can do about it.\n\n\
         Speakers: María José, Ahmed\n\n\
         Language: English / Español"
    );
}

#[test]
fn calendar_output_is_folded_and_reparseable() {
    let stamp = Utc.with_ymd_and_hms(2019, 3, 25, 10, 0, 0).unwrap();
    let description = format_description(&parse_session_fields(SESSION_PAGE).unwrap());

    let mut calendar = Calendar::new(
        "-//Paul & Ian (www.fluidkeys.com)//Updated hourly from IFF website/",
        "IFF 2019 program",
    );

    for record in parse_day(DAY_PAGE, april_first(), &site()) {
        let mut event = Event::new(&record.id, stamp);
        event.set_start(record.start);
        event.set_end(record.end);
        event.set_location(&record.location);
        event.set_description(&description);
        event.set_summary(&record.title);
        event.set_url(&record.url);
        calendar.add_event(event);
    }

    let serialized = calendar.serialize();
    assert!(serialized.starts_with("BEGIN:VCALENDAR\r\n"));
    assert!(serialized.ends_with("END:VCALENDAR\r\n"));

    for physical in serialized.split("\r\n") {
        assert!(physical.len() <= MAX_LINE_OCTETS, "{physical:?}");
        assert!(!physical.contains('\n'));
    }

    let lines = unfold(&serialized);
    let properties = lines
        .iter()
        .map(|line| Property::parse(line))
        .collect::<Option<Vec<_>>>()
        .expect("every emitted line parses");

    let begins = properties
        .iter()
        .filter(|property| property.name() == "BEGIN" && property.value() == "VEVENT")
        .count();
    assert_eq!(begins, 3);

    for (line, property) in lines.iter().zip(&properties) {
        assert_eq!(unfold(&property.to_string()), vec![line.clone()]);
    }

    assert!(lines.contains(&"DTSTART:20190401T124500Z".to_string()));
    assert!(lines.contains(&"SUMMARY:IFF Opening Ceremony".to_string()));
}
