//! Calendar object model and its content-line wire format.

mod calendar;
mod property;

pub use calendar::{escape_text, Calendar, Event};
pub use property::{unfold, Parameters, Property, PropertyError, MAX_LINE_OCTETS};
