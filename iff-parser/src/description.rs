/// Joins session detail fields into one block of text.
///
/// Each field becomes `"<label>: <text>"` and fields are separated by a blank
/// line, in the order given. A label that already ends in `:` keeps its own
/// colon and a field with empty text renders as the label alone.
pub fn format_description<L, T>(fields: &[(L, T)]) -> String
where
    L: AsRef<str>,
    T: AsRef<str>,
{
    fields
        .iter()
        .map(|(label, text)| {
            let label = label.as_ref().trim();
            let text = text.as_ref().trim();
            let colon = if label.ends_with(':') { "" } else { ":" };

            if text.is_empty() {
                format!("{label}{colon}")
            } else {
                format!("{label}{colon} {text}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}
