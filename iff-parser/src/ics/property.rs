use std::fmt::{self, Write};

use thiserror::Error;

/// Longest physical line, in octets and excluding the CRLF, before folding.
pub const MAX_LINE_OCTETS: usize = 75;

/// Characters that force a parameter value to be quoted.
const PARAM_DELIMITERS: &[char] = &[';', ':', ',', '"', '\\'];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PropertyError {
    #[error("`{0}` is not a valid property or parameter name")]
    InvalidName(String),
    #[error("parameter value {0:?} contains a control character")]
    ControlCharacter(String),
}

/// Parameters of a content line, kept in first-seen order.
///
/// Values given for an already present name are appended to that name's list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters(Vec<(String, Vec<String>)>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, values)) => values.push(value),
            None => self.0.push((name, vec![value])),
        }
    }

    /// Replaces all values of `name`, keeping its position if already present.
    fn insert(&mut self, name: impl Into<String>, values: Vec<String>) {
        let name = name.into();

        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, existing)) => *existing = values,
            None => self.0.push((name, values)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, values)| values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One logical content line: `NAME;PARAM=a,b:value`.
///
/// Names always match `[A-Za-z0-9-]+` and parameter values never hold
/// control characters other than tab, so every property can be written out
/// and parsed back. Displaying a property yields its wire form, folded to
/// [`MAX_LINE_OCTETS`] and terminated by CRLF. The value is written as is;
/// escaping it is up to whoever builds the property.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    name: String,
    parameters: Parameters,
    value: String,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Result<Self, PropertyError> {
        let name = checked_name(name.into())?;

        Ok(Self {
            name,
            parameters: Parameters::new(),
            value: value.into(),
        })
    }

    /// For names fixed in this crate, which are known to be tokens.
    pub(crate) fn fixed(name: &'static str, value: impl Into<String>) -> Self {
        debug_assert_eq!(token_len(name), name.len(), "`{name}` is not a token");

        Self {
            name: name.to_string(),
            parameters: Parameters::new(),
            value: value.into(),
        }
    }

    /// Appends a value to the parameter `name`.
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, PropertyError> {
        let name = checked_name(name.into())?;
        let value = checked_parameter_value(value.into())?;

        self.parameters.push(name, value);
        Ok(self)
    }

    /// Replaces every value of the parameter `name`.
    pub fn with_parameter_values(
        mut self,
        name: impl Into<String>,
        values: Vec<String>,
    ) -> Result<Self, PropertyError> {
        let name = checked_name(name.into())?;
        let values = values
            .into_iter()
            .map(checked_parameter_value)
            .collect::<Result<Vec<_>, _>>()?;

        self.parameters.insert(name, values);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Parses an unfolded content line, returning `None` if it is malformed.
    pub fn parse(line: &str) -> Option<Self> {
        let name_len = token_len(line);
        if name_len == 0 {
            return None;
        }

        let mut property = Property {
            name: line[..name_len].to_string(),
            parameters: Parameters::new(),
            value: String::new(),
        };
        let mut rest = &line[name_len..];

        loop {
            match rest.as_bytes().first().copied()? {
                b':' => {
                    property.value = rest[1..].to_string();
                    return Some(property);
                }
                b';' => rest = parse_parameter(&rest[1..], &mut property.parameters)?,
                _ => return None,
            }
        }
    }

    fn unfolded(&self) -> String {
        let mut line = self.name.clone();

        for (name, values) in self.parameters.iter() {
            line.push(';');
            line.push_str(name);
            line.push('=');

            for (idx, value) in values.iter().enumerate() {
                if idx > 0 {
                    line.push(',');
                }
                push_parameter_value(&mut line, value);
            }
        }

        line.push(':');
        line.push_str(&self.value);
        line
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fold(&self.unfolded(), f)
    }
}

/// Backslashes are escaped before quotes, so the inserted backslashes of `\"`
/// are never escaped a second time.
fn push_parameter_value(line: &mut String, value: &str) {
    if !value.contains(PARAM_DELIMITERS) {
        line.push_str(value);
        return;
    }

    let escaped = value.replace('\\', r"\\").replace('"', r#"\""#);
    line.push('"');
    line.push_str(&escaped);
    line.push('"');
}

/// Splits `line` so that no physical line exceeds [`MAX_LINE_OCTETS`],
/// never inside a multi-byte character. Continuations start with a space,
/// which counts toward their length.
fn fold<W: Write>(line: &str, out: &mut W) -> fmt::Result {
    let mut octets = 0;
    let mut segment_start = 0;

    for (idx, ch) in line.char_indices() {
        if octets + ch.len_utf8() > MAX_LINE_OCTETS {
            out.write_str(&line[segment_start..idx])?;
            out.write_str("\r\n ")?;
            segment_start = idx;
            octets = 1;
        }
        octets += ch.len_utf8();
    }

    out.write_str(&line[segment_start..])?;
    out.write_str("\r\n")
}

/// Length of the `[A-Za-z0-9-]+` token at the start of `input`.
fn token_len(input: &str) -> usize {
    input
        .bytes()
        .take_while(|byte| byte.is_ascii_alphanumeric() || *byte == b'-')
        .count()
}

fn checked_name(name: String) -> Result<String, PropertyError> {
    if name.is_empty() || token_len(&name) != name.len() {
        return Err(PropertyError::InvalidName(name));
    }

    Ok(name)
}

fn has_control(value: &str) -> bool {
    value.chars().any(|ch| ch.is_ascii_control() && ch != '\t')
}

fn checked_parameter_value(value: String) -> Result<String, PropertyError> {
    if has_control(&value) {
        return Err(PropertyError::ControlCharacter(value));
    }

    Ok(value)
}

/// Parses `NAME=value[,value...]` and returns what follows it.
fn parse_parameter<'a>(input: &'a str, parameters: &mut Parameters) -> Option<&'a str> {
    let name_len = token_len(input);
    if name_len == 0 {
        return None;
    }

    let name = &input[..name_len];
    let mut rest = input[name_len..].strip_prefix('=')?;

    loop {
        let (value, remainder) = parse_parameter_value(rest)?;
        if has_control(&value) {
            return None;
        }
        parameters.push(name, value);

        match remainder.strip_prefix(',') {
            Some(next) => rest = next,
            None => return Some(remainder),
        }
    }
}

fn parse_parameter_value(input: &str) -> Option<(String, &str)> {
    let Some(quoted) = input.strip_prefix('"') else {
        let end = input
            .find(|ch| matches!(ch, ',' | ';' | ':' | '"' | '\\'))
            .unwrap_or(input.len());
        return Some((input[..end].to_string(), &input[end..]));
    };

    let mut value = String::new();
    let mut chars = quoted.char_indices();

    while let Some((idx, ch)) = chars.next() {
        match ch {
            '"' => return Some((value, &quoted[idx + 1..])),
            '\\' => match chars.next()?.1 {
                '\\' => value.push('\\'),
                '"' => value.push('"'),
                other => {
                    value.push('\\');
                    value.push(other);
                }
            },
            _ => value.push(ch),
        }
    }

    None
}

/// Splits calendar text into logical content lines, joining continuation
/// lines (leading space or tab) onto the line before them.
pub fn unfold(text: &str) -> Vec<String> {
    let mut lines: Vec<String> = Vec::new();

    for physical in text.split('\n') {
        let physical = physical.strip_suffix('\r').unwrap_or(physical);

        if let (Some(continuation), Some(last)) =
            (physical.strip_prefix([' ', '\t']), lines.last_mut())
        {
            last.push_str(continuation);
        } else if !physical.is_empty() {
            lines.push(physical.to_string());
        }
    }

    lines
}
