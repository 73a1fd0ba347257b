//! Inline markup tokens shared between the derived columns and the renderer.
//!
//! A token reads `<text::props>`, where `props` is a JSON object of text
//! properties, e.g. `<+10%::{"color": "darkgreen"}>`. Tokens of one cell are
//! separated by line breaks.

use crate::error::PpaReportError;
use serde_json::Map;
use serde_json::Value as JsonValue;
use std::fmt::Display;

const TOKEN_OPEN: char = '<';
const TOKEN_CLOSE: char = '>';
const PROPS_SEPARATOR: &str = "::";

/// Text properties carried by a token.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextProps {
    pub color: Option<String>,
}

impl TextProps {
    pub fn color(color: &str) -> Self {
        TextProps {
            color: Some(color.to_owned()),
        }
    }
}

impl Display for TextProps {
    /// Writes `{}` or `{"color": "<name>"}`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.color {
            Some(color) => write!(f, "{{\"color\": \"{}\"}}", color),
            None => write!(f, "{{}}"),
        }
    }
}

/// A single `<text::props>` token.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub text: String,
    pub props: TextProps,
}

/// Wraps `text` into a token.
pub fn wrap(text: &str, props: &TextProps) -> String {
    format!("{TOKEN_OPEN}{text}{PROPS_SEPARATOR}{props}{TOKEN_CLOSE}")
}

/// Parses one token, `None` when `raw` is not a token.
pub fn unwrap(raw: &str) -> Result<Option<Token>, PpaReportError> {
    let Some(inner) = raw
        .trim()
        .strip_prefix(TOKEN_OPEN)
        .and_then(|rest| rest.strip_suffix(TOKEN_CLOSE))
    else {
        return Ok(None);
    };
    // Props never contain the separator, the text might
    let Some((text, props)) = inner.rsplit_once(PROPS_SEPARATOR) else {
        return Ok(None);
    };
    let props: Map<String, JsonValue> = serde_json::from_str(props)?;
    let color = props
        .get("color")
        .and_then(JsonValue::as_str)
        .map(str::to_owned);
    Ok(Some(Token {
        text: text.to_owned(),
        props: TextProps { color },
    }))
}

/// Splits a cell into display lines, replacing every token by its text.
/// Lines that are not tokens are kept as they are.
pub fn strip(cell: &str) -> Vec<String> {
    cell.lines()
        .map(|line| match unwrap(line) {
            Ok(Some(token)) => token.text,
            _ => line.to_owned(),
        })
        .collect()
}
