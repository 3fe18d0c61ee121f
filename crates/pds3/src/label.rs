use crate::error::Error;
use std::collections::BTreeMap;

/// One value in a parsed PDS3 label.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A bare or quoted scalar, e.g. `MARS` or `"A description."`.
    Scalar(String),
    /// A `(a, b, c)` or `{a, b, c}` set/sequence value.
    Set(Vec<String>),
    /// A nested `OBJECT = NAME ... END_OBJECT = NAME` block.
    Object(Label),
}

impl Value {
    /// Returns this value as a scalar string, if it is one.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Value::Scalar(s) => Some(s),
            _ => None,
        }
    }

    /// Returns this value as a nested label, if it is an object.
    pub fn as_object(&self) -> Option<&Label> {
        match self {
            Value::Object(label) => Some(label),
            _ => None,
        }
    }

    /// Returns this value's scalars flattened to a `Vec`, regardless of
    /// whether it was written as a single scalar or a set. Mirrors the
    /// "Polymorphic collection payloads" design note: several PDS3 fields
    /// accept either a single value or a list and callers must normalize.
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Value::Scalar(s) => vec![s],
            Value::Set(values) => values,
            Value::Object(_) => Vec::new(),
        }
    }
}

/// A parsed PDS3 label: an ordered-by-key map from keyword to value, with
/// repeated keywords (e.g. multiple `PERSONNEL` objects) collapsed into a
/// single `Value::Set`-shaped entry the caller is expected to know how to
/// widen back out via [`Label::all`].
///
/// The exact PDS3 grammar (originally a Lark grammar in the source project)
/// is treated as an implementation detail behind this type: callers only
/// see keyword lookups and nested objects, never token streams.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Label {
    fields: BTreeMap<String, Vec<Value>>,
}

impl Label {
    /// Returns the first value stored under `keyword`, if any.
    pub fn get(&self, keyword: &str) -> Option<&Value> {
        self.fields.get(keyword).and_then(|values| values.first())
    }

    /// Returns every value stored under `keyword` (for repeated keywords
    /// such as multiple `OBJECT = PERSONNEL` blocks).
    pub fn all(&self, keyword: &str) -> &[Value] {
        self.fields.get(keyword).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the scalar string stored under `keyword`, or an error
    /// naming the missing field.
    pub fn require_scalar(&self, keyword: &'static str) -> Result<String, Error> {
        self.get(keyword)
            .and_then(Value::as_scalar)
            .map(|s| s.to_string())
            .ok_or(Error::MissingKeyword(keyword))
    }

    /// Returns the scalar string stored under `keyword`, if present.
    pub fn scalar(&self, keyword: &str) -> Option<String> {
        self.get(keyword).and_then(Value::as_scalar).map(str::to_string)
    }

    /// Returns the nested object stored under `keyword`, or an error
    /// naming the missing field.
    pub fn require_object(&self, keyword: &'static str) -> Result<&Label, Error> {
        self.get(keyword)
            .and_then(Value::as_object)
            .ok_or(Error::MissingKeyword(keyword))
    }

    fn insert(&mut self, keyword: String, value: Value) {
        self.fields.entry(keyword).or_default().push(value);
    }

    /// Parses PDS3 label text into a [`Label`] tree. Supports flat
    /// `KEYWORD = VALUE` statements, quoted and multi-line string values,
    /// `(a, b, c)`/`{a, b, c}` set values, and nested
    /// `OBJECT = NAME ... END_OBJECT = NAME` blocks. Comments (`/* ... */`)
    /// and the terminal `END` statement are skipped.
    pub fn parse(text: &str) -> Result<Label, Error> {
        let statements = tokenize(text)?;
        let mut cursor = statements.iter().peekable();
        let label = parse_block(&mut cursor, None)?;
        Ok(label)
    }
}

#[derive(Debug, Clone)]
struct Statement {
    keyword: String,
    raw_value: String,
}

fn tokenize(text: &str) -> Result<Vec<Statement>, Error> {
    let stripped = strip_comments(text);
    let mut statements = Vec::new();
    let mut pending: Option<(String, String)> = None;

    for line in stripped.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            continue;
        }
        if let Some((keyword, mut value)) = pending.take() {
            if is_balanced(&value) {
                statements.push(Statement { keyword, raw_value: value });
            } else {
                value.push('\n');
                value.push_str(line.trim());
                pending = Some((keyword, value));
                continue;
            }
        }
        let trimmed = line.trim();
        if trimmed == "END" || trimmed.is_empty() {
            continue;
        }
        let Some(eq_pos) = trimmed.find('=') else {
            continue;
        };
        let keyword = trimmed[..eq_pos].trim().to_string();
        let value = trimmed[eq_pos + 1..].trim().to_string();
        if is_balanced(&value) {
            statements.push(Statement { keyword, raw_value: value });
        } else {
            pending = Some((keyword, value));
        }
    }
    if let Some((keyword, raw_value)) = pending {
        statements.push(Statement { keyword, raw_value });
    }
    Ok(statements)
}

fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            while let Some(c) = chars.next() {
                if c == '*' && chars.peek() == Some(&'/') {
                    chars.next();
                    break;
                }
            }
            continue;
        }
        out.push(c);
    }
    out
}

fn is_balanced(value: &str) -> bool {
    let quotes = value.matches('"').count();
    if quotes % 2 != 0 {
        return false;
    }
    let mut depth = 0i32;
    let mut in_quotes = false;
    for c in value.chars() {
        match c {
            '"' => in_quotes = !in_quotes,
            '(' | '{' if !in_quotes => depth += 1,
            ')' | '}' if !in_quotes => depth -= 1,
            _ => {}
        }
    }
    depth == 0
}

fn parse_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if (trimmed.starts_with('(') && trimmed.ends_with(')'))
        || (trimmed.starts_with('{') && trimmed.ends_with('}'))
    {
        let inner = &trimmed[1..trimmed.len() - 1];
        let items = split_set(inner).into_iter().map(unquote).collect();
        Value::Set(items)
    } else {
        Value::Scalar(unquote(trimmed.to_string()))
    }
}

fn split_set(inner: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for c in inner.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                current.push(c);
            }
            ',' if !in_quotes => {
                items.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        items.push(current.trim().to_string());
    }
    items
}

fn unquote(value: String) -> String {
    let trimmed = value.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        trimmed[1..trimmed.len() - 1].to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_block<'a, I>(cursor: &mut std::iter::Peekable<I>, expected_end: Option<&str>) -> Result<Label, Error>
where
    I: Iterator<Item = &'a Statement>,
{
    let mut label = Label::default();
    while let Some(statement) = cursor.next() {
        if statement.keyword == "END_OBJECT" {
            let closed = unquote(statement.raw_value.clone());
            if let Some(expected) = expected_end {
                if closed != expected {
                    return Err(Error::MismatchedObject {
                        expected: expected.to_string(),
                        found: closed,
                    });
                }
            }
            return Ok(label);
        }
        if statement.keyword == "OBJECT" {
            let name = unquote(statement.raw_value.clone());
            let nested = parse_block(cursor, Some(&name))?;
            label.insert(name, Value::Object(nested));
            continue;
        }
        label.insert(statement.keyword.clone(), parse_value(&statement.raw_value));
    }
    if expected_end.is_some() {
        return Err(Error::UnterminatedObject);
    }
    Ok(label)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_keywords() {
        let label = Label::parse(
            r#"
            DATA_SET_ID = "IZENBERG-DATA"
            VOLUME_FORMAT = ISO9660
            END
            "#,
        )
        .unwrap();
        assert_eq!(label.require_scalar("DATA_SET_ID").unwrap(), "IZENBERG-DATA");
        assert_eq!(label.require_scalar("VOLUME_FORMAT").unwrap(), "ISO9660");
    }

    #[test]
    fn parses_set_values() {
        let label = Label::parse(r#"INSTRUMENT_ID = {"NS", "GRS"}"#).unwrap();
        let values = label.get("INSTRUMENT_ID").unwrap().clone().into_vec();
        assert_eq!(values, vec!["NS".to_string(), "GRS".to_string()]);
    }

    #[test]
    fn parses_nested_objects() {
        let label = Label::parse(
            r#"
            OBJECT = CATALOG
              MISSION_CATALOG = MISSION.CAT
            END_OBJECT = CATALOG
            "#,
        )
        .unwrap();
        let catalog = label.require_object("CATALOG").unwrap();
        assert_eq!(catalog.require_scalar("MISSION_CATALOG").unwrap(), "MISSION.CAT");
    }

    #[test]
    fn rejects_mismatched_end_object() {
        let result = Label::parse(
            r#"
            OBJECT = CATALOG
              X = Y
            END_OBJECT = WRONG_NAME
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn handles_multiline_quoted_values() {
        let label = Label::parse(
            "DATA_SET_DESC = \"This is a\nmultiline description.\"\nEND",
        )
        .unwrap();
        assert!(label.require_scalar("DATA_SET_DESC").unwrap().contains("multiline"));
    }
}
