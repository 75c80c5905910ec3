//! Front matter extraction for Hugo content files.
//!
//! Hugo accepts three front matter formats, detected by the
//! opening delimiter:
//!
//! - `+++` TOML (parsed with `toml`)
//! - `---` YAML (parsed with `yaml-rust`)
//! - `{`   JSON (parsed with `serde_json`)
//!
//! Every format is normalized into a JSON object with lowercased
//! keys so callers read values through one set of accessors.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Number, Value};
use yaml_rust::{Yaml, YamlLoader};

/// Front matter format, by delimiter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Toml,
    Yaml,
    Json,
}

/// Parsed front matter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    fields: Map<String, Value>,
}

impl FrontMatter {
    /// Raw value for a key (keys are case-insensitive)
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(&key.to_ascii_lowercase())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Non-empty string value
    pub fn str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Boolean value; `"true"`/`"false"` strings are accepted
    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// String list; a single string becomes a one-element list
    pub fn string_list(&self, key: &str) -> Vec<String> {
        match self.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s.trim().to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .filter(|s| !s.is_empty())
                .collect(),
            Some(Value::String(s)) if !s.trim().is_empty() => vec![s.trim().to_string()],
            _ => Vec::new(),
        }
    }

    /// Date value
    ///
    /// Accepts RFC 3339, local date-times (`2024-01-02T10:00:00`,
    /// read as UTC) and bare dates (`2024-01-02`, midnight UTC).
    pub fn date(&self, key: &str) -> Option<DateTime<Utc>> {
        self.str(key).and_then(parse_date)
    }
}

/// Parse the date spellings Hugo accepts in front matter
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    // "2006-01-02 15:04:05 -0700" style
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S %z") {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Split a content file into front matter and body
///
/// A file without front matter yields an empty `FrontMatter` and the
/// whole text as body.
///
/// # Errors
///
/// Returns a message describing the problem when a front matter
/// block is opened but unterminated or does not parse. The caller
/// attaches the file path.
pub fn split(text: &str) -> std::result::Result<(FrontMatter, &str), String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    if let Some((inner, body)) = delimited(text, "+++")? {
        return Ok((parse(Format::Toml, inner)?, body));
    }

    if let Some((inner, body)) = delimited(text, "---")? {
        return Ok((parse(Format::Yaml, inner)?, body));
    }

    if text.starts_with('{') {
        let mut stream = serde_json::Deserializer::from_str(text).into_iter::<Value>();
        return match stream.next() {
            Some(Ok(Value::Object(map))) => {
                let body = &text[stream.byte_offset()..];
                Ok((normalize(map), body.trim_start_matches(['\r', '\n'])))
            }
            Some(Ok(_)) => Err("JSON front matter must be an object".to_string()),
            Some(Err(e)) => Err(format!("JSON front matter: {e}")),
            None => Ok((FrontMatter::default(), text)),
        };
    }

    Ok((FrontMatter::default(), text))
}

/// Parse a front matter block of a known format
pub fn parse(format: Format, raw: &str) -> std::result::Result<FrontMatter, String> {
    match format {
        Format::Toml => {
            let table: toml::Table =
                toml::from_str(raw).map_err(|e| format!("TOML front matter: {e}"))?;
            let map = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect::<Map<_, _>>();
            Ok(normalize(map))
        }
        Format::Yaml => {
            let docs =
                YamlLoader::load_from_str(raw).map_err(|e| format!("YAML front matter: {e}"))?;
            match docs.first() {
                None | Some(Yaml::Null) => Ok(FrontMatter::default()),
                Some(doc) => match yaml_to_json(doc) {
                    Value::Object(map) => Ok(normalize(map)),
                    _ => Err("YAML front matter must be a mapping".to_string()),
                },
            }
        }
        Format::Json => match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(normalize(map)),
            Ok(_) => Err("JSON front matter must be an object".to_string()),
            Err(e) => Err(format!("JSON front matter: {e}")),
        },
    }
}

/// Find a `delim`-fenced block at the top of `text`
fn delimited<'a>(
    text: &'a str,
    delim: &str,
) -> std::result::Result<Option<(&'a str, &'a str)>, String> {
    let Some(rest) = text.strip_prefix(delim) else {
        return Ok(None);
    };
    let rest = match rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n')) {
        Some(rest) => rest,
        None => return Ok(None),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == delim {
            let inner = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok(Some((inner, body)));
        }
        offset += line.len();
    }

    Err(format!("unterminated front matter (missing closing {delim})"))
}

fn normalize(map: Map<String, Value>) -> FrontMatter {
    let fields = map
        .into_iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), v))
        .collect();
    FrontMatter { fields }
}

fn toml_to_json(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Array(items.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

fn yaml_to_json(value: &Yaml) -> Value {
    match value {
        Yaml::String(s) => Value::String(s.clone()),
        Yaml::Integer(i) => Value::Number((*i).into()),
        Yaml::Real(raw) => raw
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(raw.clone())),
        Yaml::Boolean(b) => Value::Bool(*b),
        Yaml::Array(items) => Value::Array(items.iter().map(yaml_to_json).collect()),
        Yaml::Hash(hash) => Value::Object(
            hash.iter()
                .filter_map(|(k, v)| {
                    let key = match k {
                        Yaml::String(s) => s.clone(),
                        Yaml::Integer(i) => i.to_string(),
                        Yaml::Boolean(b) => b.to_string(),
                        _ => return None,
                    };
                    Some((key, yaml_to_json(v)))
                })
                .collect(),
        ),
        Yaml::Alias(_) | Yaml::Null | Yaml::BadValue => Value::Null,
    }
}
