//! Message template rendering
//!
//! Templates are tera strings evaluated against the build [`Context`]:
//! `"{{ repo.name }} #{{ build.number }} {{ build.status }}"`. Unknown fields
//! and syntax errors are errors, never blanks.

use std::collections::HashMap;
use std::fmt::Write as _;

use chrono::DateTime;
use tera::{Tera, Value};

use crate::context::Context;
use crate::error::Result;

const TEMPLATE_NAME: &str = "message";
const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Renders `template` against `context` and trims surrounding whitespace.
pub fn render(template: &str, context: &Context) -> Result<String> {
    let mut tera = Tera::default();
    // Chat text, not HTML
    tera.autoescape_on(vec![]);
    tera.register_filter("uppercase_first", uppercase_first);
    tera.register_filter("datetime", datetime);
    tera.register_filter("duration", duration);
    tera.add_raw_template(TEMPLATE_NAME, template)?;

    let vars = tera::Context::from_serialize(context)?;
    let rendered = tera.render(TEMPLATE_NAME, &vars)?;
    Ok(rendered.trim().to_string())
}

fn uppercase_first(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("uppercase_first expects a string"))?;

    let mut chars = text.chars();
    let out = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    Ok(Value::String(out))
}

/// `{{ build.started | datetime(format="%H:%M") }}`, unix seconds in UTC.
fn datetime(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let secs = value
        .as_i64()
        .ok_or_else(|| tera::Error::msg("datetime expects a unix timestamp"))?;
    let format = args
        .get("format")
        .and_then(Value::as_str)
        .unwrap_or(DEFAULT_DATETIME_FORMAT);

    let ts = DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| tera::Error::msg(format!("timestamp {} is out of range", secs)))?;

    let mut out = String::new();
    write!(out, "{}", ts.format(format))
        .map_err(|_| tera::Error::msg(format!("invalid datetime format '{}'", format)))?;
    Ok(Value::String(out))
}

/// `{{ build.finished | duration(since=build.started) }}` -> `1m 5s`
fn duration(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let end = value
        .as_i64()
        .ok_or_else(|| tera::Error::msg("duration expects a unix timestamp"))?;
    let since = match args.get("since") {
        Some(v) => v
            .as_i64()
            .ok_or_else(|| tera::Error::msg("duration `since` must be a unix timestamp"))?,
        None => 0,
    };

    let secs = end
        .checked_sub(since)
        .ok_or_else(|| tera::Error::msg("duration out of range"))?;
    Ok(Value::String(format_duration(secs)))
}

fn format_duration(secs: i64) -> String {
    if secs <= 0 {
        return "0s".to_string();
    }

    let (hours, minutes, seconds) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}
