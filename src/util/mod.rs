use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// Shown wherever an optional field is absent.
pub(crate) const PLACEHOLDER: &str = "-";

pub(crate) fn or_placeholder(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => PLACEHOLDER.to_string(),
    }
}

/// Format a server timestamp as `dd MMM yyyy` (e.g. `05 Mar 2024`).
///
/// Timestamps are shown in the offset they were sent with (the API sends UTC).
pub(crate) fn format_created_at(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return PLACEHOLDER.to_string();
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d %b %Y").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%d %b %Y").to_string();
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.format("%d %b %Y").to_string();
    }

    PLACEHOLDER.to_string()
}

/// Resolve an image reference to a fetchable URL.
///
/// Absolute references pass through; storage-relative ones are served from
/// `{base}/uploads/`, with a leading `uploads/` (or `uploads\`) segment dropped.
pub(crate) fn resolve_image_url(base_url: &str, reference: &str) -> String {
    if reference.starts_with("http") {
        return reference.to_string();
    }

    let path = reference.trim_start_matches('/');
    let path = path
        .strip_prefix("uploads/")
        .or_else(|| path.strip_prefix("uploads\\"))
        .unwrap_or(path);

    format!("{}/uploads/{}", base_url.trim_end_matches('/'), path)
}

const NAMED_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("lt", '<'),
    ("gt", '>'),
    ("quot", '"'),
    ("apos", '\''),
    ("nbsp", '\u{a0}'),
    ("copy", '\u{a9}'),
    ("reg", '\u{ae}'),
    ("trade", '\u{2122}'),
    ("deg", '\u{b0}'),
    ("times", '\u{d7}'),
    ("divide", '\u{f7}'),
    ("middot", '\u{b7}'),
    ("bull", '\u{2022}'),
    ("hellip", '\u{2026}'),
    ("ndash", '\u{2013}'),
    ("mdash", '\u{2014}'),
    ("lsquo", '\u{2018}'),
    ("rsquo", '\u{2019}'),
    ("ldquo", '\u{201c}'),
    ("rdquo", '\u{201d}'),
    ("laquo", '\u{ab}'),
    ("raquo", '\u{bb}'),
    ("euro", '\u{20ac}'),
    ("pound", '\u{a3}'),
    ("yen", '\u{a5}'),
    ("cent", '\u{a2}'),
    ("sect", '\u{a7}'),
    ("para", '\u{b6}'),
];

// Longest name above plus room for `#x10FFFF`.
const MAX_ENTITY_LEN: usize = 10;

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix('x').or_else(|| num.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }

    NAMED_ENTITIES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, c)| *c)
}

/// Decode HTML character references in a single left-to-right pass.
///
/// Output is never rescanned, so `&amp;lt;` becomes `&lt;`, not `<`.
/// Unknown or malformed references are kept verbatim.
pub(crate) fn decode_html_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];

        let decoded = after
            .char_indices()
            .take(MAX_ENTITY_LEN + 1)
            .find(|(_, c)| *c == ';')
            .and_then(|(semi, _)| decode_entity(&after[..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &after[semi + 1..];
            }
            None => {
                out.push('&');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}
