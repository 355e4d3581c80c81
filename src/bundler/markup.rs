//! Markup fragments referencing built artifacts.

use crate::bundler::ContentKind;

/// Splits a comma-separated source list, trimming entries and dropping empty ones.
pub fn split_file_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// `<url_base>/<name>`, or just the name without a base.
pub fn artifact_url(url_base: Option<&str>, name: &str) -> String {
    match url_base {
        Some(base) if !base.is_empty() => format!("{}/{}", base.trim_end_matches('/'), name),
        _ => name.to_string(),
    }
}

pub fn script_tag(url: &str) -> String {
    format!(
        r#"<script type="text/javascript" src="{}"></script>"#,
        escape_attr(url)
    )
}

pub fn stylesheet_tag(url: &str) -> String {
    format!(
        r#"<link rel="stylesheet" type="text/css" href="{}" />"#,
        escape_attr(url)
    )
}

/// Tag for kinds that have one; the bare URL otherwise.
pub fn tag_for(kind: &ContentKind, url: &str) -> String {
    match kind {
        ContentKind::Script => script_tag(url),
        ContentKind::Stylesheet => stylesheet_tag(url),
        _ => url.to_string(),
    }
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            c => escaped.push(c),
        }
    }
    escaped
}
