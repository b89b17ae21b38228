use regex::{Captures, Regex};
use std::sync::LazyLock;

static STRIP_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("strip pattern"));

/// One attribute inside a tag. Groups: leading whitespace, name, then the value as
/// double-quoted, single-quoted or bare.
pub(crate) static ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(\s+)([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#,
    )
    .expect("attribute pattern")
});

pub(crate) fn attr_value<'h>(caps: &Captures<'h>) -> &'h str {
    caps.get(3)
        .or_else(|| caps.get(4))
        .or_else(|| caps.get(5))
        .map_or("", |m| m.as_str())
}

pub(crate) fn attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    ATTR.captures_iter(tag)
        .find(|caps| caps[2].eq_ignore_ascii_case(name))
        .map(|caps| attr_value(&caps))
}

pub(crate) fn render_attr(ws: &str, name: &str, value: &str) -> String {
    if value.contains('"') {
        format!("{ws}{name}='{value}'")
    } else {
        format!("{ws}{name}=\"{value}\"")
    }
}

pub(crate) fn strip_tags(html: &str) -> String {
    STRIP_TAGS.replace_all(html, "").into_owned()
}
