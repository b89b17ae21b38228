use super::BaseUrl;
use super::markup::{ATTR, attr_value, render_attr};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static ANCHOR_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<a\b[^>]*>").expect("anchor pattern"));

pub(super) fn normalize_links(content: &str, base: &BaseUrl) -> String {
    ANCHOR_TAG
        .replace_all(content, |caps: &Captures| {
            ATTR.replace_all(&caps[0], |attr: &Captures| {
                if attr[2].eq_ignore_ascii_case("href") {
                    render_attr(&attr[1], &attr[2], &base.absolutize_link(attr_value(attr)))
                } else {
                    attr[0].to_string()
                }
            })
            .into_owned()
        })
        .into_owned()
}
