use super::BaseUrl;
use super::markup::{ATTR, attr, attr_value, render_attr};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static MEDIA_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<(?:img|source)\b[^>]*>").expect("media tag pattern"));

static FIGURE_WRAPPER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<figure class="wp-block-image[^"]*"[^>]*>"#).expect("figure pattern")
});

static NOSCRIPT_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<noscript>\s*<img[^>]*>\s*</noscript>").expect("noscript pattern")
});

pub(super) fn normalize_images(content: &str, base: &BaseUrl) -> String {
    let content = MEDIA_TAG.replace_all(content, |caps: &Captures| rewrite_media_tag(&caps[0], base));
    let content = FIGURE_WRAPPER.replace_all(&content, r#"<figure class="wp-block-image">"#);
    NOSCRIPT_IMAGE.replace_all(&content, "").into_owned()
}

fn rewrite_media_tag(tag: &str, base: &BaseUrl) -> String {
    let is_img = tag.get(..4).is_some_and(|open| open.eq_ignore_ascii_case("<img"));
    let src = attr(tag, "src");
    let lazy_src = attr(tag, "data-src").map(|value| base.absolutize_asset(value));
    let placeholder = src.is_none_or(is_placeholder);
    let promote = lazy_src.is_some() && placeholder;

    ATTR.replace_all(tag, |caps: &Captures| {
        let ws = &caps[1];
        let name = &caps[2];
        let value = attr_value(caps);
        match name.to_ascii_lowercase().as_str() {
            "src" => match (&lazy_src, promote) {
                (Some(real), true) => render_attr(ws, name, real),
                _ => render_attr(ws, name, &base.absolutize_asset(value)),
            },
            "data-src" => match (&lazy_src, promote) {
                (Some(real), true) if src.is_none() => render_attr(ws, "src", real),
                (Some(_), true) => String::new(),
                _ => render_attr(ws, name, &base.absolutize_asset(value)),
            },
            "srcset" => render_attr(ws, name, &base.absolutize_srcset(value)),
            "style" if is_img && !value.contains("width:") => String::new(),
            _ => caps[0].to_string(),
        }
    })
    .into_owned()
}

fn is_placeholder(src: &str) -> bool {
    src.trim_start()
        .get(..10)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:image"))
}
