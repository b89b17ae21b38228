//! Turns WordPress post HTML into markup that is safe to drop into the blog reader.
//!
//! Processing runs as fixed, ordered stages: image URLs, link URLs, shortcodes, then
//! whitespace cleanup. Each stage is a best-effort rewrite that leaves anything it does
//! not recognize untouched, so malformed input degrades instead of failing.

mod cleanup;
mod images;
mod links;
mod markup;
mod shortcodes;
mod tabs;

pub use tabs::{RenderedContent, Segment, Tab, TabBlock, extract_tab_blocks, placeholder};

use crate::model::{DEFAULT_BASE_URL, Settings};
use anyhow::{Context, Result};
use url::Url;

/// Entities decoded in excerpts, in the order they are applied.
const EXCERPT_ENTITIES: [(&str, &str); 6] = [
    ("&quot;", "\""),
    ("&#8217;", "'"),
    ("&#8216;", "'"),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
];

/// Origin that relative content URLs resolve against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrl {
    origin: String,
    host: String,
}

impl Default for BaseUrl {
    fn default() -> Self {
        Self {
            origin: String::from(DEFAULT_BASE_URL),
            host: String::from("imrichard.com"),
        }
    }
}

impl BaseUrl {
    pub fn parse(raw: &str) -> Result<Self> {
        let url = Url::parse(raw.trim()).with_context(|| format!("invalid base url {raw}"))?;
        if !matches!(url.scheme(), "http" | "https") {
            anyhow::bail!("base url must use http or https: {raw}");
        }
        let Some(host) = url.host_str() else {
            anyhow::bail!("base url has no host: {raw}");
        };

        Ok(Self {
            origin: url.origin().ascii_serialization(),
            host: host.to_ascii_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.origin
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub(crate) fn absolutize_asset(&self, value: &str) -> String {
        let value = value.trim();
        if is_root_relative(value) {
            format!("{}{value}", self.origin)
        } else if value.starts_with("wp-content/uploads/") {
            format!("{}/{value}", self.origin)
        } else {
            self.upgrade_protocol(value)
        }
    }

    /// Rewrites the URL of each srcset candidate. Separators, descriptors and URLs that need
    /// no rewriting are copied byte for byte.
    pub(crate) fn absolutize_srcset(&self, value: &str) -> String {
        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while !rest.is_empty() {
            let separators = rest.len()
                - rest
                    .trim_start_matches(|c: char| c == ',' || c.is_whitespace())
                    .len();
            out.push_str(&rest[..separators]);
            rest = &rest[separators..];
            if rest.is_empty() {
                break;
            }

            let url_len = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let token = &rest[..url_len];
            rest = &rest[url_len..];
            // A URL ending in commas ends the candidate with no descriptor.
            let url = token.trim_end_matches(',');
            out.push_str(&self.absolutize_asset(url));
            out.push_str(&token[url.len()..]);
            if url.len() != token.len() {
                continue;
            }

            let descriptor = descriptor_len(rest);
            out.push_str(&rest[..descriptor]);
            rest = &rest[descriptor..];
        }
        out
    }

    pub(crate) fn absolutize_link(&self, value: &str) -> String {
        let value = value.trim();
        let lower = value.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return self.upgrade_protocol(value);
        }
        if lower.starts_with("mailto:")
            || lower.starts_with("tel:")
            || value.starts_with('#')
            || value.starts_with("//")
        {
            return value.to_string();
        }
        if value.starts_with('/') {
            format!("{}{value}", self.origin)
        } else {
            format!("{}/{value}", self.origin)
        }
    }

    /// `http://<host>` becomes `https://<host>`; other hosts are left alone.
    fn upgrade_protocol(&self, value: &str) -> String {
        let prefix_len = "http://".len() + self.host.len();
        let same_host = value
            .get(..prefix_len)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(&format!("http://{}", self.host)));
        let at_boundary = value
            .get(prefix_len..)
            .and_then(|rest| rest.chars().next())
            .is_none_or(|next| matches!(next, '/' | '?' | '#' | ':'));

        if same_host && at_boundary {
            format!("https://{}{}", self.host, &value[prefix_len..])
        } else {
            value.to_string()
        }
    }
}

/// Length of the descriptor text before the comma that closes a srcset candidate.
fn descriptor_len(rest: &str) -> usize {
    let mut depth = 0usize;
    for (idx, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => return idx,
            _ => {}
        }
    }
    rest.len()
}

fn is_root_relative(value: &str) -> bool {
    value.starts_with('/') && !value.starts_with("//")
}

#[derive(Debug, Clone, Default)]
pub struct ContentProcessor {
    base: BaseUrl,
}

impl ContentProcessor {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base: BaseUrl::parse(base_url)?,
        })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(&settings.base_url).context("invalid base_url in settings")
    }

    pub fn base_url(&self) -> &BaseUrl {
        &self.base
    }

    pub fn process_content(&self, raw: &str) -> String {
        if raw.is_empty() {
            return String::new();
        }

        let content = images::normalize_images(raw, &self.base);
        let content = links::normalize_links(&content, &self.base);
        let content = shortcodes::strip_shortcodes(&content);
        cleanup::tidy(&content)
    }

    /// Plain text of an excerpt: tags stripped, common entities decoded, trimmed.
    pub fn process_excerpt(&self, raw: &str) -> String {
        excerpt_text(raw)
    }

    pub fn render_content(&self, raw: &str) -> RenderedContent {
        let (html, tabs) = extract_tab_blocks(&self.process_content(raw));
        RenderedContent { html, tabs }
    }
}

pub fn excerpt_text(raw: &str) -> String {
    decode_entities(&markup::strip_tags(raw)).trim().to_string()
}

/// Post titles only carry typographic quotes.
pub fn decode_title(raw: &str) -> String {
    raw.replace("&#8217;", "'").replace("&#8216;", "'")
}

fn decode_entities(text: &str) -> String {
    EXCERPT_ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, plain)| acc.replace(entity, plain))
}
