use crate::content::{BaseUrl, ContentProcessor, decode_title};
use anyhow::{Context, Result};
use serde::Deserialize;
use time::PrimitiveDateTime;
use time::macros::format_description;

pub const POSTS_PER_PAGE: u32 = 50;
pub const CATEGORIES_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
struct Rendered {
    #[serde(default)]
    rendered: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Embedded {
    #[serde(default)]
    author: Vec<EmbeddedAuthor>,
    #[serde(default, rename = "wp:featuredmedia")]
    featured_media: Vec<EmbeddedMedia>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddedAuthor {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddedMedia {
    #[serde(default)]
    source_url: Option<String>,
}

/// A post as returned by `/wp-json/wp/v2/posts`.
#[derive(Debug, Clone, Deserialize)]
pub struct WpPost {
    pub id: u64,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    title: Rendered,
    #[serde(default)]
    content: Rendered,
    #[serde(default)]
    excerpt: Rendered,
    #[serde(default)]
    pub categories: Vec<u64>,
    #[serde(default, rename = "_embedded")]
    embedded: Option<Embedded>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WpCategory {
    pub id: u64,
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPost {
    pub id: u64,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub date: String,
    pub slug: String,
    pub categories: Vec<u64>,
    pub featured_image: Option<String>,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogCategory {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub count: u32,
}

pub fn posts_endpoint(base: &BaseUrl) -> String {
    format!(
        "{}/wp-json/wp/v2/posts?per_page={POSTS_PER_PAGE}&_embed",
        base.as_str()
    )
}

pub fn categories_endpoint(base: &BaseUrl) -> String {
    format!(
        "{}/wp-json/wp/v2/categories?per_page={CATEGORIES_PER_PAGE}",
        base.as_str()
    )
}

impl WpPost {
    pub fn into_blog_post(self, processor: &ContentProcessor) -> BlogPost {
        let embedded = self.embedded.unwrap_or_default();
        let author = embedded
            .author
            .into_iter()
            .map(|author| author.name)
            .find(|name| !name.trim().is_empty())
            .unwrap_or_default();
        let featured_image = embedded
            .featured_media
            .into_iter()
            .find_map(|media| media.source_url);

        BlogPost {
            id: self.id,
            title: decode_title(&self.title.rendered),
            content: processor.process_content(&self.content.rendered),
            excerpt: processor.process_excerpt(&self.excerpt.rendered),
            date: calendar_date(&self.date),
            slug: self.slug,
            categories: self.categories,
            featured_image,
            author,
        }
    }
}

impl From<WpCategory> for BlogCategory {
    fn from(category: WpCategory) -> Self {
        Self {
            id: category.id,
            name: category.name,
            slug: category.slug,
            count: category.count,
        }
    }
}

pub fn parse_posts(raw: &str, processor: &ContentProcessor) -> Result<Vec<BlogPost>> {
    let posts: Vec<WpPost> = serde_json::from_str(raw).context("failed to parse posts response")?;
    Ok(posts
        .into_iter()
        .map(|post| post.into_blog_post(processor))
        .collect())
}

pub fn parse_categories(raw: &str) -> Result<Vec<BlogCategory>> {
    let categories: Vec<WpCategory> =
        serde_json::from_str(raw).context("failed to parse categories response")?;
    Ok(categories.into_iter().map(BlogCategory::from).collect())
}

/// `2024-03-05T10:20:30` becomes `2024-03-05`. Unparseable dates are kept verbatim.
fn calendar_date(raw: &str) -> String {
    let parsed = PrimitiveDateTime::parse(
        raw.trim(),
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    );
    match parsed.map(|moment| moment.date()) {
        Ok(date) => date
            .format(format_description!("[year]-[month]-[day]"))
            .unwrap_or_else(|_| raw.to_string()),
        Err(err) => {
            tracing::debug!(%err, date = raw, "post date not in WordPress format");
            raw.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSTS: &str = r#"[
        {
            "id": 12,
            "date": "2024-03-05T10:20:30",
            "modified": "2024-03-06T00:00:00",
            "slug": "hello-world",
            "status": "publish",
            "title": {"rendered": "Richard&#8217;s first post"},
            "content": {"rendered": "<p>Hi <img src=\"/wp-content/uploads/a.png\"></p>\n<p></p>", "protected": false},
            "excerpt": {"rendered": "<p>Hi &amp; welcome</p>", "protected": false},
            "author": 1,
            "categories": [3, 4],
            "tags": [],
            "_embedded": {
                "author": [{"name": "Richard"}],
                "wp:featuredmedia": [{"source_url": "https://example.com/cover.jpg"}]
            }
        },
        {
            "id": 13,
            "date": "yesterday",
            "title": {"rendered": "Bare"},
            "content": {"rendered": ""},
            "excerpt": {"rendered": ""}
        }
    ]"#;

    fn processor() -> ContentProcessor {
        ContentProcessor::new("https://example.com").expect("processor")
    }

    #[test]
    fn maps_rest_posts() {
        let posts = parse_posts(POSTS, &processor()).expect("posts");
        assert_eq!(posts.len(), 2);

        let first = &posts[0];
        assert_eq!(first.title, "Richard's first post");
        assert_eq!(
            first.content,
            r#"<p>Hi <img src="https://example.com/wp-content/uploads/a.png"></p>"#
        );
        assert_eq!(first.excerpt, "Hi & welcome");
        assert_eq!(first.date, "2024-03-05");
        assert_eq!(first.categories, vec![3, 4]);
        assert_eq!(first.author, "Richard");
        assert_eq!(
            first.featured_image.as_deref(),
            Some("https://example.com/cover.jpg")
        );

        let second = &posts[1];
        assert_eq!(second.date, "yesterday");
        assert_eq!(second.content, "");
        assert_eq!(second.author, "");
        assert!(second.categories.is_empty());
    }

    #[test]
    fn maps_categories() {
        let categories = parse_categories(
            r#"[{"id": 3, "count": 9, "description": "", "link": "x", "name": "Rust", "slug": "rust", "taxonomy": "category", "parent": 0}]"#,
        )
        .expect("categories");
        assert_eq!(
            categories,
            vec![BlogCategory {
                id: 3,
                name: String::from("Rust"),
                slug: String::from("rust"),
                count: 9,
            }]
        );
    }

    #[test]
    fn rejects_non_array_payloads() {
        assert!(parse_posts(r#"{"code": "rest_no_route"}"#, &processor()).is_err());
        assert!(parse_categories("nope").is_err());
    }

    #[test]
    fn endpoints_use_base_url() {
        let base = BaseUrl::parse("https://example.com").expect("base");
        assert_eq!(
            posts_endpoint(&base),
            "https://example.com/wp-json/wp/v2/posts?per_page=50&_embed"
        );
        assert_eq!(
            categories_endpoint(&base),
            "https://example.com/wp-json/wp/v2/categories?per_page=100"
        );
    }
}
