use regex::{Captures, Regex};
use std::sync::LazyLock;

static EMPTY_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<p(?:\s[^>]*)?>\s*</p>").expect("empty paragraph pattern"));

// Preformatted blocks may span lines; inline code is protected only within one line.
static PROTECTED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s:<pre\b[^>]*>.*?</pre>)|<code\b[^>]*>.*?</code>").expect("protected pattern")
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("space pattern"));

static BETWEEN_TAGS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("between tags pattern"));

static CODE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<pre\b([^>]*)><code\b").expect("code block pattern"));

static CLASS_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\s+class\s*=\s*(?:"[^"]*"|'[^']*'|[^\s>]+)"#).expect("class pattern")
});

pub(super) fn tidy(content: &str) -> String {
    let content = EMPTY_PARAGRAPH.replace_all(content, "");
    let collapsed = collapse_outside_code(&content);
    let canonical = CODE_BLOCK.replace_all(&collapsed, |caps: &Captures| {
        let attrs = CLASS_ATTR.replace_all(&caps[1], "");
        format!(r#"<pre class="wp-block-code"{attrs}><code"#)
    });
    canonical.trim().to_string()
}

fn collapse_outside_code(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for protected in PROTECTED.find_iter(content) {
        out.push_str(&collapse(&content[last..protected.start()]));
        out.push_str(protected.as_str());
        last = protected.end();
    }
    out.push_str(&collapse(&content[last..]));
    out
}

fn collapse(fragment: &str) -> String {
    let spaced = WHITESPACE.replace_all(fragment, " ");
    BETWEEN_TAGS.replace_all(&spaced, "><").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_whitespace_is_preserved() {
        assert_eq!(
            tidy("<pre><code>a    b</code></pre><p>a    b</p>"),
            r#"<pre class="wp-block-code"><code>a    b</code></pre><p>a b</p>"#
        );
    }

    #[test]
    fn multiline_pre_round_trips() {
        let pre = "<pre>fn main() {\n    let x = 1;\n}</pre>";
        assert_eq!(tidy(&format!("<div>\n  {pre}\n</div>")), format!("<div> {pre} </div>"));
    }

    #[test]
    fn inline_code_is_protected() {
        assert_eq!(
            tidy("<p>use   <code>a  =  b</code>   here</p>"),
            "<p>use <code>a  =  b</code> here</p>"
        );
    }

    #[test]
    fn empty_paragraphs_are_removed() {
        assert_eq!(tidy("<p class=\"x\"> \n </p><p>kept</p><p></p>"), "<p>kept</p>");
    }

    #[test]
    fn whitespace_between_tags_is_dropped() {
        assert_eq!(tidy("  <ul>\n  <li>a</li>\n  <li>b</li>\n</ul>  "), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn code_block_class_is_canonical_and_stable() {
        let once = tidy(r#"<pre class="lang-rust" data-x="1"><code class="rs">x</code></pre>"#);
        assert_eq!(
            once,
            r#"<pre class="wp-block-code" data-x="1"><code class="rs">x</code></pre>"#
        );
        assert_eq!(tidy(&once), once);
    }
}
