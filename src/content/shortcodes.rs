use regex::Regex;
use std::sync::LazyLock;

static CAPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[caption[^\]]*\](.*?)\[/caption\]").expect("caption pattern")
});

static GALLERY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[gallery[^\]]*\]").expect("gallery pattern"));

static EMBED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[embed[^\]]*\](.*?)\[/embed\]").expect("embed pattern")
});

pub(super) fn strip_shortcodes(content: &str) -> String {
    let content = CAPTION.replace_all(content, "$1");
    let content = GALLERY.replace_all(&content, "");
    EMBED.replace_all(&content, "$1").into_owned()
}
