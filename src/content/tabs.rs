use scraper::node::Text;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

static TABS_CONTAINER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".wp-block-stackable-tabs").expect("tabs container selector")
});

static TAB_TITLE: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".stk-block-tabs__tab .stk-block-tab-labels__text span")
        .expect("tab title selector")
});

static TAB_PANEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"[role="tabpanel"]"#).expect("tab panel selector"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub title: String,
    pub content_html: String,
}

/// A tab widget pulled out of a post, replaced in the HTML by `placeholder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabBlock {
    pub placeholder: String,
    pub tabs: Vec<Tab>,
    pub initial_tab: usize,
    /// Byte offset of `placeholder` in the rendered HTML.
    pub offset: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderedContent {
    pub html: String,
    pub tabs: Vec<TabBlock>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Html(&'a str),
    Tabs(&'a TabBlock),
}

impl RenderedContent {
    /// Splits the HTML at each block's placeholder so tab widgets can be rendered in place.
    /// Placeholder text that happens to occur in the post itself stays HTML.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        let mut segments = Vec::with_capacity(self.tabs.len() * 2 + 1);
        let mut last = 0;
        for block in &self.tabs {
            let end = block.offset + block.placeholder.len();
            if block.offset < last
                || self.html.get(block.offset..end) != Some(block.placeholder.as_str())
            {
                tracing::debug!(offset = block.offset, "tab placeholder not found at its offset");
                continue;
            }
            let before = &self.html[last..block.offset];
            if !before.trim().is_empty() {
                segments.push(Segment::Html(before));
            }
            segments.push(Segment::Tabs(block));
            last = end;
        }
        let rest = &self.html[last..];
        if !rest.trim().is_empty() {
            segments.push(Segment::Html(rest));
        }
        segments
    }
}

pub fn placeholder(n: usize) -> String {
    format!("__TABS_{n}__")
}

/// Replaces every stacked-tabs container holding more than one tab with a placeholder
/// and returns the extracted blocks in document order. HTML without such a container
/// comes back unchanged; otherwise the fragment is re-serialized.
pub fn extract_tab_blocks(html: &str) -> (String, Vec<TabBlock>) {
    let mut document = Html::parse_fragment(html);
    let containers: Vec<_> = document.select(&TABS_CONTAINER).map(|el| el.id()).collect();
    let mut blocks = Vec::new();
    let mut replaced = Vec::new();

    for container in document.select(&TABS_CONTAINER) {
        if container
            .ancestors()
            .any(|ancestor| containers.contains(&ancestor.id()))
        {
            continue;
        }

        let tabs = read_tabs(container);
        if tabs.len() < 2 {
            tracing::debug!(tabs = tabs.len(), "tabs container left inline");
            continue;
        }

        let initial_tab = container
            .value()
            .attr("data-initial-tab")
            .and_then(|value| value.trim().parse::<usize>().ok())
            .map_or(0, |one_based| one_based.saturating_sub(1))
            .min(tabs.len() - 1);

        replaced.push(container.id());
        blocks.push(TabBlock {
            placeholder: placeholder(blocks.len()),
            tabs,
            initial_tab,
            offset: 0,
        });
    }

    if blocks.is_empty() {
        return (html.to_string(), blocks);
    }

    // Marks each removed container with a character the serialized fragment never contains.
    let Some(marker) = unused_char(&document.root_element().inner_html()) else {
        tracing::warn!("no free marker character, tabs left inline");
        return (html.to_string(), Vec::new());
    };
    for id in &replaced {
        if let Some(mut node) = document.tree.get_mut(*id) {
            node.insert_before(Node::Text(Text {
                text: marker.to_string().into(),
            }));
            node.detach();
        }
    }

    let serialized = document.root_element().inner_html();
    let mut pieces = serialized.split(marker);
    let mut out = String::with_capacity(serialized.len());
    out.push_str(pieces.next().unwrap_or_default());
    for (block, piece) in blocks.iter_mut().zip(pieces) {
        block.offset = out.len();
        out.push_str(&block.placeholder);
        out.push_str(piece);
    }
    (out, blocks)
}

fn read_tabs(container: ElementRef<'_>) -> Vec<Tab> {
    let titles = container
        .select(&TAB_TITLE)
        .map(|span| span.text().collect::<String>().trim().to_string());
    let panels = container.select(&TAB_PANEL);

    titles
        .zip(panels)
        .filter(|(title, _)| !title.is_empty())
        .map(|(title, panel)| Tab {
            title,
            content_html: panel.inner_html(),
        })
        .collect()
}

fn unused_char(text: &str) -> Option<char> {
    ('\u{E000}'..='\u{F8FF}').find(|candidate| !text.contains(*candidate))
}
