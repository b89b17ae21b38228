use deskcore::content::{ContentProcessor, Segment};
use deskcore::model::Settings;

fn processor() -> ContentProcessor {
    ContentProcessor::from_settings(&Settings {
        base_url: String::from("https://example.com"),
        ..Settings::default()
    })
    .expect("processor")
}

const POST: &str = r#"
<p>Intro with <a href="/about">about</a> and <a href="mailto:hi@example.com">mail</a>.</p>
<p>   </p>
[caption id="attachment_1" align="aligncenter"]<figure class="wp-block-image size-full"><img src="data:image/svg+xml;base64,AAAA" data-src="wp-content/uploads/2024/01/cat.jpg" style="margin:0"><noscript><img src="wp-content/uploads/2024/01/cat.jpg"></noscript></figure>[/caption]
<pre class="language-rust"><code>fn main() {
    println!("hi");
}</code></pre>
<div class="wp-block-stackable-tabs" data-initial-tab="2">
  <div class="stk-block-tab-labels">
    <button class="stk-block-tabs__tab"><span class="stk-block-tab-labels__text"><span>First</span></span></button>
    <button class="stk-block-tabs__tab"><span class="stk-block-tab-labels__text"><span>Second</span></span></button>
  </div>
  <div role="tabpanel"><p>one</p></div>
  <div role="tabpanel"><p>two <a href="http://example.com/x">x</a></p></div>
</div>
[gallery ids="1,2"]
<p>Outro</p>
"#;

#[test]
fn full_post_renders_safely() {
    let rendered = processor().render_content(POST);

    assert!(rendered.html.contains(r#"<a href="https://example.com/about">about</a>"#));
    assert!(rendered.html.contains(r#"<a href="mailto:hi@example.com">mail</a>"#));
    assert!(rendered.html.contains(
        r#"<figure class="wp-block-image"><img src="https://example.com/wp-content/uploads/2024/01/cat.jpg"></figure>"#
    ));
    assert!(!rendered.html.contains("noscript"));
    assert!(!rendered.html.contains("[caption"));
    assert!(!rendered.html.contains("[gallery"));
    assert!(!rendered.html.contains("<p> </p>"));
    assert!(rendered.html.contains(
        "<pre class=\"wp-block-code\"><code>fn main() {\n    println!(\"hi\");\n}</code></pre>"
    ));
    assert!(rendered.html.ends_with("<p>Outro</p>"));

    assert_eq!(rendered.tabs.len(), 1);
    let block = &rendered.tabs[0];
    assert_eq!(block.initial_tab, 1);
    assert_eq!(block.tabs[0].title, "First");
    assert_eq!(block.tabs[1].title, "Second");
    assert_eq!(
        block.tabs[1].content_html,
        r#"<p>two <a href="https://example.com/x">x</a></p>"#
    );
}

#[test]
fn segments_keep_document_order() {
    let rendered = processor().render_content(POST);
    let kinds: Vec<&str> = rendered
        .segments()
        .iter()
        .map(|segment| match segment {
            Segment::Html(_) => "html",
            Segment::Tabs(_) => "tabs",
        })
        .collect();
    assert_eq!(kinds, vec!["html", "tabs", "html"]);
}

#[test]
fn processing_is_deterministic_and_stable() {
    let processor = processor();
    let first = processor.render_content(POST);
    let second = processor.render_content(POST);
    assert_eq!(first, second);

    let once = processor.process_content(POST);
    assert_eq!(processor.process_content(&once), once);
}

#[test]
fn documented_sanitizer_examples() {
    let processor = processor();
    assert_eq!(
        processor.process_content(r#"<img src="/foo.png">"#),
        r#"<img src="https://example.com/foo.png">"#
    );
    assert_eq!(
        processor.process_content(r#"<img src="wp-content/uploads/x.jpg">"#),
        r#"<img src="https://example.com/wp-content/uploads/x.jpg">"#
    );
    assert_eq!(
        processor.process_content("<pre><code>a    b</code></pre><p>a    b</p>"),
        r#"<pre class="wp-block-code"><code>a    b</code></pre><p>a b</p>"#
    );
    assert_eq!(processor.process_excerpt("Richard&#8217;s &amp; Co"), "Richard's & Co");
}
