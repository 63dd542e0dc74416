use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

static CONTENT_CONTAINER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div#chapter-content").expect("valid selector"));

/// Descendants dropped from chapter text: scripts, styles, nested divs (ad
/// slots), centered banners, iframes and the h3 notices the site injects.
static STRIPPED_TAGS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("script, style, div, center, iframe, h3").expect("valid selector")
});

/// Pull the chapter body out of a chapter page.
///
/// Returns the container's inner markup with the stripped tags removed, or
/// `None` when the page has no content container.
pub fn sanitize_chapter_html(html: &str) -> Option<String> {
    let mut doc = Html::parse_document(html);

    let (container_id, doomed) = {
        let container = doc.select(&CONTENT_CONTAINER).next()?;
        let doomed: Vec<_> = container
            .select(&STRIPPED_TAGS)
            .filter(|el| el.id() != container.id())
            .map(|el| el.id())
            .collect();
        (container.id(), doomed)
    };

    for id in doomed {
        if let Some(mut node) = doc.tree.get_mut(id) {
            node.detach();
        }
    }

    let container = doc.tree.get(container_id).and_then(ElementRef::wrap)?;
    Some(container.inner_html().trim().to_string())
}
