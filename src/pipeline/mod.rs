//! Scrape orchestration: landing page, paginated chapter listing, chapter
//! content, and the periodic update pass over stored novels.

pub mod content;
pub mod orchestrator;
pub mod update;

pub use content::{ChapterContentFetcher, CONTENT_UNAVAILABLE};
pub use orchestrator::{NovelScraper, ScrapeOutcome};
pub use update::UpdateSummary;

#[cfg(test)]
pub(crate) mod fixtures {
    //! Canned pages shaped like the novel site.

    pub const BASE: &str = "https://novelfull.net";
    pub const NOVEL_URL: &str = "https://novelfull.net/villain.html";

    fn list_items(links: &[(&str, &str)]) -> String {
        links
            .iter()
            .map(|(href, text)| format!(r#"<li><a href="{href}">{text}</a></li>"#))
            .collect()
    }

    /// Landing page, which doubles as listing page 1.
    pub fn novel_page(title: &str, links: &[(&str, &str)]) -> String {
        format!(
            r#"<html><body>
            <div class="book"><img src="/uploads/villain.jpg"></div>
            <div class="desc"><h3 class="title">{title}</h3>
              <div class="desc-text"><p>A villain story.</p></div>
            </div>
            <div class="info">
              <div><h3>Author:</h3><a href="/a">Kim</a></div>
              <div><h3>Genre:</h3><a>Fantasy</a>, <a>Action</a></div>
              <div><h3>Source:</h3>Web</div>
              <div><h3>Status:</h3><a>Completed</a></div>
            </div>
            <ul class="list-chapter">{}</ul>
            </body></html>"#,
            list_items(links)
        )
    }

    pub fn listing_page(links: &[(&str, &str)]) -> String {
        format!(
            r#"<html><body><ul class="list-chapter">{}</ul></body></html>"#,
            list_items(links)
        )
    }

    pub fn chapter_page(body: &str) -> String {
        format!(
            r#"<html><body><div id="chapter-content">{body}<script>ads()</script></div></body></html>"#
        )
    }

    pub fn page_url(page: u32) -> String {
        format!("{NOVEL_URL}?page={page}")
    }

    pub fn chapter_url(n: u32) -> String {
        format!("{BASE}/villain/chapter-{n}.html")
    }

    pub fn chapter_href(n: u32) -> String {
        format!("/villain/chapter-{n}.html")
    }
}
