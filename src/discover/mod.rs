use std::time::Duration;

use tracing::warn;

use crate::fetch::PageSource;
use crate::parse::listing;

/// Walk listing pages `start_page..=end_page` and collect talk URLs.
///
/// Any fetch failure stops the whole run and returns everything collected
/// so far — partial results beat none when a long crawl breaks in the
/// middle. A fixed delay paces consecutive page requests.
pub fn discover(
    source: &dyn PageSource,
    base_url: &str,
    start_page: u32,
    end_page: u32,
    delay: Duration,
) -> Vec<String> {
    let mut talk_urls = Vec::new();

    for page in start_page..=end_page {
        let page_param = page.to_string();
        let html = match source.fetch(base_url, &[("language", "en"), ("page", &page_param)]) {
            Ok(html) => html,
            Err(e) => {
                warn!("listing fetch for page {page} failed: {e}");
                eprintln!(
                    "Collection stopped: {} talk urls collected, last page collected was {}",
                    talk_urls.len(),
                    page.saturating_sub(1)
                );
                break;
            }
        };

        let urls = listing::parse_listing(&html);
        eprintln!("  [page {page}] {} talk urls", urls.len());
        talk_urls.extend(urls);

        if page < end_page && !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    talk_urls
}
