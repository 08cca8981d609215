use scraper::{Html, Selector};

/// Pull every talk URL out of one paginated listing page.
///
/// Each talk card is a `div.media__image` wrapping an anchor to the detail
/// page. URLs come back in page order, duplicates and all; a page with no
/// cards (past the end of the range, say) yields an empty list rather than
/// an error.
pub fn parse_listing(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let card = Selector::parse("div.media__image").unwrap();
    let anchor = Selector::parse("a[href]").unwrap();

    doc.select(&card)
        .filter_map(|div| div.select(&anchor).next())
        .filter_map(|a| a.value().attr("href"))
        .map(str::to_string)
        .collect()
}
