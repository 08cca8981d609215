// tests/discover.rs
//
// Paginated URL discovery against a scripted page source.
//
use std::cell::RefCell;
use std::time::Duration;

use tedscrape::discover::discover;
use tedscrape::fetch::{FetchError, PageSource};

struct ScriptedSource {
    responses: RefCell<Vec<Result<String, FetchError>>>,
    requests: RefCell<Vec<(String, Vec<(String, String)>)>>,
}

impl ScriptedSource {
    fn new(responses: Vec<Result<String, FetchError>>) -> Self {
        Self {
            responses: RefCell::new(responses),
            requests: RefCell::new(Vec::new()),
        }
    }

    fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    fn query_of(&self, call: usize) -> Vec<(String, String)> {
        self.requests.borrow()[call].1.clone()
    }
}

impl PageSource for ScriptedSource {
    fn fetch(&self, url: &str, query: &[(&str, &str)]) -> Result<String, FetchError> {
        self.requests.borrow_mut().push((
            url.to_string(),
            query.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect(),
        ));
        self.responses.borrow_mut().remove(0)
    }
}

fn listing_html(paths: &[&str]) -> String {
    paths
        .iter()
        .map(|p| format!(r#"<div class="media__image"><a href="{p}"></a></div>"#))
        .collect()
}

#[test]
fn single_page_range_issues_exactly_one_fetch() {
    let source = ScriptedSource::new(vec![Ok(listing_html(&["/talks/a", "/talks/b"]))]);

    let urls = discover(&source, "https://example.org/talks", 3, 3, Duration::ZERO);

    assert_eq!(urls, vec!["/talks/a", "/talks/b"]);
    assert_eq!(source.request_count(), 1);
    assert_eq!(
        source.query_of(0),
        vec![
            ("language".to_string(), "en".to_string()),
            ("page".to_string(), "3".to_string())
        ]
    );
}

#[test]
fn fetch_failure_keeps_pages_collected_so_far() {
    let source = ScriptedSource::new(vec![
        Ok(listing_html(&["/talks/one", "/talks/two"])),
        Err(FetchError::Status { status: 503 }),
        Ok(listing_html(&["/talks/never-reached"])),
    ]);

    let urls = discover(&source, "https://example.org/talks", 1, 3, Duration::ZERO);

    assert_eq!(urls, vec!["/talks/one", "/talks/two"]);
    // page 3 is never requested once page 2 fails
    assert_eq!(source.request_count(), 2);
}

#[test]
fn timeout_on_first_page_yields_empty_list() {
    let source = ScriptedSource::new(vec![Err(FetchError::Timeout)]);

    let urls = discover(&source, "https://example.org/talks", 1, 2, Duration::ZERO);

    assert!(urls.is_empty());
    assert_eq!(source.request_count(), 1);
}

#[test]
fn empty_listing_page_is_not_an_error() {
    let source = ScriptedSource::new(vec![
        Ok("<html><body>nothing here</body></html>".to_string()),
        Ok(listing_html(&["/talks/late"])),
    ]);

    let urls = discover(&source, "https://example.org/talks", 1, 2, Duration::ZERO);

    assert_eq!(urls, vec!["/talks/late"]);
    assert_eq!(source.request_count(), 2);
}
