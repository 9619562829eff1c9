// Pagination headers (`Link`, `X-Total-Count`) and infinite-scroll merging.

use url::Url;

/// Page numbers advertised by the backend's `Link` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Links {
    pub first: Option<u32>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
    pub last: Option<u32>,
}

impl Links {
    /// Whether another page exists after the zero-based `page`.
    pub fn has_more(&self, page: u32) -> bool {
        self.next.is_some_and(|next| page < next)
    }
}

/// Parse `<url?page=N&size=S>; rel="next", ...` into page numbers.
/// Entries without a recognizable rel or page parameter are skipped.
pub fn parse_link_header(header: &str) -> Links {
    let mut links = Links::default();
    for section in header.split(',') {
        let mut parts = section.split(';');
        let Some(url_part) = parts.next() else {
            continue;
        };
        let url = url_part.trim().trim_start_matches('<').trim_end_matches('>');
        let Some(page) = page_param(url) else {
            continue;
        };
        let rel = parts.find_map(|p| {
            let p = p.trim();
            p.strip_prefix("rel=").map(|r| r.trim_matches('"'))
        });
        match rel {
            Some("first") => links.first = Some(page),
            Some("prev") => links.prev = Some(page),
            Some("next") => links.next = Some(page),
            Some("last") => links.last = Some(page),
            _ => {}
        }
    }
    links
}

fn page_param(link: &str) -> Option<u32> {
    // Links may be relative; resolve them against a dummy base to read the query.
    let base = Url::parse("http://localhost/").ok()?;
    let url = base.join(link).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == "page")
        .and_then(|(_, value)| value.parse().ok())
}

/// Value of `X-Total-Count`, falling back to `fallback` when the header is
/// missing or not a number.
pub fn parse_total_count(header: Option<&str>, fallback: usize) -> u64 {
    header
        .and_then(|h| h.trim().parse().ok())
        .unwrap_or(fallback as u64)
}

/// Number of pages needed for `total_items` at `size` items per page.
pub fn total_pages(total_items: u64, size: u32) -> u32 {
    if size == 0 {
        return 0;
    }
    total_items.div_ceil(u64::from(size)) as u32
}

/// Infinite-scroll merge: a single-page result or an empty current list is
/// replaced outright, otherwise the incoming page is appended.
pub fn merge_scrolled<T: Clone>(current: &[T], incoming: Vec<T>, links: &Links) -> Vec<T> {
    if links.first == links.last || current.is_empty() {
        return incoming;
    }
    let mut merged = current.to_vec();
    merged.extend(incoming);
    merged
}
