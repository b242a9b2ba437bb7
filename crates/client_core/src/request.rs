//! Maps view parameters onto a fully qualified listing request.

use shared::protocol::CourseListQuery;
use url::Url;

use crate::ordering::OrderingKey;

const OWNED_PARAMS: [&str; 4] = ["search", "ordering", "limit", "offset"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    pub url: Url,
    pub query: CourseListQuery,
}

impl RequestDescriptor {
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }
}

pub fn offset_for(page: u32, per_page: u32) -> u64 {
    u64::from(page.saturating_sub(1)) * u64::from(per_page)
}

/// Builds the request for one page. Search text is form-encoded, so spaces,
/// `&` and `=` survive the round trip. Parameters already present on the base
/// URL are preserved unless they collide with the four listing parameters.
pub fn build_request(
    base_url: &Url,
    search_query: &str,
    ordering: &OrderingKey,
    per_page: u32,
    offset: u64,
) -> RequestDescriptor {
    let query = CourseListQuery {
        search: search_query.to_string(),
        ordering: ordering.to_string(),
        limit: per_page,
        offset,
    };

    let retained: Vec<(String, String)> = base_url
        .query_pairs()
        .filter(|(key, _)| !OWNED_PARAMS.contains(&key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base_url.clone();
    url.set_fragment(None);
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        pairs
            .append_pair("search", &query.search)
            .append_pair("ordering", &query.ordering)
            .append_pair("limit", &query.limit.to_string())
            .append_pair("offset", &query.offset.to_string());
    }

    RequestDescriptor { url, query }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://localhost:8000/figures/api/courses/general/").expect("base url")
    }

    #[test]
    fn default_mount_request_matches_wire_contract() {
        let request = build_request(&base(), "", &OrderingKey::default(), 20, 0);
        assert_eq!(
            request.url.query(),
            Some("search=&ordering=display_name&limit=20&offset=0")
        );
        assert_eq!(request.url.path(), "/figures/api/courses/general/");
    }

    #[test]
    fn descending_ordering_uses_prefix() {
        let ordering = OrderingKey::descending("self_paced");
        let request = build_request(&base(), "", &ordering, 50, 100);
        assert_eq!(
            request.url.query(),
            Some("search=&ordering=-self_paced&limit=50&offset=100")
        );
    }

    #[test]
    fn search_text_round_trips_through_encoding() {
        let request = build_request(&base(), "intro & more=fun", &OrderingKey::default(), 20, 0);
        let search = request
            .url
            .query_pairs()
            .find(|(key, _)| key == "search")
            .map(|(_, value)| value.into_owned());
        assert_eq!(search.as_deref(), Some("intro & more=fun"));
        assert_eq!(request.url.query_pairs().count(), 4);
    }

    #[test]
    fn keeps_foreign_base_params_and_replaces_owned_ones() {
        let base = Url::parse("http://localhost/api/courses/?site=2&limit=999#top").expect("url");
        let request = build_request(&base, "demo", &OrderingKey::default(), 20, 40);
        assert_eq!(
            request.url.query(),
            Some("site=2&search=demo&ordering=display_name&limit=20&offset=40")
        );
        assert!(request.url.fragment().is_none());
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(offset_for(1, 20), 0);
        assert_eq!(offset_for(3, 20), 40);
        assert_eq!(offset_for(0, 20), 0);
    }
}
