//! Paging over provider list endpoints.
//!
//! GitHub and GitLab both take `page` (1-indexed) and `per_page` query
//! parameters, but announce further pages differently: GitHub through a
//! `Link` header with `rel="next"`, GitLab through `X-Next-Page` (empty on
//! the last page) and, for small collections, `X-Total`.

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// One page of a provider listing.
#[derive(Debug, Clone, Serialize)]
#[serde(bound = "T: Serialize")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the whole collection, when the provider reports it.
    pub total: Option<u64>,
    /// 1-indexed.
    pub page: u32,
    pub per_page: u32,
    pub has_more: bool,
}

impl<T> Page<T> {
    /// Build a page without header hints.
    ///
    /// With a known total the position decides; otherwise a full page is
    /// taken to mean more may follow.
    #[must_use]
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total: Option<u64>) -> Self {
        let has_more = match total {
            Some(t) => u64::from(page) * u64::from(per_page) < t,
            None => items.len() >= per_page as usize,
        };
        Self {
            items,
            total,
            page,
            per_page,
            has_more,
        }
    }

    /// Build a page from the provider's paging headers, falling back to
    /// [`Page::new`] when they say nothing about a next page.
    #[must_use]
    pub fn with_links(items: Vec<T>, page: u32, per_page: u32, links: PageLinks) -> Self {
        let mut built = Self::new(items, page, per_page, links.total);
        if let Some(has_next) = links.has_next {
            built.has_more = has_next;
        }
        built
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Paging hints taken from response headers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageLinks {
    /// `None` when the response carried no paging header at all.
    pub has_next: Option<bool>,
    pub total: Option<u64>,
}

impl PageLinks {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let header = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

        let github_next = header("link").map(|link| {
            link.split(',')
                .any(|entry| entry.split(';').skip(1).any(|p| p.trim() == r#"rel="next""#))
        });
        let gitlab_next = header("x-next-page").map(|v| !v.trim().is_empty());

        Self {
            has_next: github_next.or(gitlab_next),
            total: header("x-total").and_then(|v| v.trim().parse().ok()),
        }
    }
}

/// `page`/`per_page` query parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

impl PaginationParams {
    #[must_use]
    pub fn for_page(page: u32, per_page: u32) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, value.parse().unwrap());
        }
        map
    }

    #[test]
    fn test_full_page_without_hints_has_more() {
        assert!(Page::new(vec![0; 100], 1, 100, None).has_more);
        assert!(!Page::new(vec![0; 99], 1, 100, None).has_more);
    }

    #[test]
    fn test_total_decides_when_known() {
        assert!(Page::new(vec![0; 100], 2, 100, Some(201)).has_more);
        assert!(!Page::new(vec![0; 100], 2, 100, Some(200)).has_more);
    }

    #[test]
    fn test_github_link_header() {
        let next = headers(&[(
            "link",
            r#"<https://api.github.com/repositories/1/commits?page=2>; rel="next", <https://api.github.com/repositories/1/commits?page=9>; rel="last""#,
        )]);
        assert_eq!(PageLinks::from_headers(&next).has_next, Some(true));

        let last = headers(&[(
            "link",
            r#"<https://api.github.com/repositories/1/commits?page=8>; rel="prev", <https://api.github.com/repositories/1/commits?page=1>; rel="first""#,
        )]);
        assert_eq!(PageLinks::from_headers(&last).has_next, Some(false));
    }

    #[test]
    fn test_gitlab_next_page_headers() {
        let links = PageLinks::from_headers(&headers(&[("x-next-page", "3"), ("x-total", "250")]));
        assert_eq!(
            links,
            PageLinks {
                has_next: Some(true),
                total: Some(250)
            }
        );

        let last = PageLinks::from_headers(&headers(&[("x-next-page", "")]));
        assert_eq!(last.has_next, Some(false));
    }

    #[test]
    fn test_header_hint_overrides_full_page_guess() {
        let links = PageLinks {
            has_next: Some(false),
            total: None,
        };
        assert!(!Page::with_links(vec![0; 100], 4, 100, links).has_more);
        assert!(Page::with_links(vec![0; 10], 1, 100, PageLinks::default()).len() == 10);
    }

    #[test]
    fn test_params_serialize_as_query() {
        let json = serde_json::to_value(PaginationParams::for_page(2, 100)).unwrap();
        assert_eq!(json, serde_json::json!({"page": 2, "per_page": 100}));
        assert_eq!(
            serde_json::to_value(PaginationParams::default()).unwrap(),
            serde_json::json!({})
        );
    }
}
