use crate::config::PaginationSettings;
use serde::Serialize;
use tracing::{debug, info};

/// The `(offset, length)` window a record source should be queried with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub offset: u64,
    pub length: u64,
}

/// One entry of the page list rendered into the `{PAGINATION}` component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    /// ` class="active"` for the current page, otherwise empty.
    #[serde(rename = "ACTIVEPAGE")]
    pub active: String,
    #[serde(rename = "PAGENUMBER")]
    pub number: u64,
    #[serde(rename = "LABEL")]
    pub label: String,
}

impl PageLink {
    fn new(number: u64, label: String, current: u64) -> Self {
        let active = if number == current {
            " class=\"active\"".to_string()
        } else {
            String::new()
        };

        Self {
            active,
            number,
            label,
        }
    }
}

/// Pagination settings for one request.
///
/// Use is a two-phase protocol: [`generate`][`Pagination::generate`] plans the
/// window to query, and once the query ran the true number of results is
/// reported with [`update_results`][`Pagination::update_results`], after which
/// the page range is known.
///
/// # Examples
///
/// ```
/// use tempus::{Limit, Pagination, PaginationSettings};
///
/// let mut pagination = Pagination::new(PaginationSettings::default(), Some("3"), Some("5"));
///
/// assert_eq!(pagination.generate(), Limit { offset: 10, length: 5 });
///
/// pagination.update_results(42);
/// assert_eq!(pagination.total_pages(), Some(9));
/// assert_eq!(pagination.last_page(), Some(6));
/// ```
#[derive(Debug, Clone)]
pub struct Pagination {
    bounds: PaginationSettings,
    /// Raw `page` request parameter.
    requested_page: Option<String>,
    /// Raw `results` request parameter.
    requested_results: Option<String>,
    loaded: bool,
    max_per_page: Option<u64>,
    max_query: Option<u64>,
    per_page: Option<u64>,
    user_per_page: Option<u64>,
    current_page: Option<u64>,
    first_page: Option<u64>,
    last_page: Option<u64>,
    total_pages: Option<u64>,
    results: Option<u64>,
    min: Option<u64>,
    max: Option<u64>,
}

impl Pagination {
    /// Create new [`Pagination`] from the configured bounds and the optional
    /// `page` and `results` request parameters.
    ///
    /// Nothing is computed until the settings are first needed.
    pub fn new(bounds: PaginationSettings, page: Option<&str>, results: Option<&str>) -> Self {
        Self {
            bounds,
            requested_page: page.map(str::to_string),
            requested_results: results.map(str::to_string),
            loaded: false,
            max_per_page: None,
            max_query: None,
            per_page: None,
            user_per_page: None,
            current_page: None,
            first_page: None,
            last_page: None,
            total_pages: None,
            results: None,
            min: None,
            max: None,
        }
    }

    /// Compute the page size and the current page from the configured bounds
    /// and the request parameters.
    ///
    /// The page size is the first of: the `results` parameter, the user
    /// preference, the display cap. Candidates above the display cap, which is
    /// itself capped by the query cap, are ignored.
    pub fn load_settings(&mut self) {
        debug!("loading pagination settings");
        let max_query = self.bounds.max_query;
        let max_per_page = self.bounds.max_per_page.min(max_query);

        let requested = self
            .requested_results
            .as_deref()
            .and_then(parse_positive)
            .filter(|&results| results <= max_per_page);
        let preferred = self
            .user_per_page
            .filter(|&results| results <= max_per_page);
        let per_page = requested.or(preferred).unwrap_or(max_per_page);

        let current_page = self
            .requested_page
            .as_deref()
            .and_then(parse_positive)
            .unwrap_or(1);

        // Show up to two pages before the current one once deep enough.
        let first_page = if current_page > 4 {
            current_page - 2
        } else {
            1
        };

        self.max_query = Some(max_query);
        self.max_per_page = Some(max_per_page);
        self.per_page = Some(per_page);
        self.current_page = Some(current_page);
        self.first_page = Some(first_page);
        self.loaded = true;
    }

    /// Return the window of results to query for the current page.
    ///
    /// Settings are loaded on the first call only.
    pub fn generate(&mut self) -> Limit {
        if !self.loaded {
            self.load_settings();
        }
        let per_page = self.per_page.unwrap_or(self.bounds.default_per_page);
        let current_page = self.current_page.unwrap_or(1);

        let min = current_page.saturating_sub(1).saturating_mul(per_page);
        self.min = Some(min);
        self.max = Some(per_page);
        debug!(offset = min, length = per_page, "generated pagination limit");

        Limit {
            offset: min,
            length: per_page,
        }
    }

    /// Set the preferred page size used by later calls to `load_settings`.
    ///
    /// Returns false and keeps the previous preference when `page_limit` is 0.
    pub fn update_prefs(&mut self, page_limit: u64) -> bool {
        if page_limit == 0 {
            info!("pagination: user pref update failed");
            return false;
        }
        debug!("pagination: updating user pref");
        self.user_per_page = Some(page_limit);

        true
    }

    /// Report the total number of results, making the page range available.
    pub fn update_results(&mut self, results: u64) {
        if !self.loaded {
            self.generate();
        }
        debug!("pagination: updating results count");
        let per_page = self.per_page.unwrap_or(self.bounds.default_per_page).max(1);
        let current_page = self.current_page.unwrap_or(1);
        let total_pages = results.div_ceil(per_page);

        self.results = Some(results);
        self.total_pages = Some(total_pages);
        self.last_page = Some(current_page.saturating_add(3).min(total_pages));
    }

    /// Return the list of page links for the current page range, or `None`
    /// until the range is known.
    ///
    /// The list holds a `First` link when the range does not start at page 1,
    /// the pages from the first page up to (not including) the last page, and
    /// a `Last` link to the final page.
    pub fn links(&self) -> Option<Vec<PageLink>> {
        let (first, last, total, current) = (
            self.first_page?,
            self.last_page?,
            self.total_pages?,
            self.current_page?,
        );
        let mut links: Vec<PageLink> = vec![];
        let mut push = |link: PageLink| match links.iter_mut().find(|l| l.number == link.number) {
            Some(existing) => *existing = link,
            None => links.push(link),
        };

        if first != 1 {
            push(PageLink::new(1, "First".into(), 0));
        }
        for number in first..last {
            push(PageLink::new(number, number.to_string(), current));
        }
        if last <= total {
            push(PageLink::new(total, "Last".into(), current));
        }

        Some(links)
    }

    /// Offset of the current window.
    pub fn min(&self) -> Option<u64> {
        report(self.min, "min")
    }

    /// Length of the current window.
    pub fn max(&self) -> Option<u64> {
        report(self.max, "max")
    }

    pub fn per_page(&self) -> Option<u64> {
        report(self.per_page, "perPage")
    }

    pub fn first_page(&self) -> Option<u64> {
        report(self.first_page, "firstPage")
    }

    pub fn last_page(&self) -> Option<u64> {
        report(self.last_page, "lastPage")
    }

    pub fn total_pages(&self) -> Option<u64> {
        report(self.total_pages, "totalPages")
    }

    pub fn current_page(&self) -> Option<u64> {
        report(self.current_page, "currentPage")
    }

    pub fn results(&self) -> Option<u64> {
        report(self.results, "results")
    }

    pub fn max_per_page(&self) -> Option<u64> {
        report(self.max_per_page, "maxPerPage")
    }

    pub fn max_query(&self) -> Option<u64> {
        report(self.max_query, "maxQuery")
    }
}

/// Parse a request parameter as an integer of at least 1.
///
/// Decimal numbers are truncated, so `2.7` reads as page 2.
fn parse_positive(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    let value = raw.parse::<u64>().ok().or_else(|| {
        raw.parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 1.0)
            .map(|value| value.trunc() as u64)
    });

    match value {
        Some(value) if value > 0 => Some(value),
        _ => {
            info!("pagination: ignoring invalid number `{raw}`");
            None
        }
    }
}

fn report(value: Option<u64>, name: &str) -> Option<u64> {
    if value.is_none() {
        info!("pagination: {name} not found");
    }

    value
}
