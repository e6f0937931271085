//! Read-side views over the content store: weekly volume, filter/search
//! visibility, the archive section and the visible grid cells.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::content::Content;
use crate::domain::slot::SlotAddress;
use crate::domain::types::{ContentStatus, NetworkCode, ProductName};
use crate::domain::week::{DailySchedule, WeekWindow};
use crate::store::ContentStore;

/// Attribute filters of the grid. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilters {
    pub product: Option<ProductName>,
    pub network: Option<NetworkCode>,
    pub status: Option<ContentStatus>,
}

impl ContentFilters {
    pub fn product(mut self, product: ProductName) -> Self {
        self.product = Some(product);
        self
    }
    pub fn network(mut self, network: NetworkCode) -> Self {
        self.network = Some(network);
        self
    }
    pub fn status(mut self, status: ContentStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Filters plus the free-text search term of the grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GridQuery {
    pub filters: ContentFilters,
    pub search: String,
}

/// Number of records whose key falls inside `[week_start, week_end]`,
/// regardless of filters or status.
pub fn visible_week_count(store: &ContentStore, week_start: NaiveDate, week_end: NaiveDate) -> usize {
    store
        .iter()
        .filter(|content| (week_start..=week_end).contains(&content.slot_key.date()))
        .count()
}

/// `true` when `content` matches every set filter and, for a non-empty
/// `search_term`, its product or custom title contains the term ignoring case.
pub fn is_visible(content: &Content, filters: &ContentFilters, search_term: &str) -> bool {
    if filters
        .product
        .as_ref()
        .is_some_and(|product| *product != content.product)
    {
        return false;
    }
    if filters
        .network
        .as_ref()
        .is_some_and(|network| !content.has_network(network))
    {
        return false;
    }
    if filters.status.is_some_and(|status| status != content.status) {
        return false;
    }
    if search_term.is_empty() {
        return true;
    }

    let term = search_term.to_lowercase();
    content.product.to_lowercase().contains(&term)
        || content
            .custom_title
            .as_ref()
            .is_some_and(|title| title.to_lowercase().contains(&term))
}

/// Every archived record, unaffected by filters and search.
pub fn archived_subset(store: &ContentStore) -> Vec<&Content> {
    store.iter().filter(|content| content.is_archived()).collect()
}

/// A grid cell with the record displayed in it.
#[derive(Debug, Clone, Serialize)]
pub struct SlotView<'a> {
    pub address: SlotAddress,
    pub content: &'a Content,
    /// Records in the same cell besides the displayed one.
    pub overflow: usize,
}

/// Visible cells of the week grid, day by day and then by time.
pub fn week_grid<'a>(
    store: &'a ContentStore,
    window: &WeekWindow,
    schedule: &DailySchedule,
    query: &GridQuery,
) -> Vec<SlotView<'a>> {
    window
        .cells(schedule)
        .into_iter()
        .filter_map(|address| {
            let occupants = store.occupants(&address);
            let content = *occupants.first()?;
            is_visible(content, &query.filters, &query.search).then(|| SlotView {
                address,
                content,
                overflow: occupants.len() - 1,
            })
        })
        .collect()
}
