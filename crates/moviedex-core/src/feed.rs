use moviedex_catalog::{CatalogError, MovieCatalog};
use moviedex_models::{Movie, MovieList, MoviePage, TimeWindow, MAX_PAGES};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info};

/// What a feed lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedSource {
    Search(String),
    Trending(TimeWindow),
    List(MovieList),
    Genre(u32),
    Recommendations(u64),
}

impl FeedSource {
    /// A blank search never reaches the catalog
    pub async fn fetch(&self, catalog: &dyn MovieCatalog, page: u32) -> Result<MoviePage, CatalogError> {
        match self {
            FeedSource::Search(query) if query.trim().is_empty() => Ok(MoviePage::empty()),
            FeedSource::Search(query) => catalog.search(query.trim(), page).await,
            FeedSource::Trending(window) => catalog.trending(*window, page).await,
            FeedSource::List(list) => catalog.list(*list, page).await,
            FeedSource::Genre(id) => catalog.discover_by_genre(*id, page).await,
            FeedSource::Recommendations(id) => catalog.recommendations(*id, page).await,
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeedSource::Search(query) => write!(f, "search \"{}\"", query),
            FeedSource::Trending(window) => write!(f, "trending this {}", window.as_str()),
            FeedSource::List(list) => f.write_str(list.label()),
            FeedSource::Genre(id) => write!(f, "genre {}", id),
            FeedSource::Recommendations(id) => write!(f, "recommendations for {}", id),
        }
    }
}

/// Proof that a page load was started for a particular generation of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTicket {
    generation: u64,
    page: u32,
}

impl PageTicket {
    pub fn page(&self) -> u32 {
        self.page
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    Applied,
    /// The page had already been merged
    Duplicate,
    /// The feed was reset since the ticket was issued
    Stale,
}

/// Accumulated pages of one listing ("load more").
///
/// Pages are merged by page number exactly once and always read back in page
/// order. A reset bumps the generation so results still in flight for the old
/// source are dropped when they land.
#[derive(Debug)]
pub struct ResultFeed {
    source: FeedSource,
    generation: u64,
    pages: BTreeMap<u32, Vec<Movie>>,
    in_flight: BTreeSet<u32>,
    total_pages: Option<u32>,
    total_results: u64,
    max_pages: u32,
}

impl ResultFeed {
    pub fn new(source: FeedSource, max_pages: u32) -> Self {
        Self {
            source,
            generation: 0,
            pages: BTreeMap::new(),
            in_flight: BTreeSet::new(),
            total_pages: None,
            total_results: 0,
            max_pages: max_pages.clamp(1, MAX_PAGES),
        }
    }

    pub fn source(&self) -> &FeedSource {
        &self.source
    }

    pub fn reset(&mut self, source: FeedSource) {
        info!("Feed reset: {} -> {}", self.source, source);
        self.source = source;
        self.generation += 1;
        self.pages.clear();
        self.in_flight.clear();
        self.total_pages = None;
        self.total_results = 0;
    }

    pub fn is_loading(&self) -> bool {
        !self.in_flight.is_empty()
    }

    pub fn pages_loaded(&self) -> usize {
        self.pages.len()
    }

    pub fn total_results(&self) -> u64 {
        self.total_results
    }

    pub fn last_page(&self) -> Option<u32> {
        self.total_pages.map(|t| t.min(self.max_pages))
    }

    /// The page "load more" would fetch, or None when the listing is exhausted
    pub fn next_page(&self) -> Option<u32> {
        let next = self.pages.keys().next_back().map_or(1, |p| p + 1);
        match self.last_page() {
            Some(last) if next > last => None,
            _ if next > self.max_pages => None,
            _ => Some(next),
        }
    }

    pub fn has_more(&self) -> bool {
        self.next_page().is_some()
    }

    /// Start a "load more". Refused while another load is in flight.
    pub fn begin_next(&mut self) -> Option<PageTicket> {
        if self.is_loading() {
            debug!("Load more ignored: a page is already loading");
            return None;
        }
        let page = self.next_page()?;
        Some(self.begin_page(page))
    }

    /// Start loading an explicit page, regardless of other loads.
    pub fn begin_page(&mut self, page: u32) -> PageTicket {
        let page = page.clamp(1, self.max_pages);
        self.in_flight.insert(page);
        PageTicket {
            generation: self.generation,
            page,
        }
    }

    pub fn complete(&mut self, ticket: PageTicket, page: MoviePage) -> PageOutcome {
        if ticket.generation != self.generation {
            debug!("Dropping page {} from a superseded listing", ticket.page);
            return PageOutcome::Stale;
        }
        self.in_flight.remove(&ticket.page);

        if self.pages.contains_key(&ticket.page) {
            debug!("Page {} already merged", ticket.page);
            return PageOutcome::Duplicate;
        }

        self.total_pages = Some(page.total_pages);
        self.total_results = page.total_results;
        self.pages.insert(ticket.page, page.results);
        PageOutcome::Applied
    }

    /// A failed load frees its slot; already merged pages are kept.
    pub fn fail(&mut self, ticket: PageTicket) {
        if ticket.generation == self.generation {
            self.in_flight.remove(&ticket.page);
        }
    }

    /// Begin, fetch and merge the next page. Returns None when nothing was started.
    pub async fn load_more(&mut self, catalog: &dyn MovieCatalog) -> Result<Option<PageOutcome>, CatalogError> {
        let Some(ticket) = self.begin_next() else {
            return Ok(None);
        };

        match self.source.fetch(catalog, ticket.page).await {
            Ok(page) => Ok(Some(self.complete(ticket, page))),
            Err(e) => {
                self.fail(ticket);
                Err(e)
            }
        }
    }

    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.pages.values().flatten()
    }

    pub fn len(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
