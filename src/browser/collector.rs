use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    browser::steamcommunity::{InventoryPageSource, PageOutcome},
    error::InventoryError,
    models::{
        inventory::{Asset, Description, InventoryPage, RetrievalResult, SteamId},
        web::{DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZES, MAX_SAFE_PAGE_SIZE, PAGE_DELAY, SOFT_BLOCK_DELAY},
    },
    status::{Severity, StatusReporter},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorSettings {
    /// Counts to try, biggest first. Unsafe and zero sizes are skipped.
    pub page_sizes: Vec<u32>,
    /// Page guard per count, in case a cursor sends us around in circles.
    pub max_pages: u32,
    pub page_delay: Duration,
    pub soft_block_delay: Duration,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        CollectorSettings {
            page_sizes: DEFAULT_PAGE_SIZES.to_vec(),
            max_pages: DEFAULT_MAX_PAGES,
            page_delay: PAGE_DELAY,
            soft_block_delay: SOFT_BLOCK_DELAY,
        }
    }
}

impl CollectorSettings {
    ///Largest to smallest with duplicates removed and nothing above MAX_SAFE_PAGE_SIZE.
    pub fn normalized_page_sizes(&self) -> Vec<u32> {
        let mut sizes: Vec<u32> = self.page_sizes.iter()
            .copied()
            .filter(|&s| s > 0 && s <= MAX_SAFE_PAGE_SIZE)
            .collect();

        sizes.sort_unstable_by(|a, b| b.cmp(a));
        sizes.dedup();
        sizes
    }
}

// Outer state is the count being tried, inner state is the cursor inside PageAttempt.
enum AttemptOutcome {
    Complete(RetrievalResult),
    SoftBlocked,
}

enum PageStep {
    Continue(String),
    Finished { partial: bool },
}

/// Pages gathered with one count. Built fresh for every count and only turned into a
/// result once that count made it to the end, so a soft-blocked count leaves nothing behind.
struct PageAttempt {
    page_size: u32,
    assets: Vec<Asset>,
    descriptions: Vec<Description>,
    cursor: Option<String>,
    pages: u32,
    reported_total: Option<u64>,
}

impl PageAttempt {
    fn new(page_size: u32) -> Self {
        PageAttempt { page_size, assets: Vec::new(), descriptions: Vec::new(), cursor: None, pages: 0, reported_total: None }
    }

    fn absorb(&mut self, mut page: InventoryPage) -> PageStep {
        let next = if page.more_items { page.continuation_cursor() } else { None };

        self.pages += 1;
        self.reported_total = page.total_inventory_count.or(self.reported_total);
        self.assets.append(&mut page.assets);
        self.descriptions.append(&mut page.descriptions);

        match (page.more_items, next) {
            (false, _) => PageStep::Finished { partial: false },
            (true, Some(cursor)) => PageStep::Continue(cursor),
            (true, None) => PageStep::Finished { partial: true },
        }
    }

    fn finish(self, partial: bool) -> RetrievalResult {
        RetrievalResult {
            assets: self.assets,
            descriptions: self.descriptions,
            page_size_used: self.page_size,
            partial,
        }
    }
}

/// Drives an [`InventoryPageSource`] through every page, dropping to smaller counts when steam soft blocks.
pub struct InventoryCollector<S, R> {
    source: S,
    reporter: R,
    settings: CollectorSettings,
}

impl<S: InventoryPageSource, R: StatusReporter> InventoryCollector<S, R> {
    pub fn new(source: S, reporter: R, settings: CollectorSettings) -> Self {
        InventoryCollector { source, reporter, settings }
    }

    ///Fetches the whole CS2 inventory of `steamid`.
    ///
    /// Malformed responses, transport errors and a tripped page guard end the retrieval right away,
    /// only soft blocks move on to the next count.
    pub async fn collect(&self, steamid: &SteamId) -> Result<RetrievalResult, InventoryError> {
        let page_sizes = self.settings.normalized_page_sizes();
        if page_sizes.is_empty() {
            return Err( InventoryError::NoPageSizes { max: MAX_SAFE_PAGE_SIZE } );
        }

        for &count in &page_sizes {
            self.reporter.report(Severity::Muted, &format!("Loading inventory… (count={})", count));

            match self.attempt(steamid, count).await? {
                AttemptOutcome::Complete(result) => {
                    info!(
                        %steamid, count,
                        assets = result.assets.len(),
                        descriptions = result.descriptions.len(),
                        partial = result.partial,
                        "inventory retrieved"
                    );
                    return Ok(result);
                }
                AttemptOutcome::SoftBlocked => {
                    self.reporter.report(Severity::Muted, &format!("Steam returned null at count={}. Trying smaller count…", count));
                    sleep(self.settings.soft_block_delay).await;
                }
            }
        }

        Err( InventoryError::SoftBlockExhausted { tried: page_sizes } )
    }

    async fn attempt(&self, steamid: &SteamId, count: u32) -> Result<AttemptOutcome, InventoryError> {
        let mut attempt = PageAttempt::new(count);

        while attempt.pages < self.settings.max_pages {
            let outcome = self.source.fetch_page(steamid, count, attempt.cursor.as_deref()).await?;

            let page = match outcome {
                PageOutcome::Success(page) => page,
                PageOutcome::SoftBlock { status, url } => {
                    warn!(status, %url, count, pages = attempt.pages, "soft block, discarding this count");
                    return Ok(AttemptOutcome::SoftBlocked);
                }
                PageOutcome::Malformed { status, url, sample } => {
                    return Err( InventoryError::MalformedResponse { status, url, sample } );
                }
            };

            match attempt.absorb(page) {
                PageStep::Finished { partial } => {
                    debug!(count, pages = attempt.pages, assets = attempt.assets.len(), reported_total = ?attempt.reported_total, "pagination finished");
                    if partial {
                        warn!(count, pages = attempt.pages, "more_items set but no cursor, returning partial inventory");
                    }
                    return Ok( AttemptOutcome::Complete(attempt.finish(partial)) );
                }
                PageStep::Continue(cursor) => {
                    attempt.cursor = Some(cursor);
                    sleep(self.settings.page_delay).await;
                }
            }
        }

        Err( InventoryError::PaginationExhausted { page_size: count, max_pages: self.settings.max_pages } )
    }
}
