use crate::error::{Error, Result};

pub(crate) const SCROLL_TIMED_OUT: &str = "scroll request timed out";

/// Bookkeeping for one scroll: the total fixed when the scroll was opened,
/// how many hits have arrived since, and the size of the latest page.
///
/// Completion is inferred from the counts alone; the server never says a
/// scroll is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollProgress {
    total: u64,
    seen: u64,
    last_page: usize,
}

impl ScrollProgress {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            seen: 0,
            last_page: 0,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn seen(&self) -> u64 {
        self.seen
    }

    pub fn last_page(&self) -> usize {
        self.last_page
    }

    pub fn record(&mut self, page_len: usize) {
        self.last_page = page_len;
        self.seen += page_len as u64;
    }

    /// Overshooting the total counts as done.
    pub fn is_complete(&self) -> bool {
        self.seen >= self.total
    }

    /// An empty page before the total is reached means the cursor stopped
    /// producing, typically because it expired server-side.
    pub fn ensure_not_stalled(&self) -> Result<()> {
        if !self.is_complete() && self.last_page == 0 {
            return Err(Error::TimeoutError(SCROLL_TIMED_OUT.to_owned()));
        }
        Ok(())
    }
}
