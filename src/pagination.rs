use anyhow::{anyhow, Result};
use std::fmt;

/// Page size choices offered by the size selector
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum PageSize {
    #[default]
    Ten,
    Twenty,
    Fifty,
}

impl PageSize {
    pub fn get(self) -> u64 {
        match self {
            PageSize::Ten => 10,
            PageSize::Twenty => 20,
            PageSize::Fifty => 50,
        }
    }

    pub fn next(self) -> Self {
        match self {
            PageSize::Ten => PageSize::Twenty,
            PageSize::Twenty => PageSize::Fifty,
            PageSize::Fifty => PageSize::Ten,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            PageSize::Ten => PageSize::Fifty,
            PageSize::Twenty => PageSize::Ten,
            PageSize::Fifty => PageSize::Twenty,
        }
    }
}

impl std::str::FromStr for PageSize {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "10" => Ok(PageSize::Ten),
            "20" => Ok(PageSize::Twenty),
            "50" => Ok(PageSize::Fifty),
            _ => Err(anyhow!("Invalid page size '{s}'. Valid options: 10, 20, 50")),
        }
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Offset/limit window over the base listing.
///
/// `total` is only meaningful in listing mode; category results carry no count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pagination {
    pub size: PageSize,
    pub offset: u64,
    pub total: u64,
}

impl Pagination {
    pub fn new(size: PageSize, start_page: u64) -> Self {
        let mut p = Self { size, offset: 0, total: 1 };
        p.offset = p.offset_for_page(start_page);
        p
    }

    pub fn limit(&self) -> u64 {
        self.size.get()
    }

    /// 1-based page number to offset
    pub fn offset_for_page(&self, page: u64) -> u64 {
        page.saturating_sub(1) * self.limit()
    }

    pub fn page_count(&self) -> u64 {
        self.total.div_ceil(self.limit()).max(1)
    }

    /// Page containing the current offset. A size change keeps the offset, so this
    /// rounds up when the offset is no longer a multiple of the size.
    pub fn current_page(&self) -> u64 {
        self.offset.div_ceil(self.limit()) + 1
    }

    pub fn go_to(&mut self, page: u64) {
        self.offset = self.offset_for_page(page.max(1));
    }
}
