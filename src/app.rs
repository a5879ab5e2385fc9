use std::time::{Duration, Instant};

use crate::dedup::{dedup_by_id, prepend_dedup, union_dedup};
use crate::pagination::{PageSize, Pagination};
use crate::types::{AppEvent, Command, Item, Stat};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode { Normal, Search, Chips }

/// Detail overlay: the stats of exactly one inspected item
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatsOverlay {
    pub name: String,
    pub stats: Vec<Stat>,
}

pub struct App {
    quit: bool,

    // Catalog state
    items: Vec<Item>,
    filters: Vec<String>,          // active category chips, selection order, unique
    pagination: Pagination,
    search: String,
    overlay: Option<StatsOverlay>,

    // Bumped whenever the data source is switched; completions carry the value they were issued with
    generation: u64,
    discard_stale: bool,

    // UI state
    input_mode: InputMode,
    sel_item: usize,
    sel_chip: usize,
    fps: u32,

    // Debug log (Ctrl+D panel)
    debug_log: Vec<String>,
    debug_visible: bool,

    toast_message: Option<(String, Instant)>,
}

impl App {
    pub fn new(page_size: PageSize, start_page: u64, discard_stale: bool, fps: u32) -> Self {
        Self {
            quit: false,
            items: Vec::new(),
            filters: Vec::new(),
            pagination: Pagination::new(page_size, start_page),
            search: String::new(),
            overlay: None,
            generation: 0,
            discard_stale,
            input_mode: InputMode::Normal,
            sel_item: 0,
            sel_chip: 0,
            fps: fps.max(1),
            debug_log: Vec::new(),
            debug_visible: false,
            toast_message: None,
        }
    }

    // ----- getters -----
    pub fn quit_flag(&self) -> bool { self.quit }
    pub fn fps(&self) -> u32 { self.fps }
    pub fn items(&self) -> &[Item] { &self.items }
    pub fn filters(&self) -> &[String] { &self.filters }
    pub fn search(&self) -> &str { &self.search }
    pub fn overlay(&self) -> Option<&StatsOverlay> { self.overlay.as_ref() }
    pub fn generation(&self) -> u64 { self.generation }
    pub fn input_mode(&self) -> InputMode { self.input_mode }
    pub fn selected_index(&self) -> usize { self.sel_item }
    pub fn selected_chip(&self) -> usize { self.sel_chip }
    pub fn page_size(&self) -> PageSize { self.pagination.size }
    pub fn offset(&self) -> u64 { self.pagination.offset }
    pub fn total(&self) -> u64 { self.pagination.total }
    pub fn page_count(&self) -> u64 { self.pagination.page_count() }
    pub fn current_page(&self) -> u64 { self.pagination.current_page() }
    pub fn debug_log(&self) -> &[String] { &self.debug_log }
    pub fn debug_visible(&self) -> bool { self.debug_visible }

    /// "loading..." whenever nothing is displayed
    pub fn header_title(&self) -> &'static str {
        if self.items.is_empty() { "loading..." } else { "Pokedex" }
    }

    /// Category results carry no total count, so paging only applies to the base listing
    pub fn pagination_visible(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.items.get(self.sel_item)
    }

    // ----- toast -----
    pub fn show_toast(&mut self, msg: String) {
        self.toast_message = Some((msg, Instant::now()));
    }

    /// Current toast if still active (visible for 2 seconds)
    pub fn toast_message(&self) -> Option<&str> {
        const TOAST_DURATION: Duration = Duration::from_secs(2);
        self.toast_message.as_ref().and_then(|(msg, time)| {
            if time.elapsed() < TOAST_DURATION {
                Some(msg.as_str())
            } else {
                None
            }
        })
    }

    pub fn log_debug(&mut self, msg: String) {
        const MAX_LOG_ENTRIES: usize = 50;

        log::debug!("{msg}");
        let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
        self.debug_log.push(format!("[{timestamp}] {msg}"));
        if self.debug_log.len() > MAX_LOG_ENTRIES {
            self.debug_log.remove(0);
        }
    }

    pub fn toggle_debug_panel(&mut self) {
        self.debug_visible = !self.debug_visible;
    }

    // ----- events -----
    /// Apply one event. Returns the upstream work the runtime should start.
    pub fn on_event(&mut self, ev: AppEvent) -> Vec<Command> {
        match ev {
            AppEvent::Quit => {
                self.quit = true;
                vec![]
            }
            AppEvent::Init | AppEvent::Reload => {
                if !self.filters.is_empty() {
                    return vec![];
                }
                self.request_page()
            }
            AppEvent::PageChanged(page) => self.change_page(page),
            AppEvent::PageSizeChanged(size) => self.change_page_size(size),
            AppEvent::PageLoaded { generation, total, items } => {
                if self.is_stale(generation) || !self.filters.is_empty() {
                    self.log_debug(format!("[PAGE] drop stale gen={generation} (current {})", self.generation));
                    return vec![];
                }
                self.log_debug(format!("[PAGE] gen={generation} {} items, total={total}", items.len()));
                self.pagination.total = total;
                self.items = dedup_by_id(items);
                self.clamp_selection();
                vec![]
            }
            AppEvent::PageFailed { generation, error } => {
                log::warn!("[app] page load failed (gen={generation}): {error}");
                if !self.is_stale(generation) {
                    self.show_toast("Failed to load page".to_string());
                }
                vec![]
            }
            AppEvent::SearchInput(text) => {
                self.search = text;
                vec![]
            }
            AppEvent::SearchSubmitted => {
                if self.search.trim().is_empty() {
                    return vec![];
                }
                self.log_debug(format!("[SEARCH] '{}'", self.search));
                vec![Command::Search { query: self.search.clone() }]
            }
            AppEvent::SearchLoaded { query, result } => {
                let head = match result {
                    Ok(item) => item,
                    Err(e) => {
                        log::info!("[app] search '{query}' failed: {e}");
                        Item::placeholder(&query)
                    }
                };
                self.items = prepend_dedup(head, &self.items);
                self.sel_item = 0;
                vec![]
            }
            AppEvent::TagClicked(tag) => self.click_tag(tag),
            AppEvent::CategoryLoaded { generation, tag, items } => {
                if self.is_stale(generation) {
                    self.log_debug(format!("[TAG] drop stale '{tag}' gen={generation}"));
                    return vec![];
                }
                self.items = if self.filters.is_empty() {
                    dedup_by_id(items)
                } else {
                    union_dedup(&self.items, items)
                };
                if !self.filters.contains(&tag) {
                    self.filters.push(tag);
                }
                self.clamp_selection();
                vec![]
            }
            AppEvent::CategoryFailed { generation, tag, error } => {
                log::warn!("[app] category '{tag}' failed (gen={generation}): {error}");
                if !self.is_stale(generation) {
                    self.show_toast(format!("Failed to load type '{tag}'"));
                }
                vec![]
            }
            AppEvent::TagRemoved(tag) => self.remove_tag(&tag),
            AppEvent::OpenStats(idx) => {
                // Placeholders have no stats and open nothing
                if let Some(item) = self.items.get(idx) {
                    if !item.stats.is_empty() {
                        self.overlay = Some(StatsOverlay {
                            name: item.name.clone(),
                            stats: item.stats.clone(),
                        });
                    }
                }
                vec![]
            }
            AppEvent::CloseStats => {
                self.overlay = None;
                vec![]
            }
        }
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.discard_stale && generation != self.generation
    }

    fn request_page(&mut self) -> Vec<Command> {
        self.generation += 1;
        self.log_debug(format!(
            "[PAGE] request gen={} limit={} offset={}",
            self.generation,
            self.pagination.limit(),
            self.pagination.offset
        ));
        vec![Command::FetchPage {
            generation: self.generation,
            limit: self.pagination.limit(),
            offset: self.pagination.offset,
        }]
    }

    fn change_page(&mut self, page: u64) -> Vec<Command> {
        if !self.filters.is_empty() {
            return vec![];
        }
        let page = page.clamp(1, self.pagination.page_count());
        if page == self.pagination.current_page() && self.pagination.offset == self.pagination.offset_for_page(page) {
            return vec![];
        }
        self.items.clear();
        self.sel_item = 0;
        self.pagination.go_to(page);
        self.request_page()
    }

    fn change_page_size(&mut self, size: PageSize) -> Vec<Command> {
        if !self.filters.is_empty() || size == self.pagination.size {
            return vec![];
        }
        self.items.clear();
        self.sel_item = 0;
        self.pagination.size = size;
        self.request_page()
    }

    fn click_tag(&mut self, tag: String) -> Vec<Command> {
        if self.filters.contains(&tag) {
            return vec![];
        }
        if self.filters.is_empty() {
            // Switching from the listing to category results
            self.items.clear();
            self.sel_item = 0;
            self.generation += 1;
        }
        self.log_debug(format!("[TAG] request '{tag}' gen={}", self.generation));
        vec![Command::FetchCategory { generation: self.generation, tag }]
    }

    /// Drops every item carrying `tag`, including items that also carry another active tag
    fn remove_tag(&mut self, tag: &str) -> Vec<Command> {
        if !self.filters.iter().any(|t| t == tag) {
            return vec![];
        }
        self.items.retain(|it| !it.has_tag(tag));
        self.filters.retain(|t| t != tag);
        self.clamp_selection();
        self.sel_chip = self.sel_chip.min(self.filters.len().saturating_sub(1));
        if self.filters.is_empty() {
            self.input_mode = InputMode::Normal;
            return self.request_page();
        }
        vec![]
    }

    fn clamp_selection(&mut self) {
        self.sel_item = self.sel_item.min(self.items.len().saturating_sub(1));
    }

    // ----- navigation -----
    pub fn up(&mut self) {
        self.sel_item = self.sel_item.saturating_sub(1);
    }

    pub fn down(&mut self) {
        if self.sel_item + 1 < self.items.len() {
            self.sel_item += 1;
        }
    }

    pub fn home(&mut self) {
        self.sel_item = 0;
    }

    pub fn end(&mut self) {
        self.sel_item = self.items.len().saturating_sub(1);
    }

    pub fn page_forward(&mut self) -> Vec<Command> {
        if self.current_page() >= self.page_count() {
            return vec![];
        }
        let next = self.current_page() + 1;
        self.on_event(AppEvent::PageChanged(next))
    }

    pub fn page_back(&mut self) -> Vec<Command> {
        if self.current_page() <= 1 {
            return vec![];
        }
        let prev = self.current_page() - 1;
        self.on_event(AppEvent::PageChanged(prev))
    }

    /// n-th tag chip (0-based) of the selected item
    pub fn selected_item_tag(&self, n: usize) -> Option<String> {
        self.selected_item().and_then(|it| it.tags.get(n).cloned())
    }

    // ----- search input -----
    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Search;
    }

    pub fn close_search(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    // ----- chip removal mode -----
    pub fn start_chips(&mut self) {
        if !self.filters.is_empty() {
            self.sel_chip = 0;
            self.input_mode = InputMode::Chips;
        }
    }

    pub fn chip_left(&mut self) {
        self.sel_chip = self.sel_chip.saturating_sub(1);
    }

    pub fn chip_right(&mut self) {
        if self.sel_chip + 1 < self.filters.len() {
            self.sel_chip += 1;
        }
    }

    pub fn selected_filter(&self) -> Option<&str> {
        self.filters.get(self.sel_chip).map(|s| s.as_str())
    }

    pub fn close_chips(&mut self) {
        self.input_mode = InputMode::Normal;
    }
}
