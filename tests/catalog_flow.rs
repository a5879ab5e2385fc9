//! End-to-end flows: App transitions driven through effects against an in-memory catalog

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use pokedex::api::CatalogApi;
use pokedex::app::App;
use pokedex::effects::run_command;
use pokedex::hydrate::{hydrate, HydrationPolicy};
use pokedex::pagination::PageSize;
use pokedex::types::{
    AppEvent, CategoryMember, CategoryRecord, Command, Item, ItemId, ListingPage, NamedRef, Stat,
};

#[derive(Default)]
struct FakeCatalog {
    order: Vec<String>,
    items: HashMap<String, Item>,
    categories: HashMap<String, Vec<String>>,
    total: u64,
    failing: HashSet<String>,
    delay_ms: u64,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeCatalog {
    fn add(&mut self, id: u32, name: &str, tags: &[&str]) {
        self.order.push(name.to_string());
        self.items.insert(
            name.to_string(),
            Item {
                id: ItemId::Number(id),
                name: name.to_string(),
                image: Some(format!("https://img.example/{id}.png")),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                stats: vec![Stat { name: "hp".into(), value: id * 2 }],
            },
        );
        self.total = self.order.len() as u64;
        for t in tags {
            self.categories.entry(t.to_string()).or_default().push(name.to_string());
        }
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list_page(&self, limit: u64, offset: u64) -> Result<ListingPage> {
        let results = self
            .order
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|n| NamedRef { name: n.clone() })
            .collect();
        Ok(ListingPage { count: self.total, results })
    }

    async fn get_item(&self, name: &str) -> Result<Item> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if self.delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.failing.contains(name) {
            return Err(anyhow!("http 500 for {name}"));
        }
        self.items
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("not found: {name}"))
    }

    async fn list_category(&self, name: &str) -> Result<CategoryRecord> {
        let members = self
            .categories
            .get(name)
            .ok_or_else(|| anyhow!("not found: type {name}"))?;
        Ok(CategoryRecord {
            pokemon: members
                .iter()
                .map(|m| CategoryMember { pokemon: NamedRef { name: m.clone() } })
                .collect(),
        })
    }
}

/// 100 fillers plus a few typed entries
fn catalog() -> FakeCatalog {
    let mut c = FakeCatalog::default();
    c.add(4, "charmander", &["fire"]);
    c.add(7, "squirtle", &["water"]);
    c.add(25, "pikachu", &["electric"]);
    c.add(146, "moltres", &["fire", "flying"]);
    c.add(658, "greninja", &["water", "dark"]);
    c.add(721, "volcanion", &["fire", "water"]);
    for i in 0..94u32 {
        c.add(1000 + i, &format!("filler-{i}"), &["normal"]);
    }
    c
}

/// Apply `ev`, then run every resulting command to completion and feed the results back
async fn drive(app: &mut App, api: &FakeCatalog, ev: AppEvent, policy: HydrationPolicy) {
    let mut queue = vec![ev];
    while let Some(ev) = queue.pop() {
        for cmd in app.on_event(ev) {
            queue.push(run_command(api, cmd, policy).await);
        }
    }
}

fn names(app: &App) -> Vec<&str> {
    app.items().iter().map(|i| i.name.as_str()).collect()
}

#[tokio::test]
async fn first_page_shows_ten_pages() {
    let api = catalog();
    let mut app = App::new(PageSize::Ten, 1, true, 30);
    drive(&mut app, &api, AppEvent::Init, HydrationPolicy::AllOrNothing).await;

    assert_eq!(app.total(), 100);
    assert_eq!(app.page_count(), 10);
    assert_eq!(app.current_page(), 1);
    assert_eq!(app.items().len(), 10);
    assert_eq!(names(&app)[..3], ["charmander", "squirtle", "pikachu"]);
    assert_eq!(app.header_title(), "Pokedex");
}

#[tokio::test]
async fn second_page_uses_offset_ten() {
    let api = catalog();
    let mut app = App::new(PageSize::Ten, 1, true, 30);
    drive(&mut app, &api, AppEvent::Init, HydrationPolicy::AllOrNothing).await;

    let cmds = app.on_event(AppEvent::PageChanged(2));
    assert!(matches!(
        cmds.as_slice(),
        [Command::FetchPage { limit: 10, offset: 10, .. }]
    ));
    for cmd in cmds {
        let ev = run_command(&api, cmd, HydrationPolicy::AllOrNothing).await;
        app.on_event(ev);
    }
    assert_eq!(app.current_page(), 2);
    assert_eq!(names(&app)[0], "filler-4");
}

#[tokio::test]
async fn search_prepends_and_placeholders_collapse() {
    let api = catalog();
    let mut app = App::new(PageSize::Ten, 2, true, 30);
    drive(&mut app, &api, AppEvent::Init, HydrationPolicy::AllOrNothing).await;
    assert_eq!(app.items().len(), 10);

    app.on_event(AppEvent::SearchInput("pikachu".into()));
    drive(&mut app, &api, AppEvent::SearchSubmitted, HydrationPolicy::AllOrNothing).await;
    assert_eq!(app.items()[0].id, ItemId::Number(25));
    assert_eq!(app.items().len(), 11);

    // Searching again moves nothing and adds nothing
    drive(&mut app, &api, AppEvent::SearchSubmitted, HydrationPolicy::AllOrNothing).await;
    assert_eq!(app.items().len(), 11);

    app.on_event(AppEvent::SearchInput("zzz".into()));
    drive(&mut app, &api, AppEvent::SearchSubmitted, HydrationPolicy::AllOrNothing).await;
    assert_eq!(app.items()[0].id, ItemId::NotFound);
    assert_eq!(app.items()[0].name, "zzz not found");
    assert_eq!(app.items().len(), 12);

    // Same sentinel identity: the newer placeholder replaces the older one
    app.on_event(AppEvent::SearchInput("yyy".into()));
    drive(&mut app, &api, AppEvent::SearchSubmitted, HydrationPolicy::AllOrNothing).await;
    assert_eq!(app.items().len(), 12);
    assert_eq!(app.items()[0].name, "yyy not found");
    assert_eq!(
        app.items().iter().filter(|i| i.id == ItemId::NotFound).count(),
        1
    );
}

#[tokio::test]
async fn tag_filters_replace_then_union_then_remove() {
    let api = catalog();
    let mut app = App::new(PageSize::Ten, 1, true, 30);
    drive(&mut app, &api, AppEvent::Init, HydrationPolicy::AllOrNothing).await;

    drive(&mut app, &api, AppEvent::TagClicked("fire".into()), HydrationPolicy::AllOrNothing).await;
    assert_eq!(names(&app), vec!["charmander", "moltres", "volcanion"]);
    assert_eq!(app.filters(), &["fire".to_string()]);
    assert!(!app.pagination_visible());

    drive(&mut app, &api, AppEvent::TagClicked("water".into()), HydrationPolicy::AllOrNothing).await;
    assert_eq!(
        names(&app),
        vec!["charmander", "moltres", "volcanion", "squirtle", "greninja"]
    );
    assert_eq!(app.filters(), &["fire".to_string(), "water".to_string()]);

    // volcanion carries both tags and goes away with fire
    drive(&mut app, &api, AppEvent::TagRemoved("fire".into()), HydrationPolicy::AllOrNothing).await;
    assert_eq!(names(&app), vec!["squirtle", "greninja"]);
    assert_eq!(app.filters(), &["water".to_string()]);

    // Last chip gone: back to the paginated listing
    drive(&mut app, &api, AppEvent::TagRemoved("water".into()), HydrationPolicy::AllOrNothing).await;
    assert!(app.pagination_visible());
    assert_eq!(app.items().len(), 10);
    assert_eq!(names(&app)[0], "charmander");
}

#[tokio::test]
async fn failed_category_adds_no_filter() {
    let api = catalog();
    let mut app = App::new(PageSize::Ten, 1, true, 30);
    drive(&mut app, &api, AppEvent::Init, HydrationPolicy::AllOrNothing).await;

    drive(&mut app, &api, AppEvent::TagClicked("shadow".into()), HydrationPolicy::AllOrNothing).await;
    assert!(app.filters().is_empty());
    assert!(app.items().is_empty());
    assert_eq!(app.header_title(), "loading...");

    drive(&mut app, &api, AppEvent::Reload, HydrationPolicy::AllOrNothing).await;
    assert_eq!(app.items().len(), 10);
}

#[tokio::test]
async fn one_bad_detail_fails_whole_batch() {
    let mut api = catalog();
    let mut app = App::new(PageSize::Ten, 1, true, 30);
    drive(&mut app, &api, AppEvent::Init, HydrationPolicy::AllOrNothing).await;
    let before: Vec<String> = names(&app).iter().map(|s| s.to_string()).collect();

    api.failing.insert("filler-5".into());
    drive(&mut app, &api, AppEvent::PageChanged(2), HydrationPolicy::AllOrNothing).await;
    assert!(app.items().is_empty(), "page change clears, failed batch never lands");
    assert_eq!(app.toast_message(), Some("Failed to load page"));

    // Fresh app on the healthy first page keeps what it had when a reload fails
    let mut app = App::new(PageSize::Ten, 1, true, 30);
    let healthy = catalog();
    drive(&mut app, &healthy, AppEvent::Init, HydrationPolicy::AllOrNothing).await;
    api.failing.insert("squirtle".into());
    drive(&mut app, &api, AppEvent::Reload, HydrationPolicy::AllOrNothing).await;
    assert_eq!(names(&app), before.iter().map(|s| s.as_str()).collect::<Vec<_>>());
}

#[tokio::test]
async fn partial_policy_keeps_survivors_in_order() {
    let mut api = catalog();
    api.failing.insert("squirtle".into());
    let mut app = App::new(PageSize::Ten, 1, true, 30);
    drive(&mut app, &api, AppEvent::Init, HydrationPolicy::Partial).await;

    assert_eq!(app.items().len(), 9);
    assert_eq!(names(&app)[..2], ["charmander", "pikachu"]);
}

#[tokio::test]
async fn batch_requests_fan_out_together() {
    let mut api = catalog();
    api.delay_ms = 20;
    let names: Vec<String> = api.order.iter().take(10).cloned().collect();

    let items = hydrate(&api, &names, HydrationPolicy::AllOrNothing).await.unwrap();
    assert_eq!(items.len(), 10);
    assert_eq!(api.max_in_flight.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn stale_tag_result_is_dropped_after_return_to_listing() {
    let api = catalog();
    let mut app = App::new(PageSize::Ten, 1, true, 30);
    drive(&mut app, &api, AppEvent::Init, HydrationPolicy::AllOrNothing).await;
    drive(&mut app, &api, AppEvent::TagClicked("fire".into()), HydrationPolicy::AllOrNothing).await;

    // water is requested, but the user drops fire before it lands
    let pending = app.on_event(AppEvent::TagClicked("water".into()));
    let back_to_listing = app.on_event(AppEvent::TagRemoved("fire".into()));
    for cmd in back_to_listing {
        let ev = run_command(&api, cmd, HydrationPolicy::AllOrNothing).await;
        app.on_event(ev);
    }
    for cmd in pending {
        let ev = run_command(&api, cmd, HydrationPolicy::AllOrNothing).await;
        app.on_event(ev);
    }

    assert!(app.filters().is_empty());
    assert!(app.pagination_visible());
    assert_eq!(app.items().len(), 10);
}
