//! Terminal client for the cart grocery list.

use clap::{Parser, Subcommand, ValueEnum};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, Table};

use cart_client::{ItemCache, ItemsApi};
use cart_domain::{
    Item, ItemFilter, ItemId, ItemStatus, ItemType, NewItem, SortKey, StatusFilter,
};

#[derive(Parser)]
#[command(name = "cart", about = "Grocery list client", version)]
struct Cli {
    /// Server base URL (defaults to $CART_URL, then localhost)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Type,
    Store,
    Aisle,
    Date,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortKey::Name,
            SortArg::Type => SortKey::Type,
            SortArg::Store => SortKey::Store,
            SortArg::Aisle => SortKey::Aisle,
            SortArg::Date => SortKey::DateAdded,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum TypeArg {
    Grocery,
    Supply,
    Clothing,
    Other,
}

impl From<TypeArg> for ItemType {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::Grocery => ItemType::Grocery,
            TypeArg::Supply => ItemType::Supply,
            TypeArg::Clothing => ItemType::Clothing,
            TypeArg::Other => ItemType::Other,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// All items (the planning view)
    List {
        /// Free-text search over name, stores, aisle, and tags
        #[arg(long)]
        search: Option<String>,
        /// Filter by tag (repeatable; any match qualifies)
        #[arg(long)]
        tag: Vec<String>,
        /// Filter by store
        #[arg(long)]
        store: Option<String>,
        /// Filter by type
        #[arg(long, value_enum)]
        item_type: Option<TypeArg>,
        /// Filter by status ("none", "pending", "purchased", "skipped")
        #[arg(long)]
        status: Option<String>,
        #[arg(long, value_enum, default_value = "date")]
        sort: SortArg,
    },
    /// The active trip, pending first
    Shop {
        #[arg(long)]
        store: Option<String>,
        #[arg(long, value_enum, default_value = "aisle")]
        sort: SortArg,
    },
    /// Status counts
    Review,
    /// Add an item
    Add {
        name: String,
        #[arg(long, default_value_t = 1.0)]
        quantity: f64,
        #[arg(long, default_value = "count")]
        unit: String,
        #[arg(long, value_enum, default_value = "grocery")]
        item_type: TypeArg,
        #[arg(long)]
        store: Vec<String>,
        #[arg(long)]
        aisle: Option<String>,
        #[arg(long)]
        tag: Vec<String>,
    },
    /// Toggle an item between pending and purchased
    Check { item: String },
    /// Toggle an item's skipped state
    Skip { item: String },
    /// One more of an item (joins the active list)
    More { item: String },
    /// One fewer of an item (at zero it leaves the active list)
    Fewer { item: String },
    /// Delete an item
    Remove { item: String },
    /// Clear every purchased item off the active list
    Complete,
    /// Load the sample collection
    Seed,
    /// Server liveness
    Status,
}

fn base_url(cli: &Cli) -> String {
    cli.url
        .clone()
        .or_else(|| std::env::var("CART_URL").ok())
        .unwrap_or_else(|| "http://127.0.0.1:8080".to_string())
}

/// Resolve a user-supplied selector: an id prefix or a case-insensitive
/// name match.
fn resolve_item(cache: &ItemCache, selector: &str) -> Result<ItemId, String> {
    let lowered = selector.to_lowercase();
    let matches: Vec<&Item> = cache
        .items()
        .iter()
        .filter(|item| {
            item.id.to_string().starts_with(&lowered) || item.name.to_lowercase() == lowered
        })
        .collect();
    match matches.as_slice() {
        [item] => Ok(item.id),
        [] => Err(format!("no item matches {:?}", selector)),
        many => Err(format!(
            "{:?} is ambiguous ({} matches); use an id prefix",
            selector,
            many.len()
        )),
    }
}

fn status_label(status: Option<ItemStatus>) -> String {
    status.map_or_else(|| "-".to_string(), |s| s.to_string())
}

fn render(items: &[Item]) {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(["id", "name", "qty", "unit", "status", "type", "stores", "aisle", "tags"]);
    for item in items {
        table.add_row([
            Cell::new(&item.id.to_string()[..8]),
            Cell::new(&item.name),
            Cell::new(item.quantity),
            Cell::new(&item.unit),
            Cell::new(status_label(item.status)),
            Cell::new(item.item_type),
            Cell::new(item.stores.join(", ")),
            Cell::new(item.aisle.as_deref().unwrap_or("-")),
            Cell::new(item.tags.join(", ")),
        ]);
    }
    println!("{table}");
}

fn parse_status_filter(raw: &str) -> Result<StatusFilter, String> {
    match raw {
        "none" | "null" => Ok(StatusFilter::Unset),
        "pending" => Ok(StatusFilter::Is(ItemStatus::Pending)),
        "purchased" => Ok(StatusFilter::Is(ItemStatus::Purchased)),
        "skipped" => Ok(StatusFilter::Is(ItemStatus::Skipped)),
        other => Err(format!("unknown status {:?}", other)),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    if let Err(message) = run(cli).await {
        eprintln!("error: {message}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    let url = base_url(&cli);

    if let Command::Status = cli.command {
        // Liveness check without hydrating the collection.
        let api = ItemsApi::new(&url).map_err(|e| e.to_string())?;
        let items = api.list().await.map_err(|e| e.to_string())?;
        println!("ok: {} items at {}", items.len(), url);
        return Ok(());
    }

    let mut cache = ItemCache::connect(&url).await.map_err(|e| e.to_string())?;

    match cli.command {
        Command::Status => unreachable!("handled above"),
        Command::List {
            search,
            tag,
            store,
            item_type,
            status,
            sort,
        } => {
            let filter = ItemFilter {
                search,
                tags: tag,
                store,
                item_type: item_type.map(Into::into),
                status: status.as_deref().map(parse_status_filter).transpose()?,
            };
            render(&cache.planning_view(&filter, sort.into()));
        }
        Command::Shop { store, sort } => {
            let filter = ItemFilter {
                store,
                ..Default::default()
            };
            render(&cache.shopping_view(&filter, sort.into()));
        }
        Command::Review => {
            let counts = cache.review_counts();
            println!(
                "pending {}  purchased {}  skipped {}  off-list {}  total {}",
                counts.pending, counts.purchased, counts.skipped, counts.unset, counts.total
            );
        }
        Command::Add {
            name,
            quantity,
            unit,
            item_type,
            store,
            aisle,
            tag,
        } => {
            let new = NewItem {
                name,
                quantity,
                unit,
                status: None,
                item_type: item_type.into(),
                stores: store,
                aisle,
                tags: tag,
            };
            let id = cache.add(new).await.map_err(|e| e.to_string())?;
            println!("added {}", id);
        }
        Command::Check { item } => {
            let id = resolve_item(&cache, &item)?;
            cache.toggle_purchased(id).await.map_err(|e| e.to_string())?;
            println!("{} is now {}", item, status_label(cache.get(id).and_then(|i| i.status)));
        }
        Command::Skip { item } => {
            let id = resolve_item(&cache, &item)?;
            cache.toggle_skipped(id).await.map_err(|e| e.to_string())?;
            println!("{} is now {}", item, status_label(cache.get(id).and_then(|i| i.status)));
        }
        Command::More { item } => {
            let id = resolve_item(&cache, &item)?;
            cache.increment(id).await.map_err(|e| e.to_string())?;
            let quantity = cache.get(id).map_or(0.0, |i| i.quantity);
            println!("{} x{}", item, quantity);
        }
        Command::Fewer { item } => {
            let id = resolve_item(&cache, &item)?;
            cache.decrement(id).await.map_err(|e| e.to_string())?;
            let quantity = cache.get(id).map_or(0.0, |i| i.quantity);
            println!("{} x{}", item, quantity);
        }
        Command::Remove { item } => {
            let id = resolve_item(&cache, &item)?;
            cache.delete(id).await.map_err(|e| e.to_string())?;
            println!("removed {}", item);
        }
        Command::Complete => {
            let cleared = cache.complete_purchasing().await;
            println!("cleared {} purchased item(s)", cleared);
        }
        Command::Seed => {
            let created = cache.seed_sample_data().await;
            println!("seeded {} item(s)", created);
        }
    }
    Ok(())
}
