//! Command handlers
//!
//! Handlers write their output to any `io::Write` so they can be driven
//! against an in-memory storefront.

use anyhow::{anyhow, bail, Context, Result};
use boutique_admin::{export_csv, password_digest, AdminAuth, DateFilter};
use boutique_backend::Backend;
use boutique_catalog::{
    FetchOutcome, Locale, OrderId, OrderQuery, OrderStatus, ProductId, ProductQuery,
    ProductSortField, SortDirection,
};
use boutique_cart::{CartKey, Quantity};
use boutique_core::{BoutiqueConfig, CheckoutForm, Storefront};
use boutique_storage::KeyValueStore;
use chrono::{TimeZone, Utc};
use clap::ArgMatches;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber; `RUST_LOG` wins over `verbose`
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// File, then environment, then `--data-dir`
pub fn load_config(matches: &ArgMatches) -> Result<BoutiqueConfig> {
    let config = match matches.get_one::<String>("config") {
        Some(path) => BoutiqueConfig::load(path).with_context(|| format!("loading {path}"))?,
        None => BoutiqueConfig::new(),
    };
    let mut config = config.apply_env();
    if let Some(dir) = matches.get_one::<String>("data-dir") {
        config = config.with_data_dir(PathBuf::from(dir));
    }
    Ok(config)
}

fn arg<'a>(matches: &'a ArgMatches, name: &str) -> Option<&'a str> {
    matches.get_one::<String>(name).map(String::as_str)
}

fn locale(matches: &ArgMatches) -> Locale {
    arg(matches, "locale")
        .and_then(|l| l.parse().ok())
        .unwrap_or_default()
}

/// Dispatch a parsed command line
pub async fn run<S: KeyValueStore>(
    matches: &ArgMatches,
    shop: &mut Storefront<S>,
    out: &mut impl Write,
) -> Result<()> {
    match matches.subcommand() {
        Some(("cart", sub)) => cart(sub, shop, out).await,
        Some(("products", sub)) => products(sub, shop, out).await,
        Some(("checkout", args)) => checkout(args, shop, out).await,
        Some(("admin", sub)) => admin(sub, shop, out).await,
        _ => bail!("no command given, see --help"),
    }
}

// ============================================================================
// Cart
// ============================================================================

async fn cart<S: KeyValueStore>(
    matches: &ArgMatches,
    shop: &mut Storefront<S>,
    out: &mut impl Write,
) -> Result<()> {
    match matches.subcommand() {
        Some(("show", args)) => show_cart(shop, locale(args), out),
        Some(("add", args)) => {
            let id = ProductId::new(arg(args, "product").unwrap_or_default());
            let quantity = Quantity::try_from(*args.get_one::<i64>("quantity").unwrap_or(&1))?;
            let product = shop
                .backend()
                .fetch_product(&id)
                .await?
                .ok_or_else(|| anyhow!("product {id} not found"))?;
            let key = shop
                .cart_mut()
                .add(&product, quantity, arg(args, "size"), arg(args, "color"));
            writeln!(out, "Added {} x {} ({key})", quantity.get(), product.name)?;
            show_cart(shop, locale(args), out)
        }
        Some(("remove", args)) => {
            let key = find_line(shop, args)?;
            shop.cart_mut().remove(&key);
            writeln!(out, "Removed {key}")?;
            show_cart(shop, locale(args), out)
        }
        Some(("set", args)) => {
            let key = find_line(shop, args)?;
            let quantity = *args.get_one::<i64>("quantity").unwrap_or(&0);
            shop.cart_mut().set_quantity(&key, quantity);
            show_cart(shop, locale(args), out)
        }
        Some(("clear", _)) => {
            shop.cart_mut().clear();
            writeln!(out, "Cart cleared")?;
            Ok(())
        }
        _ => bail!("unknown cart command"),
    }
}

/// The one cart line of `product` that fits `--size`/`--color`
fn find_line<S: KeyValueStore>(shop: &Storefront<S>, args: &ArgMatches) -> Result<CartKey> {
    let product = ProductId::new(arg(args, "product").unwrap_or_default());
    let (size, color) = (arg(args, "size"), arg(args, "color"));
    let found: Vec<&CartKey> = shop
        .cart()
        .lines()
        .iter()
        .map(|line| line.key())
        .filter(|key| key.matches(&product, size, color))
        .collect();
    match found.as_slice() {
        [key] => Ok((*key).clone()),
        [] => bail!("no cart line for product {product}"),
        many => bail!(
            "product {product} has {} cart lines; pick one with --size/--color",
            many.len()
        ),
    }
}

fn show_cart<S: KeyValueStore>(
    shop: &Storefront<S>,
    locale: Locale,
    out: &mut impl Write,
) -> Result<()> {
    let cart = shop.cart();
    if cart.is_empty() {
        writeln!(out, "Cart is empty")?;
        return Ok(());
    }
    for line in cart.lines() {
        let variant = line.variant_label();
        writeln!(
            out,
            "{:<24} {}{} x{} @ {} = {}",
            line.key().to_string(),
            line.display_name(locale),
            if variant.is_empty() { String::new() } else { format!(" [{variant}]") },
            line.quantity.get(),
            line.price,
            line.line_total(),
        )?;
    }
    writeln!(out, "Items: {}  Total: {}", cart.item_count(), cart.total())?;
    Ok(())
}

// ============================================================================
// Catalog and checkout
// ============================================================================

async fn products<S: KeyValueStore>(
    matches: &ArgMatches,
    shop: &mut Storefront<S>,
    out: &mut impl Write,
) -> Result<()> {
    let Some(("list", args)) = matches.subcommand() else {
        bail!("unknown products command");
    };

    let mut query = shop
        .product_query()
        .page(*args.get_one::<u32>("page").unwrap_or(&1));
    if let Some(search) = arg(args, "search") {
        query = query.search(search);
    }
    if let Some(category) = arg(args, "category") {
        query = query.category(category);
    }
    let field: ProductSortField = arg(args, "sort").unwrap_or("name").parse()?;
    let direction = if args.get_flag("desc") {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    let query: ProductQuery = query.sort(field, direction);

    let loc = locale(args);
    match shop.browse(&query).await {
        FetchOutcome::Ready(page) => {
            for p in &page.items {
                writeln!(
                    out,
                    "{:>5}  {:<28} {:>14}  stock {}",
                    p.id.to_string(),
                    p.display_name(loc),
                    p.price.to_string(),
                    p.stock
                )?;
            }
            writeln!(
                out,
                "Page {} of {} ({} products)",
                query.page, page.total_pages, page.total_count
            )?;
        }
        FetchOutcome::Empty => writeln!(out, "No products found")?,
        FetchOutcome::Failed(e) => return Err(e).context("loading products"),
    }
    Ok(())
}

async fn checkout<S: KeyValueStore>(
    args: &ArgMatches,
    shop: &mut Storefront<S>,
    out: &mut impl Write,
) -> Result<()> {
    let form = CheckoutForm::new(
        arg(args, "name").unwrap_or_default(),
        arg(args, "email").unwrap_or_default(),
        arg(args, "phone").unwrap_or_default(),
        arg(args, "address").unwrap_or_default(),
    );
    let order = shop.checkout(&form).await?;
    writeln!(
        out,
        "Order {} placed: {} item(s), total {}",
        order.id,
        order.unit_count(),
        order.total_amount
    )?;
    Ok(())
}

// ============================================================================
// Admin
// ============================================================================

async fn admin<S: KeyValueStore>(
    matches: &ArgMatches,
    shop: &mut Storefront<S>,
    out: &mut impl Write,
) -> Result<()> {
    let (name, args) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("unknown admin command"))?;

    if name == "hash-password" {
        writeln!(out, "{}", password_digest(arg(args, "password").unwrap_or_default()))?;
        return Ok(());
    }

    let auth = shop.admin_auth()?;
    match name {
        "login" => {
            let user = auth.login(
                arg(args, "email").unwrap_or_default(),
                arg(args, "password").unwrap_or_default(),
            )?;
            writeln!(out, "Signed in as {}", user.email)?;
            return Ok(());
        }
        "logout" => {
            auth.logout();
            writeln!(out, "Signed out")?;
            return Ok(());
        }
        "status" => return session_status(&auth, out),
        _ => {}
    }

    let user = auth.require()?;
    tracing::debug!(email = %user.email, command = name, "admin command");
    match name {
        "dashboard" => dashboard(shop, args.get_flag("json"), out).await,
        "revenue" => {
            let months = *args.get_one::<u32>("months").unwrap_or(&6);
            match shop.statistics().revenue_series(months, Utc::now()).await {
                FetchOutcome::Ready(series) => {
                    for m in series {
                        writeln!(out, "{:<9} {:>16}  {} orders", m.period, m.revenue.to_string(), m.orders)?;
                    }
                }
                FetchOutcome::Empty => writeln!(out, "No orders in the last {months} months")?,
                FetchOutcome::Failed(e) => return Err(e).context("loading revenue"),
            }
            Ok(())
        }
        "top-products" => {
            let limit = *args.get_one::<usize>("limit").unwrap_or(&5);
            match shop.statistics().top_products(limit).await {
                FetchOutcome::Ready(top) => {
                    for (rank, t) in top.iter().enumerate() {
                        writeln!(
                            out,
                            "{}. {:<28} {:>4} sold  {}",
                            rank + 1,
                            t.name,
                            t.total_quantity,
                            t.total_revenue
                        )?;
                    }
                }
                FetchOutcome::Empty => writeln!(out, "No sales yet")?,
                FetchOutcome::Failed(e) => return Err(e).context("loading sales"),
            }
            Ok(())
        }
        "low-stock" => {
            let limit = *args.get_one::<u32>("limit").unwrap_or(&10);
            match shop.products().low_stock(limit).await {
                FetchOutcome::Ready(rows) => {
                    for p in rows {
                        writeln!(out, "{:>5}  {:<28} stock {}", p.id.to_string(), p.name, p.stock)?;
                    }
                }
                FetchOutcome::Empty => writeln!(out, "Stock levels are fine")?,
                FetchOutcome::Failed(e) => return Err(e).context("loading stock"),
            }
            Ok(())
        }
        "orders" => {
            let query = order_query(args)?.page(*args.get_one::<u32>("page").unwrap_or(&1));
            match shop.orders().list(&query).await {
                FetchOutcome::Ready(page) => {
                    for o in &page.items {
                        writeln!(
                            out,
                            "{:>6}  {}  {:<10} {:<24} {}",
                            o.id.to_string(),
                            o.created_at.format("%Y-%m-%d"),
                            o.status.to_string(),
                            o.customer_name,
                            o.total_amount
                        )?;
                    }
                    writeln!(
                        out,
                        "Page {} of {} ({} orders)",
                        query.page, page.total_pages, page.total_count
                    )?;
                }
                FetchOutcome::Empty => writeln!(out, "No orders found")?,
                FetchOutcome::Failed(e) => return Err(e).context("loading orders"),
            }
            Ok(())
        }
        "export" => {
            let rows = shop.orders().export(&order_query(args)?).await?;
            write!(out, "{}", export_csv(&rows))?;
            Ok(())
        }
        "set-status" => {
            let id = OrderId::new(arg(args, "order").unwrap_or_default());
            let status: OrderStatus = arg(args, "status").unwrap_or_default().parse()?;
            let order = shop.orders().update_status(&id, status).await?;
            writeln!(out, "Order {} is now {}", order.id, order.status)?;
            Ok(())
        }
        other => bail!("unknown admin command '{other}'"),
    }
}

fn order_query(args: &ArgMatches) -> Result<OrderQuery> {
    let mut query = OrderQuery::new().status_filter(arg(args, "status").unwrap_or("all"))?;
    if let Some(search) = arg(args, "search") {
        query = query.search(search);
    }
    let period: DateFilter = arg(args, "period").unwrap_or("all").parse()?;
    Ok(period.apply(query, Utc::now()))
}

fn session_status<S: KeyValueStore>(auth: &AdminAuth<Arc<S>>, out: &mut impl Write) -> Result<()> {
    match auth.check_session() {
        Some(user) => {
            let expires = auth
                .session()
                .and_then(|s| Utc.timestamp_millis_opt(s.expires_at).single())
                .map_or_else(|| "unknown".to_string(), |t| t.to_rfc3339());
            writeln!(out, "Signed in as {} ({}), expires {expires}", user.email, user.role)?;
        }
        None => writeln!(out, "Not signed in")?,
    }
    Ok(())
}

async fn dashboard<S: KeyValueStore>(
    shop: &Storefront<S>,
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let stats = match shop.statistics().dashboard().await {
        FetchOutcome::Ready(stats) => stats,
        FetchOutcome::Empty => {
            writeln!(out, "No products or orders yet")?;
            return Ok(());
        }
        FetchOutcome::Failed(e) => return Err(e).context("loading dashboard"),
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
        return Ok(());
    }
    writeln!(out, "Products:        {}", stats.total_products)?;
    writeln!(out, "Low stock:       {}", stats.low_stock_items)?;
    writeln!(out, "Orders:          {}", stats.total_orders)?;
    writeln!(out, "Customers:       {}", stats.total_customers)?;
    writeln!(out, "Revenue:         {}", stats.total_revenue)?;
    writeln!(out, "Revenue growth:  {:+.1}%", stats.revenue_growth)?;
    writeln!(out, "Order growth:    {:+.1}%", stats.order_growth)?;
    for (status, count) in &stats.status_distribution {
        writeln!(out, "  {:<12} {count}", status.as_str())?;
    }
    Ok(())
}
