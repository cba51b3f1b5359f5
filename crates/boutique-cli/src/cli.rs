//! Command-line definition

use clap::{value_parser, Arg, ArgAction, Command};

fn page_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("page")
            .long("page")
            .default_value("1")
            .value_parser(value_parser!(u32).range(1..))
            .help("Page number, starting at 1"),
    )
    .arg(
        Arg::new("search")
            .long("search")
            .help("Search text"),
    )
}

/// Product id plus the variant filters that pick one of its lines
fn line_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("product").required(true).help("Product id"))
        .arg(Arg::new("size").long("size").help("Size of the line, when the product has several"))
        .arg(Arg::new("color").long("color").help("Color of the line, when the product has several"))
}

fn cart_command() -> Command {
    Command::new("cart")
        .about("Inspect and edit the saved cart")
        .subcommand_required(true)
        .subcommand(Command::new("show").about("List cart lines and totals"))
        .subcommand(
            Command::new("add")
                .about("Add a product from the catalog")
                .arg(Arg::new("product").required(true).help("Product id"))
                .arg(
                    Arg::new("quantity")
                        .long("quantity")
                        .short('q')
                        .default_value("1")
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true)
                        .help("Units to add"),
                )
                .arg(Arg::new("size").long("size").help("Size variant"))
                .arg(Arg::new("color").long("color").help("Color variant")),
        )
        .subcommand(line_args(Command::new("remove").about("Remove a line")))
        .subcommand(
            line_args(Command::new("set").about("Set a line's quantity; 0 or less removes it"))
                .arg(
                    Arg::new("quantity")
                        .required(true)
                        .value_parser(value_parser!(i64))
                        .allow_negative_numbers(true),
                ),
        )
        .subcommand(Command::new("clear").about("Empty the cart"))
}

fn products_command() -> Command {
    Command::new("products")
        .about("Browse the catalog")
        .subcommand_required(true)
        .subcommand(page_args(
            Command::new("list")
                .about("List products")
                .arg(Arg::new("category").long("category").help("Exact category"))
                .arg(
                    Arg::new("sort")
                        .long("sort")
                        .default_value("name")
                        .value_parser(["id", "name", "price", "stock", "created_at"])
                        .help("Sort column"),
                )
                .arg(
                    Arg::new("desc")
                        .long("desc")
                        .action(ArgAction::SetTrue)
                        .help("Sort descending"),
                ),
        ))
}

fn checkout_command() -> Command {
    Command::new("checkout")
        .about("Submit the cart as an order")
        .arg(Arg::new("name").long("name").required(true).help("Customer name"))
        .arg(Arg::new("email").long("email").required(true).help("Customer email"))
        .arg(Arg::new("phone").long("phone").required(true).help("Customer phone"))
        .arg(
            Arg::new("address")
                .long("address")
                .required(true)
                .help("Shipping address"),
        )
}

fn admin_command() -> Command {
    Command::new("admin")
        .about("Back-office commands")
        .subcommand_required(true)
        .subcommand(
            Command::new("login")
                .about("Open an admin session")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(Command::new("logout").about("Close the admin session"))
        .subcommand(Command::new("status").about("Show the current session"))
        .subcommand(
            Command::new("hash-password")
                .about("Print the SHA-256 digest to configure as the admin password")
                .arg(Arg::new("password").required(true)),
        )
        .subcommand(
            Command::new("dashboard").about("Headline sales numbers").arg(
                Arg::new("json")
                    .long("json")
                    .action(ArgAction::SetTrue)
                    .help("Output as JSON"),
            ),
        )
        .subcommand(
            Command::new("revenue")
                .about("Monthly revenue")
                .arg(
                    Arg::new("months")
                        .long("months")
                        .default_value("6")
                        .value_parser(value_parser!(u32).range(1..=36)),
                ),
        )
        .subcommand(
            Command::new("top-products").about("Best sellers by revenue").arg(
                Arg::new("limit")
                    .long("limit")
                    .default_value("5")
                    .value_parser(value_parser!(usize)),
            ),
        )
        .subcommand(
            Command::new("low-stock").about("Products running out").arg(
                Arg::new("limit")
                    .long("limit")
                    .default_value("10")
                    .value_parser(value_parser!(u32)),
            ),
        )
        .subcommand(page_args(order_filters(
            Command::new("orders").about("List orders, newest first"),
        )))
        .subcommand(order_filters(
            Command::new("export")
                .about("Write orders as CSV")
                .arg(Arg::new("search").long("search").help("Search text")),
        ))
        .subcommand(
            Command::new("set-status")
                .about("Change an order's status")
                .arg(Arg::new("order").required(true).help("Order id"))
                .arg(Arg::new("status").required(true).value_parser([
                    "pending",
                    "processing",
                    "shipped",
                    "delivered",
                    "cancelled",
                    "refunded",
                ])),
        )
}

fn order_filters(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("status")
            .long("status")
            .default_value("all")
            .help("Order status or `all`"),
    )
    .arg(
        Arg::new("period")
            .long("period")
            .default_value("all")
            .value_parser(["all", "today", "week", "month"])
            .help("Creation date window"),
    )
}

/// Build the `boutique` command
pub fn build_cli() -> Command {
    Command::new("boutique")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Boutique storefront and back-office")
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .global(true)
                .help("Directory for the cart and session files"),
        )
        .arg(
            Arg::new("locale")
                .long("locale")
                .global(true)
                .default_value("fr")
                .value_parser(["fr", "ar", "en"])
                .help("Language for product names"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging"),
        )
        .subcommand_required(true)
        .subcommand(cart_command())
        .subcommand(products_command())
        .subcommand(checkout_command())
        .subcommand(admin_command())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_definition_is_consistent() {
        build_cli().debug_assert();
    }

    #[test]
    fn negative_quantity_parses() {
        let matches = build_cli()
            .try_get_matches_from(["boutique", "cart", "set", "1", "-2", "--size", "M"])
            .unwrap();
        let (_, cart) = matches.subcommand().unwrap();
        let (_, set) = cart.subcommand().unwrap();
        assert_eq!(set.get_one::<i64>("quantity"), Some(&-2));
    }

    #[test]
    fn checkout_requires_every_field() {
        let result = build_cli().try_get_matches_from(["boutique", "checkout", "--name", "A"]);
        assert!(result.is_err());
    }
}
