use boutique_cli::{build_cli, init_tracing, load_config, run};
use boutique_core::Storefront;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = build_cli().get_matches();
    init_tracing(matches.get_flag("verbose"));

    let config = load_config(&matches)?;
    tracing::debug!(?config, "configuration");
    let mut shop = Storefront::open(config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run(&matches, &mut shop, &mut out).await
}
