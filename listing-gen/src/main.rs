use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::{rngs::StdRng, SeedableRng};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "listing-gen", about = "Gera anúncios sintéticos de negócios em JSON")]
struct Args {
    /// Quantidade de anúncios
    #[arg(long, default_value_t = 100)]
    count: usize,

    /// Arquivo de saída
    #[arg(long, default_value = "business_listings.json")]
    output: PathBuf,

    /// Semente para saída reproduzível
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let listings = listing_gen::generate(args.count, &mut rng);
    listing_gen::write_listings(&args.output, &listings)
        .with_context(|| format!("não foi possível gerar {}", args.output.display()))?;

    info!("✅ {} anúncios gerados em {}", listings.len(), args.output.display());
    Ok(())
}
