//! Quantum Invest binary
//!
//! Loads the configured rate tiers, prints the tier grid and, when given
//! `<capital> <term> [days|months]`, the simulation for that query.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quantum_common::{Query, QuantumError, TermUnit};
use quantum_invest::{
    infra::decode_records, HttpTierRepository, InMemoryTierRepository, InvestConfig,
    InvestmentService, RepositorySettings, TierRepository,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Quantum Invest v{}", quantum_common::VERSION);

    let config = InvestConfig::load()?;
    info!("Loaded configuration: {:?}", config);

    let repository = build_repository(&config.repository)?;
    let service = InvestmentService::new(repository, config.resolver.clone());

    let count = service
        .store()
        .load()
        .await
        .context("failed to load rate tiers")?;
    info!(count, "Rate tiers ready");

    println!("{}", service.grid().await);

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Some(query) = parse_query(&args)? {
        match service.simulate(&query).await {
            Ok(sim) => {
                println!();
                println!("Tier:          #{}", sim.tier.id);
                println!("Term:          {} days", sim.term_days);
                println!("Rate:          {}%", sim.rate.normalize());
                println!("Net interest:  {}", sim.net_interest);
                println!("Total payout:  {}", sim.total_payout);
            }
            Err(QuantumError::Resolution(e)) if e.is_warning() => {
                warn!("{}", e);
                println!();
                println!("{}", e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(())
}

fn build_repository(settings: &RepositorySettings) -> Result<Arc<dyn TierRepository>> {
    if !settings.offline {
        info!(url = %settings.tiers_url(), "Using HTTP tier repository");
        return Ok(Arc::new(HttpTierRepository::new(settings)));
    }

    let tiers = match &settings.seed_file {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read seed file {}", path))?;
            decode_records(&json).with_context(|| format!("invalid seed file {}", path))?
        }
        None => Vec::new(),
    };
    info!(seeded = tiers.len(), "Using in-memory tier repository");
    Ok(Arc::new(InMemoryTierRepository::with_tiers(tiers)))
}

const USAGE: &str = "usage: quantum-invest [<capital> <term> [days|months]]";

fn parse_query(args: &[String]) -> Result<Option<Query>> {
    let (capital, term, unit) = match args {
        [] => return Ok(None),
        [capital, term] => (capital, term, TermUnit::Days),
        [capital, term, unit] => (
            capital,
            term,
            unit.parse::<TermUnit>().map_err(anyhow::Error::msg)?,
        ),
        _ => anyhow::bail!(USAGE),
    };
    Ok(Some(Query::parse(capital, term, unit)))
}
