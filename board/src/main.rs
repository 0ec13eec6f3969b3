use anyhow::Context as _;
use chrono::{DateTime, Utc};
use clap::Parser;
use snowboard::{
    clock::{self, SystemClock},
    config::BoardSettings,
    context::Context,
    network,
    observe::{FailurePolicy, SwobSource},
    retry::Backoff,
    Board,
};
use swob::ObservationHour;
use tracing_subscriber::EnvFilter;

/// Color a strip of LEDs by the latest snow depth at each station.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Root of the SWOB-ML feed.
    #[arg(long, default_value = swob::DEFAULT_BASE_URL)]
    base_url: String,

    /// Fetch observations for the hour containing this time (RFC 3339)
    /// instead of the current hour.
    #[arg(long)]
    at: Option<DateTime<Utc>>,

    /// What to do when a station can't be fetched or read.
    #[arg(long, value_enum, default_value_t = FailurePolicy::Abort)]
    on_fetch_error: FailurePolicy,

    /// Don't wait for the network or the clock before fetching.
    #[arg(long)]
    no_wait: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let ctx = Context::new();
    ctx.cancel_on_interrupt().context("could not set SIGINT handler")?;

    let mut settings = BoardSettings::default();
    settings.base_url = args.base_url;
    settings.on_fetch_error = args.on_fetch_error;

    tracing::info!("Snow.Science Weather Board");

    #[cfg(feature = "hardware")]
    let mut strip = snowboard::led_strip::LedStrip::new(&Default::default())
        .map_err(anyhow::Error::msg)
        .context("could not create strip")?;

    #[cfg(all(not(feature = "hardware"), feature = "window"))]
    let mut strip = snowboard::simulator::SimStrip::new(settings.stations.len());

    #[cfg(all(not(feature = "hardware"), not(feature = "window")))]
    let mut strip = snowboard::MemoryStrip::new(settings.stations.len());

    let board = Board::from(settings);
    board.show_startup(&mut strip).context("could not show startup color")?;

    let client = board.client().context("could not create feed client")?;
    if !args.no_wait {
        network::wait_for_network(&ctx, &client, &Backoff::NETWORK)?;
    }

    let now = match args.at {
        Some(t) => t,
        None if args.no_wait => Utc::now(),
        None => clock::wait_for_valid_clock(&ctx, &SystemClock, &Backoff::CLOCK)?,
    };
    let hour = ObservationHour::from(now);

    let mut source = SwobSource::new(client, board.settings().variable.clone());
    let report = board
        .run(&ctx, &mut source, &mut strip, &hour)
        .context("could not update the board")?;

    let reported = report.observations.iter().flatten().count();
    tracing::info!(
        "showing {} of {} stations for {}",
        reported,
        report.observations.len(),
        hour
    );
    Ok(())
}
