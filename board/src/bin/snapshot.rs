//! Runs the board once against the simulator and saves a picture of the strip.
//!
//! Usage: `snapshot <OUTPUT.png> [RFC 3339 time]`

use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use snowboard::{context::Context, observe::SwobSource, simulator::SimStrip, Board};
use swob::ObservationHour;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args_os().skip(1);
    let out: PathBuf = args
        .next()
        .context("usage: snapshot <OUTPUT.png> [TIME]")?
        .into();
    let now: DateTime<Utc> = match args.next() {
        Some(t) => t
            .to_str()
            .context("time is not UTF-8")?
            .parse()
            .context("time is not RFC 3339")?,
        None => Utc::now(),
    };

    let ctx = Context::new();
    ctx.cancel_on_interrupt().context("could not set SIGINT handler")?;

    let board = Board::default();
    let mut strip = SimStrip::new_hidden(board.settings().stations.len());
    board.show_startup(&mut strip).context("could not show startup color")?;
    let client = board.client().context("could not create feed client")?;
    let mut source = SwobSource::new(client, board.settings().variable.clone());

    let result = board.run(&ctx, &mut source, &mut strip, &ObservationHour::from(now));
    if let Err(e) = &result {
        tracing::error!("run failed, saving the strip as it stands: {}", e);
    }

    strip
        .screenshot()
        .save_png(&out)
        .with_context(|| format!("could not write {}", out.display()))?;
    tracing::info!("strip in {}", out.display());
    result.map(|_| ()).map_err(Into::into)
}
