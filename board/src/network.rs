//! Waiting for the observation feed to become reachable.

use swob::SwobClient;

use crate::context::Context;
use crate::retry::{retry_forever, Backoff};
use crate::Result;

/// Block until the feed answers, or the context is cancelled.
pub fn wait_for_network(ctx: &Context, client: &SwobClient, backoff: &Backoff) -> Result<()> {
    tracing::info!("connecting to {}...", client.base_url());
    retry_forever(ctx, backoff, "reach the observation feed", || client.probe())?;
    tracing::info!("connected to {}", client.base_url());
    Ok(())
}
