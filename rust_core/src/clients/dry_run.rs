//! Poster that only logs, for local runs without posting credentials.

use crate::providers::MessagePoster;
use anyhow::Result;
use async_trait::async_trait;
use log::info;

#[derive(Debug, Clone, Default)]
pub struct DryRunPoster;

#[async_trait]
impl MessagePoster for DryRunPoster {
    async fn post_message(&self, text: &str) -> Result<()> {
        info!("[dry-run] would post: {}", text);
        Ok(())
    }

    fn poster_name(&self) -> &str {
        "dry-run"
    }
}
