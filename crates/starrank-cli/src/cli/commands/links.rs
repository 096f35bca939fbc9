//! `starrank links` – list candidate links without resolving them.

use anyhow::Result;
use starrank_core::config::StarrankConfig;
use starrank_core::http::HttpSession;
use starrank_core::run::RunSettings;
use starrank_core::source::{load_documents, DocumentSource};
use std::sync::Arc;

use crate::cli::InputArgs;

pub async fn run_links(cfg: &StarrankConfig, input: &InputArgs) -> Result<()> {
    let settings = RunSettings::from_config(cfg)?;
    let sources = input.resolve().await?;
    // Local files alone never touch libcurl.
    let session = if sources.iter().any(DocumentSource::is_remote) {
        Some(Arc::new(HttpSession::new(settings.http.clone())?))
    } else {
        None
    };
    let text = load_documents(session.as_ref(), &sources).await?;

    let links = settings.extract_links(&text);
    tracing::info!("found {} candidate link(s)", links.len());
    for link in &links {
        println!("{}", link);
    }
    Ok(())
}
