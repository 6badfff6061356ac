// skilltrace CLI
//
// Resolves configuration from flags and environment, loads the skill catalog,
// runs the analysis against GitHub and prints the report.

use anyhow::{Context, Result};
use clap::Parser;
use skilltrace::{
    Cli, GitHubClient, JsonFileCache, Provider, SkillCatalogClient, SkillRun, export_report,
    render_report,
};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("skilltrace=info"))
        .init();

    let config = Cli::parse().into_config()?;
    let run = SkillRun::new(config)?;
    let config = run.config();

    let mut builder = GitHubClient::builder().personal_token(config.github_token.clone());
    if let Some(url) = &config.github_api_url {
        builder = builder.base_uri(url.clone());
    }
    let github = builder.build().context("Failed to create GitHub client")?;

    let catalog = SkillCatalogClient::new(config.catalog_url.clone(), config.catalog_token.clone())?
        .fetch_all()
        .await
        .context("Failed to load skill catalog")?;

    let provider = Provider::new(
        config.provider,
        config.provider_api_key.clone(),
        config.model.clone(),
        config.provider_base_url.clone(),
    )?;
    let cache = JsonFileCache::new(config.cache_dir.clone(), config.cache_ttl);

    let report = run
        .execute(&github, &provider, &catalog, &cache, &mut rand::thread_rng())
        .await?;

    print!("{}", render_report(&report));

    if let Some(path) = &config.export {
        export_report(&report, path).await?;
        eprintln!("Report written to {}", path.display());
    }

    Ok(())
}
