//! End-to-end run: discover, analyze, aggregate, ask, validate

use chrono::Utc;
use log::{info, warn};
use rand::Rng;

use crate::aggregate::Aggregator;
use crate::analysis::RepoAnalyzer;
use crate::cache::{AnalysisCache, CachedRun};
use crate::config::RunConfig;
use crate::discovery::RepoDiscoverer;
use crate::error::{RunError, RunResult};
use crate::evidence::EvidenceSampler;
use crate::generation::TextGenerator;
use crate::github::{GitHubSource, RunContext};
use crate::prompt::build_prompt;
use crate::report::{ProfileSummary, RunReport};
use crate::skills::{ResponseRecoveryParser, Skill};

/// One configured run.
#[derive(Debug, Clone)]
pub struct SkillRun {
    config: RunConfig,
}

impl SkillRun {
    /// Fails on invalid configuration, before any request is made.
    pub fn new(config: RunConfig) -> RunResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Run every step and return the report.
    ///
    /// A cached analysis younger than the TTL replaces discovery and
    /// analysis unless `refresh` is set. Cache failures only log.
    pub async fn execute<S, G, C, R>(
        &self,
        source: &S,
        generator: &G,
        catalog: &[Skill],
        cache: &C,
        rng: &mut R,
    ) -> RunResult<RunReport>
    where
        S: GitHubSource,
        G: TextGenerator,
        C: AnalysisCache,
        R: Rng + ?Sized,
    {
        let config = &self.config;
        if catalog.is_empty() {
            return Err(RunError::EmptyCatalog);
        }

        let mut ctx = RunContext::with_marks(
            config.core_low_water_mark,
            config.search_low_water_mark,
            config.rate_safety_margin,
        );
        let sampler = EvidenceSampler {
            per_category: config.per_category_limit,
            category_max: config.category_sample_size,
            sample_size: config.evidence_sample_size,
        };

        let user = match &config.user {
            Some(user) => user.clone(),
            None => {
                let login = source.viewer_login().await?;
                ctx.observe_core(None).await;
                info!("Analyzing authenticated user {login}");
                login
            }
        };

        let cached = if config.refresh {
            info!("Refresh requested; ignoring cached analysis");
            None
        } else {
            match cache.load(&user).await {
                Ok(hit) => hit,
                Err(e) => {
                    warn!("Failed to read cached analysis for {user}: {e}");
                    None
                }
            }
        };

        let from_cache = cached.is_some();
        let run = match cached {
            Some(run) => run,
            None => {
                let run = self.crawl(source, &mut ctx, &user, &sampler, rng).await?;
                if let Err(e) = cache.store(&run).await {
                    warn!("Failed to cache analysis for {user}: {e}");
                }
                run
            }
        };

        let aggregate = Aggregator::new(config.top_dependencies, config.top_extensions)
            .aggregate(&run.analyses);
        let sample = sampler.fresh(&aggregate.evidence, rng);

        let prompt = build_prompt(&aggregate, &sample, catalog);
        info!(
            "Requesting skill scores ({} catalog skills, {} evidence links)",
            catalog.len(),
            sample.len()
        );
        let response = generator.generate(&prompt).await?;

        let outcome = ResponseRecoveryParser::new(config.min_score).recover(&response, catalog);
        info!(
            "Recovered {} recommendations ({} rejected, {} malformed, {} below {})",
            outcome.recommendations.len(),
            outcome.rejected.len(),
            outcome.discarded,
            outcome.below_floor,
            config.min_score
        );

        Ok(RunReport {
            user,
            generated_at: Utc::now(),
            profile: ProfileSummary::from(&aggregate),
            recommendations: outcome.recommendations,
            rejected: outcome.rejected,
            response_unparseable: outcome.parse_failed,
            highlights: run.evidence_highlights,
            sample,
            discovery_incomplete: run.discovery_incomplete,
            from_cache,
            stats: ctx.stats,
        })
    }

    async fn crawl<S, R>(
        &self,
        source: &S,
        ctx: &mut RunContext,
        user: &str,
        sampler: &EvidenceSampler,
        rng: &mut R,
    ) -> RunResult<CachedRun>
    where
        S: GitHubSource,
        R: Rng + ?Sized,
    {
        let config = &self.config;

        let discovery = RepoDiscoverer::new(config.page_size, config.search_hard_cap)
            .discover(source, ctx, user)
            .await?;
        let repos = discovery.repositories.truncated(config.max_repos);
        if repos.len() < discovery.repositories.len() {
            info!(
                "Analyzing the first {} of {} repositories",
                repos.len(),
                discovery.repositories.len()
            );
        }

        let analyses = RepoAnalyzer::new(user, config.page_size)
            .analyze_all(source, ctx, &repos)
            .await;

        let evidence: Vec<String> = analyses
            .values()
            .flat_map(|a| a.evidence.iter().cloned())
            .collect();
        let evidence_highlights = sampler.highlights(&evidence, rng);

        Ok(CachedRun {
            user: user.to_string(),
            cached_at: Utc::now(),
            analyses,
            discovery_incomplete: discovery.incomplete,
            evidence_highlights,
        })
    }
}
