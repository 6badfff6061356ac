//! Prompt assembly for skill scoring

use std::fmt::Write;

use crate::aggregate::AggregateResult;
use crate::skills::Skill;

/// Languages listed in the prompt
const PROMPT_LANGUAGES: usize = 15;

/// Compose the scoring prompt.
///
/// The model is told to answer with a bare JSON array of
/// `{"name", "score", "reason"}` objects using catalog names only; the
/// recovery parser still assumes it may not comply.
#[must_use]
pub fn build_prompt(aggregate: &AggregateResult, sample: &[String], catalog: &[Skill]) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are assessing a software developer's technical skills from their GitHub activity.\n\n",
    );
    let _ = writeln!(
        prompt,
        "Activity: {} repositories, {} authored commits, {} pull requests.\n",
        aggregate.repositories, aggregate.total_commits, aggregate.total_prs
    );

    prompt.push_str("Languages by code volume:\n");
    if aggregate.languages.is_empty() {
        prompt.push_str("- (none detected)\n");
    }
    for share in aggregate.languages.iter().take(PROMPT_LANGUAGES) {
        let _ = writeln!(prompt, "- {}: {:.2}%", share.language, share.percent);
    }

    push_list(&mut prompt, "Dependencies used", &aggregate.dependencies);
    push_list(&mut prompt, "File types touched in commits", &aggregate.file_extensions);
    push_list(&mut prompt, "Sample of authored work", sample);

    prompt.push_str("\nSkill catalog (use these names exactly):\n");
    let names: Vec<&str> = catalog.iter().map(|s| s.name.as_str()).collect();
    prompt.push_str(&names.join(", "));
    prompt.push('\n');

    prompt.push_str(
        "\nScore each catalog skill the evidence supports from 0 to 100. \
         Only use names from the catalog. Respond with a JSON array and nothing else, \
         where each element is {\"name\": string, \"score\": number, \"reason\": string}.\n",
    );

    prompt
}

fn push_list(prompt: &mut String, title: &str, items: &[String]) {
    let _ = writeln!(prompt, "\n{title}:");
    if items.is_empty() {
        prompt.push_str("- (none)\n");
        return;
    }
    for item in items {
        let _ = writeln!(prompt, "- {item}");
    }
}
