use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

pub const NO_ANSWER: &str = "I don't have information on that.";

/// Minimum word overlap for a knowledge-base question to count as a match.
const MIN_MATCH_SCORE: f64 = 0.3;

const PROJECTION_TRIGGERS: &[&str] = &[
    "lower my average",
    "reduce my average",
    "decrease my average",
    "how long to get under 5",
    "how to lower my average",
    "my average days",
];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct KnowledgeBase {
    #[serde(default)]
    pub disclaimers: Disclaimers,
    #[serde(default)]
    pub qna: Vec<QnaPair>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Disclaimers {
    #[serde(default)]
    pub primary_disclaimer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QnaPair {
    pub question: String,
    pub answer: String,
}

impl KnowledgeBase {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read knowledge base {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse knowledge base {}", path.display()))
    }

    pub fn disclaimer(&self) -> &str {
        &self.disclaimers.primary_disclaimer
    }

    pub fn best_answer(&self, question: &str) -> &str {
        let asked = tokens(question);
        self.qna
            .iter()
            .map(|pair| (overlap(&asked, &tokens(&pair.question)), pair))
            .filter(|(score, _)| *score >= MIN_MATCH_SCORE)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, pair)| pair.answer.as_str())
            .unwrap_or(NO_ANSWER)
    }
}

pub fn is_projection_question(text: &str) -> bool {
    let text = text.to_lowercase();
    PROJECTION_TRIGGERS.iter().any(|trigger| text.contains(trigger))
}

fn tokens(text: &str) -> HashSet<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn overlap(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}
