//! LLM-backed question generation: initial batch and follow-ups (§4.3)

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::db::models::{AxisScores, Difficulty, QuestionType};
use crate::llm::{extract_json_object, ChatMessage, LlmClient, RetryPolicy};

/// One generated question, not yet persisted.
#[derive(Debug, Clone)]
pub struct GeneratedQuestion {
    pub text: String,
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
}

#[derive(Debug, Deserialize)]
struct RawQuestion {
    text: String,
    #[serde(rename = "type")]
    question_type: String,
    difficulty: String,
}

impl From<RawQuestion> for GeneratedQuestion {
    fn from(raw: RawQuestion) -> Self {
        Self {
            text: raw.text,
            question_type: QuestionType::parse(&raw.question_type),
            difficulty: Difficulty::parse(&raw.difficulty),
        }
    }
}

/// The axis an answer scored weakest on, used to steer follow-up generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WeakAxis {
    Relevance,
    Technical,
    Confidence,
    Communication,
}

impl WeakAxis {
    fn instruction(self) -> &'static str {
        match self {
            WeakAxis::Relevance => "Ask the candidate for one concrete example that grounds their previous answer.",
            WeakAxis::Technical => "Ask the candidate to explain one specific implementation detail they glossed over.",
            WeakAxis::Confidence => "Ask the candidate whether they have personally applied this in practice, and how.",
            WeakAxis::Communication => "Ask the candidate to clarify one specific claim from their previous answer.",
        }
    }
}

fn weakest_axis(scores: AxisScores) -> WeakAxis {
    let candidates = [
        (WeakAxis::Relevance, scores.relevance),
        (WeakAxis::Technical, scores.technical),
        (WeakAxis::Confidence, scores.confidence),
        (WeakAxis::Communication, scores.communication),
    ];
    candidates
        .into_iter()
        .min_by_key(|(_, score)| *score)
        .map(|(axis, _)| axis)
        .expect("candidates is non-empty")
}

fn parse_raw_batch(text: &str) -> Result<Vec<RawQuestion>> {
    if let Ok(items) = serde_json::from_str::<Vec<RawQuestion>>(text) {
        return Ok(items);
    }
    if let (Some(start), Some(end)) = (text.find('['), text.rfind(']')) {
        if start < end {
            if let Ok(items) = serde_json::from_str::<Vec<RawQuestion>>(&text[start..=end]) {
                return Ok(items);
            }
        }
    }
    anyhow::bail!("could not parse a question batch out of the model response")
}

/// Produces initial question batches and follow-up questions. Holds no
/// per-interview state; callers pass in whatever context is relevant.
pub struct QuestionGenerator {
    llm: LlmClient,
    retry: RetryPolicy,
}

impl QuestionGenerator {
    const INITIAL_SYSTEM_PROMPT: &'static str = "You are a senior technical interviewer conducting an automated screening interview. \
You generate interview questions as a strict JSON array and nothing else. \
Each element has exactly these fields: \"text\" (string), \"type\" (one of \"technical\", \"behavioral\", \"situational\", \"general\"), \
\"difficulty\" (one of \"easy\", \"medium\", \"hard\"). Do not wrap the array in markdown or add commentary.";

    const FOLLOWUP_SYSTEM_PROMPT: &'static str = "You are a senior technical interviewer probing a candidate's previous answer. \
You generate exactly one follow-up question as a strict JSON object and nothing else, with fields \"text\" (string), \
\"type\" (always \"followup\"), \"difficulty\" (one of \"easy\", \"medium\", \"hard\"). \
Do not wrap the object in markdown or add commentary.";

    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            retry: RetryPolicy::default(),
        }
    }

    /// Generates `count` distinct initial questions grounded in the job and,
    /// when available, the candidate's CV.
    pub async fn generate_initial_batch(
        &self,
        job_description: &str,
        job_requirements: &str,
        cv_context: Option<&str>,
        count: usize,
    ) -> Result<Vec<GeneratedQuestion>> {
        let prompt = Self::build_initial_prompt(job_description, job_requirements, cv_context, count);

        let raw = self
            .retry
            .execute(|| async {
                let response = self
                    .llm
                    .chat_completion(
                        vec![
                            ChatMessage::system(Self::INITIAL_SYSTEM_PROMPT),
                            ChatMessage::user(prompt.clone()),
                        ],
                        Some(0.7),
                        None,
                    )
                    .await?;
                let parsed = parse_raw_batch(&response)?;
                if parsed.len() != count {
                    anyhow::bail!(
                        "expected {} questions from the model, got {}",
                        count,
                        parsed.len()
                    );
                }
                Ok(parsed)
            })
            .await
            .context("question generator exhausted its retry budget on the initial batch")?;

        Ok(raw.into_iter().map(GeneratedQuestion::from).collect())
    }

    /// Generates a single follow-up probing the axis the prior answer scored
    /// weakest on (§4.3).
    pub async fn generate_followup(
        &self,
        original_question: &str,
        candidate_answer: &str,
        scores: AxisScores,
    ) -> Result<GeneratedQuestion> {
        let axis = weakest_axis(scores);
        let prompt = Self::build_followup_prompt(original_question, candidate_answer, axis);

        let raw: RawQuestion = self
            .retry
            .execute(|| async {
                let response = self
                    .llm
                    .chat_completion(
                        vec![
                            ChatMessage::system(Self::FOLLOWUP_SYSTEM_PROMPT),
                            ChatMessage::user(prompt.clone()),
                        ],
                        Some(0.7),
                        None,
                    )
                    .await?;
                extract_json_object::<RawQuestion>(&response)
            })
            .await
            .context("question generator exhausted its retry budget on the follow-up")?;

        Ok(GeneratedQuestion::from(raw))
    }

    fn build_initial_prompt(
        job_description: &str,
        job_requirements: &str,
        cv_context: Option<&str>,
        count: usize,
    ) -> String {
        let behavioral_clause = if count >= 3 {
            "At least one question must be of type \"behavioral\"."
        } else {
            ""
        };
        let cv_clause = match cv_context {
            Some(context) if !context.trim().is_empty() => format!(
                "At least one question must reference a specific entity, technology, or experience mentioned in this excerpt of the candidate's CV:\n{}\n",
                context
            ),
            _ => "No CV is available for this candidate; generate questions from the job description alone.".to_string(),
        };

        format!(
            "Generate exactly {count} distinct interview questions for this role.\n\n\
Job description:\n{job_description}\n\n\
Job requirements:\n{job_requirements}\n\n\
{cv_clause}\n\
Cover a mix of question types. {behavioral_clause}\n\
Respond with only the JSON array."
        )
    }

    fn build_followup_prompt(original_question: &str, candidate_answer: &str, axis: WeakAxis) -> String {
        format!(
            "The candidate was asked:\n{original_question}\n\n\
They answered:\n{candidate_answer}\n\n\
{}\n\
Respond with only the JSON object.",
            axis.instruction()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weakest_axis_picks_the_lowest_score() {
        let scores = AxisScores {
            relevance: 80,
            technical: 40,
            communication: 90,
            confidence: 70,
        };
        assert_eq!(weakest_axis(scores), WeakAxis::Technical);
    }

    #[test]
    fn weakest_axis_ties_break_by_declared_order() {
        let scores = AxisScores {
            relevance: 50,
            technical: 50,
            communication: 90,
            confidence: 90,
        };
        assert_eq!(weakest_axis(scores), WeakAxis::Relevance);
    }

    #[test]
    fn parses_clean_batch() {
        let text = r#"[{"text":"Tell me about yourself","type":"general","difficulty":"easy"}]"#;
        let parsed = parse_raw_batch(text).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].text, "Tell me about yourself");
    }

    #[test]
    fn parses_batch_wrapped_in_prose() {
        let text = "Sure, here they are:\n[{\"text\":\"Q1\",\"type\":\"technical\",\"difficulty\":\"medium\"}]\nEnjoy.";
        let parsed = parse_raw_batch(text).unwrap();
        assert_eq!(parsed.len(), 1);
    }

    #[test]
    fn rejects_unparsable_batch() {
        assert!(parse_raw_batch("not json at all").is_err());
    }
}
