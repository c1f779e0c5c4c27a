//! LLM-backed answer scoring with a heuristic fallback (§4.4)

use anyhow::Result;
use serde::Deserialize;

use crate::db::models::AxisScores;
use crate::llm::{extract_json_object, ChatMessage, LlmClient, RequestDeduplicator, RetryPolicy};
use crate::text_metrics::count_filler_words;

pub struct EvaluationResult {
    pub scores: AxisScores,
    pub feedback: String,
    /// True when the LLM rubric call never produced a valid structured
    /// result and the heuristic fallback was used instead.
    pub degraded: bool,
}

#[derive(Debug, Deserialize)]
struct RawScores {
    relevance: i32,
    technical: i32,
    communication: i32,
    confidence: i32,
    feedback: String,
}

impl RawScores {
    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("relevance", self.relevance),
            ("technical", self.technical),
            ("communication", self.communication),
            ("confidence", self.confidence),
        ] {
            if !(0..=100).contains(&value) {
                anyhow::bail!("{name} score {value} is out of range [0,100]");
            }
        }
        Ok(())
    }
}

pub struct AnswerEvaluator {
    llm: LlmClient,
    retry: RetryPolicy,
    /// Collapses a retried HTTP submission for the same question, while the
    /// first evaluation is still in flight, into a single LLM call.
    dedup: RequestDeduplicator,
}

impl AnswerEvaluator {
    const SYSTEM_PROMPT: &'static str = "You are a rigorous interview evaluator. Score the candidate's answer on four \
axes, each an integer from 0 to 100: \"relevance\" (does it answer the question and match the job context), \
\"technical\" (depth and correctness), \"communication\" (clarity and structure), \"confidence\" (conviction, first-hand \
experience evident in the phrasing). Respond with a single strict JSON object: {\"relevance\": int, \"technical\": int, \
\"communication\": int, \"confidence\": int, \"feedback\": string}. No markdown, no commentary outside the object.";

    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            retry: RetryPolicy::default(),
            dedup: RequestDeduplicator::new(),
        }
    }

    /// Scores `answer` against `question` and `job_context`. Never fails:
    /// falls back to a heuristic scoring when the model can't produce a
    /// valid rubric after the retry budget is exhausted. `interview_id` and
    /// `question_id` key the in-flight dedup, so a retried submission for
    /// the same question doesn't double-charge the LLM provider.
    pub async fn evaluate(
        &self,
        interview_id: &str,
        question_id: &str,
        question: &str,
        answer: &str,
        job_context: &str,
    ) -> EvaluationResult {
        match self
            .try_llm_evaluation(interview_id, question_id, question, answer, job_context)
            .await
        {
            Ok(result) => result,
            Err(err) => {
                tracing::warn!("answer evaluation falling back to heuristic scoring: {:#}", err);
                Self::heuristic_evaluation(answer)
            }
        }
    }

    async fn try_llm_evaluation(
        &self,
        interview_id: &str,
        question_id: &str,
        question: &str,
        answer: &str,
        job_context: &str,
    ) -> Result<EvaluationResult> {
        let prompt = format!(
            "Job context:\n{job_context}\n\nQuestion:\n{question}\n\nCandidate answer:\n{answer}\n\nRespond with only the JSON object."
        );
        let key = format!("{interview_id}:{question_id}");

        let response = self
            .retry
            .execute(|| async {
                let prompt = prompt.clone();
                self.dedup
                    .deduplicate(key.clone(), || async move {
                        self.llm
                            .chat_completion(
                                vec![ChatMessage::system(Self::SYSTEM_PROMPT), ChatMessage::user(prompt)],
                                Some(0.3),
                                None,
                            )
                            .await
                            .map_err(|err| err.to_string())
                    })
                    .await
                    .map_err(|err| anyhow::anyhow!(err))
            })
            .await?;

        let raw: RawScores = extract_json_object(&response)?;
        raw.validate()?;
        Ok(EvaluationResult {
            scores: AxisScores {
                relevance: raw.relevance,
                technical: raw.technical,
                communication: raw.communication,
                confidence: raw.confidence,
            },
            feedback: raw.feedback,
            degraded: false,
        })
    }

    fn heuristic_evaluation(answer: &str) -> EvaluationResult {
        EvaluationResult {
            scores: AxisScores {
                relevance: length_based_relevance(answer),
                technical: 50,
                communication: filler_penalised_communication(answer),
                confidence: 50,
            },
            feedback: "Automated scoring was unavailable; this answer was evaluated heuristically and should be \
reviewed manually."
                .to_string(),
            degraded: true,
        }
    }
}

fn length_based_relevance(answer: &str) -> i32 {
    match answer.split_whitespace().count() {
        0..=9 => 30,
        10..=29 => 50,
        30..=79 => 65,
        80..=149 => 75,
        _ => 80,
    }
}

fn filler_penalised_communication(answer: &str) -> i32 {
    let fillers = count_filler_words(answer) as i32;
    (70 - fillers * 5).clamp(0, 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_scores_short_answers_lower() {
        let result = AnswerEvaluator::heuristic_evaluation("Yes.");
        assert_eq!(result.scores.relevance, 30);
        assert!(result.degraded);
    }

    #[test]
    fn heuristic_penalises_filler_words() {
        let clean = AnswerEvaluator::heuristic_evaluation(
            "I designed a caching layer that reduced latency by forty percent across the fleet.",
        );
        let fillery = AnswerEvaluator::heuristic_evaluation(
            "So, um, like, I basically, you know, actually did something, right.",
        );
        assert!(fillery.scores.communication < clean.scores.communication);
    }

    #[test]
    fn raw_scores_validate_rejects_out_of_range() {
        let raw = RawScores {
            relevance: 150,
            technical: 50,
            communication: 50,
            confidence: 50,
            feedback: String::new(),
        };
        assert!(raw.validate().is_err());
    }

    #[test]
    fn raw_scores_validate_accepts_in_range() {
        let raw = RawScores {
            relevance: 0,
            technical: 100,
            communication: 50,
            confidence: 50,
            feedback: String::new(),
        };
        assert!(raw.validate().is_ok());
    }
}
