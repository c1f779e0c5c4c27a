//! Weighted axis fusion, grading, and narrative summary for a completed
//! interview (§4.7)

use std::collections::HashMap;

use crate::db::models::{AiAnalysis, AxisScores, Interview, Job, Response};
use crate::llm::{ChatMessage, LlmClient, RetryPolicy};

/// One of the four response-level scoring axes a job's `scoring_criteria`
/// name maps onto.
#[derive(Debug, Clone, Copy)]
enum RawAxis {
    Relevance,
    Technical,
    Communication,
    Confidence,
}

/// Maps a job's free-text scoring criterion name onto one of the four raw
/// response axes. Unmapped names are ignored at the call site.
fn map_axis_name(name: &str) -> Option<RawAxis> {
    match name.to_lowercase().as_str() {
        "verbal cues" | "communication" => Some(RawAxis::Communication),
        "content quality" => Some(RawAxis::Relevance),
        "technical_skills" => Some(RawAxis::Technical),
        "behavioral" => Some(RawAxis::Confidence),
        _ => None,
    }
}

/// Mean of each raw axis across every response in an interview.
struct RawAxisMeans {
    relevance: f32,
    technical: f32,
    communication: f32,
    confidence: f32,
}

impl RawAxisMeans {
    fn from_responses(responses: &[Response]) -> Self {
        if responses.is_empty() {
            return Self {
                relevance: 0.0,
                technical: 0.0,
                communication: 0.0,
                confidence: 0.0,
            };
        }

        let n = responses.len() as f32;
        let mut sums = AxisScores {
            relevance: 0,
            technical: 0,
            communication: 0,
            confidence: 0,
        };
        for response in responses {
            sums.relevance += response.scores.relevance;
            sums.technical += response.scores.technical;
            sums.communication += response.scores.communication;
            sums.confidence += response.scores.confidence;
        }

        Self {
            relevance: sums.relevance as f32 / n,
            technical: sums.technical as f32 / n,
            communication: sums.communication as f32 / n,
            confidence: sums.confidence as f32 / n,
        }
    }

    fn get(&self, axis: RawAxis) -> f32 {
        match axis {
            RawAxis::Relevance => self.relevance,
            RawAxis::Technical => self.technical,
            RawAxis::Communication => self.communication,
            RawAxis::Confidence => self.confidence,
        }
    }
}

/// Computes the final weighted score and the per-criterion axis breakdown.
/// Criteria that don't map onto a raw axis are dropped and the remaining
/// weights renormalised to sum to 1. If nothing maps, falls back to an
/// unweighted mean of all four raw axes.
pub fn compute_final_score(job: &Job, responses: &[Response]) -> (f32, HashMap<String, f32>) {
    let means = RawAxisMeans::from_responses(responses);

    let mapped: Vec<(String, f32, f32)> = job
        .scoring_criteria
        .iter()
        .filter_map(|(name, weight)| map_axis_name(name).map(|axis| (name.clone(), *weight, means.get(axis))))
        .collect();

    let weight_sum: f32 = mapped.iter().map(|(_, weight, _)| weight).sum();

    if mapped.is_empty() || weight_sum <= 0.0 {
        let axis_scores = HashMap::from([
            ("relevance".to_string(), means.relevance),
            ("technical".to_string(), means.technical),
            ("communication".to_string(), means.communication),
            ("confidence".to_string(), means.confidence),
        ]);
        let fallback = (means.relevance + means.technical + means.communication + means.confidence) / 4.0;
        return (fallback, axis_scores);
    }

    let mut final_score = 0.0;
    let mut axis_scores = HashMap::with_capacity(mapped.len());
    for (name, weight, value) in mapped {
        final_score += value * (weight / weight_sum);
        axis_scores.insert(name, value);
    }

    (final_score, axis_scores)
}

/// Strengths/weaknesses read from the always-complete four raw axes, not
/// from `axis_scores` (which only holds the subset of a job's criteria
/// that `map_axis_name` recognises, and is keyed by criterion name rather
/// than axis name).
fn strengths_and_weaknesses(means: &RawAxisMeans) -> (Vec<String>, Vec<String>) {
    let axes = [
        ("relevance", means.relevance),
        ("technical", means.technical),
        ("communication", means.communication),
        ("confidence", means.confidence),
    ];
    let mut strengths: Vec<String> = axes.iter().filter(|(_, score)| *score >= 80.0).map(|(name, _)| name.to_string()).collect();
    let mut weaknesses: Vec<String> = axes.iter().filter(|(_, score)| *score < 60.0).map(|(name, _)| name.to_string()).collect();
    strengths.sort();
    weaknesses.sort();
    (strengths, weaknesses)
}

fn grade_for(score: f32) -> &'static str {
    if score >= 85.0 {
        "A"
    } else if score >= 70.0 {
        "B"
    } else if score >= 55.0 {
        "C"
    } else {
        "D"
    }
}

/// Fuses per-response scores into a job-level final score, a grade, and a
/// narrative summary, backed by an LLM call with a heuristic fallback.
pub struct FusionEngine {
    llm: LlmClient,
    retry: RetryPolicy,
}

impl FusionEngine {
    const SYSTEM_PROMPT: &'static str = "You are summarizing a completed job interview for a hiring manager. \
Write exactly one paragraph, plain prose, no markdown, grounded only in the axis scores and grade given to you. \
Be specific about strengths and weaknesses, not generic.";

    pub fn new(llm: LlmClient) -> Self {
        Self {
            llm,
            retry: RetryPolicy::default(),
        }
    }

    /// Builds the final score and `AiAnalysis` for an interview from its
    /// job and responses. Never fails: the summary falls back to a
    /// templated sentence if the LLM call can't produce one.
    pub async fn build_analysis(&self, job: &Job, responses: &[Response]) -> (f32, AiAnalysis) {
        let (final_score, axis_scores) = compute_final_score(job, responses);
        let means = RawAxisMeans::from_responses(responses);
        let (strengths, weaknesses) = strengths_and_weaknesses(&means);
        let grade = grade_for(final_score).to_string();

        let summary = match self.try_llm_summary(&axis_scores, final_score, &grade, &strengths, &weaknesses).await {
            Ok(summary) => summary,
            Err(err) => {
                tracing::warn!("fusion summary falling back to heuristic: {:#}", err);
                heuristic_summary(final_score, &grade, &strengths, &weaknesses)
            }
        };

        (
            final_score,
            AiAnalysis {
                axis_scores,
                strengths,
                weaknesses,
                grade,
                summary,
            },
        )
    }

    async fn try_llm_summary(
        &self,
        axis_scores: &HashMap<String, f32>,
        final_score: f32,
        grade: &str,
        strengths: &[String],
        weaknesses: &[String],
    ) -> anyhow::Result<String> {
        let mut axis_lines: Vec<String> = axis_scores.iter().map(|(name, score)| format!("{name}: {score:.0}")).collect();
        axis_lines.sort();

        let prompt = format!(
            "Final score: {:.0}/100 (grade {})\nAxis scores:\n{}\nStrengths: {}\nWeaknesses: {}\n\n\
Write the one-paragraph summary now.",
            final_score,
            grade,
            axis_lines.join("\n"),
            if strengths.is_empty() { "none".to_string() } else { strengths.join(", ") },
            if weaknesses.is_empty() { "none".to_string() } else { weaknesses.join(", ") },
        );

        self.retry
            .execute(|| async {
                self.llm
                    .chat_completion(
                        vec![ChatMessage::system(Self::SYSTEM_PROMPT), ChatMessage::user(prompt.clone())],
                        Some(0.5),
                        None,
                    )
                    .await
            })
            .await
            .map(|text| text.trim().to_string())
    }
}

fn heuristic_summary(final_score: f32, grade: &str, strengths: &[String], weaknesses: &[String]) -> String {
    let strengths_clause = if strengths.is_empty() {
        "no single axis stood out as a clear strength".to_string()
    } else {
        format!("the candidate stood out on {}", strengths.join(", "))
    };
    let weaknesses_clause = if weaknesses.is_empty() {
        "no axis fell notably short".to_string()
    } else {
        format!("{} could use improvement", weaknesses.join(", "))
    };
    format!(
        "The candidate finished with a final score of {final_score:.0}/100 (grade {grade}); {strengths_clause}, and {weaknesses_clause}."
    )
}

/// Orders an already-completed set of a job's interviews by final score
/// descending, ties broken by the earlier `completed_at`.
pub fn rank_completed_interviews(mut interviews: Vec<Interview>) -> Vec<Interview> {
    interviews.sort_by(|a, b| {
        let score_a = a.final_score.unwrap_or(0.0);
        let score_b = b.final_score.unwrap_or(0.0);
        score_b
            .partial_cmp(&score_a)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.completed_at.cmp(&b.completed_at))
    });
    interviews
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Candidate, InterviewStatus};

    fn job_with_criteria(criteria: &[(&str, f32)]) -> Job {
        Job {
            id: "job-1".to_string(),
            title: "Backend Engineer".to_string(),
            description: String::new(),
            requirements: String::new(),
            scoring_criteria: criteria.iter().map(|(name, weight)| (name.to_string(), *weight)).collect(),
            interview_duration_minutes: 45,
            owner_id: "owner-1".to_string(),
            created_at: "2026-01-01T00:00:00Z".to_string(),
        }
    }

    fn response_with_scores(relevance: i32, technical: i32, communication: i32, confidence: i32) -> Response {
        Response {
            id: 1,
            interview_id: "interview-1".to_string(),
            question_id: "question-1".to_string(),
            answer_text: String::new(),
            answer_audio_ref: None,
            answer_duration_seconds: 0.0,
            scores: AxisScores {
                relevance,
                technical,
                communication,
                confidence,
            },
            ai_feedback: String::new(),
            voice_analysis: None,
            created_at: crate::db::models::now(),
            updated_at: crate::db::models::now(),
        }
    }

    #[test]
    fn unmapped_axes_are_ignored_and_weights_renormalised() {
        let job = job_with_criteria(&[("content quality", 1.0), ("unmapped axis", 9.0)]);
        let responses = vec![response_with_scores(90, 0, 0, 0)];

        let (final_score, axis_scores) = compute_final_score(&job, &responses);

        assert_eq!(axis_scores.len(), 1);
        assert_eq!(final_score, 90.0);
    }

    #[test]
    fn weights_are_renormalised_to_sum_to_one() {
        let job = job_with_criteria(&[("technical_skills", 3.0), ("behavioral", 1.0)]);
        let responses = vec![response_with_scores(0, 100, 0, 0)];

        let (final_score, _) = compute_final_score(&job, &responses);

        // technical carries 3/4 of the weight: 100 * 0.75 + 0 * 0.25 = 75
        assert_eq!(final_score, 75.0);
    }

    #[test]
    fn no_mappable_axes_falls_back_to_unweighted_mean() {
        let job = job_with_criteria(&[("culture fit", 1.0)]);
        let responses = vec![response_with_scores(80, 40, 60, 20)];

        let (final_score, axis_scores) = compute_final_score(&job, &responses);

        assert_eq!(axis_scores.len(), 4);
        assert_eq!(final_score, 50.0);
    }

    #[test]
    fn strengths_and_weaknesses_use_the_spec_thresholds() {
        let means = RawAxisMeans {
            relevance: 70.0,
            technical: 85.0,
            communication: 59.9,
            confidence: 60.0,
        };
        let (strengths, weaknesses) = strengths_and_weaknesses(&means);
        assert_eq!(strengths, vec!["technical".to_string()]);
        assert_eq!(weaknesses, vec!["communication".to_string()]);
    }

    #[test]
    fn strengths_and_weaknesses_cover_all_four_axes_even_when_job_criteria_only_map_two() {
        // §8 scenario 1: criteria name "experience" has no raw-axis mapping at all,
        // yet strengths/weaknesses must still be able to draw from all four axes.
        let job = job_with_criteria(&[
            ("technical_skills", 0.4),
            ("verbal cues", 0.3),
            ("behavioral", 0.2),
            ("experience", 0.1),
        ]);
        let responses = vec![response_with_scores(90, 90, 90, 90)];
        let means = RawAxisMeans::from_responses(&responses);
        let (strengths, _) = strengths_and_weaknesses(&means);
        assert_eq!(strengths, vec!["communication", "confidence", "relevance", "technical"]);

        // compute_final_score's own axis_scores map is still the narrower,
        // criterion-keyed view used for the weighted final score.
        let (_, axis_scores) = compute_final_score(&job, &responses);
        assert_eq!(axis_scores.len(), 2);
    }

    #[test]
    fn grade_bands_match_the_spec_boundaries() {
        assert_eq!(grade_for(85.0), "A");
        assert_eq!(grade_for(84.9), "B");
        assert_eq!(grade_for(70.0), "B");
        assert_eq!(grade_for(55.0), "C");
        assert_eq!(grade_for(54.9), "D");
    }

    fn interview_with(final_score: Option<f32>, completed_at: &str) -> Interview {
        Interview {
            id: crate::db::models::new_id(),
            job_id: "job-1".to_string(),
            candidate: Candidate {
                name: "A Candidate".to_string(),
                email: "candidate@example.com".to_string(),
                phone: None,
            },
            cv_file_path: None,
            status: InterviewStatus::Completed,
            started_at: None,
            completed_at: Some(completed_at.to_string()),
            final_score,
            ai_analysis: None,
            cv_monitoring_report: None,
            created_at: crate::db::models::now(),
        }
    }

    #[test]
    fn ranking_orders_by_score_descending() {
        let interviews = vec![
            interview_with(Some(60.0), "2026-01-01T00:00:00Z"),
            interview_with(Some(90.0), "2026-01-02T00:00:00Z"),
            interview_with(Some(75.0), "2026-01-03T00:00:00Z"),
        ];
        let ranked = rank_completed_interviews(interviews);
        let scores: Vec<f32> = ranked.iter().map(|i| i.final_score.unwrap()).collect();
        assert_eq!(scores, vec![90.0, 75.0, 60.0]);
    }

    #[test]
    fn ties_are_broken_by_earlier_completion() {
        let interviews = vec![
            interview_with(Some(80.0), "2026-01-05T00:00:00Z"),
            interview_with(Some(80.0), "2026-01-01T00:00:00Z"),
        ];
        let ranked = rank_completed_interviews(interviews);
        assert_eq!(ranked[0].completed_at, Some("2026-01-01T00:00:00Z".to_string()));
    }
}
