//! Pace/clarity/confidence scoring for a decoded, transcribed answer (§4.6)

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::text_metrics::count_filler_words;

use super::decode::{decode_to_pcm, detect_pauses};
use super::stt::SttClient;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceAnalysisResult {
    pub transcript: String,
    pub word_count: usize,
    pub duration_seconds: f32,
    pub pace_wpm: f32,
    pub filler_count: usize,
    pub pause_count: usize,
    pub clarity_score: i32,
    pub confidence_score: i32,
    pub summary: String,
    /// True when transcription failed; `transcript` is empty and the
    /// scores above should not be blended into the response's
    /// communication score (§4.6 failure semantics).
    pub degraded: bool,
}

impl VoiceAnalysisResult {
    fn degraded(duration_seconds: f32, pause_count: usize) -> Self {
        Self {
            transcript: String::new(),
            word_count: 0,
            duration_seconds,
            pace_wpm: 0.0,
            filler_count: 0,
            pause_count,
            clarity_score: 0,
            confidence_score: 0,
            summary: "Voice analysis degraded: the audio could not be transcribed.".to_string(),
            degraded: true,
        }
    }
}

pub struct VoiceAnalyzer {
    stt: SttClient,
}

impl VoiceAnalyzer {
    pub fn new(stt: SttClient) -> Self {
        Self { stt }
    }

    pub async fn analyze(&self, audio_bytes: Vec<u8>) -> VoiceAnalysisResult {
        let decoded = match decode_to_pcm(audio_bytes.clone()) {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::warn!("voice analysis degraded: could not decode audio: {:#}", err);
                return VoiceAnalysisResult::degraded(0.0, 0);
            }
        };

        let duration_seconds = if decoded.sample_rate == 0 {
            0.0
        } else {
            decoded.samples.len() as f32 / decoded.sample_rate as f32
        };
        let pause_count = detect_pauses(&decoded.samples, decoded.sample_rate);

        let transcript = match self.stt.transcribe(audio_bytes, "answer.wav").await {
            Ok(transcript) => transcript,
            Err(err) => {
                tracing::warn!("voice analysis degraded: transcription failed: {:#}", err);
                return VoiceAnalysisResult::degraded(duration_seconds, pause_count);
            }
        };

        let word_count = transcript.split_whitespace().count();
        let filler_count = count_filler_words(&transcript);
        let duration_minutes = (duration_seconds / 60.0).max(1.0 / 60.0);
        let pace_wpm = word_count as f32 / duration_minutes;

        let clarity_score = compute_clarity(word_count, &transcript);
        let confidence_score = compute_confidence(pace_wpm, pause_count, filler_count);

        VoiceAnalysisResult {
            transcript,
            word_count,
            duration_seconds,
            pace_wpm,
            filler_count,
            pause_count,
            clarity_score,
            confidence_score,
            summary: build_summary(pace_wpm, clarity_score, confidence_score),
            degraded: false,
        }
    }
}

fn compute_clarity(word_count: usize, transcript: &str) -> i32 {
    let mut score = 70.0_f32;

    if word_count >= 50 {
        score += 15.0;
    } else if word_count >= 20 {
        score += 10.0;
    } else if word_count >= 10 {
        score += 5.0;
    }

    let richness = vocabulary_richness(transcript);
    if richness > 0.7 {
        score += 15.0;
    } else if richness > 0.5 {
        score += 10.0;
    }

    score.clamp(0.0, 100.0) as i32
}

fn compute_confidence(pace_wpm: f32, pause_count: usize, filler_count: usize) -> i32 {
    let mut score = 70.0_f32;

    if (120.0..=160.0).contains(&pace_wpm) {
        score += 20.0;
    } else if (100.0..120.0).contains(&pace_wpm) || (160.0..=180.0).contains(&pace_wpm) {
        score += 10.0;
    }

    if pace_wpm < 80.0 || pace_wpm > 200.0 {
        score -= 10.0;
    }

    score -= (pause_count as f32 * 2.0).min(20.0);
    score -= (filler_count as f32 * 3.0).min(30.0);

    score.clamp(0.0, 100.0) as i32
}

fn vocabulary_richness(transcript: &str) -> f32 {
    let words: Vec<String> = transcript
        .to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty())
        .collect();

    if words.is_empty() {
        return 0.0;
    }

    let unique: HashSet<&String> = words.iter().collect();
    unique.len() as f32 / words.len() as f32
}

fn build_summary(pace_wpm: f32, clarity_score: i32, confidence_score: i32) -> String {
    let pace_note = if pace_wpm < 100.0 {
        "spoke slowly"
    } else if pace_wpm > 180.0 {
        "spoke quickly"
    } else {
        "kept a steady pace"
    };
    format!(
        "The candidate {pace_note} ({pace_wpm:.0} wpm), scoring {clarity_score}/100 on clarity and {confidence_score}/100 on vocal confidence."
    )
}
