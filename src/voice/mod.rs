//! Voice Analyzer: PCM decode, transcription, pace/filler/pause/clarity/
//! confidence scoring for one answer's audio (§4.6)

pub mod analysis;
pub mod decode;
pub mod stt;

pub use analysis::{VoiceAnalysisResult, VoiceAnalyzer};
pub use stt::SttClient;
