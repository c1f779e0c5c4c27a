//! PCM decode and pause detection (§4.6)

use anyhow::{Context, Result};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Decodes an encoded audio artifact (wav/mp3/ogg/etc, whatever symphonia's
/// default probe recognizes) to mono f32 PCM.
pub fn decode_to_pcm(bytes: Vec<u8>) -> Result<DecodedAudio> {
    let cursor = std::io::Cursor::new(bytes);
    let media_source = MediaSourceStream::new(Box::new(cursor), Default::default());

    let probed = symphonia::default::get_probe()
        .format(&Hint::new(), media_source, &FormatOptions::default(), &MetadataOptions::default())
        .context("unrecognized audio container")?;

    let mut format = probed.format;
    let track = format
        .default_track()
        .context("audio file has no default track")?
        .clone();
    let track_id = track.id;
    let sample_rate = track.codec_params.sample_rate.unwrap_or(16_000);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("unsupported audio codec")?;

    let mut samples = Vec::new();
    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::ResetRequired) => break,
            Err(err) => return Err(err.into()),
        };
        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(_)) => continue,
            Err(err) => return Err(err.into()),
        };

        let spec = *decoded.spec();
        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        buffer.copy_interleaved_ref(decoded);

        let channels = spec.channels.count().max(1);
        for frame in buffer.samples().chunks(channels) {
            let mixed: f32 = frame.iter().sum::<f32>() / channels as f32;
            samples.push(mixed);
        }
    }

    Ok(DecodedAudio { samples, sample_rate })
}

const SILENCE_THRESHOLD: f32 = 0.02;
const MIN_PAUSE_MS: u32 = 300;

/// Counts non-silent-interval boundaries: a pause is a contiguous run of
/// near-silent samples at least `MIN_PAUSE_MS` long.
pub fn detect_pauses(samples: &[f32], sample_rate: u32) -> usize {
    if sample_rate == 0 {
        return 0;
    }
    let min_pause_samples = (sample_rate * MIN_PAUSE_MS / 1000) as usize;

    let mut pause_count = 0;
    let mut silent_run = 0usize;
    let mut counted_this_run = false;

    for &sample in samples {
        if sample.abs() < SILENCE_THRESHOLD {
            silent_run += 1;
            if silent_run >= min_pause_samples && !counted_this_run {
                pause_count += 1;
                counted_this_run = true;
            }
        } else {
            silent_run = 0;
            counted_this_run = false;
        }
    }

    pause_count
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silence(n: usize) -> Vec<f32> {
        vec![0.0; n]
    }

    fn tone(n: usize) -> Vec<f32> {
        (0..n).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect()
    }

    #[test]
    fn continuous_speech_has_no_pauses() {
        let samples = tone(16_000);
        assert_eq!(detect_pauses(&samples, 16_000), 0);
    }

    #[test]
    fn counts_distinct_silent_gaps() {
        let mut samples = tone(8_000);
        samples.extend(silence(8_000));
        samples.extend(tone(8_000));
        samples.extend(silence(8_000));
        samples.extend(tone(8_000));
        assert_eq!(detect_pauses(&samples, 16_000), 2);
    }

    #[test]
    fn brief_silence_below_the_threshold_is_not_a_pause() {
        let mut samples = tone(8_000);
        samples.extend(silence(100));
        samples.extend(tone(8_000));
        assert_eq!(detect_pauses(&samples, 16_000), 0);
    }
}
