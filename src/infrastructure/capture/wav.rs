//! WAV encoding for the transcription API
//!
//! The transcription endpoint takes a WAV file part; clips are encoded
//! in memory and never touch disk.

use std::io::Cursor;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::domain::audio::AudioClip;

/// WAV encoding errors
#[derive(Debug, thiserror::Error)]
pub enum WavEncodeError {
    #[error("WAV encoding failed: {0}")]
    Encode(String),
}

/// Encode a clip as 16-bit PCM WAV bytes
pub fn encode_wav(clip: &AudioClip) -> Result<Vec<u8>, WavEncodeError> {
    let spec = WavSpec {
        channels: clip.channels(),
        sample_rate: clip.sample_rate(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| WavEncodeError::Encode(e.to_string()))?;

        let mut sample_writer = writer.get_i16_writer(clip.len() as u32);
        for &sample in clip.samples() {
            sample_writer.write_sample(sample);
        }
        sample_writer
            .flush()
            .map_err(|e| WavEncodeError::Encode(e.to_string()))?;

        writer
            .finalize()
            .map_err(|e| WavEncodeError::Encode(e.to_string()))?;
    }

    Ok(cursor.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_silence_has_riff_header() {
        let clip = AudioClip::new(vec![0i16; 16_000], 16_000, 1);
        let wav = encode_wav(&clip).unwrap();

        assert_eq!(&wav[0..4], b"RIFF");
        assert_eq!(&wav[8..12], b"WAVE");
    }

    #[test]
    fn encode_includes_all_samples() {
        let clip = AudioClip::new(vec![100i16; 1600], 16_000, 1);
        let wav = encode_wav(&clip).unwrap();

        // 44-byte canonical header + 2 bytes per sample
        assert_eq!(wav.len(), 44 + 1600 * 2);
    }

    #[test]
    fn encode_stereo() {
        let clip = AudioClip::new(vec![0i16; 3200], 16_000, 2);
        let wav = encode_wav(&clip).unwrap();
        assert_eq!(&wav[0..4], b"RIFF");

        // Channel count lives at offset 22 of the fmt chunk
        assert_eq!(u16::from_le_bytes([wav[22], wav[23]]), 2);
        // Sample rate at offset 24
        assert_eq!(
            u32::from_le_bytes([wav[24], wav[25], wav[26], wav[27]]),
            16_000
        );
    }

    #[test]
    fn encode_empty_clip() {
        let clip = AudioClip::new(Vec::new(), 16_000, 1);
        let wav = encode_wav(&clip).unwrap();
        assert_eq!(wav.len(), 44);
    }
}
