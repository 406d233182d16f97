//! WAV file reading and writing for offline processing.
//!
//! Audio is held planar (one `Vec<f32>` per channel) to match the
//! processor's per-channel block layout.

use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16, 24 or 32; 32 is written as float).
    pub bits_per_sample: u16,
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Read a WAV file into planar f32 channels in [-1, 1].
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<Vec<f32>>, WavSpec), hound::Error> {
    let reader = WavReader::open(path)?;
    let spec = WavSpec::from(reader.spec());
    let channels = usize::from(spec.channels.max(1));

    let interleaved: Vec<f32> = match reader.spec().sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let frames = interleaved.len() / channels;
    let mut planar = vec![Vec::with_capacity(frames); channels];
    for frame in interleaved.chunks_exact(channels) {
        for (channel, &sample) in planar.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok((planar, spec))
}

/// Write planar channels to a WAV file. Integer formats are clipped to the
/// representable range.
pub fn write_wav<P: AsRef<Path>>(
    path: P,
    channels: &[Vec<f32>],
    spec: WavSpec,
) -> Result<(), hound::Error> {
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);

    if spec.bits_per_sample == 32 {
        for i in 0..frames {
            for channel in channels {
                writer.write_sample(channel[i])?;
            }
        }
    } else {
        let max_val = (1i32 << (spec.bits_per_sample - 1)) as f32;
        for i in 0..frames {
            for channel in channels {
                let int_sample = (channel[i] * max_val).clamp(-max_val, max_val - 1.0) as i32;
                writer.write_sample(int_sample)?;
            }
        }
    }

    writer.finalize()
}
