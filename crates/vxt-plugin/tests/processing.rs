//! End-to-end processing tests.
//!
//! Drives [`VxtAudioProcessor`] the way a host would: buffer size sweeps,
//! stereo routing, automation between blocks, and a concurrent editor
//! reading committed snapshots while the audio side runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use egui::{Rect, pos2, vec2};
use vxt_core::{CutSide, EqParam};
use vxt_gui_core::ResponseCurveRenderer;
use vxt_plugin::{ProcessorState, VxtAudioProcessor, VxtShared};

const BUFFER_SIZES: &[usize] = &[1, 2, 7, 32, 64, 128, 256, 512, 1024, 2048, 4096];
const SAMPLE_RATE: f32 = 48000.0;

fn is_finite_buffer(buf: &[f32]) -> bool {
    buf.iter().all(|s| s.is_finite())
}

fn sine(freq: f32, len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| (core::f32::consts::TAU * freq * i as f32 / SAMPLE_RATE).sin() * 0.5)
        .collect()
}

fn rms(buf: &[f32]) -> f32 {
    (buf.iter().map(|s| s * s).sum::<f32>() / buf.len() as f32).sqrt()
}

#[test]
fn buffer_sizes_stereo() {
    let shared = VxtShared::new();
    shared.set_param(EqParam::PeakGain, 12.0);
    shared.set_param(EqParam::LowCutSlope, 3.0);

    for &size in BUFFER_SIZES {
        let mut processor = VxtAudioProcessor::new(shared.clone());
        processor.prepare(SAMPLE_RATE, size).unwrap();

        let mut left: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin() * 0.5).collect();
        let mut right = left.clone();
        let mut channels: [&mut [f32]; 2] = [&mut left, &mut right];
        processor.process_block(&mut channels, 2, size).unwrap();

        assert!(is_finite_buffer(&left), "non-finite left at size {size}");
        assert!(is_finite_buffer(&right), "non-finite right at size {size}");
        assert_eq!(left, right, "identical input must give identical output");
    }
}

#[test]
fn channels_have_independent_state() {
    let shared = VxtShared::new();
    shared.set_param(EqParam::PeakGain, 6.0);
    let mut processor = VxtAudioProcessor::new(shared);
    processor.prepare(SAMPLE_RATE, 256).unwrap();

    // Impulse on the left only; the right must stay silent.
    let mut left = vec![0.0f32; 256];
    left[0] = 1.0;
    let mut right = vec![0.0f32; 256];
    let mut channels: [&mut [f32]; 2] = [&mut left, &mut right];
    processor.process_block(&mut channels, 2, 256).unwrap();

    assert!(left.iter().any(|s| *s != 0.0));
    assert!(right.iter().all(|s| *s == 0.0));
}

#[test]
fn extra_input_channels_pass_through() {
    let mut processor = VxtAudioProcessor::new(VxtShared::new());
    processor.shared().set_param(EqParam::PeakGain, -12.0);
    processor.prepare(SAMPLE_RATE, 64).unwrap();

    let input = sine(1000.0, 64);
    let mut left = input.clone();
    let mut right = input.clone();
    let mut third = input.clone();
    let mut channels: [&mut [f32]; 3] = [&mut left, &mut right, &mut third];
    processor.process_block(&mut channels, 3, 64).unwrap();

    assert_eq!(third, input);
    assert_ne!(left, input);
}

#[test]
fn automation_applies_on_next_block() {
    let shared = VxtShared::new();
    let mut processor = VxtAudioProcessor::new(shared.clone());
    processor.prepare(SAMPLE_RATE, 4800).unwrap();

    let input = sine(1000.0, 4800);
    let mut block = input.clone();
    let mut channels: [&mut [f32]; 1] = [&mut block];
    processor.process_block(&mut channels, 1, 4800).unwrap();
    let flat = rms(&block[2400..]) / rms(&input[2400..]);
    assert!((flat - 1.0).abs() < 0.02, "default chain gain {flat}");

    shared.set_param(EqParam::PeakGain, 12.0);
    for _ in 0..2 {
        let mut block = input.clone();
        let mut channels: [&mut [f32]; 1] = [&mut block];
        processor.process_block(&mut channels, 1, 4800).unwrap();
        let boosted = 20.0 * (rms(&block[2400..]) / rms(&input[2400..])).log10();
        assert!((boosted - 12.0).abs() < 0.5, "boost {boosted} dB");
    }

    let committed = shared.committed_snapshot().unwrap();
    assert_eq!(committed.settings.peak_gain_db, 12.0);
    assert!(committed.peak_active);
}

#[test]
fn twelve_db_low_cut_at_44k() {
    let shared = VxtShared::new();
    shared.set_param(EqParam::LowCut, 20.0);
    shared.set_param(EqParam::LowCutSlope, 0.0);
    let mut processor = VxtAudioProcessor::new(shared);
    processor.prepare(44100.0, 128).unwrap();

    let mut block = vec![0.0f32; 128];
    let mut channels: [&mut [f32]; 1] = [&mut block];
    processor.process_block(&mut channels, 1, 128).unwrap();

    let chain = processor.chain(0).unwrap();
    assert!(!chain.is_bypassed(CutSide::Low, 0));
    for stage in 1..4 {
        assert!(chain.is_bypassed(CutSide::Low, stage));
    }
}

#[test]
fn renderer_tracks_processor_through_shared_store() {
    let shared = VxtShared::new();
    let mut processor = VxtAudioProcessor::new(shared.clone());
    processor.prepare(SAMPLE_RATE, 64).unwrap();
    let mut renderer =
        ResponseCurveRenderer::new(Rect::from_min_size(pos2(0.0, 0.0), vec2(800.0, 360.0)));

    assert!(renderer.tick(&shared));
    assert!(!renderer.tick(&shared));
    assert_eq!(renderer.recompute_count(), 1);

    // Audio blocks alone never dirty the curve.
    let mut block = vec![0.0f32; 64];
    for _ in 0..10 {
        let mut channels: [&mut [f32]; 1] = [&mut block];
        processor.process_block(&mut channels, 1, 64).unwrap();
    }
    assert!(!renderer.tick(&shared));

    // A burst of changes costs exactly one recompute.
    shared.set_param(EqParam::PeakGain, 12.0);
    shared.set_param(EqParam::PeakFreq, 1000.0);
    shared.set_param(EqParam::PeakQ, 1.0);
    assert!(renderer.tick(&shared));
    assert!(!renderer.tick(&shared));
    assert_eq!(renderer.recompute_count(), 2);
}

#[test]
fn release_and_prepare_again() {
    let mut processor = VxtAudioProcessor::new(VxtShared::new());
    processor.prepare(SAMPLE_RATE, 64).unwrap();
    processor.release();
    assert_eq!(processor.state(), ProcessorState::Released);
    processor.prepare(96000.0, 64).unwrap();
    assert_eq!(
        processor.shared().committed_snapshot().unwrap().sample_rate,
        96000.0
    );
}

#[test]
fn editor_reads_consistent_snapshots_during_playback() {
    let shared = VxtShared::new();
    let done = Arc::new(AtomicBool::new(false));

    let audio = {
        let shared = shared.clone();
        let done = Arc::clone(&done);
        std::thread::spawn(move || {
            let mut processor = VxtAudioProcessor::new(shared);
            processor.prepare(SAMPLE_RATE, 64).unwrap();
            let mut left = vec![0.0f32; 64];
            let mut right = vec![0.0f32; 64];
            while !done.load(Ordering::Acquire) {
                let mut channels: [&mut [f32]; 2] = [&mut left, &mut right];
                processor.process_block(&mut channels, 2, 64).unwrap();
                assert!(is_finite_buffer(&left) && is_finite_buffer(&right));
            }
        })
    };

    for step in 0..2000u32 {
        let gain = (step % 37) as f32 - 24.0;
        shared.set_param(EqParam::PeakGain, gain);
        shared.set_param(EqParam::LowCutSlope, (step % 4) as f32);

        if let Some(snapshot) = shared.committed_snapshot() {
            // Committed coefficients always match their embedded settings.
            let expected =
                vxt_core::ChainSnapshot::design(&snapshot.settings, snapshot.sample_rate).unwrap();
            assert_eq!(snapshot.to_words(), expected.to_words());
        }
    }

    done.store(true, Ordering::Release);
    audio.join().unwrap();
}
