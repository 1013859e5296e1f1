//! Realtime sample mixer
//!
//! Runs once per audio-callback tick under the engine lock. Accumulates
//! every in-use, playing instance into the interleaved stereo destination
//! buffer. The mixer only reads already-decoded PCM and writes additively;
//! the caller is responsible for silencing the buffer beforehand. Nothing
//! on this path allocates.

use crate::audio::pool::InstancePool;
use crate::audio::WORKING_CHANNELS;

/// Mix all active instances into `dst` (interleaved stereo f32).
///
/// Each instance is downmixed to mono (arithmetic mean across its source
/// channels) before the per-channel gains place it in the stereo field; the
/// engine computes its own stereo placement rather than trusting the
/// source's native layout. The playhead advances by the instance's pitch
/// factor with floor-sampling and no interpolation. Non-looped instances
/// that run out of samples are released.
pub fn mix(pool: &mut InstancePool, dst: &mut [f32]) {
    let frames_requested = dst.len() / WORKING_CHANNELS;

    for slot in pool.slots_mut() {
        if !slot.in_use || !slot.is_playing {
            continue;
        }
        let Some(sample) = slot.sample.clone() else {
            slot.release();
            continue;
        };
        if sample.num_samples == 0 {
            slot.release();
            continue;
        }

        let channels = sample.channels as usize;
        let mut playhead = slot.playhead;

        for frame in 0..frames_requested {
            let base = playhead as usize * channels;

            let mut mono = 0.0f32;
            for ch in 0..channels {
                mono += sample.samples[base + ch];
            }
            mono /= channels as f32;

            dst[frame * WORKING_CHANNELS] += mono * slot.gain_l;
            dst[frame * WORKING_CHANNELS + 1] += mono * slot.gain_r;
            playhead += slot.pitch;

            if playhead as usize >= sample.num_samples {
                if slot.is_looped {
                    playhead = 0.0;
                } else {
                    break;
                }
            }
        }

        slot.playhead = playhead;
        if !slot.is_looped && slot.playhead >= sample.num_samples as f32 {
            slot.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::types::DecodedSample;
    use std::sync::Arc;

    fn mono_sample(samples: Vec<f32>) -> Arc<DecodedSample> {
        Arc::new(DecodedSample::new(samples, 1))
    }

    fn mix_frames(pool: &mut InstancePool, frames: usize) -> Vec<f32> {
        let mut dst = vec![0.0f32; frames * 2];
        mix(pool, &mut dst);
        dst
    }

    #[test]
    fn copies_mono_source_to_both_channels() {
        let mut pool = InstancePool::new(1);
        pool.play(mono_sample(vec![0.25, 0.5, 0.75, 1.0]), 0, 1.0, 0, false);

        let dst = mix_frames(&mut pool, 4);
        assert_eq!(dst, vec![0.25, 0.25, 0.5, 0.5, 0.75, 0.75, 1.0, 1.0]);
    }

    #[test]
    fn multichannel_source_downmixes_to_mean() {
        let mut pool = InstancePool::new(1);
        // 3 channels, 2 frames: (0.3, 0.6, 0.9) -> 0.6, (0.0, 0.3, 0.6) -> 0.3
        let sample = Arc::new(DecodedSample::new(
            vec![0.3, 0.6, 0.9, 0.0, 0.3, 0.6],
            3,
        ));
        pool.play(sample, 0, 1.0, 0, false);

        let dst = mix_frames(&mut pool, 2);
        assert!((dst[0] - 0.6).abs() < 1e-6);
        assert!((dst[1] - 0.6).abs() < 1e-6);
        assert!((dst[2] - 0.3).abs() < 1e-6);
        assert!((dst[3] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn accumulates_instead_of_overwriting() {
        let mut pool = InstancePool::new(1);
        pool.play(mono_sample(vec![0.5, 0.5]), 0, 1.0, 0, false);

        let mut dst = vec![0.1f32; 4];
        mix(&mut pool, &mut dst);
        for v in dst {
            assert!((v - 0.6).abs() < 1e-6);
        }
    }

    #[test]
    fn two_instances_superpose() {
        let samples = vec![0.25; 8];

        let mut solo_a = InstancePool::new(2);
        solo_a.play(mono_sample(samples.clone()), 0, 1.0, 0, false);
        let a = mix_frames(&mut solo_a, 8);

        let mut solo_b = InstancePool::new(2);
        solo_b.play(mono_sample(samples.clone()), -600, 1.0, 0, false);
        let b = mix_frames(&mut solo_b, 8);

        let mut both = InstancePool::new(2);
        both.play(mono_sample(samples.clone()), 0, 1.0, 0, false);
        both.play(mono_sample(samples), -600, 1.0, 0, false);
        let combined = mix_frames(&mut both, 8);

        for i in 0..combined.len() {
            assert!((combined[i] - (a[i] + b[i])).abs() < 1e-6);
        }
    }

    #[test]
    fn pan_gains_shape_the_stereo_field() {
        let mut pool = InstancePool::new(1);
        pool.play(mono_sample(vec![1.0; 4]), 0, 1.0, 100, false);

        let dst = mix_frames(&mut pool, 4);
        // positive pan: left is attenuated below right
        assert!(dst[0] < dst[1]);
        assert!((dst[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn double_pitch_stops_after_half_the_frames() {
        let n = 16;
        let mut pool = InstancePool::new(1);
        pool.play(mono_sample(vec![1.0; n]), 0, 2.0, 0, false);

        let dst = mix_frames(&mut pool, n);
        let produced = dst.chunks(2).filter(|f| f[0] != 0.0).count();
        assert_eq!(produced, n / 2);
        // slot released on completion
        assert!(!pool.is_playing(0));
    }

    #[test]
    fn half_pitch_replays_samples() {
        let mut pool = InstancePool::new(1);
        pool.play(mono_sample(vec![0.2, 0.8]), 0, 0.5, 0, false);

        let dst = mix_frames(&mut pool, 4);
        // floor-sampling: each source sample appears twice
        assert_eq!(dst[0], 0.2);
        assert_eq!(dst[2], 0.2);
        assert_eq!(dst[4], 0.8);
        assert_eq!(dst[6], 0.8);
        assert!(!pool.is_playing(0));
    }

    #[test]
    fn non_looped_instance_auto_stops_at_end() {
        let mut pool = InstancePool::new(1);
        pool.play(mono_sample(vec![0.5; 4]), 0, 1.0, 0, false);

        let dst = mix_frames(&mut pool, 8);
        // output stops after the source runs out
        assert_eq!(dst[6], 0.5);
        assert_eq!(dst[8], 0.0);
        assert!(!pool.is_playing(0));
    }

    #[test]
    fn looped_instance_wraps_and_keeps_playing() {
        let mut pool = InstancePool::new(1);
        pool.play(mono_sample(vec![0.1, 0.2]), 0, 1.0, 0, true);

        let dst = mix_frames(&mut pool, 6);
        assert_eq!(
            dst,
            vec![0.1, 0.1, 0.2, 0.2, 0.1, 0.1, 0.2, 0.2, 0.1, 0.1, 0.2, 0.2]
        );
        assert!(pool.is_playing(0));

        // wrap any number of times; still playing until an explicit stop
        for _ in 0..50 {
            mix_frames(&mut pool, 7);
        }
        assert!(pool.is_playing(0));
        pool.stop(0);
        assert!(!pool.is_playing(0));
    }

    #[test]
    fn paused_instance_is_skipped() {
        let mut pool = InstancePool::new(1);
        pool.play(mono_sample(vec![1.0; 4]), 0, 1.0, 0, false);
        pool.pause(0);

        let dst = mix_frames(&mut pool, 4);
        assert!(dst.iter().all(|&v| v == 0.0));

        // playhead was not advanced while paused
        pool.unpause(0);
        let dst = mix_frames(&mut pool, 4);
        assert_eq!(dst[0], 1.0);
    }

    #[test]
    fn gain_change_applies_to_the_next_tick() {
        let mut pool = InstancePool::new(1);
        pool.play(mono_sample(vec![1.0; 8]), 0, 1.0, 0, true);

        let first = mix_frames(&mut pool, 2);
        pool.set_volume(0, -600);
        let second = mix_frames(&mut pool, 2);

        assert!((first[0] - 1.0).abs() < 1e-6);
        assert!((second[0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn empty_sample_releases_without_output() {
        let mut pool = InstancePool::new(1);
        pool.play(mono_sample(Vec::new()), 0, 1.0, 0, true);

        let dst = mix_frames(&mut pool, 4);
        assert!(dst.iter().all(|&v| v == 0.0));
        assert!(!pool.is_playing(0));
    }

    #[test]
    fn playhead_persists_across_ticks() {
        let mut pool = InstancePool::new(1);
        pool.play(mono_sample(vec![0.1, 0.2, 0.3, 0.4]), 0, 1.0, 0, false);

        let first = mix_frames(&mut pool, 2);
        let second = mix_frames(&mut pool, 2);
        assert_eq!(&first[..4], &[0.1, 0.1, 0.2, 0.2]);
        assert_eq!(&second[..4], &[0.3, 0.3, 0.4, 0.4]);
    }
}
