// SPDX-FileCopyrightText: 2025 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! Audio decoding and the software mixer fed to SDL's audio callback.

use std::{
    cell::RefCell,
    collections::HashMap,
    fs::File,
    io::ErrorKind as IoErrorKind,
    path::Path,
    sync::Arc,
};

use platform::{EffectId, EngineError};
use sdl2::{
    audio::{AudioCallback, AudioDevice, AudioSpecDesired},
    AudioSubsystem,
};
use symphonia::{
    core::{
        audio::{AudioBuffer, Signal},
        codecs::DecoderOptions,
        errors::Error as SymphoniaError,
        formats::FormatOptions,
        io::{MediaSourceStream, MediaSourceStreamOptions},
        meta::MetadataOptions,
        probe::Hint,
    },
    default,
};
use tracing::{debug, trace, warn};

pub const AUDIO_CHANNELS: usize = 2;
pub const AUDIO_SAMPLE_RATE: i32 = 44100;

pub type StereoFrame = [i16; AUDIO_CHANNELS];
pub type Clip = Arc<[StereoFrame]>;

#[derive(Debug)]
struct Voice {
    clip: Clip,
    cursor: usize,
}

/// The state shared with SDL's audio thread: one looping track and any
/// amount of overlapping one-shot effects.
#[derive(Debug, Default)]
pub struct MixerCallback {
    loop_track: Option<Clip>,
    loop_cursor: usize,
    looping: bool,
    voices: Vec<Voice>,
}

impl MixerCallback {
    /// Replaces the looping track, stopping it.
    pub fn set_loop_track(&mut self, clip: Clip) {
        self.loop_track = Some(clip);
        self.loop_cursor = 0;
        self.looping = false;
    }

    /// Starts the looping track from the beginning, unless it's already
    /// playing or there is none.
    pub fn play_loop(&mut self) -> bool {
        if self.looping || self.loop_track.is_none() {
            return false;
        }
        self.loop_cursor = 0;
        self.looping = true;
        true
    }

    pub fn pause_loop(&mut self) {
        self.looping = false;
    }

    pub fn play_effect(&mut self, clip: Clip) {
        self.voices.push(Voice { clip, cursor: 0 });
    }

    pub fn mix_into(&mut self, frames: &mut [StereoFrame]) {
        frames.fill([0; AUDIO_CHANNELS]);

        if let (true, Some(track)) = (self.looping, &self.loop_track) {
            if !track.is_empty() {
                for frame in frames.iter_mut() {
                    add_frame(frame, track[self.loop_cursor]);
                    self.loop_cursor = (self.loop_cursor + 1) % track.len();
                }
            }
        }

        for voice in &mut self.voices {
            let remaining = &voice.clip[voice.cursor.min(voice.clip.len())..];
            for (frame, &sample) in frames.iter_mut().zip(remaining) {
                add_frame(frame, sample);
            }
            voice.cursor += frames.len();
        }
        self.voices.retain(|voice| voice.cursor < voice.clip.len());
    }
}

fn add_frame(frame: &mut StereoFrame, sample: StereoFrame) {
    for (out, sample) in frame.iter_mut().zip(sample) {
        *out = out.saturating_add(sample);
    }
}

impl AudioCallback for MixerCallback {
    type Channel = i16;

    fn callback(&mut self, out: &mut [i16]) {
        let frames: &mut [StereoFrame] = bytemuck::cast_slice_mut(out);
        self.mix_into(frames);
    }
}

/// The SDL audio device plus the decoded effects, owned by the platform.
pub struct Mixer {
    device: RefCell<AudioDevice<MixerCallback>>,
    sample_rate: u32,
    effects: RefCell<HashMap<EffectId, Clip>>,
}

impl Mixer {
    pub fn open(audio: &AudioSubsystem) -> Result<Mixer, EngineError> {
        let desired = AudioSpecDesired {
            freq: Some(AUDIO_SAMPLE_RATE),
            channels: Some(AUDIO_CHANNELS as u8),
            samples: None,
        };
        let device = audio
            .open_playback(None, &desired, |spec| {
                debug!(
                    "Opened audio device: {} Hz, {} channels, {} samples per callback.",
                    spec.freq, spec.channels, spec.samples,
                );
                MixerCallback::default()
            })
            .map_err(EngineError::backend_call)?;
        if device.spec().channels as usize != AUDIO_CHANNELS {
            return Err(EngineError::backend_call(format!(
                "audio device opened with {} channels instead of {AUDIO_CHANNELS}",
                device.spec().channels,
            )));
        }
        let sample_rate = device.spec().freq as u32;
        device.resume();

        Ok(Mixer {
            device: RefCell::new(device),
            sample_rate,
            effects: RefCell::new(HashMap::new()),
        })
    }

    fn load_clip(&self, path: &str) -> Result<Clip, EngineError> {
        let (samples, sample_rate) = decode_file(Path::new(path))?;
        let samples = resample(&samples, sample_rate, self.sample_rate);
        Ok(Arc::from(samples))
    }

    pub fn load_loop_track(&self, path: &str) -> Result<(), EngineError> {
        let clip = self.load_clip(path)?;
        self.device.borrow_mut().lock().set_loop_track(clip);
        Ok(())
    }

    pub fn play_loop(&self) {
        if self.device.borrow_mut().lock().play_loop() {
            debug!("Loop track started.");
        }
    }

    pub fn pause_loop(&self) {
        self.device.borrow_mut().lock().pause_loop();
    }

    pub fn load_effect(&self, id: EffectId, path: &str) -> Result<(), EngineError> {
        let clip = self.load_clip(path)?;
        self.effects.borrow_mut().insert(id, clip);
        Ok(())
    }

    pub fn play_effect(&self, id: EffectId) {
        let Some(clip) = self.effects.borrow().get(&id).cloned() else {
            warn!("Tried to play effect {id}, which hasn't been loaded.");
            return;
        };
        self.device.borrow_mut().lock().play_effect(clip);
    }
}

/// Stretches or squeezes the clip to another sample rate by picking the
/// nearest sample.
pub fn resample(samples: &[StereoFrame], from_rate: u32, to_rate: u32) -> Vec<StereoFrame> {
    if from_rate == to_rate || from_rate == 0 || samples.is_empty() {
        return samples.to_vec();
    }
    let len = (samples.len() as u64 * to_rate as u64 / from_rate as u64) as usize;
    (0..len)
        .map(|i| {
            let source = (i as u64 * from_rate as u64 / to_rate as u64) as usize;
            samples[source.min(samples.len() - 1)]
        })
        .collect()
}

fn decode_error(path: &Path, what: &str, err: impl std::fmt::Display) -> EngineError {
    EngineError::resource_load(format!("{}: {what}: {err}", path.display()))
}

/// Decodes the default track of an audio file into stereo frames, returning
/// them with the file's sample rate. Mono files are played on both channels.
pub fn decode_file(path: &Path) -> Result<(Vec<StereoFrame>, u32), EngineError> {
    debug!("Reading audio data from: {}", path.display());

    let codecs = default::get_codecs();
    let probe = default::get_probe();

    let mut hint = Hint::new();
    if let Some(extension) = path.extension().map(|s| s.to_string_lossy()) {
        hint.with_extension(&extension);
    }

    let file = File::open(path).map_err(|err| decode_error(path, "could not open", err))?;
    let source = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());
    let mut source = probe
        .format(
            &hint,
            source,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|err| decode_error(path, "unrecognized audio format", err))?;

    let Some(track) = source.format.default_track() else {
        return Err(EngineError::resource_load(format!(
            "{}: no audio tracks",
            path.display()
        )));
    };
    let sample_rate = track.codec_params.sample_rate.unwrap_or(AUDIO_SAMPLE_RATE as u32);

    let mut decoder = codecs
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|err| decode_error(path, "no decoder", err))?;

    let mut samples = Vec::new();
    loop {
        let packet = match source.format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(err)) if err.kind() == IoErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::IoError(_)) | Err(SymphoniaError::DecodeError(_)) => continue,
            Err(SymphoniaError::ResetRequired) => {
                samples.clear();
                decoder = codecs
                    .make(decoder.codec_params(), &DecoderOptions::default())
                    .map_err(|err| decode_error(path, "could not recreate the decoder", err))?;
                continue;
            }
            Err(err) => return Err(decode_error(path, "could not read a packet", err)),
        };

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            Err(SymphoniaError::DecodeError(err)) => {
                trace!("Skipped an undecodable packet: {err}");
                continue;
            }
            Err(err) => return Err(decode_error(path, "could not decode a packet", err)),
        };

        let mut converted = AudioBuffer::<i16>::new(decoded.capacity() as u64, *decoded.spec());
        decoded.convert(&mut converted);

        samples.reserve(converted.frames());
        if converted.spec().channels.count() == 1 {
            samples.extend(converted.chan(0).iter().map(|&mono| [mono, mono]));
        } else {
            let (left, right) = (converted.chan(0), converted.chan(1));
            samples.extend(left.iter().zip(right).map(|(&l, &r)| [l, r]));
        }
    }

    debug!(
        "Decoded {} frames at {} Hz from {}.",
        samples.len(),
        sample_rate,
        path.display(),
    );
    Ok((samples, sample_rate))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{resample, MixerCallback, StereoFrame};

    fn clip(frames: &[StereoFrame]) -> Arc<[StereoFrame]> {
        Arc::from(frames.to_vec())
    }

    #[test]
    fn loop_track_wraps_around() {
        let mut mixer = MixerCallback::default();
        mixer.set_loop_track(clip(&[[1, 1], [2, 2], [3, 3]]));
        assert!(mixer.play_loop());
        assert!(!mixer.play_loop());

        let mut out = [[0; 2]; 5];
        mixer.mix_into(&mut out);
        assert_eq!([[1, 1], [2, 2], [3, 3], [1, 1], [2, 2]], out);
    }

    #[test]
    fn paused_loop_is_silent_and_restarts_from_the_beginning() {
        let mut mixer = MixerCallback::default();
        mixer.set_loop_track(clip(&[[1, 1], [2, 2], [3, 3]]));
        mixer.play_loop();
        let mut out = [[9; 2]; 2];
        mixer.mix_into(&mut out);

        mixer.pause_loop();
        mixer.mix_into(&mut out);
        assert_eq!([[0, 0], [0, 0]], out);

        mixer.play_loop();
        mixer.mix_into(&mut out);
        assert_eq!([[1, 1], [2, 2]], out);
    }

    #[test]
    fn play_loop_without_a_track_does_nothing() {
        let mut mixer = MixerCallback::default();
        assert!(!mixer.play_loop());
        let mut out = [[9; 2]; 2];
        mixer.mix_into(&mut out);
        assert_eq!([[0, 0], [0, 0]], out);
    }

    #[test]
    fn effects_overlap_and_finish() {
        let mut mixer = MixerCallback::default();
        mixer.play_effect(clip(&[[10, -10], [10, -10], [10, -10]]));
        mixer.play_effect(clip(&[[i16::MAX, i16::MIN]]));

        let mut out = [[0; 2]; 2];
        mixer.mix_into(&mut out);
        assert_eq!([[i16::MAX, i16::MIN], [10, -10]], out);

        mixer.mix_into(&mut out);
        assert_eq!([[10, -10], [0, 0]], out);

        mixer.mix_into(&mut out);
        assert_eq!([[0, 0], [0, 0]], out);
    }

    #[test]
    fn resampling_scales_the_length() {
        let samples: Vec<StereoFrame> = (0..100).map(|i| [i, i]).collect();
        assert_eq!(200, resample(&samples, 22050, 44100).len());
        assert_eq!(50, resample(&samples, 44100, 22050).len());
        assert_eq!(samples, resample(&samples, 44100, 44100));
        assert_eq!([[0, 0], [0, 0], [1, 1]], resample(&samples, 22050, 44100)[..3]);
    }
}
