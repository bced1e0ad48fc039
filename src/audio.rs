//! Race sound cues
//!
//! Procedurally generated from oscillators - no external files needed!
//! Each cue is a short list of [`Tone`]s; the ambient tone is a single
//! long-running wobble that has to be stopped explicitly.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use crate::error::AudioError;

/// One-shot sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Random quack while racing
    Quack,
    /// Countdown beep (3, 2, 1)
    CountdownBeep,
    /// Race start, higher and longer than the beep
    StartTone,
    /// Winner fanfare
    Victory,
}

/// Oscillator shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Sawtooth,
}

impl Waveform {
    /// Value at `phase` (radians), in [-1, 1]
    fn sample(self, phase: f64) -> f64 {
        let x = (phase / TAU).fract();
        match self {
            Waveform::Sine => phase.sin(),
            Waveform::Sawtooth => 2.0 * x - 1.0,
        }
    }
}

/// Gain every tone decays to
pub const RELEASE_GAIN: f64 = 0.01;

/// A single oscillator burst with an exponential gain decay
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub waveform: Waveform,
    /// Starting frequency (Hz)
    pub freq: f64,
    /// Frequency reached after `sweep_secs` (equal to `freq` for a flat tone)
    pub end_freq: f64,
    pub sweep_secs: f64,
    /// Offset from the moment the cue is played
    pub delay_secs: f64,
    pub duration_secs: f64,
    /// Peak gain before master/sfx volume
    pub volume: f64,
}

impl Tone {
    const fn flat(freq: f64, duration_secs: f64, volume: f64) -> Self {
        Self {
            waveform: Waveform::Sine,
            freq,
            end_freq: freq,
            sweep_secs: 0.0,
            delay_secs: 0.0,
            duration_secs,
            volume,
        }
    }

    pub fn end_secs(&self) -> f64 {
        self.delay_secs + self.duration_secs
    }

    /// Frequency `t` seconds into the tone (exponential sweep)
    fn freq_at(&self, t: f64) -> f64 {
        if self.sweep_secs <= 0.0 || self.end_freq == self.freq {
            return self.freq;
        }
        let progress = (t / self.sweep_secs).clamp(0.0, 1.0);
        self.freq * (self.end_freq / self.freq).powf(progress)
    }

    /// Gain `t` seconds into the tone (exponential decay to [`RELEASE_GAIN`])
    fn gain_at(&self, t: f64) -> f64 {
        if self.volume <= RELEASE_GAIN {
            return self.volume;
        }
        let progress = (t / self.duration_secs).clamp(0.0, 1.0);
        self.volume * (RELEASE_GAIN / self.volume).powf(progress)
    }
}

const DEFAULT_VOLUME: f64 = 0.3;
const START_VOLUME: f64 = 0.4;

/// C5 E5 G5 C6
const VICTORY_NOTES: [f64; 4] = [523.0, 659.0, 784.0, 1047.0];
const VICTORY_NOTE_GAP: f64 = 0.15;
const VICTORY_NOTE_DURATION: f64 = 0.3;

impl SoundCue {
    /// The oscillator tones making up this cue
    pub fn tones(self) -> Vec<Tone> {
        match self {
            SoundCue::Quack => vec![Tone {
                end_freq: 200.0,
                sweep_secs: 0.1,
                ..Tone::flat(600.0, 0.15, DEFAULT_VOLUME)
            }],
            SoundCue::CountdownBeep => vec![Tone::flat(440.0, 0.2, DEFAULT_VOLUME)],
            SoundCue::StartTone => vec![Tone::flat(880.0, 0.5, START_VOLUME)],
            SoundCue::Victory => VICTORY_NOTES
                .iter()
                .enumerate()
                .map(|(i, &freq)| Tone {
                    delay_secs: i as f64 * VICTORY_NOTE_GAP,
                    ..Tone::flat(freq, VICTORY_NOTE_DURATION, DEFAULT_VOLUME)
                })
                .collect(),
        }
    }

    /// Length of the cue in seconds
    pub fn duration_secs(self) -> f64 {
        self.tones().iter().map(Tone::end_secs).fold(0.0, f64::max)
    }
}

/// Background wobble: a sawtooth whose frequency is swung by a sine LFO
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientTone {
    pub waveform: Waveform,
    pub base_freq: f64,
    pub lfo_freq: f64,
    /// Frequency swing of the LFO (Hz)
    pub lfo_depth: f64,
    pub volume: f64,
}

pub const AMBIENT_TONE: AmbientTone = AmbientTone {
    waveform: Waveform::Sawtooth,
    base_freq: 150.0,
    lfo_freq: 8.0,
    lfo_depth: 30.0,
    volume: 0.08,
};

/// Render a cue to mono PCM in [-1, 1] at `sample_rate`.
pub fn render_samples(cue: SoundCue, sample_rate: u32) -> Vec<f32> {
    let rate = f64::from(sample_rate.max(1));
    let len = (cue.duration_secs() * rate).ceil() as usize;
    let mut buffer = vec![0.0f64; len];

    for tone in cue.tones() {
        let start = (tone.delay_secs * rate).round() as usize;
        let count = (tone.duration_secs * rate).round() as usize;
        let mut phase = 0.0;
        for (n, out) in buffer.iter_mut().skip(start).take(count).enumerate() {
            let t = n as f64 / rate;
            *out += tone.waveform.sample(phase) * tone.gain_at(t);
            phase += TAU * tone.freq_at(t) / rate;
        }
    }

    buffer
        .into_iter()
        .map(|s| s.clamp(-1.0, 1.0) as f32)
        .collect()
}

/// Something that can make race noises.
///
/// Every call may fail independently; the race engine logs and ignores
/// failures so missing audio never affects the simulation.
pub trait AudioSink {
    fn play_cue(&mut self, cue: SoundCue) -> Result<(), AudioError>;
    /// Start the ambient tone, replacing one that is already running
    fn start_ambient(&mut self) -> Result<(), AudioError>;
    /// Stop the ambient tone; a no-op when none is running
    fn stop_ambient(&mut self) -> Result<(), AudioError>;
}

/// Run `op` on every node, even after a failure, and report the first error
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn try_each<N>(
    nodes: &[N],
    mut op: impl FnMut(&N) -> Result<(), AudioError>,
) -> Result<(), AudioError> {
    let mut first_err = None;
    for node in nodes {
        if let Err(e) = op(node) {
            first_err.get_or_insert(e);
        }
    }
    first_err.map_or(Ok(()), Err)
}

/// A sink shared with the host, which keeps its own handle to adjust it
impl<T: AudioSink> AudioSink for Rc<RefCell<T>> {
    fn play_cue(&mut self, cue: SoundCue) -> Result<(), AudioError> {
        self.borrow_mut().play_cue(cue)
    }

    fn start_ambient(&mut self) -> Result<(), AudioError> {
        self.borrow_mut().start_ambient()
    }

    fn stop_ambient(&mut self) -> Result<(), AudioError> {
        self.borrow_mut().stop_ambient()
    }
}

/// Silent sink for headless runs and tests
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_cue(&mut self, _cue: SoundCue) -> Result<(), AudioError> {
        Ok(())
    }

    fn start_ambient(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn stop_ambient(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use wasm_bindgen::JsValue;
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AMBIENT_TONE, AudioSink, SoundCue, Tone, Waveform, try_each};
    use crate::error::AudioError;
    use crate::settings::Settings;

    fn backend(err: JsValue) -> AudioError {
        AudioError::Backend(format!("{err:?}"))
    }

    fn osc_type(waveform: Waveform) -> OscillatorType {
        match waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
        }
    }

    /// Running ambient voice: the audible oscillator and its LFO
    struct AmbientVoice {
        osc: OscillatorNode,
        lfo: OscillatorNode,
    }

    /// Web Audio API backend
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        ambient: Option<AmbientVoice>,
        sfx_volume: f32,
        ambient_volume: f32,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            let defaults = Settings::default();
            Self {
                ctx: None,
                ambient: None,
                sfx_volume: defaults.effective_sfx_volume(),
                ambient_volume: defaults.effective_ambient_volume(),
            }
        }

        /// Take volumes from the player's settings
        pub fn apply_settings(&mut self, settings: &Settings) {
            self.sfx_volume = settings.effective_sfx_volume();
            self.ambient_volume = settings.effective_ambient_volume();
        }

        /// Lazily create the context (browsers want a user gesture first)
        fn context(&mut self) -> Result<&AudioContext, AudioError> {
            if self.ctx.is_none() {
                let ctx = AudioContext::new().map_err(|e| {
                    log::warn!("Failed to create AudioContext - audio disabled");
                    backend(e)
                })?;
                self.ctx = Some(ctx);
            }
            let ctx = self.ctx.as_ref().ok_or(AudioError::Unavailable)?;
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }
            Ok(ctx)
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            ctx: &AudioContext,
            waveform: Waveform,
        ) -> Result<(OscillatorNode, GainNode), AudioError> {
            let osc = ctx.create_oscillator().map_err(backend)?;
            let gain = ctx.create_gain().map_err(backend)?;

            osc.set_type(osc_type(waveform));
            osc.connect_with_audio_node(&gain).map_err(backend)?;
            gain.connect_with_audio_node(&ctx.destination())
                .map_err(backend)?;

            Ok((osc, gain))
        }

        fn schedule_tone(ctx: &AudioContext, tone: &Tone, vol: f64) -> Result<(), AudioError> {
            let (osc, gain) = Self::create_osc(ctx, tone.waveform)?;
            let t = ctx.current_time() + tone.delay_secs;

            osc.frequency()
                .set_value_at_time(tone.freq as f32, t)
                .map_err(backend)?;
            if tone.end_freq != tone.freq && tone.sweep_secs > 0.0 {
                osc.frequency()
                    .exponential_ramp_to_value_at_time(tone.end_freq as f32, t + tone.sweep_secs)
                    .map_err(backend)?;
            }

            gain.gain()
                .set_value_at_time((tone.volume * vol) as f32, t)
                .map_err(backend)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(
                    super::RELEASE_GAIN as f32,
                    t + tone.duration_secs,
                )
                .map_err(backend)?;

            osc.start_with_when(t).map_err(backend)?;
            osc.stop_with_when(t + tone.duration_secs).map_err(backend)?;
            Ok(())
        }
    }

    impl AudioSink for WebAudio {
        fn play_cue(&mut self, cue: SoundCue) -> Result<(), AudioError> {
            let vol = f64::from(self.sfx_volume);
            if vol <= 0.0 {
                return Ok(());
            }
            let ctx = self.context()?;
            for tone in cue.tones() {
                Self::schedule_tone(ctx, &tone, vol)?;
            }
            Ok(())
        }

        fn start_ambient(&mut self) -> Result<(), AudioError> {
            // At most one ambient voice
            self.stop_ambient()?;

            let vol = f64::from(self.ambient_volume);
            if vol <= 0.0 {
                return Ok(());
            }
            let ctx = self.context()?;
            let t = ctx.current_time();

            let (osc, gain) = Self::create_osc(ctx, AMBIENT_TONE.waveform)?;
            osc.frequency()
                .set_value_at_time(AMBIENT_TONE.base_freq as f32, t)
                .map_err(backend)?;
            gain.gain()
                .set_value_at_time((AMBIENT_TONE.volume * vol) as f32, t)
                .map_err(backend)?;

            // LFO -> main oscillator frequency for the wobble
            let lfo = ctx.create_oscillator().map_err(backend)?;
            let lfo_gain = ctx.create_gain().map_err(backend)?;
            lfo.set_type(OscillatorType::Sine);
            lfo.frequency()
                .set_value_at_time(AMBIENT_TONE.lfo_freq as f32, t)
                .map_err(backend)?;
            lfo_gain
                .gain()
                .set_value_at_time(AMBIENT_TONE.lfo_depth as f32, t)
                .map_err(backend)?;
            lfo.connect_with_audio_node(&lfo_gain).map_err(backend)?;
            lfo_gain
                .connect_with_audio_param(&osc.frequency())
                .map_err(backend)?;

            // Keep the handles before anything can sound
            let voice = AmbientVoice { osc, lfo };
            let started = try_each(&[&voice.osc, &voice.lfo], |node| {
                node.start().map_err(backend)
            });
            self.ambient = Some(voice);
            if let Err(e) = started {
                // Silence whichever oscillator did start
                let _ = self.stop_ambient();
                return Err(e);
            }
            Ok(())
        }

        fn stop_ambient(&mut self) -> Result<(), AudioError> {
            match self.ambient.take() {
                Some(voice) => try_each(&[&voice.osc, &voice.lfo], |node| {
                    node.stop().map_err(backend)
                }),
                None => Ok(()),
            }
        }
    }
}
