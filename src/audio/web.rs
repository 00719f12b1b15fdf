//! Browser playback using the Web Audio API
//!
//! Effects are synthesized with oscillators - no sample files needed. The
//! looping background track is a plain `<audio>` element.

use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use super::{MusicLifecycle, SoundEffect};
use crate::settings::Settings;

/// Base pitches for the score jingles, one per variant
const SCORE_ROOTS: [f32; super::SCORE_VARIANTS as usize] = [523.25, 587.33, 659.25, 698.46, 783.99];

/// Page-wide audio resources. Created once by the host and handed to the
/// input handlers. `suspend`/`resume` follow page visibility so a page
/// restored from the back/forward cache keeps its sound; `teardown`
/// releases everything and runs on drop.
pub struct AudioSession {
    ctx: Option<AudioContext>,
    music: Option<HtmlAudioElement>,
    settings: Settings,
    lifecycle: MusicLifecycle,
}

impl AudioSession {
    pub fn init(settings: Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - effects disabled");
        }

        let music = settings.music_url.as_deref().and_then(|url| {
            match HtmlAudioElement::new_with_src(url) {
                Ok(el) => {
                    el.set_loop(true);
                    el.set_volume(settings.effective_music_volume() as f64);
                    Some(el)
                }
                Err(e) => {
                    log::warn!("Failed to create music element: {:?}", e);
                    None
                }
            }
        });

        Self {
            ctx,
            music,
            settings,
            lifecycle: MusicLifecycle::Idle,
        }
    }

    /// Start the background loop. Browsers only allow this after a user
    /// gesture, so the host calls it from the first key or pointer event.
    /// Later calls do nothing.
    pub fn start_music(&mut self) {
        if self.lifecycle.start() {
            self.play_music();
        }
    }

    pub fn music_started(&self) -> bool {
        self.lifecycle != MusicLifecycle::Idle
    }

    /// Page hidden: pause the loop and suspend the context, keeping both
    pub fn suspend(&mut self) {
        if !self.lifecycle.hide() {
            return;
        }
        if let Some(music) = &self.music {
            let _ = music.pause();
        }
        if let Some(ctx) = &self.ctx {
            let _ = ctx.suspend();
        }
        log::debug!("Audio suspended");
    }

    /// Page shown again after `suspend`
    pub fn resume(&mut self) {
        if self.lifecycle.show() {
            log::debug!("Audio resumed");
            self.play_music();
        }
    }

    fn play_music(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }

        let Some(music) = &self.music else { return };
        match music.play() {
            Ok(promise) => spawn_local(async move {
                if let Err(e) = JsFuture::from(promise).await {
                    log::warn!("Background music refused to play: {:?}", e);
                }
            }),
            Err(e) => log::warn!("Background music failed: {:?}", e),
        }
    }

    /// Stop music and release the audio context
    pub fn teardown(&mut self) {
        if let Some(music) = self.music.take() {
            let _ = music.pause();
        }
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
        }
        self.lifecycle = MusicLifecycle::Idle;
    }

    /// Play a sound effect. Failures are silent.
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.settings.effective_sfx_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Score(variant) => self.play_score(ctx, vol, variant),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    /// Create an oscillator with gain envelope
    fn create_osc(
        &self,
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Score - quick rising arpeggio, pitch set by the variant
    fn play_score(&self, ctx: &AudioContext, vol: f32, variant: u8) {
        let root = SCORE_ROOTS[variant as usize % SCORE_ROOTS.len()];
        for (i, ratio) in [1.0, 1.25, 1.5].iter().enumerate() {
            let delay = i as f64 * 0.06;
            if let Some((osc, gain)) = self.create_osc(ctx, root * ratio, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.15).ok();
            }
        }
    }

    /// Game over - sad descending
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        for (i, freq) in [400.0, 350.0, 300.0, 200.0].iter().enumerate() {
            let delay = i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.4).ok();
            }
        }
    }
}

impl Drop for AudioSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
