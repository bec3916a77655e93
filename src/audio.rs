//! Audio system using Web Audio API
//!
//! Theme music comes from the page's `<audio id="theme-music">` element;
//! sound effects are procedurally generated so no extra files are needed.

use wasm_bindgen::JsCast;
use web_sys::{AudioContext, GainNode, HtmlAudioElement, OscillatorNode, OscillatorType};

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Countdown number shown
    CountdownBeep,
    /// Countdown finished, run begins
    RunStart,
    /// Player hit by a falling object
    Explosion,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    theme: Option<HtmlAudioElement>,
    sfx_volume: f32,
    music_volume: f32,
}

impl AudioManager {
    pub fn new(settings: &Settings) -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - sound effects disabled");
        }
        let theme = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("theme-music"))
            .and_then(|el| el.dyn_into::<HtmlAudioElement>().ok());
        if theme.is_none() {
            log::warn!("No #theme-music element - music disabled");
        }
        let mut manager = Self {
            ctx,
            theme,
            sfx_volume: 0.0,
            music_volume: 0.0,
        };
        manager.apply_settings(settings);
        manager
    }

    /// Pick up volume/mute changes
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.sfx_volume = settings.effective_sfx_volume();
        self.music_volume = settings.effective_music_volume();
        if let Some(theme) = &self.theme {
            theme.set_volume(self.music_volume as f64);
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Restart the theme from the beginning
    pub fn start_music(&self) {
        if let Some(theme) = &self.theme {
            theme.set_current_time(0.0);
            if self.music_volume > 0.0 {
                let _ = theme.play();
            }
        }
    }

    pub fn stop_music(&self) {
        if let Some(theme) = &self.theme {
            let _ = theme.pause();
        }
    }

    /// React to a simulation event
    pub fn handle_event(&self, event: &GameEvent) {
        match event {
            GameEvent::CountdownTick { .. } => self.play(SoundEffect::CountdownBeep),
            GameEvent::ScoreChanged { score: 0 } => self.play(SoundEffect::RunStart),
            GameEvent::GameOver { .. } => {
                self.stop_music();
                self.play(SoundEffect::Explosion);
            }
            _ => {}
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.sfx_volume;
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::CountdownBeep => self.play_beep(ctx, vol, 440.0),
            SoundEffect::RunStart => self.play_beep(ctx, vol, 880.0),
            SoundEffect::Explosion => self.play_explosion(ctx, vol),
        }
    }

    // === Sound generators ===

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

    /// Short square-wave blip
    fn play_beep(&self, ctx: &AudioContext, vol: f32, freq: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, freq, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.12)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.15).ok();
    }

    /// Explosion - low rumble with a crackling top
    fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        // Rumble sweeping down
        if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.8)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0, t + 0.8)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.85).ok();
        }

        // Crackle
        if let Some((osc, gain)) = self.create_osc(ctx, 1800.0, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.15, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(1800.0, t).ok();
            osc.frequency().set_value_at_time(400.0, t + 0.03).ok();
            osc.frequency().set_value_at_time(2200.0, t + 0.06).ok();
            osc.frequency().set_value_at_time(300.0, t + 0.1).ok();
            osc.frequency().set_value_at_time(1500.0, t + 0.14).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }
}
