//! Audio cueing.
//!
//! The engine never synthesizes sound: it schedules `Tone` cues that cross
//! the frame buffer as 4-float records, and the bridge plays them through
//! Web Audio. An unavailable or disabled audio backend simply sees an empty
//! tone section — cueing is always a silent no-op, never an error.

use crate::renderer::draw::ToneRecord;
use crate::systems::particles::Rng;

/// Oscillator shape, matching the Web Audio `OscillatorType` the bridge
/// feeds it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    pub fn wire_index(self) -> f32 {
        match self {
            Waveform::Sine => 0.0,
            Waveform::Square => 1.0,
            Waveform::Sawtooth => 2.0,
            Waveform::Triangle => 3.0,
        }
    }
}

/// One synthesized note.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    pub duration: f32,
    pub waveform: Waveform,
    pub volume: f32,
}

impl Tone {
    pub fn new(freq: f32, duration: f32, waveform: Waveform, volume: f32) -> Self {
        Tone {
            freq,
            duration,
            waveform,
            volume,
        }
    }

    pub fn record(self) -> ToneRecord {
        ToneRecord {
            freq: self.freq,
            duration: self.duration,
            waveform: self.waveform.wire_index(),
            volume: self.volume,
        }
    }
}

#[derive(Debug, Clone)]
struct Pending {
    tone: Tone,
    delay: f32,
}

/// Tone scheduler: recipes push tones with delays, `tick` moves due tones
/// into the per-frame queue, the frame build drains it.
pub struct AudioState {
    pending: Vec<Pending>,
    due: Vec<Tone>,
    sfx_enabled: bool,
    music_enabled: bool,
    /// Countdown to the next ambient pad note.
    ambient_in: f32,
}

impl Default for AudioState {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioState {
    /// The first ambient note waits out the page load.
    const AMBIENT_LEAD_IN: f32 = 2.0;
    /// Ambient pad notes, a soft A minor wash.
    const AMBIENT_NOTES: [f32; 4] = [220.0, 329.63, 440.0, 523.25];

    pub fn new() -> Self {
        AudioState {
            pending: Vec::new(),
            due: Vec::new(),
            sfx_enabled: true,
            music_enabled: true,
            ambient_in: Self::AMBIENT_LEAD_IN,
        }
    }

    /// Cue a tone after a delay. Dropped silently while sfx are off.
    pub fn schedule(&mut self, tone: Tone, delay: f32) {
        if !self.sfx_enabled {
            return;
        }
        if delay <= 0.0 {
            self.due.push(tone);
        } else {
            self.pending.push(Pending { tone, delay });
        }
    }

    // -- Recipes --

    pub fn play_button_click(&mut self) {
        self.schedule(Tone::new(800.0, 0.1, Waveform::Square, 0.05), 0.0);
    }

    /// Two-note build chord.
    pub fn play_build(&mut self) {
        self.schedule(Tone::new(600.0, 0.3, Waveform::Sawtooth, 0.08), 0.0);
        self.schedule(Tone::new(800.0, 0.2, Waveform::Sine, 0.06), 0.1);
    }

    /// Five random low rumble hits, 50 ms apart.
    pub fn play_battle(&mut self, rng: &mut Rng) {
        for i in 0..5 {
            let freq = 100.0 + rng.range(0.0, 200.0);
            self.schedule(
                Tone::new(freq, 0.1, Waveform::Sawtooth, 0.1),
                i as f32 * 0.05,
            );
        }
    }

    /// Rising C-major arpeggio: C5 E5 G5 C6.
    pub fn play_victory(&mut self) {
        for (i, freq) in [523.25, 659.25, 783.99, 1046.5].into_iter().enumerate() {
            self.schedule(Tone::new(freq, 0.5, Waveform::Sine, 0.1), i as f32 * 0.2);
        }
    }

    /// Descending defeat scale.
    pub fn play_defeat(&mut self) {
        for (i, freq) in [500.0, 400.0, 300.0, 200.0].into_iter().enumerate() {
            self.schedule(Tone::new(freq, 0.3, Waveform::Triangle, 0.08), i as f32 * 0.3);
        }
    }

    pub fn play_end_turn(&mut self) {
        self.schedule(Tone::new(440.0, 0.2, Waveform::Sine, 0.06), 0.0);
        self.schedule(Tone::new(554.37, 0.3, Waveform::Sine, 0.08), 0.2);
    }

    /// Bright two-note resource chime.
    pub fn play_resource(&mut self) {
        self.schedule(Tone::new(1000.0, 0.1, Waveform::Sine, 0.05), 0.0);
        self.schedule(Tone::new(1200.0, 0.1, Waveform::Sine, 0.04), 0.05);
    }

    pub fn play_laser(&mut self) {
        self.schedule(Tone::new(800.0, 0.2, Waveform::Sawtooth, 0.1), 0.0);
    }

    pub fn play_launch(&mut self) {
        self.schedule(Tone::new(400.0, 0.5, Waveform::Sawtooth, 0.08), 0.0);
    }

    // -- Scheduling --

    /// Advance delays and the ambient drone. Due tones land in the frame
    /// queue until drained.
    pub fn tick(&mut self, dt: f32, rng: &mut Rng) {
        if self.music_enabled && self.sfx_enabled {
            self.ambient_in -= dt;
            if self.ambient_in <= 0.0 {
                let note = Self::AMBIENT_NOTES[rng.next_int(4) as usize];
                self.due.push(Tone::new(note, 2.0, Waveform::Sine, 0.02));
                self.ambient_in = rng.range(3.0, 5.0);
            }
        }

        let due = &mut self.due;
        self.pending.retain_mut(|p| {
            p.delay -= dt;
            if p.delay <= 0.0 {
                due.push(p.tone);
                false
            } else {
                true
            }
        });
    }

    /// Tones due this frame, in cue order. Clears the queue.
    pub fn drain(&mut self) -> std::vec::Drain<'_, Tone> {
        self.due.drain(..)
    }

    pub fn queued_tones(&self) -> usize {
        self.due.len()
    }

    pub fn pending_tones(&self) -> usize {
        self.pending.len()
    }

    // -- Toggles --

    /// Flip sfx. Turning them off drops everything already cued.
    pub fn toggle_sfx(&mut self) -> bool {
        self.sfx_enabled = !self.sfx_enabled;
        if !self.sfx_enabled {
            self.pending.clear();
            self.due.clear();
        }
        self.sfx_enabled
    }

    /// Flip the ambient drone.
    pub fn toggle_music(&mut self) -> bool {
        self.music_enabled = !self.music_enabled;
        if self.music_enabled {
            self.ambient_in = Self::AMBIENT_LEAD_IN;
        }
        self.music_enabled
    }

    pub fn sfx_enabled(&self) -> bool {
        self.sfx_enabled
    }

    pub fn music_enabled(&self) -> bool {
        self.music_enabled
    }
}
