//! Frame buffer and wire protocol.
//!
//! Each frame the engine rebuilds one set of flat `f32` sections the browser
//! reads zero-copy as `Float32Array` views:
//!
//! ```text
//! [Header: 16 floats]
//! [Shapes:  count × 12 floats]  kind, x, y, p0..p4, r, g, b, alpha
//! [Sprites: count × 8 floats]   x, y, rotation, scale, sprite, alpha, pad, pad
//! [Tones:   count × 4 floats]   freq, duration, waveform, volume
//! ```
//!
//! Capacities are fixed at construction and written into the header so the
//! painter can size its views once; overfull sections drop records rather
//! than reallocate mid-frame.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use crate::systems::particles::Color;

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_PROTOCOL_VERSION: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_VIEWPORT_X: usize = 2;
pub const HEADER_VIEWPORT_Y: usize = 3;
pub const HEADER_SHAPE_COUNT: usize = 4;
pub const HEADER_MAX_SHAPES: usize = 5;
pub const HEADER_SPRITE_COUNT: usize = 6;
pub const HEADER_MAX_SPRITES: usize = 7;
pub const HEADER_TONE_COUNT: usize = 8;
pub const HEADER_MAX_TONES: usize = 9;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per shape record (wire format — never changes).
pub const SHAPE_FLOATS: usize = 12;

/// Floats per ship sprite record (wire format — never changes).
pub const SPRITE_FLOATS: usize = 8;

/// Floats per tone record (wire format — never changes).
pub const TONE_FLOATS: usize = 4;

/// Shape record discriminant. Parameter meaning per kind:
/// - `Circle`: p0 = radius
/// - `Star`: p0 = radius, p1 = rotation, p2 = point count
/// - `Line`: p0/p1 = end point, p2 = width, p3 = shadow blur
/// - `Glow`: p0 = radius (radial gradient, color center → transparent edge)
/// - `Ring`: p0 = radius, p1 = line width, p2 = shadow blur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ShapeKind {
    Circle = 0,
    Star = 1,
    Line = 2,
    Glow = 3,
    Ring = 4,
}

/// One shape on the effects canvas.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct ShapeRecord {
    pub kind: f32,
    pub x: f32,
    pub y: f32,
    pub p0: f32,
    pub p1: f32,
    pub p2: f32,
    pub p3: f32,
    pub p4: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub alpha: f32,
}

impl ShapeRecord {
    pub const FLOATS: usize = SHAPE_FLOATS;
}

/// One ship marker (8 floats / 32 bytes stride).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct SpriteInstance {
    pub x: f32,
    pub y: f32,
    pub rotation: f32,
    pub scale: f32,
    pub sprite: f32,
    pub alpha: f32,
    pub pad0: f32,
    pub pad1: f32,
}

impl SpriteInstance {
    pub const FLOATS: usize = SPRITE_FLOATS;
}

/// One tone cue for the Web Audio layer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct ToneRecord {
    pub freq: f32,
    pub duration: f32,
    pub waveform: f32,
    pub volume: f32,
}

impl ToneRecord {
    pub const FLOATS: usize = TONE_FLOATS;
}

/// Section capacities, fixed at engine construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FxLayout {
    pub max_shapes: usize,
    pub max_sprites: usize,
    pub max_tones: usize,
}

impl Default for FxLayout {
    fn default() -> Self {
        FxLayout {
            max_shapes: 1024,
            max_sprites: 64,
            max_tones: 16,
        }
    }
}

/// The per-frame output buffer.
pub struct FrameBuffer {
    layout: FxLayout,
    header: [f32; HEADER_FLOATS],
    shapes: Vec<f32>,
    sprites: Vec<f32>,
    tones: Vec<f32>,
    frame_counter: u32,
}

impl FrameBuffer {
    pub fn new(layout: FxLayout) -> Self {
        let mut header = [0.0; HEADER_FLOATS];
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_MAX_SHAPES] = layout.max_shapes as f32;
        header[HEADER_MAX_SPRITES] = layout.max_sprites as f32;
        header[HEADER_MAX_TONES] = layout.max_tones as f32;
        FrameBuffer {
            layout,
            header,
            shapes: Vec::with_capacity(layout.max_shapes * SHAPE_FLOATS),
            sprites: Vec::with_capacity(layout.max_sprites * SPRITE_FLOATS),
            tones: Vec::with_capacity(layout.max_tones * TONE_FLOATS),
            frame_counter: 0,
        }
    }

    /// Reset all sections for a new frame and stamp the viewport offset.
    pub fn begin_frame(&mut self, viewport_offset: Vec2) {
        self.shapes.clear();
        self.sprites.clear();
        self.tones.clear();
        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.header[HEADER_FRAME_COUNTER] = self.frame_counter as f32;
        self.header[HEADER_VIEWPORT_X] = viewport_offset.x;
        self.header[HEADER_VIEWPORT_Y] = viewport_offset.y;
    }

    /// Write section counts into the header. Call after the last push.
    pub fn finish(&mut self) {
        self.header[HEADER_SHAPE_COUNT] = self.shape_count() as f32;
        self.header[HEADER_SPRITE_COUNT] = self.sprite_count() as f32;
        self.header[HEADER_TONE_COUNT] = self.tone_count() as f32;
    }

    pub fn push_shape(&mut self, record: ShapeRecord) {
        if self.shape_count() >= self.layout.max_shapes {
            return;
        }
        self.shapes.extend_from_slice(bytemuck::cast_slice(&[record]));
    }

    pub fn push_circle(&mut self, pos: Vec2, radius: f32, color: Color, alpha: f32) {
        self.push_shape(ShapeRecord {
            kind: ShapeKind::Circle as u8 as f32,
            x: pos.x,
            y: pos.y,
            p0: radius,
            r: color.r,
            g: color.g,
            b: color.b,
            alpha,
            ..Default::default()
        });
    }

    pub fn push_star(&mut self, pos: Vec2, radius: f32, rotation: f32, color: Color, alpha: f32) {
        self.push_shape(ShapeRecord {
            kind: ShapeKind::Star as u8 as f32,
            x: pos.x,
            y: pos.y,
            p0: radius,
            p1: rotation,
            p2: 5.0,
            r: color.r,
            g: color.g,
            b: color.b,
            alpha,
            ..Default::default()
        });
    }

    pub fn push_line(
        &mut self,
        from: Vec2,
        to: Vec2,
        width: f32,
        blur: f32,
        color: Color,
        alpha: f32,
    ) {
        self.push_shape(ShapeRecord {
            kind: ShapeKind::Line as u8 as f32,
            x: from.x,
            y: from.y,
            p0: to.x,
            p1: to.y,
            p2: width,
            p3: blur,
            r: color.r,
            g: color.g,
            b: color.b,
            alpha,
            ..Default::default()
        });
    }

    pub fn push_glow(&mut self, pos: Vec2, radius: f32, color: Color, alpha: f32) {
        self.push_shape(ShapeRecord {
            kind: ShapeKind::Glow as u8 as f32,
            x: pos.x,
            y: pos.y,
            p0: radius,
            r: color.r,
            g: color.g,
            b: color.b,
            alpha,
            ..Default::default()
        });
    }

    pub fn push_ring(
        &mut self,
        pos: Vec2,
        radius: f32,
        width: f32,
        blur: f32,
        color: Color,
        alpha: f32,
    ) {
        self.push_shape(ShapeRecord {
            kind: ShapeKind::Ring as u8 as f32,
            x: pos.x,
            y: pos.y,
            p0: radius,
            p1: width,
            p2: blur,
            r: color.r,
            g: color.g,
            b: color.b,
            alpha,
            ..Default::default()
        });
    }

    pub fn push_sprite(&mut self, instance: SpriteInstance) {
        if self.sprite_count() >= self.layout.max_sprites {
            return;
        }
        self.sprites.extend_from_slice(bytemuck::cast_slice(&[instance]));
    }

    pub fn push_tone(&mut self, tone: ToneRecord) {
        if self.tone_count() >= self.layout.max_tones {
            return;
        }
        self.tones.extend_from_slice(bytemuck::cast_slice(&[tone]));
    }

    pub fn layout(&self) -> FxLayout {
        self.layout
    }

    pub fn shape_count(&self) -> usize {
        self.shapes.len() / SHAPE_FLOATS
    }

    pub fn sprite_count(&self) -> usize {
        self.sprites.len() / SPRITE_FLOATS
    }

    pub fn tone_count(&self) -> usize {
        self.tones.len() / TONE_FLOATS
    }

    // -- Zero-copy accessors for the wasm bridge --

    pub fn header_ptr(&self) -> *const f32 {
        self.header.as_ptr()
    }

    pub fn shapes_ptr(&self) -> *const f32 {
        self.shapes.as_ptr()
    }

    pub fn sprites_ptr(&self) -> *const f32 {
        self.sprites.as_ptr()
    }

    pub fn tones_ptr(&self) -> *const f32 {
        self.tones.as_ptr()
    }

    pub fn shapes(&self) -> &[f32] {
        &self.shapes
    }

    pub fn sprites(&self) -> &[f32] {
        &self.sprites
    }

    pub fn tones(&self) -> &[f32] {
        &self.tones
    }

    pub fn header(&self) -> &[f32] {
        &self.header
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_have_wire_strides() {
        assert_eq!(std::mem::size_of::<ShapeRecord>(), SHAPE_FLOATS * 4);
        assert_eq!(std::mem::size_of::<SpriteInstance>(), SPRITE_FLOATS * 4);
        assert_eq!(std::mem::size_of::<ToneRecord>(), TONE_FLOATS * 4);
    }

    #[test]
    fn begin_frame_resets_sections() {
        let mut frame = FrameBuffer::new(FxLayout::default());
        frame.begin_frame(Vec2::ZERO);
        frame.push_circle(Vec2::new(1.0, 2.0), 3.0, Color::WHITE, 1.0);
        frame.push_sprite(SpriteInstance::default());
        frame.finish();
        assert_eq!(frame.shape_count(), 1);
        assert_eq!(frame.sprite_count(), 1);

        frame.begin_frame(Vec2::ZERO);
        assert_eq!(frame.shape_count(), 0);
        assert_eq!(frame.sprite_count(), 0);
    }

    #[test]
    fn header_carries_counts_and_viewport() {
        let mut frame = FrameBuffer::new(FxLayout::default());
        frame.begin_frame(Vec2::new(3.0, -2.0));
        frame.push_circle(Vec2::ZERO, 1.0, Color::GOLD, 0.5);
        frame.push_circle(Vec2::ZERO, 1.0, Color::GOLD, 0.5);
        frame.push_tone(ToneRecord {
            freq: 440.0,
            duration: 0.2,
            waveform: 0.0,
            volume: 0.1,
        });
        frame.finish();

        let header = frame.header();
        assert_eq!(header[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(header[HEADER_VIEWPORT_X], 3.0);
        assert_eq!(header[HEADER_VIEWPORT_Y], -2.0);
        assert_eq!(header[HEADER_SHAPE_COUNT], 2.0);
        assert_eq!(header[HEADER_TONE_COUNT], 1.0);
    }

    #[test]
    fn overfull_sections_drop_records() {
        let layout = FxLayout {
            max_shapes: 2,
            max_sprites: 1,
            max_tones: 1,
        };
        let mut frame = FrameBuffer::new(layout);
        frame.begin_frame(Vec2::ZERO);
        for _ in 0..5 {
            frame.push_circle(Vec2::ZERO, 1.0, Color::WHITE, 1.0);
            frame.push_sprite(SpriteInstance::default());
        }
        frame.finish();
        assert_eq!(frame.shape_count(), 2);
        assert_eq!(frame.sprite_count(), 1);
    }

    #[test]
    fn frame_counter_increments() {
        let mut frame = FrameBuffer::new(FxLayout::default());
        frame.begin_frame(Vec2::ZERO);
        frame.begin_frame(Vec2::ZERO);
        assert_eq!(frame.header()[HEADER_FRAME_COUNTER], 2.0);
    }

    #[test]
    fn shape_record_round_trips_through_floats() {
        let mut frame = FrameBuffer::new(FxLayout::default());
        frame.begin_frame(Vec2::ZERO);
        frame.push_line(
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 50.0),
            3.0,
            10.0,
            Color::CYAN,
            0.8,
        );
        let floats = frame.shapes();
        assert_eq!(floats[0], ShapeKind::Line as u8 as f32);
        assert_eq!(floats[3], 100.0); // p0 = end x
        assert_eq!(floats[4], 50.0); // p1 = end y
        assert_eq!(floats[5], 3.0); // p2 = width
    }
}
