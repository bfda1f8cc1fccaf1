/// Sprite images, collision masks, sprite-sheet slicing and frame animation.
///
/// Everything here works on in-memory `RgbaImage`s; loading from disk lives
/// in `assets`.

use std::sync::Arc;

use anyhow::{bail, Result};
use image::{imageops, Rgba, RgbaImage};

/// Pixels with alpha above this value are solid for collision purposes.
const MASK_ALPHA_THRESHOLD: u8 = 127;

/// Milliseconds each animation frame stays on screen.
pub const ANIMATION_INTERVAL_MS: u64 = 200;

// ── Mask ──────────────────────────────────────────────────────────────────────

/// Per-pixel opacity bitmap of an image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn from_image(image: &RgbaImage) -> Self {
        let bits = image
            .pixels()
            .map(|p| p.0[3] > MASK_ALPHA_THRESHOLD)
            .collect();
        Self {
            width: image.width(),
            height: image.height(),
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at (x, y) is solid.  Out-of-range reads are empty.
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[(y * self.width + x) as usize]
    }

    /// Number of solid pixels.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True if any solid pixel of `self` lands on a solid pixel of `other`
    /// when `other`'s origin sits at `offset` relative to `self`'s origin.
    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        let (dx, dy) = offset;
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (self.width as i32).min(dx + other.width as i32);
        let y1 = (self.height as i32).min(dy + other.height as i32);

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x as u32, y as u32) && other.get((x - dx) as u32, (y - dy) as u32) {
                    return true;
                }
            }
        }
        false
    }
}

// ── Sprite ────────────────────────────────────────────────────────────────────

/// An image together with the collision mask derived from it.
#[derive(Clone, Debug, PartialEq)]
pub struct Sprite {
    pub image: RgbaImage,
    pub mask: Mask,
}

impl Sprite {
    pub fn new(image: RgbaImage) -> Self {
        let mask = Mask::from_image(&image);
        Self { image, mask }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Nearest-neighbour rescale, used for the fireball which ships oversized.
pub fn scale(image: &RgbaImage, width: u32, height: u32) -> RgbaImage {
    imageops::resize(image, width, height, imageops::FilterType::Nearest)
}

// ── Frame slicing ─────────────────────────────────────────────────────────────

/// Cut `frame_count` frames of `frame_width × frame_height` out of a
/// single-row sprite sheet, left to right from x = 0.
///
/// Each frame is flattened onto black and black is then keyed out, so both
/// transparent and pure-black sheet pixels end up fully transparent.
pub fn slice_frames(
    sheet: &RgbaImage,
    frame_width: u32,
    frame_height: u32,
    frame_count: u32,
) -> Result<Vec<Sprite>> {
    if frame_count == 0 || frame_width == 0 || frame_height == 0 {
        bail!(
            "cannot slice {frame_count} frames of {frame_width}x{frame_height}: empty frame layout"
        );
    }
    if u64::from(frame_count) * u64::from(frame_width) > u64::from(sheet.width())
        || frame_height > sheet.height()
    {
        bail!(
            "sprite sheet {}x{} is too small for {frame_count} frames of {frame_width}x{frame_height}",
            sheet.width(),
            sheet.height()
        );
    }

    let frames = (0..frame_count)
        .map(|i| {
            let mut frame =
                imageops::crop_imm(sheet, i * frame_width, 0, frame_width, frame_height).to_image();
            key_out_black(&mut frame);
            Sprite::new(frame)
        })
        .collect();
    Ok(frames)
}

fn key_out_black(frame: &mut RgbaImage) {
    for pixel in frame.pixels_mut() {
        let Rgba([r, g, b, a]) = *pixel;
        let flatten = |c: u8| (u16::from(c) * u16::from(a) / 255) as u8;
        let (r, g, b) = (flatten(r), flatten(g), flatten(b));
        *pixel = if r == 0 && g == 0 && b == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([r, g, b, 255])
        };
    }
}

// ── Animation ─────────────────────────────────────────────────────────────────

/// Looping frame animation driven by elapsed milliseconds.
///
/// The frame list is shared between every entity that uses the same sheet;
/// the index and timestamp belong to one entity.
#[derive(Clone, Debug)]
pub struct Animation {
    frames: Arc<[Sprite]>,
    index: usize,
    last_update: u64,
    interval: u64,
}

impl Animation {
    pub fn new(frames: Arc<[Sprite]>, now: u64) -> Self {
        Self::with_interval(frames, now, ANIMATION_INTERVAL_MS)
    }

    pub fn with_interval(frames: Arc<[Sprite]>, now: u64, interval: u64) -> Self {
        assert!(!frames.is_empty(), "an animation needs at least one frame");
        Self {
            frames,
            index: 0,
            last_update: now,
            interval,
        }
    }

    /// Step to the next frame if a full interval has passed since the last
    /// step.  Returns whether the displayed frame changed.
    pub fn advance(&mut self, now: u64) -> bool {
        if now.saturating_sub(self.last_update) < self.interval {
            return false;
        }
        self.last_update = now;
        self.index += 1;
        if self.index >= self.frames.len() {
            self.index = 0;
        }
        true
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn last_update(&self) -> u64 {
        self.last_update
    }

    /// The frame currently on display.
    pub fn current(&self) -> &Sprite {
        &self.frames[self.index]
    }

    /// The frame shown at creation.  Its mask is the one used for collisions.
    pub fn first(&self) -> &Sprite {
        &self.frames[0]
    }
}
