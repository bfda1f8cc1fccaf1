#![allow(dead_code)]

use std::sync::Arc;

use evil_clutches::assets::{Assets, BOSS_FRAMES, DEMON_FRAMES, DRAGON_FRAMES, FIREBALL_IMAGE_SIZE};
use evil_clutches::entities::{
    BOSS_HEIGHT, BOSS_WIDTH, DEMON_HEIGHT, DEMON_WIDTH, DRAGON_HEIGHT, DRAGON_WIDTH,
    WINDOW_HEIGHT, WINDOW_WIDTH,
};
use evil_clutches::sprites::Sprite;
use image::{Rgba, RgbaImage};

pub const SOLID: Rgba<u8> = Rgba([200, 40, 40, 255]);
pub const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);
pub const SKY: Rgba<u8> = Rgba([10, 20, 60, 255]);

pub fn solid(width: i32, height: i32) -> RgbaImage {
    RgbaImage::from_pixel(width as u32, height as u32, SOLID)
}

/// Opaque on the left `opaque_cols` columns, transparent elsewhere.
pub fn left_part(width: i32, height: i32, opaque_cols: u32) -> RgbaImage {
    RgbaImage::from_fn(width as u32, height as u32, |x, _| {
        if x < opaque_cols {
            SOLID
        } else {
            CLEAR
        }
    })
}

fn frames(width: i32, height: i32, count: u32) -> Arc<[Sprite]> {
    (0..count).map(|_| Sprite::new(solid(width, height))).collect()
}

/// In-memory stand-ins for the asset files: every sprite fully opaque.
pub fn test_assets() -> Arc<Assets> {
    Arc::new(Assets {
        background: RgbaImage::from_pixel(WINDOW_WIDTH as u32, WINDOW_HEIGHT as u32, SKY),
        dragon: frames(DRAGON_WIDTH, DRAGON_HEIGHT, DRAGON_FRAMES),
        boss: frames(BOSS_WIDTH, BOSS_HEIGHT, BOSS_FRAMES),
        demon: frames(DEMON_WIDTH, DEMON_HEIGHT, DEMON_FRAMES),
        fireball: Arc::new(Sprite::new(solid(
            FIREBALL_IMAGE_SIZE as i32,
            FIREBALL_IMAGE_SIZE as i32,
        ))),
    })
}
