/// Startup asset loading: background, sprite sheets and the fireball image.
///
/// Every file is read once.  A missing or undecodable file is an error the
/// caller is expected to treat as fatal.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use image::RgbaImage;
use tracing::debug;

use crate::entities::{BOSS_HEIGHT, BOSS_WIDTH, DEMON_HEIGHT, DEMON_WIDTH, DRAGON_HEIGHT, DRAGON_WIDTH};
use crate::sprites::{scale, slice_frames, Sprite};

pub const BACKGROUND_FILE: &str = "Background.bmp";
pub const DRAGON_FILE: &str = "dragon.png";
pub const BOSS_FILE: &str = "boss.png";
pub const DEMON_FILE: &str = "demon.png";
pub const FIREBALL_FILE: &str = "fireball.png";

pub const DRAGON_FRAMES: u32 = 5;
pub const BOSS_FRAMES: u32 = 4;
pub const DEMON_FRAMES: u32 = 4;

/// Side length the fireball image is scaled to after loading.
pub const FIREBALL_IMAGE_SIZE: u32 = 64;

/// Decoded images shared by every entity.
#[derive(Debug)]
pub struct Assets {
    pub background: RgbaImage,
    pub dragon: Arc<[Sprite]>,
    pub boss: Arc<[Sprite]>,
    pub demon: Arc<[Sprite]>,
    pub fireball: Arc<Sprite>,
}

impl Assets {
    pub fn load(dir: &Path) -> Result<Self> {
        let background = load_image(&dir.join(BACKGROUND_FILE))?;
        let dragon = load_sheet(
            &dir.join(DRAGON_FILE),
            DRAGON_WIDTH as u32,
            DRAGON_HEIGHT as u32,
            DRAGON_FRAMES,
        )?;
        let boss = load_sheet(
            &dir.join(BOSS_FILE),
            BOSS_WIDTH as u32,
            BOSS_HEIGHT as u32,
            BOSS_FRAMES,
        )?;
        let demon = load_sheet(
            &dir.join(DEMON_FILE),
            DEMON_WIDTH as u32,
            DEMON_HEIGHT as u32,
            DEMON_FRAMES,
        )?;
        let fireball = load_image(&dir.join(FIREBALL_FILE))?;
        let fireball = Sprite::new(scale(&fireball, FIREBALL_IMAGE_SIZE, FIREBALL_IMAGE_SIZE));

        Ok(Self {
            background,
            dragon,
            boss,
            demon,
            fireball: Arc::new(fireball),
        })
    }
}

fn load_image(path: &Path) -> Result<RgbaImage> {
    let image = image::open(path).with_context(|| format!("loading asset {}", path.display()))?;
    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "loaded asset"
    );
    Ok(image.to_rgba8())
}

fn load_sheet(path: &Path, width: u32, height: u32, count: u32) -> Result<Arc<[Sprite]>> {
    let sheet = load_image(path)?;
    let frames = slice_frames(&sheet, width, height, count)
        .with_context(|| format!("slicing sprite sheet {}", path.display()))?;
    Ok(Arc::from(frames))
}
