/// All game entity types — pure data, no logic.

use std::sync::Arc;

use crate::assets::Assets;
use crate::sprites::{Animation, Mask, Sprite};

// ── Geometry ──────────────────────────────────────────────────────────────────

pub const WINDOW_WIDTH: i32 = 640;
pub const WINDOW_HEIGHT: i32 = 480;

pub const DRAGON_WIDTH: i32 = 135;
pub const DRAGON_HEIGHT: i32 = 150;
pub const BOSS_WIDTH: i32 = 135;
pub const BOSS_HEIGHT: i32 = 165;
pub const DEMON_WIDTH: i32 = 130;
pub const DEMON_HEIGHT: i32 = 140;
pub const FIREBALL_WIDTH: i32 = 50;
pub const FIREBALL_HEIGHT: i32 = 48;

/// Axis-aligned rectangle in window pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub const fn top(&self) -> i32 {
        self.y
    }

    pub const fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub const fn left(&self) -> i32 {
        self.x
    }

    pub const fn right(&self) -> i32 {
        self.x + self.width
    }
}

// ── Shared capability ─────────────────────────────────────────────────────────

/// Anything that occupies a rectangle, shows an image and can collide.
pub trait Body {
    fn rect(&self) -> Rect;

    /// The sprite currently on display.
    fn sprite(&self) -> &Sprite;

    /// Collision mask.  Fixed at creation: animated bodies keep the mask of
    /// their first frame whatever frame is on screen.
    fn mask(&self) -> &Mask;
}

// ── Player & boss ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Dragon {
    pub x: i32,
    pub y: i32,
    pub rect: Rect,
    pub animation: Animation,
}

#[derive(Clone, Debug)]
pub struct Boss {
    pub x: i32,
    pub y: i32,
    pub rect: Rect,
    pub animation: Animation,
    /// +1 moving down, −1 moving up.
    pub direction: i32,
    /// Timestamp (ms) of the last demon spawned.
    pub last_spawn: u64,
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    /// Launched by the dragon, travels right.
    Fireball,
    /// Spawned by the boss, travels left.
    Demon,
}

/// What a projectile shows: one fixed sprite or a looping animation.
#[derive(Clone, Debug)]
pub enum Look {
    Static(Arc<Sprite>),
    Animated(Animation),
}

impl Look {
    pub fn sprite(&self) -> &Sprite {
        match self {
            Look::Static(sprite) => sprite.as_ref(),
            Look::Animated(animation) => animation.current(),
        }
    }

    pub fn mask(&self) -> &Mask {
        match self {
            Look::Static(sprite) => &sprite.mask,
            Look::Animated(animation) => &animation.first().mask,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub kind: ProjectileKind,
    pub rect: Rect,
    /// Horizontal pixels per tick; the sign is the direction of travel.
    pub speed: i32,
    pub look: Look,
}

impl Body for Dragon {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> &Sprite {
        self.animation.current()
    }

    fn mask(&self) -> &Mask {
        &self.animation.first().mask
    }
}

impl Body for Boss {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> &Sprite {
        self.animation.current()
    }

    fn mask(&self) -> &Mask {
        &self.animation.first().mask
    }
}

impl Body for Projectile {
    fn rect(&self) -> Rect {
        self.rect
    }

    fn sprite(&self) -> &Sprite {
        self.look.sprite()
    }

    fn mask(&self) -> &Mask {
        self.look.mask()
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Running,
    Stopped,
}

/// The entire game state.  Cloneable so pure update functions can return a
/// new copy; images are shared behind `Arc`s so clones stay cheap.
#[derive(Clone, Debug)]
pub struct GameState {
    pub dragon: Dragon,
    pub boss: Boss,
    pub demons: Vec<Projectile>,
    pub fireballs: Vec<Projectile>,
    pub assets: Arc<Assets>,
    pub status: GameStatus,
    pub frame: u64,
    pub width: i32,
    pub height: i32,
}
