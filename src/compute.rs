/// Pure game-logic functions.
///
/// Every public function takes an immutable reference to the current
/// `GameState` (plus, where needed, the tick's input, the clock in
/// milliseconds and an RNG handle) and returns a brand-new `GameState`.
/// Side effects are limited to the injected RNG and log output.
///
/// One tick is `update` → (render) → `check_collisions` → `animate`;
/// `tick` runs the three without rendering.

use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use crate::assets::Assets;
use crate::entities::{
    Body, Boss, Dragon, GameState, GameStatus, Look, Projectile, ProjectileKind, Rect,
    BOSS_HEIGHT, BOSS_WIDTH, DEMON_HEIGHT, DEMON_WIDTH, DRAGON_HEIGHT, DRAGON_WIDTH,
    FIREBALL_HEIGHT, FIREBALL_WIDTH, WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::input::InputSnapshot;
use crate::sprites::Animation;

// ── Tuning ────────────────────────────────────────────────────────────────────

pub const DRAGON_SPEED: i32 = 5;
pub const BOSS_SPEED: i32 = 6;
pub const DEMON_SPEED: i32 = -7;
pub const FIREBALL_SPEED: i32 = 7;

/// Minimum milliseconds between two demon spawns.
pub const DEMON_SPAWN_INTERVAL_MS: u64 = 150;
/// Each tick the boss rolls in `0..SPAWN_ROLL_RANGE`...
pub const SPAWN_ROLL_RANGE: u32 = 150;
/// ...and a roll at or below this value is a spawn attempt.
pub const SPAWN_ROLL_HIT: u32 = 1;

/// The mouth sits in a box wider and shorter than the dragon sprite.
const MOUTH_WIDTH_RATIO: f32 = 0.74;
const MOUTH_HEIGHT_RATIO: f32 = 0.67;

// ── Constructors ─────────────────────────────────────────────────────────────

/// Build the initial game state: dragon top-left, boss top-right heading down.
pub fn init_state(assets: Arc<Assets>, now: u64) -> GameState {
    let dragon = Dragon {
        x: 0,
        y: 0,
        rect: Rect::new(0, 0, DRAGON_WIDTH, DRAGON_HEIGHT),
        animation: Animation::new(Arc::clone(&assets.dragon), now),
    };

    let boss_x = WINDOW_WIDTH - BOSS_WIDTH;
    let boss = Boss {
        x: boss_x,
        y: 0,
        rect: Rect::new(boss_x, 0, BOSS_WIDTH, BOSS_HEIGHT),
        animation: Animation::new(Arc::clone(&assets.boss), now),
        direction: 1,
        last_spawn: now,
    };

    GameState {
        dragon,
        boss,
        demons: Vec::new(),
        fireballs: Vec::new(),
        assets,
        status: GameStatus::Running,
        frame: 0,
        width: WINDOW_WIDTH,
        height: WINDOW_HEIGHT,
    }
}

/// A fireball leaving the mouth of a dragon standing at (x, y).
pub fn new_fireball(assets: &Assets, x: i32, y: i32) -> Projectile {
    let mouth_width = DRAGON_WIDTH as f32 + DRAGON_WIDTH as f32 * MOUTH_WIDTH_RATIO;
    let mouth_height = DRAGON_HEIGHT as f32 - DRAGON_WIDTH as f32 * MOUTH_HEIGHT_RATIO;
    let fx = x + (mouth_width / 2.0).floor() as i32 - FIREBALL_WIDTH / 2;
    let fy = y + (mouth_height / 2.0).floor() as i32 - FIREBALL_HEIGHT / 2;

    Projectile {
        kind: ProjectileKind::Fireball,
        rect: Rect::new(fx, fy, FIREBALL_WIDTH, FIREBALL_HEIGHT),
        speed: FIREBALL_SPEED,
        look: Look::Static(Arc::clone(&assets.fireball)),
    }
}

/// A demon centred on a boss standing at (x, y).
pub fn new_demon(assets: &Assets, x: i32, y: i32, now: u64) -> Projectile {
    let dx = x + BOSS_WIDTH / 2 - DEMON_WIDTH / 2;
    let dy = y + BOSS_HEIGHT / 2 - DEMON_HEIGHT / 2;

    Projectile {
        kind: ProjectileKind::Demon,
        rect: Rect::new(dx, dy, DEMON_WIDTH, DEMON_HEIGHT),
        speed: DEMON_SPEED,
        look: Look::Animated(Animation::new(Arc::clone(&assets.demon), now)),
    }
}

// ── Per-entity rules ─────────────────────────────────────────────────────────

/// Vertical movement from held keys.  Up and down cancel out; there is no
/// clamping, so the dragon can fly off screen.
pub fn move_dragon(dragon: &Dragon, input: &InputSnapshot) -> Dragon {
    let mut y = dragon.y;
    if input.up {
        y -= DRAGON_SPEED;
    }
    if input.down {
        y += DRAGON_SPEED;
    }
    Dragon {
        y,
        rect: Rect { y, ..dragon.rect },
        ..dragon.clone()
    }
}

/// Move one step and bounce off the top/bottom of a `height`-tall window.
/// The top check wins when both edges are touched.
pub fn move_boss(boss: &Boss, height: i32) -> Boss {
    let y = boss.y + boss.direction * BOSS_SPEED;
    let rect = Rect { y, ..boss.rect };

    let direction = if rect.top() <= 0 {
        1
    } else if rect.bottom() >= height {
        -1
    } else {
        boss.direction
    };

    Boss {
        y,
        rect,
        direction,
        ..boss.clone()
    }
}

/// Roll for a demon.  A spawn needs both a lucky roll and an expired
/// cooldown; on success the boss's cooldown restarts at `now`.
pub fn spawn_demon(
    boss: &Boss,
    assets: &Assets,
    now: u64,
    rng: &mut impl Rng,
) -> (Boss, Option<Projectile>) {
    let roll = rng.gen_range(0..SPAWN_ROLL_RANGE);
    if roll > SPAWN_ROLL_HIT || now.saturating_sub(boss.last_spawn) < DEMON_SPAWN_INTERVAL_MS {
        return (boss.clone(), None);
    }

    let demon = new_demon(assets, boss.x, boss.y, now);
    debug!(x = demon.rect.x, y = demon.rect.y, "demon spawned");
    let boss = Boss {
        last_spawn: now,
        ..boss.clone()
    };
    (boss, Some(demon))
}

/// Whether a projectile is still (at least partly) within the horizontal
/// window bounds.
pub fn in_bounds(rect: &Rect, width: i32) -> bool {
    rect.x >= -rect.width && rect.x <= width
}

/// Move every projectile by its speed and drop those that scrolled away.
pub fn advance_projectiles(projectiles: &[Projectile], width: i32) -> Vec<Projectile> {
    projectiles
        .iter()
        .filter_map(|p| {
            let rect = Rect {
                x: p.rect.x + p.speed,
                ..p.rect
            };
            in_bounds(&rect, width).then(|| Projectile { rect, ..p.clone() })
        })
        .collect()
}

// ── Per-frame stages ─────────────────────────────────────────────────────────

/// Apply input and move everything: dragon, boss, demons, fireballs.
///
/// A close request stops the game and leaves every entity where it was.
pub fn update(
    state: &GameState,
    input: &InputSnapshot,
    now: u64,
    rng: &mut impl Rng,
) -> GameState {
    if input.close_requested || state.status == GameStatus::Stopped {
        return GameState {
            status: GameStatus::Stopped,
            ..state.clone()
        };
    }

    // ── 1. Dragon: launch from where it stands, then move ───────────────────
    let mut fireballs = state.fireballs.clone();
    for _ in 0..input.fire_presses {
        let fireball = new_fireball(&state.assets, state.dragon.x, state.dragon.y);
        debug!(x = fireball.rect.x, y = fireball.rect.y, "fireball launched");
        fireballs.push(fireball);
    }
    let dragon = move_dragon(&state.dragon, input);

    // ── 2. Boss: bounce, then maybe spawn from the new position ─────────────
    let boss = move_boss(&state.boss, state.height);
    let (boss, spawned) = spawn_demon(&boss, &state.assets, now, rng);
    let mut demons = state.demons.clone();
    demons.extend(spawned);

    // ── 3. Projectiles ───────────────────────────────────────────────────────
    let demons = advance_projectiles(&demons, state.width);
    let fireballs = advance_projectiles(&fireballs, state.width);

    GameState {
        dragon,
        boss,
        demons,
        fireballs,
        frame: state.frame + 1,
        ..state.clone()
    }
}

/// Per-pixel overlap of two bodies, using their rectangles' top-left corners
/// as mask origins.
pub fn collide_mask(a: &impl Body, b: &impl Body) -> bool {
    let (ra, rb) = (a.rect(), b.rect());
    a.mask().overlaps(b.mask(), (rb.x - ra.x, rb.y - ra.y))
}

/// Remove every fireball that touches a demon, together with every demon it
/// touches.  Fireballs are checked in order; a demon already destroyed by an
/// earlier fireball cannot absorb a later one.
pub fn check_collisions(state: &GameState) -> GameState {
    let mut demon_alive = vec![true; state.demons.len()];
    let mut fireballs = Vec::with_capacity(state.fireballs.len());

    for fireball in &state.fireballs {
        let mut hit = false;
        for (alive, demon) in demon_alive.iter_mut().zip(&state.demons) {
            if *alive && collide_mask(fireball, demon) {
                *alive = false;
                hit = true;
            }
        }
        if hit {
            info!(x = fireball.rect.x, y = fireball.rect.y, "collision");
        } else {
            fireballs.push(fireball.clone());
        }
    }

    let demons = state
        .demons
        .iter()
        .zip(&demon_alive)
        .filter(|(_, alive)| **alive)
        .map(|(d, _)| d.clone())
        .collect();

    GameState {
        demons,
        fireballs,
        ..state.clone()
    }
}

/// Step the dragon, boss and demon animations.  Fireballs do not animate.
pub fn animate(state: &GameState, now: u64) -> GameState {
    let mut dragon = state.dragon.clone();
    dragon.animation.advance(now);

    let mut boss = state.boss.clone();
    boss.animation.advance(now);

    let demons = state
        .demons
        .iter()
        .map(|d| {
            let mut demon = d.clone();
            if let Look::Animated(animation) = &mut demon.look {
                animation.advance(now);
            }
            demon
        })
        .collect();

    GameState {
        dragon,
        boss,
        demons,
        ..state.clone()
    }
}

/// Advance the simulation by one tick without rendering.  All randomness
/// comes through `rng` so callers control determinism.
pub fn tick(
    state: &GameState,
    input: &InputSnapshot,
    now: u64,
    rng: &mut impl Rng,
) -> GameState {
    let state = update(state, input, now, rng);
    if state.status == GameStatus::Stopped {
        return state;
    }
    animate(&check_collisions(&state), now)
}
