/// Rendering layer — all terminal I/O lives here.
///
/// A frame is drawn in two steps: the game state is composited onto a
/// window-sized RGBA canvas, then the canvas is scaled into the terminal
/// using upper-half blocks (two canvas rows per terminal row).  No game
/// logic is performed; this module only translates state into pixels.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};
use image::{imageops, Rgba, RgbaImage};

use crate::entities::{Body, GameState};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_LETTERBOX: Color = Color::Black;
const C_HINT: Color = Color::DarkGrey;

const HALF_BLOCK: char = '▀';

// ── Composition ───────────────────────────────────────────────────────────────

/// Paint background then dragon, boss, demons and fireballs, in that order.
pub fn compose(state: &GameState) -> RgbaImage {
    let mut canvas = RgbaImage::new(state.width.max(0) as u32, state.height.max(0) as u32);
    imageops::overlay(&mut canvas, &state.assets.background, 0, 0);

    draw_body(&mut canvas, &state.dragon);
    draw_body(&mut canvas, &state.boss);
    for demon in &state.demons {
        draw_body(&mut canvas, demon);
    }
    for fireball in &state.fireballs {
        draw_body(&mut canvas, fireball);
    }
    canvas
}

/// Alpha-blend a body's current image at its rectangle, clipped to the canvas.
fn draw_body(canvas: &mut RgbaImage, body: &impl Body) {
    let rect = body.rect();
    imageops::overlay(
        canvas,
        &body.sprite().image,
        i64::from(rect.x),
        i64::from(rect.y),
    );
}

// ── Scaling ───────────────────────────────────────────────────────────────────

/// Where the scaled canvas lands inside the terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Left terminal column of the picture.
    pub col: u16,
    /// Top terminal row of the picture.
    pub row: u16,
    /// Picture width in columns (one canvas sample per column).
    pub cols: u16,
    /// Picture height in terminal rows (two canvas samples per row).
    pub rows: u16,
}

impl Viewport {
    /// Largest aspect-preserving fit of a `canvas_w × canvas_h` canvas into
    /// `term_cols × term_rows` cells, centred.
    pub fn fit(canvas_w: u32, canvas_h: u32, term_cols: u16, term_rows: u16) -> Self {
        let avail_w = u32::from(term_cols);
        let avail_h = u32::from(term_rows) * 2;
        if canvas_w == 0 || canvas_h == 0 || avail_w == 0 || avail_h == 0 {
            return Self { col: 0, row: 0, cols: 0, rows: 0 };
        }

        let (w, h) = if avail_w * canvas_h <= avail_h * canvas_w {
            (avail_w, avail_w * canvas_h / canvas_w)
        } else {
            (avail_h * canvas_w / canvas_h, avail_h)
        };
        let cols = w as u16;
        let rows = (h / 2) as u16;

        Self {
            col: (term_cols - cols) / 2,
            row: (term_rows - rows) / 2,
            cols,
            rows,
        }
    }

    /// Canvas pixel shown by sample (x, y) of the picture, where y counts
    /// half-rows.
    fn source(&self, canvas: &RgbaImage, x: u16, y: u16) -> Rgba<u8> {
        let sx = u32::from(x) * canvas.width() / u32::from(self.cols);
        let sy = u32::from(y) * canvas.height() / (u32::from(self.rows) * 2);
        *canvas.get_pixel(sx.min(canvas.width() - 1), sy.min(canvas.height() - 1))
    }
}

fn to_color(pixel: Rgba<u8>) -> Color {
    let Rgba([r, g, b, _]) = pixel;
    Color::Rgb { r, g, b }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame into a terminal of `size` (columns, rows).
/// The bottom row is reserved for the controls hint.
pub fn render<W: Write>(out: &mut W, state: &GameState, size: (u16, u16)) -> std::io::Result<()> {
    let (term_cols, term_rows) = size;
    let picture_rows = term_rows.saturating_sub(1);

    let canvas = compose(state);
    let viewport = Viewport::fit(canvas.width(), canvas.height(), term_cols, picture_rows);

    draw_canvas(out, &canvas, &viewport, term_cols, picture_rows)?;
    draw_controls_hint(out, term_rows)?;

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, term_rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Write every picture cell, blanking the letterbox around it so stale
/// pixels from a previous terminal size disappear.
fn draw_canvas<W: Write>(
    out: &mut W,
    canvas: &RgbaImage,
    viewport: &Viewport,
    term_cols: u16,
    picture_rows: u16,
) -> std::io::Result<()> {
    let mut current: Option<(Color, Color)> = None;

    for row in 0..picture_rows {
        out.queue(cursor::MoveTo(0, row))?;
        for col in 0..term_cols {
            let inside = row >= viewport.row
                && row < viewport.row + viewport.rows
                && col >= viewport.col
                && col < viewport.col + viewport.cols;

            let (fg, bg, ch) = if inside {
                let x = col - viewport.col;
                let y = (row - viewport.row) * 2;
                let top = to_color(viewport.source(canvas, x, y));
                let bottom = to_color(viewport.source(canvas, x, y + 1));
                (top, bottom, HALF_BLOCK)
            } else {
                (C_LETTERBOX, C_LETTERBOX, ' ')
            };

            if current != Some((fg, bg)) {
                out.queue(style::SetForegroundColor(fg))?;
                out.queue(style::SetBackgroundColor(bg))?;
                current = Some((fg, bg));
            }
            out.queue(Print(ch))?;
        }
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, term_rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, term_rows.saturating_sub(1)))?;
    out.queue(style::SetBackgroundColor(C_LETTERBOX))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("W S / ↑ ↓ : Move   SPACE : Fire   Q : Quit"))?;
    Ok(())
}
