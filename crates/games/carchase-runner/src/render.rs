use carchase_core::geometry::Aabb;
use carchase_core::render::{Color, DrawSurface, TextAlign};
use carchase_core::report::SubmissionStatus;

use crate::engine::{Engine, Phase};
use crate::powerups::PowerUpKind;

pub const SKY: Color = Color::rgb(24, 26, 48);
pub const SKYLINE: Color = Color::rgb(44, 48, 82);
pub const GROUND: Color = Color::rgb(58, 58, 64);
pub const LANE_MARK: Color = Color::rgb(230, 200, 60);
pub const OBSTACLE: Color = Color::rgb(200, 60, 60);
pub const PLAYER: Color = Color::rgb(60, 140, 230);
pub const SHIELD_HALO: Color = Color::rgba(120, 220, 255, 110);
pub const HUD_TEXT: Color = Color::rgb(240, 240, 240);
pub const OVERLAY: Color = Color::rgba(0, 0, 0, 170);

pub const RESTART_PROMPT: &str = "Press R to play again";

const SKYLINE_SPACING: f32 = 120.0;
const SKYLINE_HEIGHTS: [f32; 5] = [70.0, 110.0, 55.0, 90.0, 130.0];
const SHIELD_PADDING: f32 = 5.0;

pub fn powerup_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::ScoreMultiplier => Color::rgb(250, 210, 40),
        PowerUpKind::Shield => Color::rgb(90, 210, 250),
        PowerUpKind::HighJump => Color::rgb(90, 220, 110),
        PowerUpKind::TimeDilation => Color::rgb(180, 110, 240),
    }
}

/// Session data shown alongside the simulation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hud {
    pub personal_best: Option<u64>,
    pub submission: Option<SubmissionStatus>,
}

/// Draw one frame: background, ground, obstacles, power-ups, player, HUD,
/// then the game-over overlay when the run has ended.
pub fn draw_frame(engine: &Engine, hud: &Hud, surface: &mut dyn DrawSurface) {
    let (width, height) = surface.size();
    let ground = engine.state().ground_level;

    surface.clear(SKY);
    draw_skyline(engine.state().background_offset, ground, width, surface);

    surface.fill_rect(Aabb::new(0.0, ground, width, height - ground), GROUND);
    surface.stroke_line((0.0, ground), (width, ground), 2.0, LANE_MARK);

    for o in engine.obstacles() {
        surface.fill_rect(o.bounds(), OBSTACLE);
    }
    for p in engine.powerups() {
        surface.fill_rect(p.bounds(), powerup_color(p.kind));
    }

    let player = engine.player().bounds();
    if engine.shield_active() {
        let halo = Aabb::new(
            player.x - SHIELD_PADDING,
            player.y - SHIELD_PADDING,
            player.width + SHIELD_PADDING * 2.0,
            player.height + SHIELD_PADDING * 2.0,
        );
        surface.fill_rect(halo, SHIELD_HALO);
    }
    surface.fill_rect(player, PLAYER);

    draw_hud(engine, hud, width, surface);

    if engine.phase() == Phase::GameOver {
        draw_game_over(engine, hud, width, height, surface);
    }
}

/// Repeating silhouettes scrolled by the background offset.
fn draw_skyline(offset: f32, ground: f32, width: f32, surface: &mut dyn DrawSurface) {
    let count = (width / SKYLINE_SPACING).ceil() as usize + 1;
    for i in 0..count {
        let x = (i as f32 * SKYLINE_SPACING - offset).rem_euclid(width + SKYLINE_SPACING)
            - SKYLINE_SPACING;
        let h = SKYLINE_HEIGHTS[i % SKYLINE_HEIGHTS.len()];
        surface.fill_rect(Aabb::new(x, ground - h, SKYLINE_SPACING * 0.6, h), SKYLINE);
    }
}

fn draw_hud(engine: &Engine, hud: &Hud, width: f32, surface: &mut dyn DrawSurface) {
    let score = engine.score().max(0.0).floor() as u64;
    surface.text(
        &format!("Score: {score}"),
        12.0,
        24.0,
        20.0,
        TextAlign::Left,
        HUD_TEXT,
    );
    if let Some(best) = hud.personal_best {
        surface.text(
            &format!("Best: {best}"),
            12.0,
            48.0,
            16.0,
            TextAlign::Left,
            HUD_TEXT,
        );
    }

    let mut y = 24.0;
    for (kind, secs) in engine.active_effects() {
        surface.text(
            &format!("{} {:.0}s", kind.label(), secs.ceil()),
            width - 12.0,
            y,
            16.0,
            TextAlign::Right,
            powerup_color(kind),
        );
        y += 22.0;
    }
}

fn draw_game_over(
    engine: &Engine,
    hud: &Hud,
    width: f32,
    height: f32,
    surface: &mut dyn DrawSurface,
) {
    surface.fill_rect(Aabb::new(0.0, 0.0, width, height), OVERLAY);

    let cx = width / 2.0;
    let cy = height / 2.0;
    let final_score = engine.summary().map(|s| s.final_score).unwrap_or(0);

    surface.text("GAME OVER", cx, cy - 50.0, 40.0, TextAlign::Center, HUD_TEXT);
    surface.text(
        &format!("Final score: {final_score}"),
        cx,
        cy,
        24.0,
        TextAlign::Center,
        HUD_TEXT,
    );

    let mut line_y = cy + 30.0;
    if let Some(best) = hud.personal_best
        && final_score > best
    {
        surface.text(
            "New personal best!",
            cx,
            line_y,
            18.0,
            TextAlign::Center,
            LANE_MARK,
        );
        line_y += 24.0;
    }
    // A failed submission shows nothing
    if hud.submission == Some(SubmissionStatus::Accepted) {
        surface.text("Score saved", cx, line_y, 16.0, TextAlign::Center, HUD_TEXT);
        line_y += 24.0;
    }
    surface.text(
        RESTART_PROMPT,
        cx,
        line_y + 10.0,
        18.0,
        TextAlign::Center,
        HUD_TEXT,
    );
}
