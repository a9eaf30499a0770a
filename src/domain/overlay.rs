//! Overlay scene building.
//!
//! Turns an attacker index plus display settings into two layers of plain
//! vector shapes in a unit grid: square (file f, rank r) spans
//! `[f, f + 1] x [7 - r, 8 - r]`, so rank 8 is row 0 whatever the board
//! orientation. The UI only scales these shapes to pixels and paints them.
//!
//! - fill layer: control tint per square, drawn beneath the pieces
//! - outline layer: rings, badges or arrows, drawn above everything

use shakmaty::Square;

use crate::domain::attack_index::AttackerIndex;
use crate::domain::chess::{BoardSnapshot, PieceColor, PieceKind, file_of, rank_of};
use crate::domain::geometry::{attacks_of, ray_endpoints_of};
use crate::domain::settings::{OverlaySettings, OverlayStyle, SideFilter};

// Fill tints
pub const WHITE_CONTROL: OverlayColor = OverlayColor::new(0x4caf50, 0.35);
pub const BLACK_CONTROL: OverlayColor = OverlayColor::new(0xe53935, 0.35);

/// Outline/arrow color for every piece of the non-keyed side
pub const OPPOSITE_SIDE: OverlayColor = OverlayColor::new(0x263238, 0.9);

const OUTLINE_WIDTH: f32 = 0.035;
const DASH_LENGTH: f32 = 0.12;
const DASH_GAP: f32 = 0.06;
const RING_START: f32 = 0.04;
const RING_STEP: f32 = 0.035;
const HATCH_BANDS: usize = 8;

const BADGE_RADIUS: f32 = 0.13;
const BADGE_INSET: f32 = 0.16;

const ARROW_WIDTH: f32 = 0.06;
const ARROW_HEAD_LENGTH: f32 = 0.22;
const ARROW_HEAD_HALF_WIDTH: f32 = 0.12;
const ARROW_START_OFFSET: f32 = 0.28;
const KNIGHT_MARK_RADIUS: f32 = 0.14;
const KING_MARK_SIZE: f32 = 0.3;
const MARK_WIDTH: f32 = 0.04;

/// Hex RGB plus opacity
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct OverlayColor {
    pub rgb: u32,
    pub alpha: f32,
}

impl OverlayColor {
    pub const fn new(rgb: u32, alpha: f32) -> Self {
        Self { rgb, alpha }
    }
}

/// Outline color of a piece type on the keyed side
pub fn kind_color(kind: PieceKind) -> OverlayColor {
    match kind {
        PieceKind::Pawn => OverlayColor::new(0x29b6f6, 0.95),
        PieceKind::Knight => OverlayColor::new(0xff9800, 0.95),
        PieceKind::Bishop => OverlayColor::new(0xab47bc, 0.95),
        PieceKind::Rook => OverlayColor::new(0x26a69a, 0.95),
        PieceKind::Queen => OverlayColor::new(0xec407a, 0.95),
        PieceKind::King => OverlayColor::new(0xfdd835, 0.95),
    }
}

/// Per-type color for the keyed side, the fixed color otherwise
pub fn outline_color(color: PieceColor, kind: PieceKind, side: SideFilter) -> OverlayColor {
    if color == side.keyed_side() {
        kind_color(kind)
    } else {
        OPPOSITE_SIDE
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    fn lerp(self, other: Point, t: f32) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }
}

/// Top-left corner of a square in the unit grid
pub fn square_origin(sq: Square) -> Point {
    Point::new(file_of(sq) as f32, (7 - rank_of(sq)) as f32)
}

pub fn square_center(sq: Square) -> Point {
    let o = square_origin(sq);
    Point::new(o.x + 0.5, o.y + 0.5)
}

#[derive(Clone, PartialEq, Debug)]
pub enum Shape {
    /// Solid filled axis-aligned square
    Rect {
        origin: Point,
        size: f32,
        color: OverlayColor,
    },
    /// Filled convex polygon
    Polygon {
        points: Vec<Point>,
        color: OverlayColor,
    },
    /// Dashed square outline; `dash_offset` shifts the dash phase along the perimeter
    DashedRect {
        origin: Point,
        size: f32,
        color: OverlayColor,
        width: f32,
        dash: f32,
        gap: f32,
        dash_offset: f32,
    },
    /// Solid square outline
    Outline {
        origin: Point,
        size: f32,
        color: OverlayColor,
        width: f32,
    },
    Circle {
        center: Point,
        radius: f32,
        color: OverlayColor,
        width: f32,
    },
    /// Shaft from `from` to the head base, filled triangular head ending at `head[0]`
    Arrow {
        from: Point,
        to: Point,
        head: [Point; 3],
        color: OverlayColor,
        width: f32,
    },
    /// Round count marker
    Badge {
        center: Point,
        radius: f32,
        count: usize,
        fill: OverlayColor,
        text: OverlayColor,
    },
}

impl Shape {
    /// Line segments of a `DashedRect`, walking the perimeter clockwise from
    /// the top-left corner. Other shapes have none.
    pub fn dash_segments(&self) -> Vec<(Point, Point)> {
        let Shape::DashedRect {
            origin,
            size,
            dash,
            gap,
            dash_offset,
            ..
        } = *self
        else {
            return Vec::new();
        };
        let period = dash + gap;
        if size <= 0.0 || dash <= 0.0 || period <= 0.0 {
            return Vec::new();
        }

        let on_side = |side: i32, s: f32| {
            let t = s - side as f32 * size;
            match side {
                0 => Point::new(origin.x + t, origin.y),
                1 => Point::new(origin.x + size, origin.y + t),
                2 => Point::new(origin.x + size - t, origin.y + size),
                _ => Point::new(origin.x, origin.y + size - t),
            }
        };

        let perimeter = 4.0 * size;
        let mut segments = Vec::new();
        let mut s = -(dash_offset.rem_euclid(period));
        while s < perimeter {
            let (a, b) = (s.max(0.0), (s + dash).min(perimeter));
            let mut start = a;
            let mut side = ((start / size).floor() as i32).clamp(0, 3);
            // dashes crossing a corner become one segment per side
            while start < b && side < 4 {
                let end = ((side + 1) as f32 * size).min(b);
                if end > start {
                    segments.push((on_side(side, start), on_side(side, end)));
                    start = end;
                }
                side += 1;
            }
            s += period;
        }
        segments
    }

    /// Closed polyline approximating a `Circle`
    pub fn circle_points(&self, steps: usize) -> Vec<Point> {
        let Shape::Circle { center, radius, .. } = *self else {
            return Vec::new();
        };
        (0..steps)
            .map(|i| {
                let angle = i as f32 / steps as f32 * std::f32::consts::TAU;
                Point::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
            })
            .collect()
    }
}

/// Both layers of one overlay frame
#[derive(Clone, Default, PartialEq, Debug)]
pub struct OverlayLayers {
    pub fill: Vec<Shape>,
    pub outline: Vec<Shape>,
}

/// Owns the current overlay layers; every `render` replaces them wholesale.
#[derive(Default, Debug)]
pub struct OverlayRenderer {
    layers: OverlayLayers,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(
        &mut self,
        index: &AttackerIndex,
        settings: &OverlaySettings,
        board: &BoardSnapshot,
        exclude: Option<Square>,
    ) {
        self.layers = build_layers(index, settings, board, exclude);
    }

    pub fn fill_layer(&self) -> &[Shape] {
        &self.layers.fill
    }

    pub fn outline_layer(&self) -> &[Shape] {
        &self.layers.outline
    }

    #[cfg(test)]
    pub fn layers(&self) -> &OverlayLayers {
        &self.layers
    }
}

/// Build both layers from scratch.
pub fn build_layers(
    index: &AttackerIndex,
    settings: &OverlaySettings,
    board: &BoardSnapshot,
    exclude: Option<Square>,
) -> OverlayLayers {
    let mut layers = OverlayLayers {
        fill: fill_pass(index),
        outline: Vec::new(),
    };
    match settings.style {
        OverlayStyle::Squares => squares_pass(index, settings.side, &mut layers.outline),
        OverlayStyle::Arrows => arrows_pass(board, settings.side, exclude, &mut layers.outline),
    }
    layers
}

fn fill_pass(index: &AttackerIndex) -> Vec<Shape> {
    let mut shapes = Vec::new();
    for (sq, attackers) in index.iter() {
        let origin = square_origin(sq);
        if attackers.is_contested() {
            shapes.extend(hatch(origin));
        } else {
            let color = if attackers.white.is_empty() {
                BLACK_CONTROL
            } else {
                WHITE_CONTROL
            };
            shapes.push(Shape::Rect {
                origin,
                size: 1.0,
                color,
            });
        }
    }
    shapes
}

/// Diagonal bands alternating the two control tints, clipped to the square
fn hatch(origin: Point) -> Vec<Shape> {
    let square = [
        Point::new(0.0, 0.0),
        Point::new(1.0, 0.0),
        Point::new(1.0, 1.0),
        Point::new(0.0, 1.0),
    ];
    let band = 2.0 / HATCH_BANDS as f32;
    (0..HATCH_BANDS)
        .filter_map(|i| {
            let (lo, hi) = (i as f32 * band, (i + 1) as f32 * band);
            let clipped = clip_half_plane(&square, |p| p.x + p.y - lo);
            let clipped = clip_half_plane(&clipped, |p| hi - (p.x + p.y));
            if clipped.len() < 3 {
                return None;
            }
            let color = if i % 2 == 0 { WHITE_CONTROL } else { BLACK_CONTROL };
            Some(Shape::Polygon {
                points: clipped
                    .into_iter()
                    .map(|p| Point::new(origin.x + p.x, origin.y + p.y))
                    .collect(),
                color,
            })
        })
        .collect()
}

/// Keep the part of a convex polygon where `f >= 0`
fn clip_half_plane(polygon: &[Point], f: impl Fn(Point) -> f32) -> Vec<Point> {
    let mut out = Vec::new();
    for (i, &cur) in polygon.iter().enumerate() {
        let next = polygon[(i + 1) % polygon.len()];
        let (fc, fnext) = (f(cur), f(next));
        if fc >= 0.0 {
            out.push(cur);
        }
        if (fc >= 0.0) != (fnext >= 0.0) {
            out.push(cur.lerp(next, fc / (fc - fnext)));
        }
    }
    out
}

fn squares_pass(index: &AttackerIndex, side: SideFilter, out: &mut Vec<Shape>) {
    for (sq, attackers) in index.iter() {
        let origin = square_origin(sq);
        let combos = [PieceColor::White, PieceColor::Black]
            .into_iter()
            .filter(|c| side.includes(*c))
            .flat_map(move |c| attackers.side(c).kinds().map(move |k| (c, k)));

        for (ring, (color, kind)) in combos.enumerate() {
            let inset = RING_START + ring as f32 * RING_STEP;
            out.push(Shape::DashedRect {
                origin: Point::new(origin.x + inset, origin.y + inset),
                size: 1.0 - 2.0 * inset,
                color: outline_color(color, kind, side),
                width: OUTLINE_WIDTH,
                dash: DASH_LENGTH,
                gap: DASH_GAP,
                dash_offset: if ring % 2 == 0 { 0.0 } else { DASH_LENGTH },
            });
        }

        // counts are per side totals, independent of the side filter
        if attackers.is_contested() {
            out.push(Shape::Badge {
                center: Point::new(origin.x + BADGE_INSET, origin.y + BADGE_INSET),
                radius: BADGE_RADIUS,
                count: attackers.white.total(),
                fill: OverlayColor::new(0xffffff, 0.95),
                text: OverlayColor::new(0x111111, 1.0),
            });
            out.push(Shape::Badge {
                center: Point::new(origin.x + 1.0 - BADGE_INSET, origin.y + 1.0 - BADGE_INSET),
                radius: BADGE_RADIUS,
                count: attackers.black.total(),
                fill: OverlayColor::new(0x111111, 0.95),
                text: OverlayColor::new(0xffffff, 1.0),
            });
        }
    }
}

fn arrows_pass(board: &BoardSnapshot, side: SideFilter, exclude: Option<Square>, out: &mut Vec<Shape>) {
    for (from, piece) in board.pieces() {
        if Some(from) == exclude || !side.includes(piece.color) {
            continue;
        }
        let color = outline_color(piece.color, piece.kind, side);
        let center = square_center(from);
        match piece.kind {
            PieceKind::Knight => {
                for target in attacks_of(piece.kind, piece.color, from, board) {
                    out.push(Shape::Circle {
                        center: square_center(target),
                        radius: KNIGHT_MARK_RADIUS,
                        color,
                        width: MARK_WIDTH,
                    });
                }
            }
            PieceKind::King => {
                for target in attacks_of(piece.kind, piece.color, from, board) {
                    let c = square_center(target);
                    out.push(Shape::Outline {
                        origin: Point::new(c.x - KING_MARK_SIZE / 2.0, c.y - KING_MARK_SIZE / 2.0),
                        size: KING_MARK_SIZE,
                        color,
                        width: MARK_WIDTH,
                    });
                }
            }
            PieceKind::Pawn => {
                for target in attacks_of(piece.kind, piece.color, from, board) {
                    out.push(arrow(center, square_center(target), color));
                }
            }
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                for end in ray_endpoints_of(piece.kind, piece.color, from, board) {
                    out.push(arrow(center, square_center(end), color));
                }
            }
        }
    }
}

/// Arrow from near the piece center to `tip`, head included
fn arrow(center: Point, tip: Point, color: OverlayColor) -> Shape {
    let (dx, dy) = (tip.x - center.x, tip.y - center.y);
    let len = (dx * dx + dy * dy).sqrt().max(f32::EPSILON);
    let (ux, uy) = (dx / len, dy / len);
    let start = Point::new(center.x + ux * ARROW_START_OFFSET, center.y + uy * ARROW_START_OFFSET);
    let base = Point::new(tip.x - ux * ARROW_HEAD_LENGTH, tip.y - uy * ARROW_HEAD_LENGTH);
    let (px, py) = (-uy * ARROW_HEAD_HALF_WIDTH, ux * ARROW_HEAD_HALF_WIDTH);
    Shape::Arrow {
        from: start,
        to: base,
        head: [
            tip,
            Point::new(base.x + px, base.y + py),
            Point::new(base.x - px, base.y - py),
        ],
        color,
        width: ARROW_WIDTH,
    }
}
