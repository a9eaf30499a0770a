//! Overlay painting: scales unit-grid shapes to pixels and paints them on a canvas.

use gpui::{
    Bounds, Div, Hsla, PathBuilder, Pixels, Point as PxPoint, SharedString, Window, canvas, div,
    fill, point, prelude::*, px, size,
};

use crate::domain::Shape;
use crate::domain::overlay::Point;
use crate::ui::theme::{overlay_hsla, overlay_rgba};

const CIRCLE_STEPS: usize = 32;

/// One overlay layer as an absolutely positioned canvas covering the board.
/// Badges are skipped here; they carry text and go through `render_badges`.
pub fn render_overlay_layer(shapes: Vec<Shape>, square_size: f32) -> impl IntoElement {
    canvas(
        |_, _, _| {},
        move |bounds, _, window, _| {
            for shape in &shapes {
                paint_shape(shape, bounds.origin, square_size, window);
            }
        },
    )
    .absolute()
    .top_0()
    .left_0()
    .size_full()
}

/// Count badges of a layer as positioned text elements
pub fn render_badges(shapes: &[Shape], square_size: f32) -> Vec<Div> {
    shapes
        .iter()
        .filter_map(|shape| match *shape {
            Shape::Badge {
                center,
                radius,
                count,
                fill: badge_fill,
                text,
            } => {
                let diameter = radius * 2.0 * square_size;
                Some(
                    div()
                        .absolute()
                        .left(px((center.x - radius) * square_size))
                        .top(px((center.y - radius) * square_size))
                        .size(px(diameter))
                        .rounded_full()
                        .bg(overlay_rgba(badge_fill))
                        .flex()
                        .items_center()
                        .justify_center()
                        .text_size(px(diameter * 0.7))
                        .line_height(px(diameter))
                        .text_color(overlay_rgba(text))
                        .child(SharedString::from(count.to_string())),
                )
            }
            _ => None,
        })
        .collect()
}

fn to_px(origin: PxPoint<Pixels>, p: Point, scale: f32) -> PxPoint<Pixels> {
    point(origin.x + px(p.x * scale), origin.y + px(p.y * scale))
}

fn paint_shape(shape: &Shape, origin: PxPoint<Pixels>, scale: f32, window: &mut Window) {
    let at = |p: Point| to_px(origin, p, scale);
    match shape {
        Shape::Rect {
            origin: corner,
            size: side,
            color,
        } => {
            let bounds = Bounds::new(at(*corner), size(px(side * scale), px(side * scale)));
            window.paint_quad(fill(bounds, overlay_hsla(*color)));
        }
        Shape::Polygon { points, color } => {
            let points: Vec<_> = points.iter().map(|p| at(*p)).collect();
            fill_polygon(window, &points, overlay_hsla(*color));
        }
        Shape::DashedRect { color, width, .. } => {
            let color = overlay_hsla(*color);
            for (a, b) in shape.dash_segments() {
                stroke(window, &[at(a), at(b)], false, px(width * scale), color);
            }
        }
        Shape::Outline {
            origin: corner,
            size: side,
            color,
            width,
        } => {
            let corners = [
                Point::new(corner.x, corner.y),
                Point::new(corner.x + side, corner.y),
                Point::new(corner.x + side, corner.y + side),
                Point::new(corner.x, corner.y + side),
            ]
            .map(at);
            stroke(window, &corners, true, px(width * scale), overlay_hsla(*color));
        }
        Shape::Circle { color, width, .. } => {
            let points: Vec<_> = shape.circle_points(CIRCLE_STEPS).into_iter().map(at).collect();
            stroke(window, &points, true, px(width * scale), overlay_hsla(*color));
        }
        Shape::Arrow {
            from,
            to,
            head,
            color,
            width,
        } => {
            let color = overlay_hsla(*color);
            stroke(window, &[at(*from), at(*to)], false, px(width * scale), color);
            fill_polygon(window, &(*head).map(at), color);
        }
        Shape::Badge { .. } => {}
    }
}

fn stroke(window: &mut Window, points: &[PxPoint<Pixels>], closed: bool, width: Pixels, color: Hsla) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    let mut builder = PathBuilder::stroke(width);
    builder.move_to(*first);
    for p in rest {
        builder.line_to(*p);
    }
    if closed {
        builder.close();
    }
    if let Ok(path) = builder.build() {
        window.paint_path(path, color);
    }
}

fn fill_polygon(window: &mut Window, points: &[PxPoint<Pixels>], color: Hsla) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    let mut builder = PathBuilder::fill();
    builder.move_to(*first);
    for p in rest {
        builder.line_to(*p);
    }
    builder.close();
    if let Ok(path) = builder.build() {
        window.paint_path(path, color);
    }
}
