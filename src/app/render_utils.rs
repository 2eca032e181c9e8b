use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, Vec2};

pub(super) const WANTED_COLOR: Color32 = Color32::from_rgb(120, 128, 140);
pub(super) const LINK_COLOR: Color32 = Color32::from_rgb(96, 112, 128);
pub(super) const MATCH_COLOR: Color32 = Color32::from_rgb(250, 205, 90);

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, pan: Vec2, zoom: f32) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let origin = rect.left_top() + pan;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (origin.x - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }

    let mut y = rect.top() + (origin.y - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

/// Tick transforms are in viewport space with the origin at the top left of
/// the canvas; pan and zoom apply on top.
pub(super) fn viewport_to_screen(rect: Rect, pan: Vec2, zoom: f32, translate: Vec2) -> Pos2 {
    rect.left_top() + pan + translate * zoom
}

pub(super) fn screen_to_viewport(rect: Rect, pan: Vec2, zoom: f32, screen: Pos2) -> Vec2 {
    (screen - rect.left_top() - pan) / zoom
}

/// Root warm, first ring teal, then cooling toward the rim.
pub(super) fn depth_color(depth: u32) -> Color32 {
    match depth {
        0 => Color32::from_rgb(236, 122, 84),
        1 => Color32::from_rgb(72, 182, 170),
        2 => Color32::from_rgb(90, 140, 215),
        _ => Color32::from_rgb(110, 115, 170),
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn viewport_round_trips_through_pan_and_zoom() {
        let rect = Rect::from_min_size(pos2(10.0, 20.0), vec2(800.0, 600.0));
        let pan = vec2(-35.0, 12.0);
        let translate = vec2(400.0, 300.0);

        let screen = viewport_to_screen(rect, pan, 2.0, translate);
        assert_eq!(screen, pos2(775.0, 632.0));
        assert_eq!(screen_to_viewport(rect, pan, 2.0, screen), translate);
    }

    #[test]
    fn circle_visibility_counts_radius() {
        let rect = Rect::from_min_size(Pos2::ZERO, vec2(100.0, 100.0));
        assert!(circle_visible(rect, pos2(-5.0, 50.0), 10.0));
        assert!(!circle_visible(rect, pos2(-15.0, 50.0), 10.0));
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend_color(Color32::BLACK, Color32::WHITE, 0.0), Color32::BLACK);
        assert_eq!(blend_color(Color32::BLACK, Color32::WHITE, 2.0), Color32::WHITE);
        assert_eq!(dim_color(Color32::WHITE, 1.0), Color32::WHITE);
    }
}
