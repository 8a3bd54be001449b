use image::imageops::FilterType;

use crate::animation::clip::SpriteFrame;
use crate::foundation::core::GoalBox;
use crate::foundation::math::blend_channel;
use crate::render::frame::VideoFrame;

/// What happened when a sprite was composited onto a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompositeOutcome {
    /// The sprite was blended over the given frame rectangle.
    Applied {
        /// Left edge of the blended rectangle.
        x: u32,
        /// Top edge of the blended rectangle.
        y: u32,
        /// Blended width after clipping.
        width: u32,
        /// Blended height after clipping.
        height: u32,
    },
    /// Clipping to the frame left nothing to draw.
    OutOfBounds,
    /// The sprite has no alpha channel; nothing was drawn.
    MissingAlpha,
    /// The sprite scales to zero width or height.
    Degenerate,
}

impl CompositeOutcome {
    /// Whether any pixel was touched.
    pub fn is_applied(self) -> bool {
        matches!(self, CompositeOutcome::Applied { .. })
    }
}

/// Where a sprite lands relative to the goal, before clipping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpritePlacement {
    /// Left edge; may be negative.
    pub x: i64,
    /// Top edge; may be negative.
    pub y: i64,
    /// Scaled sprite width.
    pub width: u32,
    /// Scaled sprite height.
    pub height: u32,
}

/// Scale a `sprite_w x sprite_h` sprite to the goal width and anchor it on the goal bottom.
///
/// Only the width is fitted; height follows the same factor, so sprites whose aspect differs from
/// the box's keep their own proportions rather than filling the box.
pub fn place_sprite(
    goal: GoalBox,
    sprite_w: u32,
    sprite_h: u32,
    y_offset_fraction: f64,
) -> Option<SpritePlacement> {
    if sprite_w == 0 || sprite_h == 0 {
        return None;
    }
    let width = goal.width();
    let height = (u64::from(sprite_h) * u64::from(width) / u64::from(sprite_w)) as u32;
    if width == 0 || height == 0 {
        return None;
    }

    let x = i64::from(goal.center_x()) - i64::from(width / 2);
    let y_offset = (f64::from(height) * y_offset_fraction).floor() as i64;
    let y = i64::from(goal.y2) - i64::from(height) + y_offset;

    Some(SpritePlacement {
        x,
        y,
        width,
        height,
    })
}

/// Blend `sprite` onto `frame`, scaled to and anchored on `goal`.
///
/// `out = (1 - a) * bg + a * sprite` per color channel. The frame keeps its dimensions; sprite
/// parts falling outside the frame are cropped.
pub fn composite_sprite(
    frame: &mut VideoFrame,
    goal: GoalBox,
    sprite: &SpriteFrame,
    y_offset_fraction: f64,
) -> CompositeOutcome {
    if !sprite.has_alpha() {
        tracing::warn!(
            width = sprite.width(),
            height = sprite.height(),
            "sprite has no alpha channel; skipping overlay"
        );
        return CompositeOutcome::MissingAlpha;
    }

    let Some(place) = place_sprite(goal, sprite.width(), sprite.height(), y_offset_fraction)
    else {
        return CompositeOutcome::Degenerate;
    };

    // Visible window in frame coordinates.
    let dst_x0 = place.x.max(0);
    let dst_y0 = place.y.max(0);
    let dst_x1 = (place.x + i64::from(place.width)).min(i64::from(frame.width));
    let dst_y1 = (place.y + i64::from(place.height)).min(i64::from(frame.height));
    if dst_x1 <= dst_x0 || dst_y1 <= dst_y0 {
        tracing::trace!(?place, "sprite clipped away entirely");
        return CompositeOutcome::OutOfBounds;
    }

    let scaled = image::imageops::resize(
        sprite.pixels(),
        place.width,
        place.height,
        FilterType::Triangle,
    );

    let src_x0 = (dst_x0 - place.x) as u32;
    let src_y0 = (dst_y0 - place.y) as u32;
    let (dst_x0, dst_y0) = (dst_x0 as u32, dst_y0 as u32);
    let (w, h) = ((dst_x1 as u32) - dst_x0, (dst_y1 as u32) - dst_y0);

    for row in 0..h {
        for col in 0..w {
            let s = scaled.get_pixel(src_x0 + col, src_y0 + row).0;
            let a = s[3];
            if a == 0 {
                continue;
            }
            let i = frame.offset(dst_x0 + col, dst_y0 + row);
            for c in 0..3 {
                frame.data[i + c] = blend_channel(frame.data[i + c], s[c], a);
            }
        }
    }

    CompositeOutcome::Applied {
        x: dst_x0,
        y: dst_y0,
        width: w,
        height: h,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/composite.rs"]
mod tests;
