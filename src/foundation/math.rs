pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Straight-alpha blend of one 8-bit channel: `(1-a)*dst + a*src` with `a = alpha/255`.
///
/// `alpha == 0` returns `dst` and `alpha == 255` returns `src` exactly.
pub(crate) fn blend_channel(dst: u8, src: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    let inv = 255 - a;
    (((u32::from(dst) * inv) + (u32::from(src) * a) + 127) / 255) as u8
}

/// Premultiplied source over an opaque destination channel: `src + dst*(1-a)`.
pub(crate) fn over_premul_channel(dst: u8, src_premul: u8, alpha: u8) -> u8 {
    let inv = 255u16 - u16::from(alpha);
    (u16::from(src_premul) + mul_div255_u16(u16::from(dst), inv)).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
