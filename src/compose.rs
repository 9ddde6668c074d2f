//! Integer pixel math for the snapshot compositor. All blending happens in
//! premultiplied alpha; buffers convert at the boundaries.

pub type PremulRgba8 = [u8; 4];

pub fn premultiply(rgba: [u8; 4]) -> PremulRgba8 {
    let a = u16::from(rgba[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    [
        mul_div255(u16::from(rgba[0]), a),
        mul_div255(u16::from(rgba[1]), a),
        mul_div255(u16::from(rgba[2]), a),
        rgba[3],
    ]
}

pub fn unpremultiply(premul: PremulRgba8) -> [u8; 4] {
    let a = u16::from(premul[3]);
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let unscale = |c: u8| -> u8 {
        let c = u32::from(c);
        let a = u32::from(a);
        ((c * 255 + a / 2) / a).min(255) as u8
    };
    [
        unscale(premul[0]),
        unscale(premul[1]),
        unscale(premul[2]),
        premul[3],
    ]
}

/// Source-over in premultiplied space with an extra scalar opacity on src.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

fn add_sat_u8(a: u8, b: u8) -> u8 {
    a.saturating_add(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_opacity_0_is_noop() {
        let dst = [1, 2, 3, 4];
        let src = [200, 200, 200, 200];
        assert_eq!(over(dst, src, 0.0), dst);
    }

    #[test]
    fn over_src_alpha_0_is_noop() {
        let dst = [10, 20, 30, 40];
        let src = [255, 255, 255, 0];
        assert_eq!(over(dst, src, 1.0), dst);
    }

    #[test]
    fn over_src_opaque_replaces_dst() {
        let dst = [0, 0, 0, 255];
        let src = [255, 0, 0, 255];
        assert_eq!(over(dst, src, 1.0), src);
    }

    #[test]
    fn over_dst_transparent_returns_scaled_src() {
        let dst = [0, 0, 0, 0];
        let src = [100, 110, 120, 200];
        assert_eq!(over(dst, src, 1.0), src);
    }

    #[test]
    fn half_opacity_over_black_halves_channels() {
        let dst = [0, 0, 0, 255];
        let src = [255, 0, 0, 255];
        let out = over(dst, src, 0.5);
        assert_eq!(out[3], 255);
        assert!((i32::from(out[0]) - 128).abs() <= 1);
        assert_eq!(out[1], 0);
    }

    #[test]
    fn premultiply_roundtrips_for_opaque_and_zero() {
        assert_eq!(unpremultiply(premultiply([12, 34, 56, 255])), [12, 34, 56, 255]);
        assert_eq!(premultiply([99, 99, 99, 0]), [0, 0, 0, 0]);
        let half = premultiply([200, 100, 40, 128]);
        let back = unpremultiply(half);
        assert!((i32::from(back[0]) - 200).abs() <= 1);
        assert!((i32::from(back[1]) - 100).abs() <= 1);
        assert!((i32::from(back[2]) - 40).abs() <= 1);
        assert_eq!(back[3], 128);
    }
}
