//! Pixel primitives for the paint surface. All writes are clipped to the
//! buffer; coordinates may be negative or past the edges.

use std::collections::VecDeque;

use image::{Rgba, RgbaImage};

fn set_pixel_safe(img: &mut RgbaImage, x: i32, y: i32, color: Rgba<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Stamps a filled disc. `thickness` is the stroke diameter; 1 paints a
/// single pixel.
pub fn stamp_disc(img: &mut RgbaImage, cx: i32, cy: i32, thickness: u32, color: Rgba<u8>) {
    let radius = thickness as i32 / 2;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy <= radius * radius {
                set_pixel_safe(img, cx + dx, cy + dy, color);
            }
        }
    }
}

/// Bresenham line, stamped with the stroke thickness at every step.
pub fn draw_line(
    img: &mut RgbaImage,
    from: (i32, i32),
    to: (i32, i32),
    thickness: u32,
    color: Rgba<u8>,
) {
    let (x0, y0) = from;
    let (x1, y1) = to;
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);

    loop {
        stamp_disc(img, x, y, thickness, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Rectangle outline between two opposite corners, any corner order.
pub fn draw_rect_outline(
    img: &mut RgbaImage,
    a: (i32, i32),
    b: (i32, i32),
    thickness: u32,
    color: Rgba<u8>,
) {
    let (x0, x1) = (a.0.min(b.0), a.0.max(b.0));
    let (y0, y1) = (a.1.min(b.1), a.1.max(b.1));
    draw_line(img, (x0, y0), (x1, y0), thickness, color);
    draw_line(img, (x1, y0), (x1, y1), thickness, color);
    draw_line(img, (x1, y1), (x0, y1), thickness, color);
    draw_line(img, (x0, y1), (x0, y0), thickness, color);
}

/// Circle outline by ring membership: inside the outer radius, outside the
/// inner one. Avoids dither artifacts from stepping the circumference.
pub fn draw_circle_outline(
    img: &mut RgbaImage,
    center: (i32, i32),
    radius: u32,
    thickness: u32,
    color: Rgba<u8>,
) {
    let half = f64::from(thickness) / 2.0;
    let outer = f64::from(radius) + half;
    let inner = (f64::from(radius) - half).max(0.0);
    let (outer2, inner2) = (outer * outer, inner * inner);
    let reach = outer.ceil() as i32;

    for dy in -reach..=reach {
        for dx in -reach..=reach {
            let d2 = f64::from(dx * dx + dy * dy);
            if d2 <= outer2 && d2 >= inner2 {
                set_pixel_safe(img, center.0 + dx, center.1 + dy, color);
            }
        }
    }
}

/// Breadth-first flood fill: 4-connected, exact RGBA equality, bounded by the
/// buffer. Seeding outside the buffer or on the fill color is a no-op.
pub fn flood_fill(img: &mut RgbaImage, seed: (i32, i32), fill: Rgba<u8>) {
    let (sx, sy) = seed;
    if sx < 0 || sy < 0 || (sx as u32) >= img.width() || (sy as u32) >= img.height() {
        return;
    }
    let (sx, sy) = (sx as u32, sy as u32);
    let target = *img.get_pixel(sx, sy);
    if target == fill {
        return;
    }

    let (w, h) = img.dimensions();
    let mut queue = VecDeque::new();
    queue.push_back((sx, sy));

    while let Some((x, y)) = queue.pop_front() {
        if *img.get_pixel(x, y) != target {
            continue;
        }
        img.put_pixel(x, y, fill);

        if x > 0 && *img.get_pixel(x - 1, y) == target {
            queue.push_back((x - 1, y));
        }
        if x + 1 < w && *img.get_pixel(x + 1, y) == target {
            queue.push_back((x + 1, y));
        }
        if y > 0 && *img.get_pixel(x, y - 1) == target {
            queue.push_back((x, y - 1));
        }
        if y + 1 < h && *img.get_pixel(x, y + 1) == target {
            queue.push_back((x, y + 1));
        }
    }
}

/// One-pixel border along the buffer edges.
pub fn stroke_border(img: &mut RgbaImage, color: Rgba<u8>) {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return;
    }
    for x in 0..w {
        img.put_pixel(x, 0, color);
        img.put_pixel(x, h - 1, color);
    }
    for y in 0..h {
        img.put_pixel(0, y, color);
        img.put_pixel(w - 1, y, color);
    }
}
