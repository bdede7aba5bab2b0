//! Procedural surface textures for the solar system bodies.
//!
//! Everything is synthesized at startup from the scene RNG; no image
//! assets exist anywhere in the program.

use crate::util::{Rgb, Rng};

/// An RGBA texture sampled with wrapping UV coordinates
#[derive(Clone)]
pub struct Texture {
    width: u32,
    height: u32,
    pixels: Vec<u8>, // RGBA, 4 bytes per pixel
}

impl Texture {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn idx(&self, x: u32, y: u32) -> usize {
        ((y % self.height) * self.width + (x % self.width)) as usize * 4
    }

    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8, a: u8) {
        if x < self.width && y < self.height {
            let i = self.idx(x, y);
            self.pixels[i] = r;
            self.pixels[i + 1] = g;
            self.pixels[i + 2] = b;
            self.pixels[i + 3] = a;
        }
    }

    /// Alpha-blend a color over an existing texel
    fn blend_pixel(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let i = self.idx(x as u32, y as u32);
        let (r, g, b) = color.to_bytes();
        let a = alpha.clamp(0.0, 1.0);
        let inv = 1.0 - a;
        self.pixels[i] = (self.pixels[i] as f32 * inv + r as f32 * a) as u8;
        self.pixels[i + 1] = (self.pixels[i + 1] as f32 * inv + g as f32 * a) as u8;
        self.pixels[i + 2] = (self.pixels[i + 2] as f32 * inv + b as f32 * a) as u8;
    }

    /// Sample with wrapping UV in [0, 1); returns RGB
    #[inline]
    pub fn sample(&self, u: f32, v: f32) -> (u8, u8, u8) {
        let (r, g, b, _) = self.sample_rgba(u, v);
        (r, g, b)
    }

    /// Sample with wrapping UV in [0, 1); returns RGBA
    #[inline]
    pub fn sample_rgba(&self, u: f32, v: f32) -> (u8, u8, u8, u8) {
        let u = u.rem_euclid(1.0);
        let v = v.rem_euclid(1.0);
        let x = (u * self.width as f32) as u32 % self.width;
        let y = (v * self.height as f32) as u32 % self.height;
        let i = self.idx(x, y);
        (
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        )
    }

    fn fill(&mut self, color: Rgb) {
        let (r, g, b) = color.to_bytes();
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk[0] = r;
            chunk[1] = g;
            chunk[2] = b;
            chunk[3] = 255;
        }
    }

    /// Blend a rotated filled ellipse into the texture
    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, rot: f32, color: Rgb, alpha: f32) {
        let extent = rx.max(ry);
        let (sin, cos) = rot.sin_cos();
        let x0 = (cx - extent).floor() as i32;
        let x1 = (cx + extent).ceil() as i32;
        let y0 = (cy - extent).floor() as i32;
        let y1 = (cy + extent).ceil() as i32;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                // Inverse-rotate into ellipse space
                let ex = dx * cos + dy * sin;
                let ey = -dx * sin + dy * cos;
                if (ex / rx).powi(2) + (ey / ry).powi(2) <= 1.0 {
                    self.blend_pixel(px, py, color, alpha);
                }
            }
        }
    }
}

// ============================================================================
// Procedural surface generators
// ============================================================================

impl Texture {
    /// Ocean-and-continents surface: vertical ocean gradient, scattered
    /// landmass ellipses, streaky cloud highlights
    pub fn continental(size: u32, rng: &mut Rng) -> Self {
        let mut tex = Self::new(size, size);

        // Ocean gradient with a green equatorial band
        let stops = [
            (0.0, Rgb::from_hex("#1a4a8a").expect("stop")),
            (0.3, Rgb::from_hex("#2a6ab0").expect("stop")),
            (0.5, Rgb::from_hex("#1d8c4a").expect("stop")),
            (0.7, Rgb::from_hex("#3a9a5a").expect("stop")),
            (1.0, Rgb::from_hex("#1a4a8a").expect("stop")),
        ];
        for y in 0..size {
            let t = y as f32 / size as f32;
            let color = gradient_sample(&stops, t);
            let (r, g, b) = color.to_bytes();
            for x in 0..size {
                tex.set_pixel(x, y, r, g, b, 255);
            }
        }

        // Continents
        let land = Rgb::from_hex("#2a7a4a").expect("land color");
        for _ in 0..8 {
            let cx = rng.next_f32() * size as f32;
            let cy = rng.next_f32() * size as f32;
            let rx = 20.0 + rng.next_f32() * 30.0;
            let ry = 10.0 + rng.next_f32() * 20.0;
            let rot = rng.next_f32() * std::f32::consts::PI;
            tex.fill_ellipse(cx, cy, rx, ry, rot, land, 1.0);
        }

        // Cloud streaks
        for _ in 0..6 {
            let cx = rng.next_f32() * size as f32;
            let cy = rng.next_f32() * size as f32;
            let rx = 15.0 + rng.next_f32() * 25.0;
            let ry = 5.0 + rng.next_f32() * 10.0;
            let rot = rng.next_f32() * std::f32::consts::PI;
            tex.fill_ellipse(cx, cy, rx, ry, rot, Rgb::WHITE, 0.25);
        }

        tex
    }

    /// Gas-giant surface: sinusoidal latitude bands between two colors
    /// plus faint wind-blown flecks
    pub fn banded(size: u32, color_a: Rgb, color_b: Rgb, rng: &mut Rng) -> Self {
        let mut tex = Self::new(size, size);

        for y in 0..size {
            let band = (y as f32 * 0.2).sin() * 0.5 + 0.5;
            let color = color_b.lerp(color_a, band);
            let (r, g, b) = color.to_bytes();
            for x in 0..size {
                tex.set_pixel(x, y, r, g, b, 255);
            }
        }

        for _ in 0..500 {
            let x = (rng.next_f32() * size as f32) as i32;
            let y = (rng.next_f32() * size as f32) as i32;
            let w = 2 + (rng.next_f32() * 8.0) as i32;
            let alpha = rng.next_f32() * 0.08;
            for dx in 0..w {
                tex.blend_pixel(x + dx, y, Rgb::WHITE, alpha);
            }
        }

        tex
    }

    /// Rocky surface: base color, crater gradients, light/dark patches
    pub fn rocky(size: u32, base: Rgb, rng: &mut Rng) -> Self {
        let mut tex = Self::new(size, size);
        tex.fill(base);

        // Craters: dark center fading to a faint bright rim
        for _ in 0..60 {
            let cx = rng.next_f32() * size as f32;
            let cy = rng.next_f32() * size as f32;
            let radius = 3.0 + rng.next_f32() * 12.0;
            let x0 = (cx - radius) as i32;
            let x1 = (cx + radius) as i32;
            let y0 = (cy - radius) as i32;
            let y1 = (cy + radius) as i32;
            for py in y0..=y1 {
                for px in x0..=x1 {
                    let dx = px as f32 + 0.5 - cx;
                    let dy = py as f32 + 0.5 - cy;
                    let d = (dx * dx + dy * dy).sqrt() / radius;
                    if d <= 1.0 {
                        if d < 0.5 {
                            let a = 0.5 - d * 0.6;
                            tex.blend_pixel(px, py, Rgb::new(0.0, 0.0, 0.0), a);
                        } else {
                            let a = (d - 0.5) * 0.1;
                            tex.blend_pixel(px, py, Rgb::WHITE, a);
                        }
                    }
                }
            }
        }

        // Patchy albedo variation
        for _ in 0..200 {
            let x = (rng.next_f32() * size as f32) as i32;
            let y = (rng.next_f32() * size as f32) as i32;
            let w = 4 + (rng.next_f32() * 12.0) as i32;
            let h = 4 + (rng.next_f32() * 12.0) as i32;
            let bright = rng.next_f32() > 0.5;
            let color = if bright {
                Rgb::WHITE
            } else {
                Rgb::new(0.0, 0.0, 0.0)
            };
            for py in y..y + h {
                for px in x..x + w {
                    tex.blend_pixel(px, py, color, 0.15);
                }
            }
        }

        tex
    }

    /// Saturn's ring: a 1-pixel-tall radial alpha gradient, sampled by
    /// normalized distance across the ring span
    pub fn ring_gradient(width: u32) -> Self {
        let mut tex = Self::new(width, 1);
        let stops: [(f32, Rgb, f32); 6] = [
            (0.0, Rgb::new(0.77, 0.63, 0.39), 0.0),
            (0.15, Rgb::new(0.77, 0.63, 0.39), 0.7),
            (0.4, Rgb::new(0.86, 0.78, 0.55), 0.5),
            (0.6, Rgb::new(0.77, 0.59, 0.31), 0.6),
            (0.8, Rgb::new(0.71, 0.55, 0.27), 0.4),
            (1.0, Rgb::new(0.71, 0.55, 0.27), 0.0),
        ];
        for x in 0..width {
            let t = x as f32 / (width - 1).max(1) as f32;
            let (color, alpha) = gradient_sample_alpha(&stops, t);
            let (r, g, b) = color.to_bytes();
            tex.set_pixel(x, 0, r, g, b, (alpha * 255.0) as u8);
        }
        tex
    }
}

fn gradient_sample(stops: &[(f32, Rgb)], t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    for pair in stops.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            return c0.lerp(c1, f.clamp(0.0, 1.0));
        }
    }
    stops.last().map(|&(_, c)| c).unwrap_or(Rgb::WHITE)
}

fn gradient_sample_alpha(stops: &[(f32, Rgb, f32)], t: f32) -> (Rgb, f32) {
    let t = t.clamp(0.0, 1.0);
    for pair in stops.windows(2) {
        let (t0, c0, a0) = pair[0];
        let (t1, c1, a1) = pair[1];
        if t <= t1 {
            let f = if t1 > t0 { (t - t0) / (t1 - t0) } else { 0.0 };
            let f = f.clamp(0.0, 1.0);
            return (c0.lerp(c1, f), a0 + (a1 - a0) * f);
        }
    }
    stops
        .last()
        .map(|&(_, c, a)| (c, a))
        .unwrap_or((Rgb::WHITE, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textures_have_requested_dimensions() {
        let mut rng = Rng::new(8);
        let tex = Texture::continental(256, &mut rng);
        assert_eq!((tex.width(), tex.height()), (256, 256));
        let ring = Texture::ring_gradient(256);
        assert_eq!((ring.width(), ring.height()), (256, 1));
    }

    #[test]
    fn ring_alpha_vanishes_at_both_edges() {
        let ring = Texture::ring_gradient(256);
        assert_eq!(ring.sample_rgba(0.0, 0.0).3, 0);
        assert_eq!(ring.sample_rgba(0.999, 0.0).3, 0);
        // And peaks somewhere inside
        let (_, _, _, mid) = ring.sample_rgba(0.15, 0.0);
        assert!(mid > 150);
    }

    #[test]
    fn banded_surface_varies_by_row_not_column() {
        let mut rng = Rng::new(8);
        let a = Rgb::from_hex("#c88b3a").unwrap();
        let b = Rgb::from_hex("#a0622a").unwrap();
        let tex = Texture::banded(64, a, b, &mut rng);
        // Two rows a quarter-band apart differ
        let r0 = tex.sample(0.1, 0.0);
        let r8 = tex.sample(0.1, 8.0 / 64.0);
        assert_ne!(r0, r8);
    }

    #[test]
    fn rocky_surface_keeps_craters_local() {
        let mut rng = Rng::new(8);
        let base = Rgb::from_hex("#8a7a6a").unwrap();
        let tex = Texture::rocky(128, base, &mut rng);
        // Some texels darkened, none fully black or white across the board
        let mut darker = 0;
        for y in 0..128 {
            for x in 0..128 {
                let (r, _, _) = tex.sample(x as f32 / 128.0, y as f32 / 128.0);
                if r < base.to_bytes().0 {
                    darker += 1;
                }
            }
        }
        assert!(darker > 0);
        assert!(darker < 128 * 128);
    }

    #[test]
    fn sampling_wraps_uv() {
        let mut rng = Rng::new(8);
        let tex = Texture::banded(64, Rgb::WHITE, Rgb::new(0.0, 0.0, 0.0), &mut rng);
        assert_eq!(tex.sample(0.25, 0.5), tex.sample(1.25, -0.5));
    }
}
