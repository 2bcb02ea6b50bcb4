//! Software canvas over an RGBA image

use ember_core::{Color, EmberError, Result, Surface, Vec2, TWO_PI};
use image::{Rgba, RgbaImage};
use std::path::Path;

/// Sub-samples per pixel axis used for edge coverage
const SUPERSAMPLE: u32 = 2;

#[derive(Debug, Clone, Copy)]
struct PaintState {
    alpha: f32,
    color: Color,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            color: Color::BLACK,
        }
    }
}

/// A circular arc closed by its chord, as a canvas fills a single `arc`
#[derive(Debug, Clone, Copy)]
struct ArcShape {
    center: Vec2,
    radius: f32,
    /// Chord endpoints and the side the arc lies on; `None` for a full circle
    chord: Option<(Vec2, Vec2, f32)>,
}

impl ArcShape {
    fn new(center: Vec2, radius: f32, start: f32, end: f32) -> Self {
        let sweep = (end - start).abs();
        let chord = if sweep >= TWO_PI - 1e-4 {
            None
        } else {
            let point_at = |angle: f32| center + Vec2::new(angle.cos(), angle.sin()) * radius;
            let a = point_at(start);
            let b = point_at(end);
            let side = side_of(a, b, point_at((start + end) * 0.5));
            Some((a, b, side))
        };
        Self {
            center,
            radius,
            chord,
        }
    }

    fn covers(&self, p: Vec2) -> bool {
        let d = p - self.center;
        if d.x * d.x + d.y * d.y > self.radius * self.radius {
            return false;
        }
        match self.chord {
            None => true,
            Some((a, b, side)) => side_of(a, b, p) * side >= 0.0,
        }
    }

    /// Pixel-space bounding box `(x0, y0, x1, y1)`, exclusive end, clipped
    fn bounds(&self, width: u32, height: u32) -> Option<(u32, u32, u32, u32)> {
        let x0 = (self.center.x - self.radius).floor().max(0.0);
        let y0 = (self.center.y - self.radius).floor().max(0.0);
        let x1 = (self.center.x + self.radius).ceil().min(width as f32);
        let y1 = (self.center.y + self.radius).ceil().min(height as f32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
    }
}

/// Signed area test: which side of line `a -> b` the point `p` lies on
fn side_of(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Straight-alpha source-over blend of `color` at `alpha` onto `px`
fn blend(px: &mut Rgba<u8>, color: Color, alpha: f32) {
    let src_a = alpha.clamp(0.0, 1.0);
    if src_a <= 0.0 {
        return;
    }
    let dst_a = px.0[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);

    let src = [color.r, color.g, color.b];
    for (c, s) in src.iter().enumerate() {
        let d = px.0[c] as f32 / 255.0;
        let out = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        px.0[c] = (out.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    px.0[3] = (out_a.clamp(0.0, 1.0) * 255.0).round() as u8;
}

/// Software implementation of the canvas subset used by particle fields
pub struct RasterSurface {
    image: RgbaImage,
    state: PaintState,
    stack: Vec<PaintState>,
    path: Vec<ArcShape>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            state: PaintState::default(),
            stack: Vec::new(),
            path: Vec::new(),
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// The canvas composited over an opaque background
    pub fn flatten(&self, background: Color) -> RgbaImage {
        let bg = Rgba(background.with_alpha(1.0).to_rgba8());
        let mut out = RgbaImage::from_pixel(self.image.width(), self.image.height(), bg);
        for (dst, src) in out.pixels_mut().zip(self.image.pixels()) {
            let [r, g, b, a] = src.0;
            let color = Color::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0);
            blend(dst, color, a as f32 / 255.0);
        }
        out
    }

    /// Write the canvas as PNG, over `background` when given
    pub fn save_png(&self, path: impl AsRef<Path>, background: Option<Color>) -> Result<()> {
        let path = path.as_ref();
        let result = match background {
            Some(bg) => self.flatten(bg).save(path),
            None => self.image.save(path),
        };
        result.map_err(|e| EmberError::RenderError(format!("{}: {e}", path.display())))?;
        log::debug!(
            "[render] Wrote {}x{} PNG to {}",
            self.image.width(),
            self.image.height(),
            path.display()
        );
        Ok(())
    }
}

/// Canvases laid out left to right and top-aligned, like a page of
/// side-by-side canvases. Each is flattened over `background` when given.
pub fn compose_row(surfaces: &[&RasterSurface], background: Option<Color>) -> RgbaImage {
    let width = surfaces.iter().map(|s| s.image.width()).sum();
    let height = surfaces.iter().map(|s| s.image.height()).max().unwrap_or(0);
    let mut out = match background {
        Some(bg) => RgbaImage::from_pixel(width, height, Rgba(bg.with_alpha(1.0).to_rgba8())),
        None => RgbaImage::new(width, height),
    };

    let mut x = 0i64;
    for surface in surfaces {
        let tile = match background {
            Some(bg) => surface.flatten(bg),
            None => surface.image.clone(),
        };
        image::imageops::replace(&mut out, &tile, x, 0);
        x += surface.image.width() as i64;
    }
    out
}

/// Write [`compose_row`] of `surfaces` as one PNG
pub fn save_row_png(
    surfaces: &[&RasterSurface],
    path: impl AsRef<Path>,
    background: Option<Color>,
) -> Result<()> {
    let path = path.as_ref();
    let image = compose_row(surfaces, background);
    image
        .save(path)
        .map_err(|e| EmberError::RenderError(format!("{}: {e}", path.display())))?;
    log::debug!(
        "[render] Wrote {} canvas(es) as {}x{} PNG to {}",
        surfaces.len(),
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}

impl Surface for RasterSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn clear(&mut self) {
        for px in self.image.pixels_mut() {
            *px = Rgba([0, 0, 0, 0]);
        }
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        // Canvas ignores out-of-range alpha rather than clamping it
        if (0.0..=1.0).contains(&alpha) {
            self.state.alpha = alpha;
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.color = color;
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn arc(&mut self, center: Vec2, radius: f32, start_angle: f32, end_angle: f32) {
        if radius > 0.0 {
            self.path.push(ArcShape::new(center, radius, start_angle, end_angle));
        }
    }

    fn fill(&mut self) {
        let (width, height) = self.image.dimensions();
        let alpha = self.state.alpha * self.state.color.a;
        let color = self.state.color;
        let samples = (SUPERSAMPLE * SUPERSAMPLE) as f32;
        let step = 1.0 / SUPERSAMPLE as f32;

        for shape in &self.path {
            let Some((x0, y0, x1, y1)) = shape.bounds(width, height) else {
                continue;
            };
            for y in y0..y1 {
                for x in x0..x1 {
                    let mut hits = 0;
                    for sy in 0..SUPERSAMPLE {
                        for sx in 0..SUPERSAMPLE {
                            let p = Vec2::new(
                                x as f32 + (sx as f32 + 0.5) * step,
                                y as f32 + (sy as f32 + 0.5) * step,
                            );
                            if shape.covers(p) {
                                hits += 1;
                            }
                        }
                    }
                    if hits > 0 {
                        let coverage = hits as f32 / samples;
                        blend(self.image.get_pixel_mut(x, y), color, alpha * coverage);
                    }
                }
            }
        }
    }
}
