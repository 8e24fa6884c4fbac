//! Module implementing text layers: coverage masks of rendered text.

use std::fmt;

use image::{Pixel, RgbaImage};

use model::Color;
use super::Typeface;


/// Coverage mask of text rendered onto a canvas of particular size.
///
/// The layer holds no color. It's only given one when composited onto an image,
/// which allows the same layer to be painted onto every frame of an animation.
#[derive(Clone)]
pub struct TextLayer {
    width: u32,
    height: u32,
    coverage: Vec<f32>,
    /// Bounding box of non-zero coverage, as (min_x, min_y, max_x, max_y), inclusive.
    ink: Option<(u32, u32, u32, u32)>,
}

impl TextLayer {
    /// Create an empty layer for a canvas of given size.
    pub fn new(width: u32, height: u32) -> Self {
        TextLayer{
            width, height,
            coverage: vec![0.0; width as usize * height as usize],
            ink: None,
        }
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether nothing has been drawn on the layer.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ink.is_none()
    }

    /// Coverage of given pixel, between 0.0 and 1.0.
    #[inline]
    pub fn coverage(&self, x: u32, y: u32) -> f32 {
        if x < self.width && y < self.height {
            self.coverage[self.index(x, y)]
        } else {
            0.0
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    fn cover(&mut self, x: u32, y: u32, value: f32) {
        let value = value.max(0.0).min(1.0);
        if value <= 0.0 {
            return;
        }
        let i = self.index(x, y);
        if value > self.coverage[i] {
            self.coverage[i] = value;
        }
        self.ink = Some(match self.ink {
            None => (x, y, x, y),
            Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
        });
    }
}

impl TextLayer {
    /// Draw a line of text with its pen starting at given position on the baseline.
    /// Parts of the text outside of the canvas are clipped.
    pub fn draw_line<T: Typeface + ?Sized>(&mut self, face: &T, size: f32, text: &str,
                                           x: f32, baseline: f32) {
        let (ox, oy) = (x.round() as i32, baseline.round() as i32);
        trace!("Drawing {:?} at size {} from ({}, {})", text, size, ox, oy);

        let (width, height) = (self.width as i32, self.height as i32);
        face.rasterize(size, text, &mut |px, py, v| {
            let (x, y) = (ox + px, oy + py);
            if x >= 0 && y >= 0 && x < width && y < height {
                self.cover(x as u32, y as u32, v);
            }
        });
    }

    /// Create the outline of this layer's text, i.e. the text dilated by given radius.
    ///
    /// The edge of the outline is antialiased.
    pub fn outline(&self, radius: f32) -> TextLayer {
        let mut result = TextLayer::new(self.width, self.height);
        let (x0, y0, x1, y1) = match self.ink {
            Some(ink) if radius > 0.0 => ink,
            Some(_) => return self.clone(),
            None => return result,
        };

        // Past the diagonal, the outline already covers the whole layer.
        let diagonal = (self.width as f32).hypot(self.height as f32);
        let radius = radius.min(diagonal);
        let distances = self.ink_distances();

        let reach = (radius + 0.5).ceil() as u32;
        let (min_x, min_y) = (x0.saturating_sub(reach), y0.saturating_sub(reach));
        let max_x = x1.saturating_add(reach).min(self.width - 1);
        let max_y = y1.saturating_add(reach).min(self.height - 1);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let i = self.index(x, y);
                let dist = distances[i].sqrt() as f32;
                let weight = (radius + 0.5 - dist).max(0.0).min(1.0);
                result.cover(x, y, weight.max(self.coverage[i]));
            }
        }
        result
    }

    /// Squared distance from every pixel to the nearest one that's mostly covered.
    ///
    /// Computed separably, columns then rows, as the lower envelope of parabolas
    /// rooted at the covered pixels.
    fn ink_distances(&self) -> Vec<f64> {
        let (width, height) = (self.width as usize, self.height as usize);
        let mut grid: Vec<f64> = self.coverage.iter()
            .map(|&c| if c >= 0.5 { 0.0 } else { f64::INFINITY })
            .collect();

        let mut line = vec![0.0; height];
        let mut out = vec![0.0; height];
        for x in 0..width {
            for y in 0..height {
                line[y] = grid[y * width + x];
            }
            squared_distances(&line, &mut out);
            for y in 0..height {
                grid[y * width + x] = out[y];
            }
        }

        let mut out = vec![0.0; width];
        for y in 0..height {
            let row = &mut grid[y * width..(y + 1) * width];
            squared_distances(row, &mut out);
            row.copy_from_slice(&out);
        }
        grid
    }

    /// Paint the layer onto given image, with given color.
    pub fn composite(&self, target: &mut RgbaImage, color: Color) {
        let (x0, y0, x1, y1) = match self.ink {
            Some(ink) => ink,
            None => return,
        };
        let (width, height) = target.dimensions();
        if (width, height) != (self.width, self.height) {
            warn!("Compositing {}x{} text layer onto {}x{} image",
                self.width, self.height, width, height);
        }

        for y in y0..=y1.min(height.saturating_sub(1)) {
            for x in x0..=x1.min(width.saturating_sub(1)) {
                let value = self.coverage(x, y);
                if value > 0.0 {
                    let alpha = (value * 255.0).round() as u8;
                    target.get_pixel_mut(x, y).blend(&color.to_rgba(alpha));
                }
            }
        }
    }
}

impl fmt::Debug for TextLayer {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_struct("TextLayer")
            .field("size", &format_args!("{}x{}", self.width, self.height))
            .field("ink", &self.ink)
            .finish()
    }
}


/// One-dimensional squared distance transform of `f` into `out`.
/// Infinite entries of `f` are treated as empty.
fn squared_distances(f: &[f64], out: &mut [f64]) {
    // Parabolas of the lower envelope, with the position each one starts at.
    let mut roots: Vec<usize> = Vec::with_capacity(f.len());
    let mut starts: Vec<f64> = Vec::with_capacity(f.len());
    for q in 0..f.len() {
        if !f[q].is_finite() {
            continue;
        }
        let fq = f[q] + (q as f64) * (q as f64);
        let mut start = f64::NEG_INFINITY;
        while let Some(&p) = roots.last() {
            let fp = f[p] + (p as f64) * (p as f64);
            let s = (fq - fp) / (2.0 * (q - p) as f64);
            if s <= starts[starts.len() - 1] {
                roots.pop();
                starts.pop();
            } else {
                start = s;
                break;
            }
        }
        roots.push(q);
        starts.push(start);
    }

    if roots.is_empty() {
        for d in out.iter_mut() {
            *d = f64::INFINITY;
        }
        return;
    }
    let mut k = 0;
    for q in 0..out.len() {
        while k + 1 < roots.len() && starts[k + 1] < q as f64 {
            k += 1;
        }
        let p = roots[k];
        let diff = q as f64 - p as f64;
        out[q] = diff * diff + f[p];
    }
}
