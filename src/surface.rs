// --- File: surface.rs ---
//! Pixel surfaces the renderer can draw to.
//!
//! A surface only has to accept a full RGBA image at its own size and a
//! scaled blit of an image of any size.

/// Tightly packed RGBA8 image, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RgbaImage {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    /// Reallocates if the size changed; contents are unspecified afterwards.
    pub fn ensure_size(&mut self, width: u32, height: u32) {
        if self.width != width.max(1) || self.height != height.max(1) {
            *self = Self::new(width, height);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.pixels[i..i + 4]);
        Some(out)
    }

    pub fn fill(&mut self, color: [u8; 4]) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    /// Bilinear sample at pixel-center coordinates, clamped to the edges.
    fn sample_bilinear(&self, sx: f32, sy: f32) -> [u8; 4] {
        let sx = sx.clamp(0.0, (self.width - 1) as f32);
        let sy = sy.clamp(0.0, (self.height - 1) as f32);
        let x0 = sx.floor() as u32;
        let y0 = sy.floor() as u32;
        let x1 = (x0 + 1).min(self.width - 1);
        let y1 = (y0 + 1).min(self.height - 1);
        let tx = sx - x0 as f32;
        let ty = sy - y0 as f32;
        let w = self.width as usize;
        let at =
            |x: u32, y: u32, c: usize| self.pixels[(y as usize * w + x as usize) * 4 + c] as f32;

        let mut out = [0u8; 4];
        for (c, slot) in out.iter_mut().enumerate() {
            let top = at(x0, y0, c) + (at(x1, y0, c) - at(x0, y0, c)) * tx;
            let bottom = at(x0, y1, c) + (at(x1, y1, c) - at(x0, y1, c)) * tx;
            *slot = (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8;
        }
        out
    }
}

pub trait PixelSurface {
    fn dimensions(&self) -> (u32, u32);

    /// Replaces the surface contents with an image of exactly its size.
    fn put_image(&mut self, image: &RgbaImage);

    /// Draws `image` stretched over the whole surface.
    fn blit_scaled(&mut self, image: &RgbaImage, smoothing: bool);
}

impl PixelSurface for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn put_image(&mut self, image: &RgbaImage) {
        if image.dimensions() == self.dimensions() {
            self.pixels.copy_from_slice(&image.pixels);
        } else {
            self.blit_scaled(image, false);
        }
    }

    fn blit_scaled(&mut self, image: &RgbaImage, smoothing: bool) {
        let sx_ratio = image.width as f32 / self.width as f32;
        let sy_ratio = image.height as f32 / self.height as f32;
        let w = self.width as usize;
        for (i, px) in self.pixels.chunks_exact_mut(4).enumerate() {
            let x = (i % w) as f32;
            let y = (i / w) as f32;
            let color = if smoothing {
                image.sample_bilinear((x + 0.5) * sx_ratio - 0.5, (y + 0.5) * sy_ratio - 0.5)
            } else {
                let nx = (((x + 0.5) * sx_ratio) as u32).min(image.width - 1);
                let ny = (((y + 0.5) * sy_ratio) as u32).min(image.height - 1);
                let j = (ny as usize * image.width as usize + nx as usize) * 4;
                [
                    image.pixels[j],
                    image.pixels[j + 1],
                    image.pixels[j + 2],
                    image.pixels[j + 3],
                ]
            };
            px.copy_from_slice(&color);
        }
    }
}

// --- End of File: surface.rs ---
