//! RGBA drawing surfaces with a current composite operation.

use super::raster::{CoverageMask, PixelRect};
use crate::error::InkResult;
use crate::types::Color;
use image::{ImageFormat, Rgba, RgbaImage};
use sha2::{Digest, Sha256};
use std::ops::{Deref, DerefMut};
use std::path::Path;

/// How painted coverage combines with what is already on a surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CompositeOp {
    /// Normal painting
    #[default]
    SourceOver,
    /// Covered pixels become fully transparent; color is ignored
    DestinationOut,
}

/// A transparent-by-default straight-alpha pixel buffer.
#[derive(Clone, Debug)]
pub struct Surface {
    image: RgbaImage,
    op: CompositeOp,
}

impl PartialEq for Surface {
    fn eq(&self, other: &Self) -> bool {
        self.image == other.image
    }
}

fn blend_over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    match src[3] {
        255 => return src,
        0 => return dst,
        _ => {}
    }
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return [0; 4];
    }
    let channel = |s: u8, d: u8| {
        ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    [
        channel(src[0], dst[0]),
        channel(src[1], dst[1]),
        channel(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ]
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            op: CompositeOp::SourceOver,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn bounds(&self) -> PixelRect {
        PixelRect::full(self.width(), self.height())
    }

    pub fn composite_op(&self) -> CompositeOp {
        self.op
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    /// Switch the composite operation until the returned guard is dropped.
    pub fn scoped(&mut self, op: CompositeOp) -> CompositeScope<'_> {
        self.op = op;
        CompositeScope { surface: self }
    }

    pub fn clear(&mut self) {
        self.image.fill(0);
    }

    pub fn clear_rect(&mut self, rect: PixelRect) {
        let Some(rect) = rect.clip(self.width(), self.height()) else {
            return;
        };
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                self.image.put_pixel(x, y, Rgba([0; 4]));
            }
        }
    }

    /// Paint the covered pixels of `mask` with `color` under the current
    /// composite operation, optionally limited to `clip`.
    pub fn paint_mask(&mut self, mask: &CoverageMask, color: Color, clip: Option<PixelRect>) {
        let Some(area) = mask.bounds() else {
            return;
        };
        let area = match clip {
            Some(clip) => PixelRect::new(
                area.x0.max(clip.x0),
                area.y0.max(clip.y0),
                area.x1.min(clip.x1),
                area.y1.min(clip.y1),
            ),
            None => area,
        };
        if area.is_empty() {
            return;
        }

        let src = color.to_array();
        let (w, h) = (self.width(), self.height());
        for (x, y) in mask.covered_in(area) {
            if x >= w || y >= h {
                continue;
            }
            let dst = self.image.get_pixel_mut(x, y);
            dst.0 = match self.op {
                CompositeOp::SourceOver => blend_over(dst.0, src),
                CompositeOp::DestinationOut => [0; 4],
            };
        }
    }

    /// Copy `rect` from `source` verbatim.
    pub fn restore_rect(&mut self, source: &Surface, rect: PixelRect) {
        let w = self.width().min(source.width());
        let h = self.height().min(source.height());
        let Some(rect) = rect.clip(w, h) else {
            return;
        };
        for y in rect.y0..rect.y1 {
            for x in rect.x0..rect.x1 {
                self.image.put_pixel(x, y, *source.image.get_pixel(x, y));
            }
        }
    }

    /// Source-over another surface of the same size onto this one.
    pub fn draw_surface(&mut self, top: &Surface) {
        let w = self.width().min(top.width());
        let h = self.height().min(top.height());
        for y in 0..h {
            for x in 0..w {
                let src = top.image.get_pixel(x, y).0;
                if src[3] == 0 {
                    continue;
                }
                let dst = self.image.get_pixel_mut(x, y);
                dst.0 = blend_over(dst.0, src);
            }
        }
    }

    /// True when every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|p| p.0[3] == 0)
    }

    pub fn painted_pixels(&self) -> usize {
        self.image.pixels().filter(|p| p.0[3] != 0).count()
    }

    /// Hex SHA-256 of the dimensions and raw pixels.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.width().to_le_bytes());
        hasher.update(self.height().to_le_bytes());
        hasher.update(self.image.as_raw());
        format!("{:x}", hasher.finalize())
    }

    /// This surface composited over an opaque background.
    pub fn flatten_over(&self, background: Color) -> RgbaImage {
        let mut out = Surface {
            image: RgbaImage::from_pixel(self.width(), self.height(), Rgba(background.to_array())),
            op: CompositeOp::SourceOver,
        };
        out.draw_surface(self);
        out.image
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> InkResult<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

/// Guard returned by [`Surface::scoped`]; resets the operation to
/// [`CompositeOp::SourceOver`] when dropped.
pub struct CompositeScope<'a> {
    surface: &'a mut Surface,
}

impl Deref for CompositeScope<'_> {
    type Target = Surface;

    fn deref(&self) -> &Surface {
        self.surface
    }
}

impl DerefMut for CompositeScope<'_> {
    fn deref_mut(&mut self) -> &mut Surface {
        self.surface
    }
}

impl Drop for CompositeScope<'_> {
    fn drop(&mut self) {
        self.surface.op = CompositeOp::SourceOver;
    }
}
