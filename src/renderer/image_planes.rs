use std::path::Path;

use image::RgbaImage;
use nalgebra::DMatrix;

use crate::{
    geometry::{FloatType, ScreenPoint, ScreenSize},
    util::Rgba,
};

/// Rendered image as four separate channel planes, indexed by (x, y).
#[derive(Clone, Debug, PartialEq)]
pub struct RgbaPlanes {
    pub r: DMatrix<FloatType>,
    pub g: DMatrix<FloatType>,
    pub b: DMatrix<FloatType>,
    pub a: DMatrix<FloatType>,
}

impl RgbaPlanes {
    /// All channels zero (transparent black).
    pub fn new(size: ScreenSize) -> Self {
        let plane = DMatrix::zeros(size.x as usize, size.y as usize);
        RgbaPlanes {
            r: plane.clone(),
            g: plane.clone(),
            b: plane.clone(),
            a: plane,
        }
    }

    pub fn size(&self) -> ScreenSize {
        ScreenSize::new(self.r.nrows() as u32, self.r.ncols() as u32)
    }

    pub fn put_pixel(&mut self, point: &ScreenPoint, color: Rgba) {
        let index = (point.x as usize, point.y as usize);
        self.r[index] = color.r;
        self.g[index] = color.g;
        self.b[index] = color.b;
        self.a[index] = color.a;
    }

    pub fn get_pixel(&self, point: &ScreenPoint) -> Rgba {
        let index = (point.x as usize, point.y as usize);
        Rgba::new(self.r[index], self.g[index], self.b[index], self.a[index])
    }

    /// Converts to an 8 bit image, clamping the channels to 0-1.
    pub fn to_image(&self) -> RgbaImage {
        let size = self.size();
        RgbaImage::from_fn(size.x, size.y, |x, y| {
            color_to_image(self.get_pixel(&ScreenPoint::new(x, y)))
        })
    }

    /// Saves the image, format is given by the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.to_image().save(path)
    }
}

/// Maps a 0-1 rgba pixel to pixel type compatible with module image.
pub fn color_to_image(color: Rgba) -> image::Rgba<u8> {
    let convert = |c: FloatType| (c * 255.0).round().clamp(0.0, 255.0) as u8;
    image::Rgba([
        convert(color.r),
        convert(color.g),
        convert(color.b),
        convert(color.a),
    ])
}
