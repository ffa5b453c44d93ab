use image::imageops::{self, FilterType};
use image::GenericImageView;
use ndarray::{Array3, Axis};

use crate::classification::domain::face_image::{
    ElementType, FaceImage, TensorLayout, TensorSpec,
};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Cuts face regions out of a frame and shapes them like the classifier input.
///
/// Float inputs are scaled to [-1, 1] (MobileNet preprocessing); byte inputs
/// get the raw pixel values and leave scaling to the quantized model.
#[derive(Clone, Debug)]
pub struct FaceCropper {
    height: usize,
    width: usize,
    layout: TensorLayout,
    element_type: ElementType,
}

impl FaceCropper {
    pub fn new(spec: &TensorSpec) -> Self {
        let (height, width) = spec.image_size();
        Self {
            height,
            width,
            layout: spec.layout(),
            element_type: spec.element_type,
        }
    }

    /// Returns `None` when the region has no pixels inside the frame.
    pub fn crop(&self, frame: &Frame, region: &Region) -> Option<FaceImage> {
        let r = region.clamped(frame.width(), frame.height());
        if r.is_empty() {
            return None;
        }
        let view = frame.as_rgb_image();
        let sub = imageops::crop_imm(
            &view,
            r.x as u32,
            r.y as u32,
            r.width as u32,
            r.height as u32,
        );
        let (sub_w, sub_h) = sub.dimensions();
        let face: image::RgbImage =
            image::ImageBuffer::from_fn(sub_w, sub_h, |x, y| sub.get_pixel(x, y));
        let face = imageops::resize(
            &face,
            self.width as u32,
            self.height as u32,
            FilterType::Triangle,
        );

        let hwc = Array3::from_shape_vec((self.height, self.width, 3), face.into_raw())
            .expect("resized face matches the input size");
        let pixels = match self.layout {
            TensorLayout::Nhwc => hwc.insert_axis(Axis(0)),
            TensorLayout::Nchw => hwc
                .permuted_axes([2, 0, 1])
                .as_standard_layout()
                .to_owned()
                .insert_axis(Axis(0)),
        }
        .into_dyn();

        Some(match self.element_type {
            ElementType::Uint8 => FaceImage::Uint8(pixels),
            ElementType::Float32 => FaceImage::Float32(pixels.mapv(|v| v as f32 / 127.5 - 1.0)),
        })
    }
}
