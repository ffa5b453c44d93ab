use ndarray::{ArrayView3, ArrayViewMut3};

/// A single video/image frame: contiguous RGB bytes in row-major order.
///
/// Format conversion happens at I/O boundaries only; the domain layer
/// treats pixel data as opaque.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    index: usize,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * (channels as usize),
            "data length must equal width * height * channels"
        );
        Self {
            data,
            width,
            height,
            channels,
            index,
        }
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    /// Read-only counterpart of [`Frame::as_rgb_image_mut`].
    pub fn as_rgb_image(&self) -> image::ImageBuffer<image::Rgb<u8>, &[u8]> {
        debug_assert_eq!(self.channels, 3, "RGB view needs a 3-channel frame");
        image::ImageBuffer::from_raw(self.width, self.height, self.data.as_slice())
            .expect("Frame data length must match dimensions")
    }

    /// Borrows the pixels as an RGB image buffer for `image`/`imageproc`
    /// drawing. Only valid for 3-channel frames.
    pub fn as_rgb_image_mut(&mut self) -> image::ImageBuffer<image::Rgb<u8>, &mut [u8]> {
        debug_assert_eq!(self.channels, 3, "RGB view needs a 3-channel frame");
        image::ImageBuffer::from_raw(self.width, self.height, self.data.as_mut_slice())
            .expect("Frame data length must match dimensions")
    }

    /// Shrinks the frame so it is at most `max_width` pixels wide, keeping
    /// the aspect ratio. Narrower frames are returned unchanged.
    pub fn downscaled_to_width(self, max_width: u32) -> Frame {
        if self.width <= max_width || max_width == 0 || self.channels != 3 {
            return self;
        }
        let new_height =
            ((self.height as u64 * max_width as u64) / self.width as u64).max(1) as u32;
        let index = self.index;
        let img = image::RgbImage::from_raw(self.width, self.height, self.data)
            .expect("Frame data length must match dimensions");
        let resized = image::imageops::resize(
            &img,
            max_width,
            new_height,
            image::imageops::FilterType::Triangle,
        );
        Frame::new(resized.into_raw(), max_width, new_height, 3, index)
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
