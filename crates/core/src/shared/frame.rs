use ndarray::{ArrayView3, ArrayViewMut3};

/// A single decoded video frame: contiguous RGB bytes in row-major order.
///
/// Pixel format conversion happens at the I/O boundary; the overlay and
/// scheduling code only ever sees packed RGB.
#[derive(Clone, Debug, PartialEq)]
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

    /// A frame filled with a single RGB colour.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3], index: usize) -> Self {
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self::new(data, width, height, 3, index)
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

    /// Zero-based position of this frame in decode order.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the pixel at column `x`, row `y`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let c = self.channels as usize;
        let offset = (y as usize * self.width as usize + x as usize) * c;
        Some(&self.data[offset..offset + c])
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_fills_every_pixel() {
        let frame = Frame::solid(3, 2, [10, 20, 30], 7);
        assert_eq!(frame.data().len(), 18);
        assert_eq!(frame.index(), 7);
        for y in 0..2 {
            for x in 0..3 {
                assert_eq!(frame.pixel(x, y).unwrap(), &[10, 20, 30]);
            }
        }
    }

    #[test]
    fn test_pixel_out_of_bounds_is_none() {
        let frame = Frame::solid(4, 4, [0, 0, 0], 0);
        assert!(frame.pixel(4, 0).is_none());
        assert!(frame.pixel(0, 4).is_none());
    }

    #[test]
    fn test_pixel_addresses_row_major() {
        let mut data = vec![0u8; 12]; // 2x2 RGB
        data[9] = 99; // row=1, col=1, R
        let frame = Frame::new(data, 2, 2, 3, 0);
        assert_eq!(frame.pixel(1, 1).unwrap()[0], 99);
        assert_eq!(frame.pixel(0, 1).unwrap()[0], 0);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height * channels")]
    fn test_mismatched_data_length_panics_in_debug() {
        Frame::new(vec![0u8; 5], 2, 2, 3, 0);
    }

    #[test]
    fn test_ndarray_views_share_storage() {
        let mut frame = Frame::solid(4, 2, [0, 0, 0], 0);
        assert_eq!(frame.as_ndarray().shape(), &[2, 4, 3]);
        frame.as_ndarray_mut()[[1, 3, 2]] = 200;
        assert_eq!(frame.pixel(3, 1).unwrap(), &[0, 0, 200]);
    }
}
