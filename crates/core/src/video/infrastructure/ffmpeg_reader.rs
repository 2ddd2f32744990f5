use std::path::Path;

use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// Decodes video frames via ffmpeg-next (libavformat + libavcodec).
///
/// Converts each decoded frame to RGB24 and wraps it in a [`Frame`].
pub struct FfmpegReader {
    input_ctx: Option<ffmpeg_next::format::context::Input>,
    video_stream_index: usize,
}

// Safety: FfmpegReader is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegReader {}

impl FfmpegReader {
    pub fn new() -> Self {
        Self {
            input_ctx: None,
            video_stream_index: 0,
        }
    }
}

impl Default for FfmpegReader {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoReader for FfmpegReader {
    fn open(&mut self, path: &Path) -> Result<VideoMetadata, Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let ictx = ffmpeg_next::format::input(path)?;

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or("No video stream found")?;

        let video_stream_index = stream.index();
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let fps = rational_to_f64(stream.avg_frame_rate())
            .or_else(|| rational_to_f64(stream.rate()))
            .unwrap_or(0.0);

        let total_frames = match stream.frames() {
            n if n > 0 => n as usize,
            _ => estimate_frame_count(ictx.duration(), fps),
        };

        let metadata = VideoMetadata {
            width: decoder.width(),
            height: decoder.height(),
            fps,
            total_frames,
            codec: decoder
                .codec()
                .map(|c| c.name().to_string())
                .unwrap_or_default(),
        };

        self.video_stream_index = video_stream_index;
        self.input_ctx = Some(ictx);

        Ok(metadata)
    }

    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<Frame, Box<dyn std::error::Error>>> + '_> {
        let Some(ictx) = self.input_ctx.as_mut() else {
            return Box::new(std::iter::once(Err("FfmpegReader: not opened".into())));
        };

        match FfmpegFrameIter::new(ictx, self.video_stream_index) {
            Ok(iter) => Box::new(iter),
            Err(e) => Box::new(std::iter::once(Err(e))),
        }
    }

    fn close(&mut self) {
        self.input_ctx = None;
    }
}

/// Lazy iterator that decodes video frames one at a time, avoiding the need
/// to buffer the entire video in memory.
struct FfmpegFrameIter<'a> {
    ictx: &'a mut ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    video_stream_index: usize,
    frame_index: usize,
    flushing: bool,
    done: bool,
}

impl<'a> FfmpegFrameIter<'a> {
    fn new(
        ictx: &'a mut ffmpeg_next::format::context::Input,
        video_stream_index: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let stream = ictx
            .stream(video_stream_index)
            .ok_or("video stream disappeared")?;
        let codec_ctx = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())?;
        let decoder = codec_ctx.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();

        let scaler = ffmpeg_next::software::scaling::Context::get(
            decoder.format(),
            width,
            height,
            ffmpeg_next::format::Pixel::RGB24,
            width,
            height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        Ok(Self {
            ictx,
            decoder,
            scaler,
            width,
            height,
            video_stream_index,
            frame_index: 0,
            flushing: false,
            done: false,
        })
    }

    fn try_receive(&mut self) -> Option<Result<Frame, Box<dyn std::error::Error>>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_err() {
            return None;
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::empty();
        let pixels = self
            .scaler
            .run(&decoded, &mut rgb_frame)
            .map(|()| extract_rgb_pixels(&rgb_frame, self.width, self.height));
        Some(index_frame(&mut self.frame_index, pixels, self.width, self.height))
    }
}

impl Iterator for FfmpegFrameIter<'_> {
    type Item = Result<Frame, Box<dyn std::error::Error>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if let Some(result) = self.try_receive() {
            return Some(result);
        }

        if self.flushing {
            self.done = true;
            return None;
        }

        loop {
            let Some((stream, packet)) = self.ictx.packets().next() else {
                let _ = self.decoder.send_eof();
                self.flushing = true;
                if let Some(result) = self.try_receive() {
                    return Some(result);
                }
                self.done = true;
                return None;
            };

            if stream.index() != self.video_stream_index {
                continue;
            }

            if let Err(e) = self.decoder.send_packet(&packet) {
                log::debug!("dropping undecodable packet: {e}");
                continue;
            }

            if let Some(result) = self.try_receive() {
                return Some(result);
            }
        }
    }
}

/// Wraps converted pixels in a [`Frame`] at the next decode position. The
/// position is consumed even when conversion failed, so later frames keep
/// their true index.
fn index_frame(
    next_index: &mut usize,
    pixels: Result<Vec<u8>, ffmpeg_next::Error>,
    width: u32,
    height: u32,
) -> Result<Frame, Box<dyn std::error::Error>> {
    let index = *next_index;
    *next_index += 1;
    let pixels = pixels.map_err(|e| format!("frame {index}: pixel conversion failed: {e}"))?;
    Ok(Frame::new(pixels, width, height, 3, index))
}

fn rational_to_f64(rate: ffmpeg_next::Rational) -> Option<f64> {
    (rate.numerator() > 0 && rate.denominator() > 0)
        .then(|| f64::from(rate.numerator()) / f64::from(rate.denominator()))
}

/// Falls back to container duration (microseconds) times frame rate when the
/// stream header does not carry a frame count. Returns 0 when unknown.
fn estimate_frame_count(duration_us: i64, fps: f64) -> usize {
    if duration_us <= 0 || fps <= 0.0 {
        return 0;
    }
    (duration_us as f64 / 1_000_000.0 * fps).round() as usize
}

/// Copies pixel data from an ffmpeg frame into a contiguous RGB buffer.
///
/// ffmpeg frames may have padding bytes at the end of each row (stride > width*3).
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let w = width as usize;
    let h = height as usize;

    let mut pixels = Vec::with_capacity(w * h * 3);
    for row in 0..h {
        let row_start = row * stride;
        pixels.extend_from_slice(&data[row_start..row_start + w * 3]);
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::infrastructure::test_video::create_test_video;
    use rstest::rstest;

    #[test]
    fn test_open_returns_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.mp4");
        create_test_video(&path, 5, 160, 120, 25);

        let mut reader = FfmpegReader::new();
        let meta = reader.open(&path).unwrap();
        assert_eq!((meta.width, meta.height), (160, 120));
        assert!(meta.fps > 0.0);
        assert!(!meta.codec.is_empty());
    }

    #[test]
    fn test_open_nonexistent_fails() {
        let mut reader = FfmpegReader::new();
        assert!(reader.open(Path::new("/nonexistent/in.mp4")).is_err());
    }

    #[test]
    fn test_frames_are_sequential_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.mp4");
        create_test_video(&path, 6, 160, 120, 25);

        let mut reader = FfmpegReader::new();
        reader.open(&path).unwrap();
        let frames: Vec<_> = reader.frames().map(|f| f.unwrap()).collect();

        assert_eq!(frames.len(), 6);
        for (i, frame) in frames.iter().enumerate() {
            assert_eq!(frame.index(), i);
            assert_eq!(frame.channels(), 3);
            assert_eq!(frame.data().len(), 160 * 120 * 3);
        }
    }

    #[test]
    fn test_reopen_restarts_from_first_frame() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("in.mp4");
        create_test_video(&path, 4, 160, 120, 25);

        let mut reader = FfmpegReader::new();
        reader.open(&path).unwrap();
        let first_pass = reader.frames().count();
        reader.close();

        reader.open(&path).unwrap();
        let indices: Vec<_> = reader.frames().map(|f| f.unwrap().index()).collect();
        assert_eq!(first_pass, 4);
        assert_eq!(indices, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_failed_conversion_still_consumes_its_index() {
        let mut next = 0;
        let ok = |n: usize| -> Result<Vec<u8>, ffmpeg_next::Error> { Ok(vec![n as u8; 2 * 2 * 3]) };

        assert_eq!(index_frame(&mut next, ok(0), 2, 2).unwrap().index(), 0);
        assert_eq!(index_frame(&mut next, ok(1), 2, 2).unwrap().index(), 1);
        let err = index_frame(&mut next, Err(ffmpeg_next::Error::InvalidData), 2, 2).unwrap_err();
        assert!(err.to_string().starts_with("frame 2:"));
        assert_eq!(index_frame(&mut next, ok(3), 2, 2).unwrap().index(), 3);
        assert_eq!(next, 4);
    }

    #[test]
    fn test_frames_without_open_returns_error() {
        let mut reader = FfmpegReader::new();
        assert!(reader.frames().next().unwrap().is_err());
    }

    #[rstest]
    #[case(0, 30.0, 0)]
    #[case(2_000_000, 0.0, 0)]
    #[case(2_000_000, 30.0, 60)]
    #[case(1_500_000, 24.0, 36)]
    fn test_estimate_frame_count(#[case] duration: i64, #[case] fps: f64, #[case] expected: usize) {
        assert_eq!(estimate_frame_count(duration, fps), expected);
    }

    #[test]
    fn test_rational_rejects_zero_denominator() {
        assert_eq!(rational_to_f64(ffmpeg_next::Rational(30, 0)), None);
        assert_eq!(rational_to_f64(ffmpeg_next::Rational(30, 1)), Some(30.0));
    }
}
