use std::path::Path;

use crate::shared::constants::FALLBACK_WRITER_DEFAULT_FPS;
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_writer::VideoWriter;

/// Built-in sequential writer encoding MPEG-4 Part 2 via ffmpeg-next.
///
/// The container is guessed from the output extension, so outputs whose
/// container cannot hold MPEG-4 (e.g. WebM) fail to open.
pub struct FfmpegWriter {
    state: Option<EncoderState>,
}

struct EncoderState {
    octx: ffmpeg_next::format::context::Output,
    encoder: ffmpeg_next::codec::encoder::video::Encoder,
    scaler: ffmpeg_next::software::scaling::Context,
    width: u32,
    height: u32,
    fps: i32,
    frame_count: usize,
}

// Safety: FfmpegWriter is only used from a single thread at a time.
// The raw pointers inside ffmpeg types are not shared across threads.
unsafe impl Send for FfmpegWriter {}

impl FfmpegWriter {
    pub fn new() -> Self {
        Self { state: None }
    }
}

impl Default for FfmpegWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl EncoderState {
    const STREAM: usize = 0;

    fn write_pending_packets(&mut self) -> Result<(), ffmpeg_next::Error> {
        let ost_time_base = self
            .octx
            .stream(Self::STREAM)
            .ok_or(ffmpeg_next::Error::StreamNotFound)?
            .time_base();

        let mut encoded = ffmpeg_next::Packet::empty();
        while self.encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(Self::STREAM);
            encoded.rescale_ts(ffmpeg_next::Rational(1, self.fps), ost_time_base);
            encoded.write_interleaved(&mut self.octx)?;
        }
        Ok(())
    }
}

impl VideoWriter for FfmpegWriter {
    fn open(
        &mut self,
        path: &Path,
        metadata: &VideoMetadata,
    ) -> Result<(), Box<dyn std::error::Error>> {
        ffmpeg_next::init()?;

        let mut octx = ffmpeg_next::format::output(path)?;

        let global_header = octx
            .format()
            .flags()
            .contains(ffmpeg_next::format::Flags::GLOBAL_HEADER);

        let codec = ffmpeg_next::encoder::find(ffmpeg_next::codec::Id::MPEG4)
            .ok_or("MPEG4 encoder not found")?;

        let mut ost = octx.add_stream(Some(codec))?;

        let mut encoder_ctx = ffmpeg_next::codec::context::Context::new_with_codec(codec)
            .encoder()
            .video()?;

        encoder_ctx.set_width(metadata.width);
        encoder_ctx.set_height(metadata.height);
        encoder_ctx.set_format(ffmpeg_next::format::Pixel::YUV420P);

        let fps = match metadata.fps.round() as i32 {
            n if n > 0 => n,
            _ => FALLBACK_WRITER_DEFAULT_FPS,
        };
        encoder_ctx.set_time_base(ffmpeg_next::Rational(1, fps));
        encoder_ctx.set_frame_rate(Some(ffmpeg_next::Rational(fps, 1)));

        if global_header {
            encoder_ctx.set_flags(ffmpeg_next::codec::Flags::GLOBAL_HEADER);
        }

        let encoder = encoder_ctx.open_with(ffmpeg_next::Dictionary::new())?;
        ost.set_parameters(&encoder);

        octx.write_header()?;

        let scaler = ffmpeg_next::software::scaling::Context::get(
            ffmpeg_next::format::Pixel::RGB24,
            metadata.width,
            metadata.height,
            ffmpeg_next::format::Pixel::YUV420P,
            metadata.width,
            metadata.height,
            ffmpeg_next::software::scaling::Flags::BILINEAR,
        )?;

        self.state = Some(EncoderState {
            octx,
            encoder,
            scaler,
            width: metadata.width,
            height: metadata.height,
            fps,
            frame_count: 0,
        });

        Ok(())
    }

    fn write(&mut self, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let state = self.state.as_mut().ok_or("FfmpegWriter: not opened")?;

        if frame.width() != state.width || frame.height() != state.height {
            return Err(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                state.width,
                state.height
            )
            .into());
        }

        let mut rgb_frame = ffmpeg_next::util::frame::video::Video::new(
            ffmpeg_next::format::Pixel::RGB24,
            state.width,
            state.height,
        );

        // Copy pixel data, respecting stride
        let row_bytes = state.width as usize * 3;
        let stride = rgb_frame.stride(0);
        let data = rgb_frame.data_mut(0);
        for (row, src) in frame.data().chunks_exact(row_bytes).enumerate() {
            let dst_start = row * stride;
            data[dst_start..dst_start + row_bytes].copy_from_slice(src);
        }

        let mut yuv_frame = ffmpeg_next::util::frame::video::Video::empty();
        state.scaler.run(&rgb_frame, &mut yuv_frame)?;
        yuv_frame.set_pts(Some(state.frame_count as i64));

        state.encoder.send_frame(&yuv_frame)?;
        state.write_pending_packets()?;

        state.frame_count += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let Some(mut state) = self.state.take() else {
            return Ok(());
        };

        state.encoder.send_eof()?;
        state.write_pending_packets()?;
        state.octx.write_trailer()?;
        log::debug!("fallback writer finalised {} frames", state.frame_count);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::video::domain::video_reader::VideoReader;
    use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;

    fn metadata(w: u32, h: u32, fps: f64) -> VideoMetadata {
        VideoMetadata {
            width: w,
            height: h,
            fps,
            total_frames: 0,
            codec: String::new(),
        }
    }

    #[test]
    fn test_write_creates_readable_video() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.mp4");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(160, 120, 24.0)).unwrap();
        for i in 0..3 {
            writer
                .write(&Frame::solid(160, 120, [128, 128, 128], i))
                .unwrap();
        }
        writer.close().unwrap();

        let mut reader = FfmpegReader::new();
        let meta = reader.open(&path).unwrap();
        assert_eq!((meta.width, meta.height), (160, 120));

        let frames: Vec<_> = reader.frames().map(|f| f.unwrap()).collect();
        assert_eq!(frames.len(), 3);
        let avg: f64 = frames[0].data().iter().map(|&b| b as f64).sum::<f64>()
            / frames[0].data().len() as f64;
        assert!((avg - 128.0).abs() < 40.0, "average {avg} should be near 128");
    }

    #[test]
    fn test_non_positive_fps_hint_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.avi");

        let mut writer = FfmpegWriter::new();
        writer.open(&path, &metadata(64, 48, 0.0)).unwrap();
        writer.write(&Frame::solid(64, 48, [0, 0, 0], 0)).unwrap();
        writer.close().unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_write_without_open_returns_error() {
        let mut writer = FfmpegWriter::new();
        assert!(writer.write(&Frame::solid(16, 16, [0, 0, 0], 0)).is_err());
    }

    #[test]
    fn test_size_mismatch_returns_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FfmpegWriter::new();
        writer
            .open(&dir.path().join("out.mp4"), &metadata(64, 48, 24.0))
            .unwrap();
        assert!(writer.write(&Frame::solid(32, 32, [0, 0, 0], 0)).is_err());
    }

    #[test]
    fn test_unwritable_path_fails_to_open() {
        let mut writer = FfmpegWriter::new();
        let result = writer.open(
            Path::new("/nonexistent/dir/out.mp4"),
            &metadata(64, 48, 24.0),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_close_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = FfmpegWriter::new();
        writer
            .open(&dir.path().join("out.mp4"), &metadata(64, 48, 24.0))
            .unwrap();
        writer.write(&Frame::solid(64, 48, [9, 9, 9], 0)).unwrap();
        writer.close().unwrap();
        writer.close().unwrap();
    }
}
