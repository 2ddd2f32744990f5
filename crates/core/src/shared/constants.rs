/// Edge length of each control icon, in pixels.
pub const ICON_SIZE: i64 = 80;
/// Centre-to-centre distance between neighbouring icons.
pub const ICON_SPACING: i64 = 100;
/// Distance from the bottom edge of the frame to the centre of the lower icon row.
pub const ICON_BOTTOM_OFFSET: i64 = 150;

/// Frames between two progress reports.
pub const PROGRESS_INTERVAL: usize = 100;

pub const DEFAULT_ENCODER_PROGRAM: &str = "ffmpeg";
pub const PRIMARY_CODEC: &str = "libx264";
pub const PRIMARY_CRF: &str = "23";
pub const GENERIC_QUALITY: &str = "3";
pub const WEBM_CODEC: &str = "libvpx-vp9";
pub const WEBM_CRF: &str = "30";
pub const PIXEL_FORMAT: &str = "yuv420p";
/// First major version of the encoder that accepts preset/faststart arguments.
pub const MODERN_ENCODER_MAJOR: u32 = 5;

pub const FRAME_FILE_PREFIX: &str = "frame_";
pub const FRAME_FILE_EXTENSION: &str = "png";
pub const TEMP_DIR_PREFIX: &str = "control-overlay-";

/// Frame rate the fallback writer uses when the hint is not positive.
pub const FALLBACK_WRITER_DEFAULT_FPS: i32 = 30;
