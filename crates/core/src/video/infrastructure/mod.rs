pub mod ffmpeg_reader;
pub mod ffmpeg_writer;
pub mod png_frame_writer;

#[cfg(test)]
pub(crate) mod test_video;
