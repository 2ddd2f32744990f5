//! Draws a WASD control overlay onto every frame of a video and re-encodes
//! the result, through an external `ffmpeg` binary when one is usable and a
//! built-in writer otherwise.

pub mod encoding;
pub mod overlay;
pub mod pipeline;
pub mod schedule;
pub mod shared;
pub mod video;
