pub mod frame_sequence;
pub mod overlay_video_use_case;
pub mod pipeline_error;
pub mod progress_reporter;
pub mod run_result;
