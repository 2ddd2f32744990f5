pub mod ffmpeg_cli_runner;
