pub mod command_runner;
pub mod encoder_plan;
pub mod encoder_planner;
