pub mod action_schedule;
pub mod control_key;
