pub mod icon_layout;
pub mod overlay_renderer;
