pub mod control_icon_renderer;
mod glyphs;
