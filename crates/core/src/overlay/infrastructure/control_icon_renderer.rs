use ndarray::{s, Axis};

use crate::overlay::domain::icon_layout::{icon_layout, IconBox};
use crate::overlay::domain::overlay_renderer::OverlayRenderer;
use crate::schedule::domain::control_key::ControlKey;
use crate::shared::frame::Frame;

use super::glyphs::{self, GLYPH_COLS, GLYPH_ROWS};

/// Fill, border colour and border thickness for one icon state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IconStyle {
    pub fill: [u8; 3],
    pub border: [u8; 3],
    pub border_thickness: i64,
}

pub const ACTIVE_STYLE: IconStyle = IconStyle {
    fill: [0, 255, 0],
    border: [255, 255, 255],
    border_thickness: 3,
};

pub const INACTIVE_STYLE: IconStyle = IconStyle {
    fill: [128, 128, 128],
    border: [64, 64, 64],
    border_thickness: 1,
};

pub const TEXT_OUTLINE: [u8; 3] = [0, 0, 0];
pub const TEXT_FILL: [u8; 3] = [255, 255, 255];

/// Pixel size of one glyph cell.
const GLYPH_CELL: i64 = 6;
/// How far the dark outline pass extends past each lit cell.
const GLYPH_OUTLINE: i64 = 2;

/// CPU renderer for the four-key control cluster.
///
/// Each icon is a filled square with a border, and its letter is drawn in
/// two passes: a dilated dark pass, then the light glyph on top, so the
/// letter stays readable over any fill or background.
pub struct ControlIconRenderer;

impl ControlIconRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ControlIconRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayRenderer for ControlIconRenderer {
    fn render(
        &self,
        frame: &mut Frame,
        active: Option<ControlKey>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if frame.channels() != 3 {
            return Err(format!(
                "ControlIconRenderer expects RGB frames, got {} channels",
                frame.channels()
            )
            .into());
        }

        for (key, icon) in icon_layout(frame.width(), frame.height()) {
            let style = if Some(key) == active {
                ACTIVE_STYLE
            } else {
                INACTIVE_STYLE
            };
            draw_icon(frame, &icon, style);
            draw_letter(frame, &icon, key);
        }

        Ok(())
    }
}

fn draw_icon(frame: &mut Frame, icon: &IconBox, style: IconStyle) {
    fill_rect(
        frame,
        icon.left(),
        icon.top(),
        icon.right() + 1,
        icon.bottom() + 1,
        style.fill,
    );

    // Border strokes are centred on the box edges.
    let t = style.border_thickness;
    let inset = (t - 1) / 2;
    let (l, r) = (icon.left() - inset, icon.right() - inset);
    let (top, bottom) = (icon.top() - inset, icon.bottom() - inset);
    fill_rect(frame, l, top, r + t, top + t, style.border);
    fill_rect(frame, l, bottom, r + t, bottom + t, style.border);
    fill_rect(frame, l, top, l + t, bottom + t, style.border);
    fill_rect(frame, r, top, r + t, bottom + t, style.border);
}

fn draw_letter(frame: &mut Frame, icon: &IconBox, key: ControlKey) {
    let rows = glyphs::glyph(key);
    let (ox, oy) = glyph_origin(icon);

    for (col, row) in glyphs::lit_cells(rows) {
        let x = ox + col as i64 * GLYPH_CELL;
        let y = oy + row as i64 * GLYPH_CELL;
        fill_rect(
            frame,
            x - GLYPH_OUTLINE,
            y - GLYPH_OUTLINE,
            x + GLYPH_CELL + GLYPH_OUTLINE,
            y + GLYPH_CELL + GLYPH_OUTLINE,
            TEXT_OUTLINE,
        );
    }

    for (col, row) in glyphs::lit_cells(rows) {
        let x = ox + col as i64 * GLYPH_CELL;
        let y = oy + row as i64 * GLYPH_CELL;
        fill_rect(frame, x, y, x + GLYPH_CELL, y + GLYPH_CELL, TEXT_FILL);
    }
}

/// Top-left corner of the glyph so that it is centred in the icon.
fn glyph_origin(icon: &IconBox) -> (i64, i64) {
    let w = GLYPH_COLS as i64 * GLYPH_CELL;
    let h = GLYPH_ROWS as i64 * GLYPH_CELL;
    (icon.center_x - w / 2, icon.center_y - h / 2)
}

/// Fills the half-open rectangle `[x0, x1) x [y0, y1)`, clipped to the frame.
fn fill_rect(frame: &mut Frame, x0: i64, y0: i64, x1: i64, y1: i64, color: [u8; 3]) {
    let w = i64::from(frame.width());
    let h = i64::from(frame.height());
    let (x0, x1) = (x0.clamp(0, w), x1.clamp(0, w));
    let (y0, y1) = (y0.clamp(0, h), y1.clamp(0, h));
    if x0 >= x1 || y0 >= y1 {
        return;
    }

    let mut view = frame.as_ndarray_mut();
    let mut area = view.slice_mut(s![y0 as usize..y1 as usize, x0 as usize..x1 as usize, ..]);
    for mut px in area.lanes_mut(Axis(2)) {
        for (dst, src) in px.iter_mut().zip(color) {
            *dst = src;
        }
    }
}
