use crate::schedule::domain::control_key::ControlKey;
use crate::shared::constants::{ICON_BOTTOM_OFFSET, ICON_SIZE, ICON_SPACING};

/// Square screen area occupied by one icon. Coordinates may fall outside
/// the frame for very small videos; drawing clips them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IconBox {
    pub center_x: i64,
    pub center_y: i64,
    pub half: i64,
}

impl IconBox {
    pub fn left(&self) -> i64 {
        self.center_x - self.half
    }

    pub fn top(&self) -> i64 {
        self.center_y - self.half
    }

    pub fn right(&self) -> i64 {
        self.center_x + self.half
    }

    pub fn bottom(&self) -> i64 {
        self.center_y + self.half
    }
}

/// Positions of the four icons for a frame of the given size.
///
/// The cluster hangs from the bottom centre: the down icon sits at the
/// anchor, left and right flank it, and up sits directly above it.
pub fn icon_layout(width: u32, height: u32) -> [(ControlKey, IconBox); 4] {
    let cx = i64::from(width) / 2;
    let row_y = i64::from(height) - ICON_BOTTOM_OFFSET;
    let half = ICON_SIZE / 2;
    let at = |x: i64, y: i64| IconBox {
        center_x: x,
        center_y: y,
        half,
    };

    [
        (ControlKey::Up, at(cx, row_y - ICON_SPACING)),
        (ControlKey::Left, at(cx - ICON_SPACING, row_y)),
        (ControlKey::Down, at(cx, row_y)),
        (ControlKey::Right, at(cx + ICON_SPACING, row_y)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn find(layout: &[(ControlKey, IconBox); 4], key: ControlKey) -> IconBox {
        layout.iter().find(|(k, _)| *k == key).unwrap().1
    }

    #[test]
    fn test_layout_for_720p() {
        let layout = icon_layout(1280, 720);
        assert_eq!(find(&layout, ControlKey::Down).center_x, 640);
        assert_eq!(find(&layout, ControlKey::Down).center_y, 570);
        assert_eq!(find(&layout, ControlKey::Left).center_x, 540);
        assert_eq!(find(&layout, ControlKey::Right).center_x, 740);
        assert_eq!(find(&layout, ControlKey::Up).center_y, 470);
        assert_eq!(find(&layout, ControlKey::Up).center_x, 640);
    }

    #[test]
    fn test_icons_do_not_overlap() {
        let layout = icon_layout(640, 480);
        for (i, (_, a)) in layout.iter().enumerate() {
            for (_, b) in layout.iter().skip(i + 1) {
                let disjoint = a.right() < b.left()
                    || b.right() < a.left()
                    || a.bottom() < b.top()
                    || b.bottom() < a.top();
                assert!(disjoint, "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_box_edges() {
        let b = IconBox {
            center_x: 100,
            center_y: 50,
            half: 40,
        };
        assert_eq!((b.left(), b.top(), b.right(), b.bottom()), (60, 10, 140, 90));
    }
}
