use crate::schedule::domain::control_key::ControlKey;
use crate::shared::frame::Frame;

/// Domain interface for compositing the control indicator onto a frame.
///
/// Implementations draw in place; callers must not expect the input pixels
/// to survive.
pub trait OverlayRenderer: Send {
    fn render(
        &self,
        frame: &mut Frame,
        active: Option<ControlKey>,
    ) -> Result<(), Box<dyn std::error::Error>>;
}
