use serde::{Deserialize, Serialize};

/// Window bounds in screen pixels, as persisted in a project's frame record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl WindowGeometry {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A `width` x `height` rectangle centered on a screen of the given size.
    ///
    /// Windows larger than the screen are pinned to the top-left corner.
    pub fn centered(screen_width: u32, screen_height: u32, width: u32, height: u32) -> Self {
        let x = screen_width.saturating_sub(width) / 2;
        let y = screen_height.saturating_sub(height) / 2;
        Self::new(x as i32, y as i32, width, height)
    }

    /// Zero-sized windows cannot be restored.
    pub fn is_usable(&self) -> bool {
        self.width > 0 && self.height > 0
    }
}
