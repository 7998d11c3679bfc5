//! Blocking notices shown with native message boxes.

use rfd::{MessageButtons, MessageDialog, MessageLevel};

/// Modal message boxes. Each call blocks until the user closes it.
pub struct Notice;

impl Notice {
    pub fn info(title: &str, message: &str) {
        Self::show(MessageLevel::Info, title, message);
    }

    pub fn warning(title: &str, message: &str) {
        Self::show(MessageLevel::Warning, title, message);
    }

    pub fn error(title: &str, message: &str) {
        Self::show(MessageLevel::Error, title, message);
    }

    fn show(level: MessageLevel, title: &str, message: &str) {
        MessageDialog::new()
            .set_level(level)
            .set_title(title)
            .set_description(message)
            .set_buttons(MessageButtons::Ok)
            .show();
    }
}
