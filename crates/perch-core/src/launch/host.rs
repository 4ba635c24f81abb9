//! The front end's side of a launch.

use crate::model::Entry;

/// Callbacks into whatever is presenting the launcher to the user.
pub trait LaunchHost {
    /// A target was handed to the shell.
    fn notify_launched(&mut self, title: &str);

    /// A launch failed; `message` is ready to show as-is.
    fn report_error(&mut self, title: &str, message: &str);

    /// Confirmation sound after a successful launch.
    fn play_confirmation(&mut self) {}

    /// Open a pop-up's own window.
    fn show_popup(&mut self, popup: &Entry);
}
