//! Terminal implementation of the launch callbacks.

use perch_core::{Entry, LaunchHost};

#[derive(Debug, Default)]
pub struct ConsoleHost;

impl LaunchHost for ConsoleHost {
    fn notify_launched(&mut self, title: &str) {
        println!("Launched {}", title);
    }

    fn report_error(&mut self, _title: &str, message: &str) {
        eprintln!("{}", message);
    }

    fn play_confirmation(&mut self) {
        // Terminal bell.
        print!("\x07");
    }

    fn show_popup(&mut self, popup: &Entry) {
        println!("{}", popup.title);
        for child in popup.children.iter().flatten() {
            println!("  {}  [{}]", child.title, child.item_id);
        }
    }
}
