//! Starting entries and menu items.

use super::host::LaunchHost;
use crate::model::{Entry, MenuEntry, MenuItemType};
use crate::platform::{expand_env_vars, LaunchFailure, LaunchRequest, ShellLauncher, SystemShell};
use crate::settings::Settings;
use crate::tree::{resolve_popup, Forest};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Launches entries through the shell and reports back to a [`LaunchHost`].
///
/// Never retries and never waits for the started process.
pub struct LaunchExecutor {
    shell: Box<dyn ShellLauncher>,
    notify_on_launch: bool,
    play_sound_on_launch: bool,
}

impl Default for LaunchExecutor {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl LaunchExecutor {
    pub fn new(settings: &Settings) -> Self {
        Self {
            shell: Box::new(SystemShell),
            notify_on_launch: settings.notify_on_launch,
            play_sound_on_launch: settings.play_sound_on_launch,
        }
    }

    pub fn with_shell(mut self, shell: impl ShellLauncher + 'static) -> Self {
        self.shell = Box::new(shell);
        self
    }

    /// Launch a list entry. Pop-ups are opened through the host instead.
    pub fn launch(&self, entry: &Entry, host: &mut dyn LaunchHost) -> bool {
        if entry.is_popup() {
            debug!("Opening pop-up \"{}\"", entry.title);
            host.show_popup(entry);
            return true;
        }
        self.launch_target(
            &entry.title,
            &entry.file_path_or_uri,
            &entry.arguments,
            &entry.working_directory,
            entry.run_elevated,
            host,
        )
    }

    /// Launch a tray menu item.
    ///
    /// Pop-up references open the referenced pop-up from `list`; a dangling
    /// reference is logged and does nothing. Containers, headings and
    /// separators are not launchable.
    pub fn launch_menu_entry(
        &self,
        item: &MenuEntry,
        list: &Forest<Entry>,
        host: &mut dyn LaunchHost,
    ) -> bool {
        if !item.is_actionable() {
            debug!(
                "Menu item \"{}\" ({:?}) is not launchable",
                item.title, item.item_type
            );
            return false;
        }

        if item.item_type != MenuItemType::PopupReference {
            return self.launch_target(
                &item.title,
                &item.file_path_or_uri,
                &item.arguments,
                &item.working_directory,
                false,
                host,
            );
        }

        match resolve_popup(list, &item.popup_id) {
            Some(popup) => {
                host.show_popup(popup);
                true
            }
            None => {
                warn!(
                    "Menu item \"{}\" references missing pop-up {:?}",
                    item.title, item.popup_id
                );
                false
            }
        }
    }

    fn launch_target(
        &self,
        title: &str,
        path: &str,
        arguments: &str,
        working_directory: &str,
        elevated: bool,
        host: &mut dyn LaunchHost,
    ) -> bool {
        let path = path.trim();
        if path.is_empty() {
            warn!("\"{}\" has nothing to launch", title);
            host.report_error(title, &format!("\"{}\" has no file or address to open.", title));
            return false;
        }

        let working_directory = working_directory.trim();
        let request = LaunchRequest {
            target: expand_env_vars(path),
            arguments: expand_env_vars(arguments),
            working_directory: (!working_directory.is_empty())
                .then(|| PathBuf::from(expand_env_vars(working_directory))),
            elevated,
        };

        match self.shell.open(&request) {
            Ok(()) => {
                info!("Launched \"{}\" ({})", title, request.target);
                if self.notify_on_launch {
                    host.notify_launched(title);
                }
                if self.play_sound_on_launch {
                    host.play_confirmation();
                }
                true
            }
            Err(LaunchFailure::TargetNotFound) => {
                warn!(
                    "Launch of \"{}\" failed: {} (expanded to {}) not found",
                    title, path, request.target
                );
                host.report_error(
                    title,
                    &format!("Could not launch \"{}\": {} was not found.", title, path),
                );
                false
            }
            Err(LaunchFailure::Failed(reason)) => {
                warn!("Launch of \"{}\" failed: {}", title, reason);
                host.report_error(title, &format!("Could not launch \"{}\": {}", title, reason));
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every request and answers with a fixed result.
    #[derive(Clone)]
    struct FakeShell {
        requests: Rc<RefCell<Vec<LaunchRequest>>>,
        result: Result<(), LaunchFailure>,
    }

    impl FakeShell {
        fn answering(result: Result<(), LaunchFailure>) -> Self {
            Self {
                requests: Rc::new(RefCell::new(Vec::new())),
                result,
            }
        }
    }

    impl ShellLauncher for FakeShell {
        fn open(&self, request: &LaunchRequest) -> Result<(), LaunchFailure> {
            self.requests.borrow_mut().push(request.clone());
            self.result.clone()
        }
    }

    #[derive(Default)]
    struct RecordingHost {
        launched: Vec<String>,
        errors: Vec<String>,
        sounds: usize,
        popups: Vec<String>,
    }

    impl LaunchHost for RecordingHost {
        fn notify_launched(&mut self, title: &str) {
            self.launched.push(title.to_string());
        }

        fn report_error(&mut self, _title: &str, message: &str) {
            self.errors.push(message.to_string());
        }

        fn play_confirmation(&mut self) {
            self.sounds += 1;
        }

        fn show_popup(&mut self, popup: &Entry) {
            self.popups.push(popup.title.clone());
        }
    }

    #[test]
    fn test_success_notifies_and_expands_variables() {
        std::env::set_var("PERCH_LAUNCH_TEST_HOME", "/home/ana");
        let shell = FakeShell::answering(Ok(()));
        let executor = LaunchExecutor::default().with_shell(shell.clone());
        let mut host = RecordingHost::default();

        let entry = Entry::normal("Notes", "%PERCH_LAUNCH_TEST_HOME%/notes.txt")
            .with_arguments("--dir %PERCH_LAUNCH_TEST_HOME%")
            .with_working_directory("%PERCH_LAUNCH_TEST_HOME%");
        assert!(executor.launch(&entry, &mut host));

        let requests = shell.requests.borrow();
        assert_eq!(requests[0].target, "/home/ana/notes.txt");
        assert_eq!(requests[0].arguments, "--dir /home/ana");
        assert_eq!(requests[0].working_directory, Some(PathBuf::from("/home/ana")));
        assert_eq!(host.launched, vec!["Notes"]);
        assert_eq!(host.sounds, 0);
    }

    #[test]
    fn test_not_found_message_names_entry_and_path() {
        let executor =
            LaunchExecutor::default().with_shell(FakeShell::answering(Err(LaunchFailure::TargetNotFound)));
        let mut host = RecordingHost::default();

        assert!(!executor.launch(&Entry::normal("Ghost", "C:\\gone.exe"), &mut host));
        assert!(host.launched.is_empty());
        assert_eq!(
            host.errors,
            vec!["Could not launch \"Ghost\": C:\\gone.exe was not found."]
        );
    }

    #[test]
    fn test_not_found_message_shows_path_as_written() {
        std::env::set_var("PERCH_LAUNCH_TEST_TOOLS", "/opt/tools");
        let shell = FakeShell::answering(Err(LaunchFailure::TargetNotFound));
        let executor = LaunchExecutor::default().with_shell(shell.clone());
        let mut host = RecordingHost::default();

        let entry = Entry::normal("Tool", " %PERCH_LAUNCH_TEST_TOOLS%/tool.exe ");
        assert!(!executor.launch(&entry, &mut host));
        assert_eq!(shell.requests.borrow()[0].target, "/opt/tools/tool.exe");
        assert_eq!(
            host.errors,
            vec!["Could not launch \"Tool\": %PERCH_LAUNCH_TEST_TOOLS%/tool.exe was not found."]
        );
    }

    #[test]
    fn test_generic_failure_message_carries_error_text() {
        let executor = LaunchExecutor::default().with_shell(FakeShell::answering(Err(
            LaunchFailure::Failed("Access is denied.".into()),
        )));
        let mut host = RecordingHost::default();

        assert!(!executor.launch(&Entry::normal("Locked", "locked.exe"), &mut host));
        assert_eq!(host.errors, vec!["Could not launch \"Locked\": Access is denied."]);
    }

    #[test]
    fn test_settings_gate_notification_and_sound() {
        let settings = Settings {
            notify_on_launch: false,
            play_sound_on_launch: true,
            ..Settings::default()
        };
        let executor = LaunchExecutor::new(&settings).with_shell(FakeShell::answering(Ok(())));
        let mut host = RecordingHost::default();

        assert!(executor.launch(&Entry::normal("Calc", "calc.exe"), &mut host));
        assert!(host.launched.is_empty());
        assert_eq!(host.sounds, 1);
    }

    #[test]
    fn test_elevated_flag_reaches_shell() {
        let shell = FakeShell::answering(Ok(()));
        let executor = LaunchExecutor::default().with_shell(shell.clone());
        let mut entry = Entry::normal("Admin", "regedit.exe");
        entry.run_elevated = true;

        executor.launch(&entry, &mut RecordingHost::default());
        assert!(shell.requests.borrow()[0].elevated);
    }

    #[test]
    fn test_popup_entry_opens_popup_not_shell() {
        let shell = FakeShell::answering(Ok(()));
        let executor = LaunchExecutor::default().with_shell(shell.clone());
        let mut host = RecordingHost::default();

        assert!(executor.launch(&Entry::popup("Games", vec![]), &mut host));
        assert_eq!(host.popups, vec!["Games"]);
        assert!(shell.requests.borrow().is_empty());
    }

    #[test]
    fn test_empty_path_reports_without_shell() {
        let shell = FakeShell::answering(Ok(()));
        let executor = LaunchExecutor::default().with_shell(shell.clone());
        let mut host = RecordingHost::default();

        assert!(!executor.launch(&Entry::normal("Blank", "  "), &mut host));
        assert_eq!(host.errors.len(), 1);
        assert!(shell.requests.borrow().is_empty());
    }

    #[test]
    fn test_menu_entries() {
        let shell = FakeShell::answering(Ok(()));
        let executor = LaunchExecutor::default().with_shell(shell.clone());
        let mut host = RecordingHost::default();
        let popup = Entry::popup("Games", vec![]);
        let list = Forest::new(vec![popup.clone()]);

        assert!(executor.launch_menu_entry(&MenuEntry::item("Pad", "notepad.exe"), &list, &mut host));
        assert!(executor.launch_menu_entry(
            &MenuEntry::popup_reference("Games", popup.item_id.clone()),
            &list,
            &mut host
        ));
        assert!(!executor.launch_menu_entry(
            &MenuEntry::popup_reference("Old", "missing"),
            &list,
            &mut host
        ));
        assert!(!executor.launch_menu_entry(&MenuEntry::sub_menu("Sub", vec![]), &list, &mut host));
        assert!(!executor.launch_menu_entry(
            &MenuEntry::new_untitled(MenuItemType::Separator),
            &list,
            &mut host
        ));

        assert_eq!(shell.requests.borrow().len(), 1);
        assert_eq!(host.popups, vec!["Games"]);
        assert!(host.errors.is_empty());
    }
}
