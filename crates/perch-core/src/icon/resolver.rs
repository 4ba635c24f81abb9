//! The ordered heuristic that picks an icon for an entry.

use super::types::{BuiltinIcon, Icon, IconImage, IconOrigin};
use crate::config::IconConfig;
use crate::model::{Entry, MenuEntry, MenuItemType};
use crate::platform::{
    expand_env_vars, IconExtractor, LnkShortcutResolver, PathSearch, ShellIconExtractor,
    ShortcutResolver, SystemPathSearch,
};
use crate::{PerchError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, error, warn};

/// Optional scheme, dotted host, optional port, then anything after `/`, `?` or `#`.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)([a-z][a-z0-9+.\-]*://)?([a-z0-9\-]+\.)+[a-z]{2,}(:\d+)?([/?#]\S*)?$")
        .expect("url regex must compile")
});

/// Whether `value` is shaped like a web address.
pub fn looks_like_url(value: &str) -> bool {
    URL_PATTERN.is_match(value.trim())
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Decode an image file into RGBA.
pub fn decode_icon_file(path: &Path) -> Result<IconImage> {
    let image = image::open(path).map_err(|e| PerchError::IconDecode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let rgba = image.to_rgba8();
    Ok(IconImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba: rgba.into_raw(),
    })
}

/// Maps entries to icons. First match wins; nothing here ever fails.
pub struct IconResolver {
    icons_dir: PathBuf,
    path_search: Box<dyn PathSearch>,
    shortcuts: Box<dyn ShortcutResolver>,
    extractor: Box<dyn IconExtractor>,
}

impl IconResolver {
    /// Resolver backed by the real platform collaborators.
    pub fn new(icons_dir: impl Into<PathBuf>) -> Self {
        Self {
            icons_dir: icons_dir.into(),
            path_search: Box::new(SystemPathSearch::from_env()),
            shortcuts: Box::new(LnkShortcutResolver),
            extractor: Box::new(ShellIconExtractor),
        }
    }

    pub fn with_path_search(mut self, path_search: impl PathSearch + 'static) -> Self {
        self.path_search = Box::new(path_search);
        self
    }

    pub fn with_shortcut_resolver(mut self, shortcuts: impl ShortcutResolver + 'static) -> Self {
        self.shortcuts = Box::new(shortcuts);
        self
    }

    pub fn with_extractor(mut self, extractor: impl IconExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn icons_dir(&self) -> &Path {
        &self.icons_dir
    }

    /// Image file a front end draws for a built-in icon.
    pub fn builtin_asset(&self, icon: BuiltinIcon) -> PathBuf {
        self.icons_dir.join(icon.file_name())
    }

    /// Icon for a list entry.
    pub fn resolve_entry(&self, entry: &Entry) -> Icon {
        self.resolve(
            &entry.title,
            &entry.file_path_or_uri,
            &entry.icon_source,
            entry.is_popup(),
        )
    }

    /// Icon for a tray menu item; separators and headings have none.
    pub fn resolve_menu_entry(&self, item: &MenuEntry) -> Option<Icon> {
        match item.item_type {
            MenuItemType::Separator | MenuItemType::SectionHeading => None,
            MenuItemType::SubMenu => Some(Icon::Builtin(BuiltinIcon::Folder)),
            MenuItemType::PopupReference => Some(Icon::Builtin(BuiltinIcon::Popup)),
            MenuItemType::MenuItem => Some(self.resolve(&item.title, &item.file_path_or_uri, "", false)),
        }
    }

    fn resolve(&self, title: &str, path: &str, icon_source: &str, is_popup: bool) -> Icon {
        let path = path.trim();
        if path.is_empty() && !is_popup {
            warn!("Entry \"{}\" has no path; using unknown icon", title);
            return Icon::Builtin(BuiltinIcon::Unknown);
        }

        let icon_source = icon_source.trim();
        if !icon_source.is_empty() {
            let file = self.icons_dir.join(icon_source);
            if file.is_file() {
                return match decode_icon_file(&file) {
                    Ok(image) => Icon::Image {
                        image,
                        origin: IconOrigin::Explicit(file),
                    },
                    Err(e) => {
                        error!("{}", e);
                        Icon::Builtin(BuiltinIcon::Unknown)
                    }
                };
            }
            debug!("Icon source {} not found for \"{}\"", file.display(), title);
        }

        if is_popup {
            return Icon::Builtin(BuiltinIcon::Popup);
        }

        let expanded = expand_env_vars(path);
        let as_file = Path::new(expanded.trim_end_matches(['\\', '/']));
        if as_file.is_file() {
            return self.file_icon(as_file);
        }

        if Path::new(&expanded).is_dir() {
            return Icon::Builtin(BuiltinIcon::Folder);
        }

        if has_extension(Path::new(&expanded), IconConfig::EXECUTABLE_EXTENSION) {
            return match self.path_search.find_executable(&expanded) {
                Some(found) => self.extract(&found, IconOrigin::PathSearch(found.clone())),
                None => {
                    warn!("{} not found on PATH; using unknown icon", expanded);
                    Icon::Builtin(BuiltinIcon::Unknown)
                }
            };
        }

        if looks_like_url(&expanded) {
            return Icon::Builtin(BuiltinIcon::Globe);
        }

        warn!("No icon rule matched {:?} for \"{}\"", path, title);
        Icon::Builtin(BuiltinIcon::Unknown)
    }

    fn file_icon(&self, file: &Path) -> Icon {
        if has_extension(file, IconConfig::SHORTCUT_EXTENSION) {
            if let Some(target) = self.shortcuts.resolve_target(file) {
                return self.extract(&target, IconOrigin::ShortcutTarget(target.clone()));
            }
            debug!("Shortcut {} has no target; using its own icon", file.display());
        }
        self.extract(file, IconOrigin::Associated(file.to_path_buf()))
    }

    fn extract(&self, path: &Path, origin: IconOrigin) -> Icon {
        match self.extractor.extract_associated(path) {
            Ok(image) => Icon::Image { image, origin },
            Err(e @ PerchError::Unsupported { .. }) => {
                debug!("{}", e);
                Icon::Builtin(BuiltinIcon::Unknown)
            }
            Err(e) => {
                error!("Icon extraction for {} failed: {}", path.display(), e);
                Icon::Builtin(BuiltinIcon::Unknown)
            }
        }
    }
}

impl std::fmt::Debug for IconResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IconResolver")
            .field("icons_dir", &self.icons_dir)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tracing::Level;

    /// Log sink shared with a test subscriber.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` and return every WARN-or-worse line it logged.
    fn warnings_from(f: impl FnOnce()) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::WARN)
            .with_ansi(false)
            .without_time()
            .with_target(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    struct FakePathSearch(HashMap<String, PathBuf>);

    impl PathSearch for FakePathSearch {
        fn find_executable(&self, name: &str) -> Option<PathBuf> {
            self.0.get(name).cloned()
        }
    }

    struct FakeShortcuts(Option<PathBuf>);

    impl ShortcutResolver for FakeShortcuts {
        fn resolve_target(&self, _shortcut: &Path) -> Option<PathBuf> {
            self.0.clone()
        }
    }

    /// Returns a 1x1 image for every path except those ending in `broken.exe`.
    struct FakeExtractor;

    impl IconExtractor for FakeExtractor {
        fn extract_associated(&self, path: &Path) -> Result<IconImage> {
            if path.ends_with("broken.exe") {
                return Err(PerchError::IconDecode {
                    path: path.to_path_buf(),
                    message: "no icon resource".into(),
                });
            }
            Ok(IconImage {
                width: 1,
                height: 1,
                rgba: vec![0, 0, 0, 255],
            })
        }
    }

    fn resolver(icons_dir: &Path) -> IconResolver {
        let mut on_path = HashMap::new();
        on_path.insert(
            "calc.exe".to_string(),
            PathBuf::from("C:\\Windows\\System32\\calc.exe"),
        );
        IconResolver::new(icons_dir)
            .with_path_search(FakePathSearch(on_path))
            .with_shortcut_resolver(FakeShortcuts(None))
            .with_extractor(FakeExtractor)
    }

    #[test]
    fn test_exe_found_on_path_uses_extracted_icon() {
        let icons = TempDir::new().unwrap();
        let icon = resolver(icons.path()).resolve_entry(&Entry::normal("Calc", "calc.exe"));
        assert_eq!(
            icon.origin(),
            Some(&IconOrigin::PathSearch(PathBuf::from(
                "C:\\Windows\\System32\\calc.exe"
            )))
        );
    }

    #[test]
    fn test_empty_path_is_unknown() {
        let icons = TempDir::new().unwrap();
        let icon = resolver(icons.path()).resolve_entry(&Entry::normal("Nothing", ""));
        assert!(icon.is_builtin(BuiltinIcon::Unknown));
    }

    #[test]
    fn test_url_is_globe() {
        let icons = TempDir::new().unwrap();
        let resolver = resolver(icons.path());
        for url in ["https://example.com", "www.rust-lang.org/learn?x=1#top", "example.com:8080"] {
            let icon = resolver.resolve_entry(&Entry::normal("Web", url));
            assert!(icon.is_builtin(BuiltinIcon::Globe), "{}", url);
        }
    }

    #[test]
    fn test_popup_without_path_is_popup_icon() {
        let icons = TempDir::new().unwrap();
        let icon = resolver(icons.path()).resolve_entry(&Entry::popup("Games", vec![]));
        assert!(icon.is_builtin(BuiltinIcon::Popup));
    }

    #[test]
    fn test_explicit_icon_source_wins() {
        let icons = TempDir::new().unwrap();
        image::RgbaImage::new(4, 3)
            .save(icons.path().join("calc.png"))
            .unwrap();

        let resolver = resolver(icons.path());
        for entry in [
            Entry::normal("Calc", "calc.exe").with_icon_source("calc.png"),
            Entry::popup("Games", vec![]).with_icon_source("calc.png"),
            Entry::normal("Web", "https://example.com").with_icon_source("calc.png"),
        ] {
            match resolver.resolve_entry(&entry) {
                Icon::Image { image, origin } => {
                    assert_eq!((image.width, image.height), (4, 3));
                    assert_eq!(origin, IconOrigin::Explicit(icons.path().join("calc.png")));
                }
                other => panic!("expected explicit icon, got {}", other),
            }
        }
    }

    #[test]
    fn test_missing_icon_source_falls_through() {
        let icons = TempDir::new().unwrap();
        let entry = Entry::normal("Web", "https://example.com").with_icon_source("gone.png");
        assert!(resolver(icons.path())
            .resolve_entry(&entry)
            .is_builtin(BuiltinIcon::Globe));
    }

    #[test]
    fn test_corrupt_icon_source_degrades_to_unknown() {
        let icons = TempDir::new().unwrap();
        fs::write(icons.path().join("bad.png"), b"definitely not a png").unwrap();
        let entry = Entry::normal("Calc", "calc.exe").with_icon_source("bad.png");
        assert!(resolver(icons.path())
            .resolve_entry(&entry)
            .is_builtin(BuiltinIcon::Unknown));
    }

    #[test]
    fn test_existing_file_uses_associated_icon() {
        let icons = TempDir::new().unwrap();
        let doc = icons.path().join("notes.txt");
        fs::write(&doc, b"hello").unwrap();

        let with_slash = format!("{}/", doc.display());
        let icon = resolver(icons.path()).resolve_entry(&Entry::normal("Notes", with_slash));
        assert_eq!(icon.origin(), Some(&IconOrigin::Associated(doc)));
    }

    #[test]
    fn test_shortcut_uses_target_icon() {
        let dir = TempDir::new().unwrap();
        let link = dir.path().join("Editor.LNK");
        fs::write(&link, b"").unwrap();
        let target = PathBuf::from("C:\\Tools\\editor.exe");

        let resolver = resolver(dir.path()).with_shortcut_resolver(FakeShortcuts(Some(target.clone())));
        let icon = resolver.resolve_entry(&Entry::normal("Editor", link.to_string_lossy()));
        assert_eq!(icon.origin(), Some(&IconOrigin::ShortcutTarget(target)));
    }

    #[test]
    fn test_directory_is_folder_after_env_expansion() {
        let dir = TempDir::new().unwrap();
        std::env::set_var("PERCH_ICON_TEST_DIR", dir.path());

        let icon = resolver(dir.path()).resolve_entry(&Entry::normal("Docs", "%PERCH_ICON_TEST_DIR%"));
        assert!(icon.is_builtin(BuiltinIcon::Folder));
    }

    #[test]
    fn test_exe_not_on_path_is_unknown() {
        let icons = TempDir::new().unwrap();
        let icon = resolver(icons.path()).resolve_entry(&Entry::normal("Gone", "nowhere.EXE"));
        assert!(icon.is_builtin(BuiltinIcon::Unknown));
    }

    #[test]
    fn test_extraction_failure_degrades_to_unknown() {
        let icons = TempDir::new().unwrap();
        let mut on_path = HashMap::new();
        on_path.insert("broken.exe".to_string(), PathBuf::from("broken.exe"));
        let resolver = resolver(icons.path()).with_path_search(FakePathSearch(on_path));

        let icon = resolver.resolve_entry(&Entry::normal("Broken", "broken.exe"));
        assert!(icon.is_builtin(BuiltinIcon::Unknown));
    }

    #[test]
    fn test_unmatched_path_is_unknown() {
        let icons = TempDir::new().unwrap();
        let icon = resolver(icons.path()).resolve_entry(&Entry::normal("Odd", "just some words"));
        assert!(icon.is_builtin(BuiltinIcon::Unknown));
    }

    #[test]
    fn test_unknown_fallbacks_log_warnings() {
        let icons = TempDir::new().unwrap();
        let resolver = resolver(icons.path());

        let empty = warnings_from(|| {
            resolver.resolve_entry(&Entry::normal("Blank", ""));
        });
        assert!(empty.contains("WARN"));
        assert!(empty.contains("\"Blank\" has no path"));

        let missing_exe = warnings_from(|| {
            resolver.resolve_entry(&Entry::normal("Gone", "nowhere.exe"));
        });
        assert!(missing_exe.contains("WARN"));
        assert!(missing_exe.contains("nowhere.exe not found on PATH"));

        let unmatched = warnings_from(|| {
            resolver.resolve_entry(&Entry::normal("Odd", "just some words"));
        });
        assert!(unmatched.contains("WARN"));
        assert!(unmatched.contains("No icon rule matched"));
    }

    #[test]
    fn test_resolved_icons_do_not_warn() {
        let icons = TempDir::new().unwrap();
        let resolver = resolver(icons.path());
        let logged = warnings_from(|| {
            resolver.resolve_entry(&Entry::normal("Docs", "https://docs.rs"));
            resolver.resolve_entry(&Entry::popup("Games", vec![]));
        });
        assert!(logged.is_empty());
    }

    #[test]
    fn test_builtin_asset_lives_in_icons_dir() {
        let icons = TempDir::new().unwrap();
        let resolver = resolver(icons.path());
        assert_eq!(
            resolver.builtin_asset(BuiltinIcon::Globe),
            icons.path().join("globe.png")
        );
    }

    #[test]
    fn test_menu_entry_icons() {
        let icons = TempDir::new().unwrap();
        let resolver = resolver(icons.path());

        assert!(resolver
            .resolve_menu_entry(&MenuEntry::new_untitled(MenuItemType::Separator))
            .is_none());
        assert!(resolver
            .resolve_menu_entry(&MenuEntry::new_untitled(MenuItemType::SectionHeading))
            .is_none());
        assert_eq!(
            resolver.resolve_menu_entry(&MenuEntry::sub_menu("Sub", vec![])),
            Some(Icon::Builtin(BuiltinIcon::Folder))
        );
        assert_eq!(
            resolver.resolve_menu_entry(&MenuEntry::popup_reference("Games", "id")),
            Some(Icon::Builtin(BuiltinIcon::Popup))
        );
        assert!(resolver
            .resolve_menu_entry(&MenuEntry::item("Docs", "https://docs.rs"))
            .unwrap()
            .is_builtin(BuiltinIcon::Globe));
    }

    #[test]
    fn test_looks_like_url() {
        assert!(looks_like_url("http://localhost.dev/path"));
        assert!(looks_like_url("docs.rs"));
        assert!(!looks_like_url("localhost"));
        assert!(!looks_like_url("C:\\Windows"));
    }
}
