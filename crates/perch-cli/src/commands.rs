//! Sub-command definitions and handlers.

use crate::host::ConsoleHost;
use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand, ValueEnum};
use perch_core::{
    Entry, Forest, Icon, InsertPosition, Launchpad, MenuEntry, MenuItemType, TreeNode,
};
use std::path::PathBuf;
use tracing::info;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the main list
    List {
        /// Print the raw JSON records
        #[arg(long)]
        json: bool,
    },
    /// Show the tray menu
    Menu {
        #[arg(long)]
        json: bool,
    },
    /// Show every pop-up with its id
    Popups,
    /// Show the icon each entry resolves to
    Icons {
        /// Resolve tray menu items instead of list entries
        #[arg(long)]
        menu: bool,
    },
    /// Create an untitled list entry to be renamed afterwards
    New {
        /// Create a pop-up instead of a plain entry
        #[arg(long)]
        popup: bool,
        #[command(flatten)]
        place: Placement,
    },
    /// Add a list entry
    Add {
        title: String,
        /// File, folder, program or URL (empty for a pop-up)
        #[arg(default_value = "")]
        path: String,
        #[arg(long, default_value = "")]
        args: String,
        /// Working directory
        #[arg(long, default_value = "")]
        dir: String,
        /// Icon file name inside the icons directory
        #[arg(long, default_value = "")]
        icon: String,
        #[arg(long)]
        popup: bool,
        #[arg(long)]
        elevated: bool,
        #[command(flatten)]
        place: Placement,
    },
    /// Add a tray menu item
    AddMenu {
        #[arg(value_enum)]
        kind: MenuKind,
        #[arg(default_value = "")]
        title: String,
        #[arg(default_value = "")]
        path: String,
        #[arg(long, default_value = "")]
        args: String,
        /// Pop-up opened by a popup-ref item
        #[arg(long, default_value = "")]
        popup_id: String,
        #[command(flatten)]
        place: Placement,
    },
    /// Rename an entry or menu item
    Rename {
        id: String,
        title: String,
        #[arg(long)]
        menu: bool,
    },
    /// Remove an entry or menu item
    Remove {
        id: String,
        #[arg(long)]
        menu: bool,
        /// Required when the node has children
        #[arg(long)]
        cascade: bool,
    },
    /// Move a node under another parent or to another position
    Move {
        id: String,
        /// New parent id; omit for the top level
        #[arg(long)]
        parent: Option<String>,
        #[arg(long, default_value_t = usize::MAX)]
        index: usize,
        #[arg(long)]
        menu: bool,
    },
    /// Launch a list entry
    Launch { id: String },
    /// Launch a tray menu item
    LaunchMenu { id: String },
    /// Copy the data file to a backup
    Backup {
        /// File or directory; defaults to the current directory
        destination: Option<PathBuf>,
        #[arg(long)]
        menu: bool,
    },
    /// Replace the data with the contents of another file
    Import {
        file: PathBuf,
        #[arg(long)]
        menu: bool,
    },
    /// Report duplicate ids, untitled nodes and dangling pop-up references
    Check,
}

/// Where a new node goes.
#[derive(Args, Debug, Default)]
pub struct Placement {
    /// Insert before this id
    #[arg(long, conflicts_with = "after")]
    before: Option<String>,
    /// Insert after this id
    #[arg(long)]
    after: Option<String>,
}

impl Placement {
    fn resolve(&self) -> (Option<&str>, InsertPosition) {
        match (&self.before, &self.after) {
            (Some(id), _) => (Some(id.as_str()), InsertPosition::Before),
            (None, Some(id)) => (Some(id.as_str()), InsertPosition::After),
            (None, None) => (None, InsertPosition::After),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum MenuKind {
    Item,
    SubMenu,
    Heading,
    Separator,
    PopupRef,
}

impl From<MenuKind> for MenuItemType {
    fn from(kind: MenuKind) -> Self {
        match kind {
            MenuKind::Item => MenuItemType::MenuItem,
            MenuKind::SubMenu => MenuItemType::SubMenu,
            MenuKind::Heading => MenuItemType::SectionHeading,
            MenuKind::Separator => MenuItemType::Separator,
            MenuKind::PopupRef => MenuItemType::PopupReference,
        }
    }
}

pub fn run(pad: &mut Launchpad, command: Command) -> Result<()> {
    match command {
        Command::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(pad.list().nodes())?);
            } else {
                print_forest(pad.list(), |e| e.file_path_or_uri.as_str());
            }
        }
        Command::Menu { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(pad.menu().nodes())?);
            } else {
                print_forest(pad.menu(), |m| match m.item_type {
                    MenuItemType::PopupReference => m.popup_id.as_str(),
                    _ => m.file_path_or_uri.as_str(),
                });
            }
        }
        Command::Popups => {
            for popup in pad.popups() {
                println!("{}  [{}]", popup.title, popup.item_id);
            }
        }
        Command::Icons { menu } => {
            let resolver = pad.icon_resolver();
            let describe = |icon: &Icon| match icon.builtin() {
                Some(builtin) => format!(
                    "{} ({})",
                    icon,
                    resolver.builtin_asset(builtin).display()
                ),
                None => icon.to_string(),
            };
            if menu {
                let icons = pad.resolve_menu_icons(&resolver);
                pad.menu().walk(|item, depth| {
                    if let Some(icon) = icons.get(&item.item_id) {
                        println!("{}{}: {}", indent(depth), item.title, describe(icon));
                    }
                });
            } else {
                let icons = pad.resolve_list_icons(&resolver);
                pad.list().walk(|entry, depth| {
                    if let Some(icon) = icons.get(&entry.item_id) {
                        println!("{}{}: {}", indent(depth), entry.title, describe(icon));
                    }
                });
            }
        }
        Command::New { popup, place } => {
            let entry = Entry::new_untitled(if popup {
                perch_core::EntryType::Popup
            } else {
                perch_core::EntryType::Normal
            });
            let id = entry.item_id.clone();
            let (selected, position) = place.resolve();
            pad.edit_list(|list| list.create_untitled(selected, entry, position))?;
            println!("{}", id);
        }
        Command::Add {
            title,
            path,
            args,
            dir,
            icon,
            popup,
            elevated,
            place,
        } => {
            let mut entry = if popup {
                Entry::popup(title, Vec::new())
            } else {
                Entry::normal(title, path)
            }
            .with_arguments(args)
            .with_working_directory(dir)
            .with_icon_source(icon);
            entry.run_elevated = elevated;

            let id = entry.item_id.clone();
            let (selected, position) = place.resolve();
            pad.edit_list(|list| list.add(selected, entry, position))?;
            println!("{}", id);
        }
        Command::AddMenu {
            kind,
            title,
            path,
            args,
            popup_id,
            place,
        } => {
            let mut item = MenuEntry::new_untitled(kind.into());
            if !title.is_empty() {
                item.title = title;
            }
            item.file_path_or_uri = path;
            item.arguments = args;
            if matches!(kind, MenuKind::PopupRef) {
                if perch_core::tree::resolve_popup(pad.list(), &popup_id).is_none() {
                    bail!("{} is not the id of a pop-up", popup_id);
                }
                item.popup_id = popup_id;
            }

            let id = item.item_id.clone();
            let (selected, position) = place.resolve();
            pad.edit_menu(|menu| menu.add(selected, item, position))?;
            println!("{}", id);
        }
        Command::Rename { id, title, menu } => {
            let found = if menu {
                pad.edit_menu(|m| m.rename(&id, title))
            } else {
                pad.edit_list(|l| l.rename(&id, title))
            };
            if !found {
                bail!("No item with id {}", id);
            }
        }
        Command::Remove { id, menu, cascade } => {
            let has_children = if menu {
                pad.menu().has_children(&id)
            } else {
                pad.list().has_children(&id)
            };
            if has_children && !cascade {
                bail!("{} has child items; pass --cascade to remove them too", id);
            }
            let removed = if menu {
                pad.edit_menu(|m| m.remove_by_id(&id).map(|n| n.title().to_string()))
            } else {
                pad.edit_list(|l| l.remove_by_id(&id).map(|n| n.title().to_string()))
            };
            match removed {
                Some(title) => info!("Removed {}", title),
                None => bail!("No item with id {}", id),
            }
        }
        Command::Move {
            id,
            parent,
            index,
            menu,
        } => {
            let parent = parent.as_deref();
            if menu {
                pad.edit_menu(|m| m.move_node(&id, parent, index))?;
            } else {
                pad.edit_list(|l| l.move_node(&id, parent, index))?;
            }
        }
        Command::Launch { id } => {
            let executor = pad.launch_executor();
            let mut host = ConsoleHost;
            if !pad.launch(&id, &executor, &mut host)? {
                bail!("Launch failed");
            }
        }
        Command::LaunchMenu { id } => {
            let executor = pad.launch_executor();
            let mut host = ConsoleHost;
            if !pad.launch_menu(&id, &executor, &mut host)? {
                bail!("Nothing was launched");
            }
        }
        Command::Backup { destination, menu } => {
            let destination = match destination {
                Some(path) => path,
                None => std::env::current_dir().context("reading current directory")?,
            };
            let written = if menu {
                pad.backup_menu(&destination)?
            } else {
                pad.backup_list(&destination)?
            };
            println!("{}", written.display());
        }
        Command::Import { file, menu } => {
            let count = if menu {
                pad.import_menu(&file)?
            } else {
                pad.import_list(&file)?
            };
            println!("Imported {} top-level items from {}", count, file.display());
        }
        Command::Check => {
            let report = pad.diagnose();
            if report.is_clean() {
                println!("No problems found");
                return Ok(());
            }
            for id in &report.duplicate_list_ids {
                println!("duplicate list id: {}", id);
            }
            for id in &report.duplicate_menu_ids {
                println!("duplicate menu id: {}", id);
            }
            for title in &report.untitled {
                println!("untitled node: {}", title);
            }
            for title in &report.dangling_references {
                println!("dangling pop-up reference: {}", title);
            }
            bail!("Data files have problems");
        }
    }
    Ok(())
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn print_forest<T: TreeNode>(forest: &Forest<T>, detail: impl Fn(&T) -> &str) {
    if forest.is_empty() {
        println!("(empty)");
        return;
    }
    forest.walk(|node, depth| {
        let detail = detail(node);
        if detail.is_empty() {
            println!("{}{}  [{}]", indent(depth), node.title(), node.item_id());
        } else {
            println!(
                "{}{}  [{}]  {}",
                indent(depth),
                node.title(),
                node.item_id(),
                detail
            );
        }
    });
}
