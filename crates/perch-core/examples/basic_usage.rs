//! Basic usage example - show the list and the icon of every entry

use perch_core::{Launchpad, Result};

fn main() -> Result<()> {
    // Get data directory from args or use a local one
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "./example-data".to_string());
    std::fs::create_dir_all(&path)?;

    println!("Opening launcher data in: {}", path);
    let pad = Launchpad::open(&path)?;

    let resolver = pad.icon_resolver();
    let icons = pad.resolve_list_icons(&resolver);

    println!("Found {} entries:", pad.list().node_count());
    pad.list().walk(|entry, depth| {
        let icon = icons
            .get(&entry.item_id)
            .map(|icon| icon.to_string())
            .unwrap_or_default();
        println!("{}- {} ({})", "  ".repeat(depth), entry.title, icon);
    });

    Ok(())
}
