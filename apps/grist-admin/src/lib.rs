//! Shared plumbing for the grist-admin binaries

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

/// Table with the house style
pub fn styled_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

/// Print the error to stderr and exit non-zero
pub fn fail(err: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", err);
    std::process::exit(1);
}
