//! Table rendering for environment spec summaries.

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL};
use testrig_environment::{ResourceSummary, SpecSummary};

/// Render a spec summary as a table, one row per resource, groups flattened
/// in declaration order.
pub fn render_table(summary: &SpecSummary) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Group", "Resource", "Kind", "Static values"]);

    for group in &summary.groups {
        for member in &group.members {
            push_rows(&mut table, &group.id, member);
        }
    }
    table
}

fn push_rows(table: &mut Table, group_id: &str, resource: &ResourceSummary) {
    if resource.members.is_empty() {
        table.add_row(vec![
            Cell::new(group_id),
            Cell::new(&resource.id),
            Cell::new(&resource.kind),
            Cell::new(render_values(resource)),
        ]);
    } else {
        // Nested group: qualify members with the parent path.
        let path = format!("{}/{}", group_id, resource.id);
        for member in &resource.members {
            push_rows(table, &path, member);
        }
    }
}

fn render_values(resource: &ResourceSummary) -> String {
    resource
        .values
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("\n")
}
