use crate::demo::LayerRow;
use crate::models::geometry::GeometryExtent;
use comfy_table::{Attribute, Cell, CellAlignment, Table};

pub fn layer_table(rows: &[LayerRow]) -> Table {
    let mut table = Table::new();
    table
        .set_header(vec![
            Cell::new("")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center),
            Cell::new("Layer")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center),
            Cell::new("Zoom range")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center),
            Cell::new("Features")
                .add_attribute(Attribute::Bold)
                .set_alignment(CellAlignment::Center),
        ])
        .load_preset(comfy_table::presets::ASCII_BORDERS_ONLY_CONDENSED);

    for row in rows {
        let marker = match (row.visible, row.rendered) {
            (false, _) => "⬜",
            (true, 0) => "⚠️",
            (true, _) => "✅",
        };
        table.add_row(vec![
            Cell::new(marker).set_alignment(CellAlignment::Center),
            Cell::new(&row.name),
            Cell::new(&row.zoom).set_alignment(CellAlignment::Center),
            Cell::new(row.rendered).set_alignment(CellAlignment::Center),
        ]);
    }
    table
}

pub fn print_layer_summary(step: &str, zoom: f64, bounds: &GeometryExtent, rows: &[LayerRow]) {
    println!("\n▶ {} (zoom {}, bbox {})", step, zoom, bounds);
    println!("{}", layer_table(rows));

    // visible but empty usually means the zoom gate is closed
    let empty: Vec<&str> = rows
        .iter()
        .filter(|r| r.visible && r.rendered == 0)
        .map(|r| r.name.as_str())
        .collect();
    if !empty.is_empty() {
        println!("  ⚠️ Nothing drawn for: {}", empty.join(", "));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lists_every_row() {
        let rows = vec![
            LayerRow {
                name: "bbox_points".into(),
                visible: true,
                zoom: "*..*".into(),
                rendered: 12,
            },
            LayerRow {
                name: "bbox_polygons".into(),
                visible: false,
                zoom: "15..*".into(),
                rendered: 0,
            },
        ];
        let rendered = layer_table(&rows).to_string();
        assert!(rendered.contains("bbox_points"));
        assert!(rendered.contains("bbox_polygons"));
        assert!(rendered.contains("15..*"));
        assert!(rendered.contains("12"));
    }
}
