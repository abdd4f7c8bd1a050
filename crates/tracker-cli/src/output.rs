use serde::Serialize;
use tracker_core::render::{self, DetailView, ListItem};

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let header_row: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| format!("{:width$}", h, width = widths[i]))
        .collect();
    println!("{}", header_row.join("  ").trim_end());

    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));

    for row in &rows {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

pub fn print_list(items: &[ListItem]) {
    if items.is_empty() {
        println!("No projects.");
        return;
    }
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            vec![
                item.index.to_string(),
                item.title.clone(),
                item.status.to_string(),
                item.image_count.to_string(),
            ]
        })
        .collect();
    print_table(&["#", "TITLE", "STATUS", "IMAGES"], rows);
}

pub fn print_detail(view: &DetailView) {
    println!("[{}] {}", view.index, view.title);
    let width = view
        .fields
        .iter()
        .map(|f| f.label.len())
        .max()
        .unwrap_or(0);
    for f in &view.fields {
        println!("  {:width$}  {}", format!("{}:", f.label), f.value, width = width + 1);
    }

    let notes = render::plain_text(&view.notes);
    if !notes.is_empty() {
        println!("Notes:");
        for line in notes.lines() {
            println!("  {line}");
        }
    }

    if !view.images.is_empty() {
        println!("Images:");
        for img in &view.images {
            println!("  [{}] {} ({} bytes encoded)", img.index, img.format, img.encoded_len);
        }
    }
}
