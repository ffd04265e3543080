use comfy_table::{
    Attribute, Cell, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use crossterm::style::Stylize;
use table_view::config::config::Config;
use table_view::config::preferences::Theme;
use table_view::{ComputedView, SortDirection};

/// Approximate pixels per terminal column when honouring column widths
const PIXELS_PER_CHAR: u32 = 8;

fn header_color(theme: Theme) -> Color {
    match theme {
        Theme::Dark => Color::Cyan,
        Theme::Light => Color::DarkBlue,
    }
}

fn sort_icon(config: &Config, sorted: Option<SortDirection>, sortable: bool) -> &str {
    let icons = &config.display.icons;
    match sorted {
        Some(SortDirection::Ascending) => &icons.sort_ascending,
        Some(SortDirection::Descending) => &icons.sort_descending,
        None if sortable => &icons.unsorted,
        None => "",
    }
}

/// Render one computed page to stdout
pub fn display_view(view: &ComputedView, config: &Config, theme: Theme) {
    if view.headers.is_empty() {
        println!("{}", "All columns are hidden.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let show_numbers = config.display.show_row_numbers;
    let mut headers = Vec::new();
    let mut constraints = Vec::new();
    if show_numbers {
        headers.push(Cell::new("#").add_attribute(Attribute::Bold));
        constraints.push(ColumnConstraint::ContentWidth);
    }
    for header in &view.headers {
        let icon = sort_icon(config, header.sorted, header.sortable);
        let text = if icon.is_empty() {
            header.label.clone()
        } else {
            format!("{} {}", header.label, icon)
        };
        headers.push(
            Cell::new(text)
                .add_attribute(Attribute::Bold)
                .fg(header_color(theme)),
        );
        let chars = (header.width / PIXELS_PER_CHAR).clamp(1, u32::from(u16::MAX)) as u16;
        constraints.push(ColumnConstraint::UpperBoundary(Width::Fixed(chars)));
    }
    table.set_header(headers);
    table.set_constraints(constraints);

    for (offset, row) in view.display_rows().into_iter().enumerate() {
        let mut cells = Vec::with_capacity(row.len() + 1);
        if show_numbers {
            cells.push(Cell::new(view.page.range.start + offset + 1));
        }
        cells.extend(row.into_iter().map(Cell::new));
        table.add_row(cells);
    }

    if view.row_count() == 0 {
        println!("{}", "No results found.".yellow());
    } else {
        println!("{table}");
    }

    let prev = if view.can_previous() { "◀ prev" } else { "" };
    let next = if view.can_next() { "next ▶" } else { "" };
    println!(
        "\n{}  {} {}",
        format!(
            "{} · {} of {} rows",
            view.page_label(),
            view.total_rows,
            view.source_rows
        )
        .green(),
        prev.dark_grey(),
        next.dark_grey()
    );
}
