//! Box-drawn table layout for pre-rendered (already colored) cells.
//!
//! Row 0 is the title row and is drawn with plain delimiters above the box.
//! Row 1 is the first boxed row. Any further rows are drawn below a middle
//! rule; absent rows are skipped.

use crate::width::{pad_right, visible_width};

/// One table row; `None` for a row that does not apply to this render.
pub type Row = Option<Vec<String>>;

struct Rule {
    left: char,
    fill: char,
    mid: char,
    right: char,
}

const TOP: Rule = Rule {
    left: '┌',
    fill: '─',
    mid: '┬',
    right: '┐',
};

const MIDDLE: Rule = Rule {
    left: '├',
    fill: '─',
    mid: '┼',
    right: '┤',
};

const BOTTOM: Rule = Rule {
    left: '└',
    fill: '─',
    mid: '┴',
    right: '┘',
};

const BOX_EDGE: char = '│';
const TITLE_EDGE: char = ' ';
const TITLE_SEPARATOR: char = '|';

/// Per-column width: one more than the widest cell any present row has at
/// that index. Short rows only contribute where they have cells.
pub fn column_widths(rows: &[Row], emoji_width: usize) -> Vec<usize> {
    let mut widths: Vec<usize> = Vec::new();
    for cells in rows.iter().flatten() {
        if widths.len() < cells.len() {
            widths.resize(cells.len(), 0);
        }
        for (i, cell) in cells.iter().enumerate() {
            widths[i] = widths[i].max(visible_width(cell, emoji_width) + 1);
        }
    }
    widths
}

/// Edge, then per column a space and the padded cell, separators between
/// columns, closing edge. Missing trailing cells render blank.
fn render_row(
    cells: &[String],
    widths: &[usize],
    edge: char,
    separator: char,
    emoji_width: usize,
) -> String {
    let mut line = String::new();
    line.push(edge);
    for (i, width) in widths.iter().enumerate() {
        let cell = cells.get(i).map(String::as_str).unwrap_or("");
        line.push(' ');
        line.push_str(&pad_right(cell, *width, emoji_width));
        if i + 1 < widths.len() {
            line.push(separator);
        }
    }
    line.push(edge);
    line
}

fn render_rule(widths: &[usize], rule: &Rule) -> String {
    let segments: Vec<String> = widths
        .iter()
        .map(|w| rule.fill.to_string().repeat(w + 1))
        .collect();
    format!(
        "{}{}{}",
        rule.left,
        segments.join(&rule.mid.to_string()),
        rule.right
    )
}

/// Render the whole block. Lines are joined with `\n`, no trailing newline.
pub fn render_grid(rows: &[Row], emoji_width: usize) -> String {
    let widths = column_widths(rows, emoji_width);
    let mut lines = Vec::new();

    if let Some(Some(title)) = rows.first() {
        lines.push(render_row(
            title,
            &widths,
            TITLE_EDGE,
            TITLE_SEPARATOR,
            emoji_width,
        ));
    }

    lines.push(render_rule(&widths, &TOP));

    if let Some(Some(head)) = rows.get(1) {
        lines.push(render_row(head, &widths, BOX_EDGE, BOX_EDGE, emoji_width));
    }

    let body: Vec<&Vec<String>> = rows.iter().skip(2).flatten().collect();
    if !body.is_empty() {
        lines.push(render_rule(&widths, &MIDDLE));
        for cells in body {
            lines.push(render_row(cells, &widths, BOX_EDGE, BOX_EDGE, emoji_width));
        }
    }

    lines.push(render_rule(&widths, &BOTTOM));
    lines.join("\n")
}
