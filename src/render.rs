use crate::types::RollPlan;

const MAX_WIDTH: f64 = 80.0;

/// Draws a roll as a single line, e.g. `|--40--|-30-|....|`.
/// Waste is filled with `.`; pieces are labelled when the label fits.
pub fn render_roll(parent_width: f64, plan: &RollPlan) -> String {
    if parent_width <= 0.0 {
        return String::new();
    }
    let scale = MAX_WIDTH / parent_width;
    let cols = MAX_WIDTH as usize;
    let mut line = vec![' '; cols + 1];

    let mut offset = 0.0;
    let mut start = 0usize;
    line[0] = '|';

    for &piece in &plan.pieces {
        offset += piece;
        let end = ((offset * scale).round() as usize).clamp(start, cols);
        draw_segment(&mut line, start, end, '-', Some(&piece.to_string()));
        start = end;
    }

    if plan.waste > 0.0 && start < cols {
        draw_segment(&mut line, start, cols, '.', None);
    }

    let out: String = line.into_iter().collect();
    out.trim_end().to_string()
}

fn draw_segment(line: &mut [char], start: usize, end: usize, fill: char, label: Option<&str>) {
    if end <= start {
        return;
    }
    for c in &mut line[start + 1..end] {
        *c = fill;
    }
    line[end] = '|';

    if let Some(label) = label {
        let inner = end - start - 1;
        let chars: Vec<char> = label.chars().collect();
        if chars.len() <= inner {
            let from = start + 1 + (inner - chars.len()) / 2;
            line[from..from + chars.len()].copy_from_slice(&chars);
        }
    }
}
