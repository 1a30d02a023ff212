use crate::layout::{Area, GanttChart, GridKind, Point};
use std::fmt::{self, Write};

const COMPLETE: &str = "#0000ff";
const INCOMPLETE: &str = "#ff0000";
const CONNECTOR: &str = "#606060";
const GROUP_THICKNESS: i32 = 3;
const FONT_SIZE: i32 = 11;

/// Paints the chart as a standalone SVG document.
pub fn render(chart: &GanttChart) -> Result<String, fmt::Error> {
    let layout = &chart.layout;
    let pad = layout.padding;
    let (width, height) = (layout.canvas.width, layout.canvas.height);

    let mut out = String::new();
    writeln!(
        out,
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="Arial, sans-serif" font-size="{FONT_SIZE}">"##
    )?;
    writeln!(out, r##"<rect width="100%" height="100%" fill="#ffffff"/>"##)?;

    for line in &layout.grid {
        let (stroke, stroke_width, top) = match line.kind {
            GridKind::Day => ("#80c0ff", 2, 0),
            GridKind::Quarter => ("#80c0ff", 1, 0),
            GridKind::Hour => ("#e0e0ff", 1, 16),
        };
        writeln!(
            out,
            r##"<line x1="{x}" y1="{top}" x2="{x}" y2="{height}" stroke="{stroke}" stroke-width="{stroke_width}"/>"##,
            x = line.x
        )?;
        if let Some(label) = &line.label {
            writeln!(
                out,
                r##"<text x="{}" y="2" dominant-baseline="hanging" fill="#0000ff">{}</text>"##,
                line.x + 1,
                escape(label)
            )?;
        }
    }

    for conn in &chart.connections {
        writeln!(
            out,
            r##"<polyline points="{}" fill="none" stroke="{CONNECTOR}"/>"##,
            points(&conn.path, pad)
        )?;
        writeln!(
            out,
            r##"<polygon points="{}" fill="{CONNECTOR}"/>"##,
            points(&conn.arrow, pad)
        )?;
    }

    for area in &layout.areas {
        write_area(&mut out, area, pad)?;
    }

    out.push_str("</svg>\n");
    Ok(out)
}

fn write_area(out: &mut String, area: &Area, pad: i32) -> fmt::Result {
    let r = area.rect.offset(pad, pad);
    let color = if area.percent_complete >= 100.0 {
        COMPLETE
    } else {
        INCOMPLETE
    };

    if area.is_group {
        let t = GROUP_THICKNESS;
        let bracket = [
            Point::new(r.x, r.bottom()),
            Point::new(r.x, r.y),
            Point::new(r.right(), r.y),
            Point::new(r.right(), r.bottom()),
            Point::new(r.right() - t, r.y + t),
            Point::new(r.x + t, r.y + t),
        ];
        writeln!(out, r##"<polygon points="{}" fill="{color}"/>"##, points(&bracket, 0))?;
    } else if area.is_milestone {
        let (hw, hh) = (r.width / 2, r.height / 2);
        let diamond = [
            Point::new(r.x + hw, r.y),
            Point::new(r.x, r.y + hh),
            Point::new(r.x + hw, r.bottom()),
            Point::new(r.right(), r.y + hh),
        ];
        writeln!(out, r##"<polygon points="{}" fill="{color}"/>"##, points(&diamond, 0))?;
    } else {
        let done = (r.width as f64 * area.percent_complete / 100.0) as i32;
        writeln!(
            out,
            r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#8080ff" fill-opacity="0.59"/>"##,
            r.x, r.y, done, r.height
        )?;
        writeln!(
            out,
            r##"<rect x="{}" y="{}" width="{}" height="{}" fill="#ffffff" fill-opacity="0.59"/>"##,
            r.x + done,
            r.y,
            r.width - done,
            r.height
        )?;
        writeln!(
            out,
            r##"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{color}"/>"##,
            r.x, r.y, r.width, r.height
        )?;
    }

    let text = area.text_rect.offset(pad, pad);
    let lines: Vec<&str> = area.display_label.lines().collect();
    let line_height = text.height / lines.len().max(1) as i32;
    write!(
        out,
        r##"<text x="{}" y="{}" dominant-baseline="hanging" fill="#000000">"##,
        text.x, text.y
    )?;
    for (idx, line) in lines.iter().enumerate() {
        let dy = if idx == 0 { 0 } else { line_height };
        write!(
            out,
            r##"<tspan x="{}" dy="{dy}">{}</tspan>"##,
            text.x,
            escape(line)
        )?;
    }
    out.push_str("</text>\n");
    Ok(())
}

fn points(points: &[Point], offset: i32) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", p.x + offset, p.y + offset))
        .collect::<Vec<_>>()
        .join(" ")
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
