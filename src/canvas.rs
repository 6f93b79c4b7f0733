// SPDX: CC0-1.0

//! In-memory [`Surface`] that records what was drawn and can serialize it as
//! SVG.

use crate::{
    chart::Resolution,
    render::{Color, Surface},
    Number, Point,
};
use core::fmt::{self, Write};

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Line {
        from: Point<Number>,
        to: Point<Number>,
        color: Color,
        width: Number,
    },
    Rect {
        at: Point<Number>,
        width: Number,
        height: Number,
        color: Color,
    },
    Circle {
        center: Point<Number>,
        radius: Number,
        color: Color,
    },
    Text {
        text: String,
        at: Point<Number>,
        color: Color,
        font: String,
    },
}

#[derive(Clone, Debug)]
pub struct Canvas {
    resolution: Resolution,
    shapes: Vec<Shape>,
    stroke_color: Color,
    fill_color: Color,
    line_width: Number,
    font: String,
    cursor: Option<Point<Number>>,
    pending: Vec<(Point<Number>, Point<Number>)>,
}

impl Canvas {
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            shapes: Vec::new(),
            stroke_color: Color::BLACK,
            fill_color: Color::BLACK,
            line_width: 1.0,
            font: String::from("10px sans-serif"),
            cursor: None,
            pending: Vec::new(),
        }
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn lines(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(|s| matches!(s, Shape::Line { .. }))
    }

    pub fn rects(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(|s| matches!(s, Shape::Rect { .. }))
    }

    pub fn circles(&self) -> impl Iterator<Item = &Shape> {
        self.shapes
            .iter()
            .filter(|s| matches!(s, Shape::Circle { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(|s| match s {
            Shape::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    /// Writes the recorded shapes as a standalone SVG document.
    pub fn write_svg<W: Write>(&self, mut out: W) -> fmt::Result {
        let (w, h) = (self.resolution.width(), self.resolution.height());
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
        )?;
        writeln!(out, r#"  <rect width="{w}" height="{h}" fill="white"/>"#)?;
        for shape in &self.shapes {
            match shape {
                Shape::Line {
                    from,
                    to,
                    color,
                    width,
                } => writeln!(
                    out,
                    r#"  <line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{color}" stroke-width="{width}"/>"#,
                    from.x, from.y, to.x, to.y
                )?,
                Shape::Rect {
                    at,
                    width,
                    height,
                    color,
                } => writeln!(
                    out,
                    r#"  <rect x="{}" y="{}" width="{width}" height="{height}" fill="{color}"/>"#,
                    at.x, at.y
                )?,
                Shape::Circle {
                    center,
                    radius,
                    color,
                } => writeln!(
                    out,
                    r#"  <circle cx="{}" cy="{}" r="{radius}" fill="{color}"/>"#,
                    center.x, center.y
                )?,
                Shape::Text {
                    text,
                    at,
                    color,
                    font,
                } => writeln!(
                    out,
                    r#"  <text x="{}" y="{}" fill="{color}" style="font: {font}">{}</text>"#,
                    at.x,
                    at.y,
                    Escaped(text)
                )?,
            }
        }
        writeln!(out, "</svg>")
    }

    pub fn to_svg(&self) -> String {
        let mut s = String::new();
        // writing into a String cannot fail
        let _ = self.write_svg(&mut s);
        s
    }
}

struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                c => f.write_char(c)?,
            }
        }
        Ok(())
    }
}

impl Surface for Canvas {
    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn clear(&mut self) {
        self.shapes.clear();
        self.begin_path();
    }

    fn begin_path(&mut self) {
        self.cursor = None;
        self.pending.clear();
    }

    fn move_to(&mut self, x: Number, y: Number) {
        self.cursor = Some(Point { x, y });
    }

    fn line_to(&mut self, x: Number, y: Number) {
        let to = Point { x, y };
        // like a 2D canvas, a line without a current point only moves
        if let Some(from) = self.cursor {
            self.pending.push((from, to));
        }
        self.cursor = Some(to);
    }

    fn stroke(&mut self) {
        let (color, width) = (self.stroke_color, self.line_width);
        self.shapes
            .extend(self.pending.drain(..).map(|(from, to)| Shape::Line {
                from,
                to,
                color,
                width,
            }));
    }

    fn fill_rect(&mut self, x: Number, y: Number, width: Number, height: Number) {
        // normalize negative extents the way a 2D canvas does
        let (x, width) = if width < 0.0 { (x + width, -width) } else { (x, width) };
        let (y, height) = if height < 0.0 {
            (y + height, -height)
        } else {
            (y, height)
        };
        self.shapes.push(Shape::Rect {
            at: Point { x, y },
            width,
            height,
            color: self.fill_color,
        });
    }

    fn fill_circle(&mut self, x: Number, y: Number, radius: Number) {
        self.shapes.push(Shape::Circle {
            center: Point { x, y },
            radius,
            color: self.fill_color,
        });
    }

    fn fill_text(&mut self, text: &str, x: Number, y: Number) {
        self.shapes.push(Shape::Text {
            text: text.to_string(),
            at: Point { x, y },
            color: self.fill_color,
            font: self.font.clone(),
        });
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.stroke_color = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.fill_color = color;
    }

    fn set_line_width(&mut self, width: Number) {
        self.line_width = width;
    }

    fn set_font(&mut self, font: &str) {
        self.font = font.to_string();
    }
}
