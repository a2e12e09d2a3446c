//! Scatter plot layout and SVG rendering.

use std::fmt::Write as _;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Point};
use crate::error::{Error, Result};
use crate::float_fmt::{fmt_f64_fixed, fmt_f64_trim};

pub const POINT_COLOR: &str = "#8ff0a4";
pub const CENTER_COLOR: &str = "#e01b24";
/// Grid lines per axis.
pub const GRID_LINES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlotSpec {
    pub width: usize,
    pub height: usize,
    pub padding: usize,
    pub title: String,
}

impl Default for PlotSpec {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            padding: 50,
            title: "Data".to_string(),
        }
    }
}

impl PlotSpec {
    pub fn plot_width(&self) -> usize {
        self.width.saturating_sub(self.padding.saturating_mul(2))
    }

    pub fn plot_height(&self) -> usize {
        self.height.saturating_sub(self.padding.saturating_mul(2))
    }

    pub fn validate(&self) -> Result<()> {
        if self.plot_width() == 0 || self.plot_height() == 0 {
            return Err(Error::PlotTooSmall {
                width: self.width,
                height: self.height,
                padding: self.padding,
            });
        }
        Ok(())
    }
}

/// Data-space window, widened by one unit on each side and snapped to integers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Bounds {
    pub x_min: f64,
    pub y_min: f64,
    pub x_range: f64,
    pub y_range: f64,
}

impl Bounds {
    /// `None` for an empty slice. A window that collapses to zero width (huge
    /// magnitudes swallow the +-1) is widened to one unit.
    pub fn from_points(points: &[Point]) -> Option<Bounds> {
        let first = points.first()?;
        let (mut x_lo, mut x_hi, mut y_lo, mut y_hi) = (first.x, first.x, first.y, first.y);
        for p in &points[1..] {
            x_lo = x_lo.min(p.x);
            x_hi = x_hi.max(p.x);
            y_lo = y_lo.min(p.y);
            y_hi = y_hi.max(p.y);
        }

        let x_min = (x_lo - 1.0).round();
        let y_min = (y_lo - 1.0).round();
        Some(Bounds {
            x_min,
            y_min,
            x_range: span(x_min, x_hi),
            y_range: span(y_min, y_hi),
        })
    }

    /// Both ranges are finite and positive, so projection never divides by
    /// zero or produces NaN.
    pub fn is_plottable(&self) -> bool {
        [self.x_min, self.y_min, self.x_range, self.y_range]
            .iter()
            .all(|v| v.is_finite())
            && self.x_range > 0.0
            && self.y_range > 0.0
    }
}

fn span(min: f64, hi: f64) -> f64 {
    let range = (hi + 1.0).round() - min;
    if range == 0.0 {
        1.0
    } else {
        range
    }
}

/// Maps data coordinates onto the padded SVG canvas (y grows upwards).
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    bounds: Bounds,
    padding: f64,
    plot_w: f64,
    plot_h: f64,
}

impl Layout {
    pub fn new(bounds: Bounds, spec: &PlotSpec) -> Self {
        Self {
            bounds,
            padding: spec.padding as f64,
            plot_w: spec.plot_width() as f64,
            plot_h: spec.plot_height() as f64,
        }
    }

    pub fn project(&self, p: &Point) -> Point {
        let b = &self.bounds;
        Point {
            x: (p.x - b.x_min) / b.x_range * self.plot_w + self.padding,
            y: (p.y - b.y_min) / b.y_range * -self.plot_h + self.padding + self.plot_h,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Graph {
    pub name: String,
    pub color: String,
    pub points: Vec<Point>,
    pub bounds: Bounds,
}

impl Graph {
    pub fn new(name: impl Into<String>, data: &Dataset) -> Result<Self> {
        let bounds = Bounds::from_points(data.points()).ok_or(Error::EmptyDataset)?;
        if !bounds.is_plottable() {
            return Err(Error::UnplottableRange);
        }
        Ok(Self {
            name: name.into(),
            color: POINT_COLOR.to_string(),
            points: data.points().to_vec(),
            bounds,
        })
    }

    pub fn size(&self) -> usize {
        self.points.len()
    }

    /// Render the scatter plot, overlaying `centers` (in data space) if any.
    pub fn draw_svg(&self, spec: &PlotSpec, centers: &[Point]) -> Result<String> {
        spec.validate()?;
        let layout = Layout::new(self.bounds, spec);
        let pad = spec.padding as f64;
        let pw = spec.plot_width() as f64;
        let ph = spec.plot_height() as f64;
        let n = |v: f64| fmt_f64_fixed(v, 2);

        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" class="kfit-plot">"#,
            w = spec.width,
            h = spec.height,
        );
        let _ = writeln!(
            out,
            r#"<title>{}</title>"#,
            escape_xml(&self.name)
        );
        let _ = writeln!(
            out,
            r##"<rect x="0" y="0" width="{}" height="{}" fill="#1e1e1e"/>"##,
            spec.width, spec.height
        );
        let _ = writeln!(
            out,
            r##"<text x="{}" y="{}" text-anchor="middle" fill="#ffffff" font-size="18">{}</text>"##,
            n(spec.width as f64 / 2.0),
            n(pad / 2.0 + 6.0),
            escape_xml(&self.name)
        );

        out.push_str("<g class=\"grid\" stroke=\"#444444\" stroke-width=\"1\">\n");
        for i in 0..=GRID_LINES {
            let f = i as f64 / GRID_LINES as f64;
            let x = pad + f * pw;
            let y = pad + ph - f * ph;
            let _ = writeln!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                n(x),
                n(pad),
                n(x),
                n(pad + ph)
            );
            let _ = writeln!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}"/>"#,
                n(pad),
                n(y),
                n(pad + pw),
                n(y)
            );
        }
        out.push_str("</g>\n");

        out.push_str("<g class=\"labels\" fill=\"#bbbbbb\" font-size=\"11\">\n");
        for i in 0..=GRID_LINES {
            let f = i as f64 / GRID_LINES as f64;
            let xv = self.bounds.x_min + f * self.bounds.x_range;
            let yv = self.bounds.y_min + f * self.bounds.y_range;
            let _ = writeln!(
                out,
                r#"<text x="{}" y="{}" text-anchor="middle">{}</text>"#,
                n(pad + f * pw),
                n(pad + ph + 16.0),
                fmt_f64_trim(xv, 2)
            );
            let _ = writeln!(
                out,
                r#"<text x="{}" y="{}" text-anchor="end">{}</text>"#,
                n(pad - 6.0),
                n(pad + ph - f * ph + 4.0),
                fmt_f64_trim(yv, 2)
            );
        }
        out.push_str("</g>\n");

        let _ = writeln!(
            out,
            r#"<g class="points" fill="{}">"#,
            escape_xml(&self.color)
        );
        for p in &self.points {
            let s = layout.project(p);
            let _ = writeln!(out, r#"<circle cx="{}" cy="{}" r="3"/>"#, n(s.x), n(s.y));
        }
        out.push_str("</g>\n");

        if !centers.is_empty() {
            let _ = writeln!(
                out,
                r#"<g class="centers" fill="none" stroke="{CENTER_COLOR}" stroke-width="2">"#
            );
            for c in centers {
                let s = layout.project(c);
                let _ = writeln!(out, r#"<circle cx="{}" cy="{}" r="7"/>"#, n(s.x), n(s.y));
            }
            out.push_str("</g>\n");
        }

        out.push_str("</svg>\n");
        Ok(out)
    }
}

pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
