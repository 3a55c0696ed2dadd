//! SVG line chart of thermochron curves
//!
//! The most recent season (last in the list) is drawn thick and black on
//! top; older seasons are thin, translucent and cycle through a 10-colour
//! palette. A dashed line marks freezing.

use crate::render::RenderOptions;
use crate::types::ThermochronResult;

const WIDTH: f64 = 1000.0;
const HEIGHT: f64 = 600.0;
const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 170.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 80.0;

const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd",
    "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// SVG formatter for thermochron results
pub struct SvgFormatter;

/// Data-to-pixel mapping for the plot area
struct Frame {
    max_k: f64,
    y_min: f64,
    y_max: f64,
}

impl Frame {
    fn x(&self, k: f64) -> f64 {
        let span = (self.max_k - 1.0).max(1.0);
        MARGIN_LEFT + (k - 1.0) / span * (WIDTH - MARGIN_LEFT - MARGIN_RIGHT)
    }

    fn y(&self, value: f64) -> f64 {
        let span = self.y_max - self.y_min;
        HEIGHT - MARGIN_BOTTOM - (value - self.y_min) / span * (HEIGHT - MARGIN_TOP - MARGIN_BOTTOM)
    }
}

impl SvgFormatter {
    /// Format results as a standalone SVG document
    pub fn format(results: &[ThermochronResult], options: &RenderOptions) -> String {
        let max_k = options.max_k;
        let frame = Self::frame(results, max_k, options.freezing_point);
        let mut svg = String::with_capacity(16 * 1024);

        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\" font-family=\"system-ui, sans-serif\">\n",
            w = WIDTH,
            h = HEIGHT
        ));
        svg.push_str(&format!("<rect width=\"{}\" height=\"{}\" fill=\"white\"/>\n", WIDTH, HEIGHT));

        Self::push_grid(&mut svg, &frame);
        Self::push_freezing_line(&mut svg, &frame, options);

        // Older seasons first so the current one paints on top
        let current = results.len().saturating_sub(1);
        for (i, result) in results.iter().enumerate() {
            let is_current = i == current;
            let (color, width, opacity) = if is_current {
                ("black", 3.5, 1.0)
            } else {
                (PALETTE[i % PALETTE.len()], 1.2, 0.45)
            };

            let points: Vec<String> = result
                .k_values
                .iter()
                .zip(&result.thermochron_values)
                .take(max_k)
                .map(|(&k, &v)| format!("{:.1},{:.1}", frame.x(k as f64), frame.y(v)))
                .collect();

            svg.push_str(&format!(
                "<polyline class=\"season{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" stroke-opacity=\"{}\" points=\"{}\"/>\n",
                if is_current { " current" } else { "" },
                color,
                width,
                opacity,
                points.join(" ")
            ));

            // Legend entry
            let ly = MARGIN_TOP + 10.0 + i as f64 * 18.0;
            let lx = WIDTH - MARGIN_RIGHT + 15.0;
            svg.push_str(&format!(
                "<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"{}\" stroke-width=\"{}\" stroke-opacity=\"{}\"/>\n",
                lx, ly, lx + 20.0, ly, color, width, opacity
            ));
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" dominant-baseline=\"middle\">{}</text>\n",
                lx + 26.0,
                ly,
                escape_xml(&result.season.label)
            ));
        }

        // Title, axis labels, caption
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"30\" font-size=\"18\" text-anchor=\"middle\">{}</text>\n",
            (MARGIN_LEFT + WIDTH - MARGIN_RIGHT) / 2.0,
            escape_xml(&options.title_for(results))
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"13\" text-anchor=\"middle\">k (streak length in days)</text>\n",
            (MARGIN_LEFT + WIDTH - MARGIN_RIGHT) / 2.0,
            HEIGHT - MARGIN_BOTTOM + 40.0
        ));
        svg.push_str(&format!(
            "<text x=\"20\" y=\"{y:.1}\" font-size=\"13\" text-anchor=\"middle\" transform=\"rotate(-90 20 {y:.1})\">Temperature ({unit})</text>\n",
            y = (MARGIN_TOP + HEIGHT - MARGIN_BOTTOM) / 2.0,
            unit = escape_xml(&options.unit_symbol)
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" font-style=\"italic\" fill=\"gray\" text-anchor=\"middle\">thermochron(k) = coldest k-day streak's highest daily high</text>\n",
            (MARGIN_LEFT + WIDTH - MARGIN_RIGHT) / 2.0,
            HEIGHT - 15.0
        ));

        svg.push_str("</svg>\n");
        svg
    }

    /// Axis ranges covering every displayed value plus the freezing line
    fn frame(results: &[ThermochronResult], max_k: usize, freezing_point: f64) -> Frame {
        let (lo, hi) = results
            .iter()
            .flat_map(|r| r.thermochron_values.iter().take(max_k))
            .fold((freezing_point, freezing_point), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        // Snap outward to multiples of 10 with at least one step of headroom
        let y_min = (lo / 10.0).floor() * 10.0;
        let mut y_max = (hi / 10.0).ceil() * 10.0;
        if y_max - y_min < 10.0 {
            y_max = y_min + 10.0;
        }

        Frame {
            max_k: max_k as f64,
            y_min,
            y_max,
        }
    }

    fn push_grid(svg: &mut String, frame: &Frame) {
        let left = MARGIN_LEFT;
        let right = WIDTH - MARGIN_RIGHT;
        let top = MARGIN_TOP;
        let bottom = HEIGHT - MARGIN_BOTTOM;

        svg.push_str("<g class=\"grid\" stroke=\"#000\" stroke-opacity=\"0.3\" stroke-width=\"0.5\">\n");
        let mut t = frame.y_min;
        while t <= frame.y_max + 1e-9 {
            let y = frame.y(t);
            svg.push_str(&format!("<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\"/>\n", left, y, right, y));
            t += 10.0;
        }
        let mut k = 1.0;
        while k <= frame.max_k + 1e-9 {
            let x = frame.x(k);
            svg.push_str(&format!("<line x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\"/>\n", x, top, x, bottom));
            k += 7.0;
        }
        svg.push_str("</g>\n");

        // Tick labels
        let mut t = frame.y_min;
        while t <= frame.y_max + 1e-9 {
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"end\" dominant-baseline=\"middle\">{}</text>\n",
                left - 6.0,
                frame.y(t),
                t
            ));
            t += 10.0;
        }
        let mut k = 1.0;
        while k <= frame.max_k + 1e-9 {
            svg.push_str(&format!(
                "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"11\" text-anchor=\"middle\">{}</text>\n",
                frame.x(k),
                bottom + 16.0,
                k
            ));
            k += 7.0;
        }

        svg.push_str(&format!(
            "<rect x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"none\" stroke=\"black\"/>\n",
            left,
            top,
            right - left,
            bottom - top
        ));
    }

    fn push_freezing_line(svg: &mut String, frame: &Frame, options: &RenderOptions) {
        let y = frame.y(options.freezing_point);
        svg.push_str(&format!(
            "<line class=\"freezing\" x1=\"{:.1}\" y1=\"{:.1}\" x2=\"{:.1}\" y2=\"{:.1}\" stroke=\"gray\" stroke-dasharray=\"6 4\" stroke-opacity=\"0.7\"/>\n",
            MARGIN_LEFT,
            y,
            WIDTH - MARGIN_RIGHT,
            y
        ));
        svg.push_str(&format!(
            "<text x=\"{:.1}\" y=\"{:.1}\" font-size=\"10\" fill=\"gray\">{}{}</text>\n",
            MARGIN_LEFT + 6.0,
            y - 4.0,
            options.freezing_point,
            escape_xml(&options.unit_symbol)
        ));
    }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
