//! Static SVG Sankey renderer.
//!
//! Nodes sit at their fixed normalized positions; bar heights are
//! proportional to the weight each node carries. Links are drawn as
//! cubic bands stacked in edge order at both ends.

use crate::error::RenderError;
use crate::format::escape_markup;
use crate::render::{ChartFormat, ChartLayout, ChartRenderer};
use crate::sankey::SankeyData;
use std::fmt::Write;

/// Share of the plot height taken by the heaviest node.
const NODE_FILL: f64 = 0.5;
/// Smallest bar drawn, so zero-weight nodes stay visible.
const MIN_NODE_HEIGHT: f64 = 1.0;
/// Nodes right of this x position get their label on the left.
const LABEL_FLIP_X: f64 = 0.9;
/// Gap between a bar and its label.
const LABEL_GAP: f64 = 6.0;

/// Pixel rectangle of a node bar.
#[derive(Debug, Clone, Copy, PartialEq)]
struct NodeBox {
    x: f64,
    y: f64,
    height: f64,
}

/// Renders Sankey charts as standalone SVG documents.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    layout: ChartLayout,
}

impl SvgRenderer {
    /// Create a renderer with a custom layout.
    pub const fn new(layout: ChartLayout) -> Self {
        Self { layout }
    }

    /// Layout in use.
    pub const fn layout(&self) -> &ChartLayout {
        &self.layout
    }

    fn node_boxes(&self, data: &SankeyData, scale: f64) -> Vec<NodeBox> {
        let layout = &self.layout;
        let (left, top) = (layout.margin.left, layout.margin.top);
        let plot_height = layout.plot_height();
        let track = layout.plot_width() - layout.node_thickness;

        (0..data.node_count())
            .map(|i| {
                let height = (data.node_value(i) as f64 * scale).max(MIN_NODE_HEIGHT);
                let center = top + data.y[i].clamp(0.0, 1.0) * plot_height;
                let lowest = (top + plot_height - height).max(top);
                NodeBox {
                    x: left + data.x[i].clamp(0.0, 1.0) * track,
                    y: (center - height / 2.0).clamp(top, lowest),
                    height,
                }
            })
            .collect()
    }

    fn write_links(
        &self,
        out: &mut String,
        data: &SankeyData,
        boxes: &[NodeBox],
        scale: f64,
    ) -> std::fmt::Result {
        let thickness = self.layout.node_thickness;
        let mut out_offset = vec![0.0; boxes.len()];
        let mut in_offset = vec![0.0; boxes.len()];

        writeln!(out, r#"<g class="links">"#)?;
        for link in 0..data.link_count() {
            let (s, t) = (data.source[link], data.target[link]);
            let band = data.value[link] as f64 * scale;

            let x0 = boxes[s].x + thickness;
            let x1 = boxes[t].x;
            let y0 = boxes[s].y + out_offset[s];
            let y1 = boxes[t].y + in_offset[t];
            out_offset[s] += band;
            in_offset[t] += band;

            let mid = (x0 + x1) / 2.0;
            writeln!(
                out,
                r#"<path d="M{x0:.2},{y0:.2} C{mid:.2},{y0:.2} {mid:.2},{y1:.2} {x1:.2},{y1:.2} L{x1:.2},{y1b:.2} C{mid:.2},{y1b:.2} {mid:.2},{y0b:.2} {x0:.2},{y0b:.2} Z" fill="{color}" fill-opacity="0.8"/>"#,
                y0b = y0 + band,
                y1b = y1 + band,
                color = escape_markup(&data.link_colors[link]),
            )?;
        }
        writeln!(out, "</g>")
    }

    fn write_nodes(
        &self,
        out: &mut String,
        data: &SankeyData,
        boxes: &[NodeBox],
    ) -> std::fmt::Result {
        let layout = &self.layout;

        writeln!(out, r#"<g class="nodes">"#)?;
        for (i, node) in boxes.iter().enumerate() {
            writeln!(
                out,
                r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"/>"#,
                node.x,
                node.y,
                layout.node_thickness,
                node.height,
                escape_markup(&data.node_colors[i]),
            )?;
        }
        writeln!(out, "</g>")?;

        writeln!(
            out,
            r#"<g class="labels" font-size="{}" fill="black">"#,
            layout.label_size
        )?;
        for (i, node) in boxes.iter().enumerate() {
            let (x, anchor) = if data.x[i] > LABEL_FLIP_X {
                (node.x - LABEL_GAP, "end")
            } else {
                (node.x + layout.node_thickness + LABEL_GAP, "start")
            };
            let lines = data.label_lines(i);
            // Center the block of lines on the bar.
            let first = node.y + node.height / 2.0
                - (lines.len().saturating_sub(1) as f64) * layout.label_size * 0.6;

            write!(
                out,
                r#"<text x="{x:.2}" y="{first:.2}" text-anchor="{anchor}" dominant-baseline="middle">"#
            )?;
            for (n, line) in lines.iter().enumerate() {
                let dy = if n == 0 { "0" } else { "1.2em" };
                write!(
                    out,
                    r#"<tspan x="{x:.2}" dy="{dy}">{}</tspan>"#,
                    escape_markup(line)
                )?;
            }
            writeln!(out, "</text>")?;
        }
        writeln!(out, "</g>")
    }

    fn document(&self, data: &SankeyData, title: &str) -> Result<String, std::fmt::Error> {
        let layout = &self.layout;
        let max_value = (0..data.node_count())
            .map(|i| data.node_value(i))
            .max()
            .unwrap_or(0)
            .max(1);
        let scale = layout.plot_height() * NODE_FILL / max_value as f64;
        let boxes = self.node_boxes(data, scale);

        let mut out = String::new();
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
            w = layout.width,
            h = layout.height,
            font = escape_markup(&layout.font_family),
        )?;
        writeln!(out, r#"<rect width="100%" height="100%" fill="white"/>"#)?;
        writeln!(
            out,
            r##"<text class="title" x="{:.2}" y="{:.2}" font-size="{}" fill="#444">{}</text>"##,
            layout.margin.left,
            layout.margin.top / 2.0 + layout.font_size / 2.0,
            layout.font_size + 2.0,
            escape_markup(title),
        )?;
        self.write_links(&mut out, data, &boxes, scale)?;
        self.write_nodes(&mut out, data, &boxes)?;
        writeln!(out, "</svg>")?;
        Ok(out)
    }
}

impl ChartRenderer for SvgRenderer {
    fn format(&self) -> ChartFormat {
        ChartFormat::Svg
    }

    fn render(&self, data: &SankeyData, title: &str) -> Result<Vec<u8>, RenderError> {
        if data.node_count() == 0 {
            return Err(RenderError::EmptyGraph);
        }
        Ok(self.document(data, title)?.into_bytes())
    }
}
