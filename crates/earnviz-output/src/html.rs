//! Interactive HTML renderer backed by plotly.js.

use crate::error::RenderError;
use crate::format::escape_markup;
use crate::render::{ChartFormat, ChartLayout, ChartRenderer};
use crate::sankey::SankeyData;
use serde_json::{Value, json};

/// plotly.js bundle loaded by generated pages.
pub const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Renders Sankey charts as self-contained plotly.js pages.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    layout: ChartLayout,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(ChartLayout::default())
    }
}

impl HtmlRenderer {
    /// Create a renderer with a custom layout.
    pub const fn new(layout: ChartLayout) -> Self {
        Self { layout }
    }

    /// The plotly figure (`data` and `layout`) for a chart.
    pub fn figure(&self, data: &SankeyData, title: &str) -> Value {
        let layout = &self.layout;
        json!({
            "data": [{
                "type": "sankey",
                "arrangement": "fixed",
                "node": {
                    "pad": layout.node_pad,
                    "thickness": layout.node_thickness,
                    "line": {"color": "black", "width": 0.0},
                    "label": data.labels,
                    "color": data.node_colors,
                    "x": data.x,
                    "y": data.y,
                },
                "textfont": {
                    "family": layout.font_family,
                    "size": layout.label_size,
                    "color": "black",
                },
                "link": {
                    "source": data.source,
                    "target": data.target,
                    "value": data.value,
                    "color": data.link_colors,
                },
            }],
            "layout": {
                "title": {"text": title},
                "font": {"size": layout.font_size},
                "width": layout.width,
                "height": layout.height,
                "margin": {
                    "t": layout.margin.top,
                    "b": layout.margin.bottom,
                    "l": layout.margin.left,
                    "r": layout.margin.right,
                },
            },
        })
    }
}

impl ChartRenderer for HtmlRenderer {
    fn format(&self) -> ChartFormat {
        ChartFormat::Html
    }

    fn render(&self, data: &SankeyData, title: &str) -> Result<Vec<u8>, RenderError> {
        if data.node_count() == 0 {
            return Err(RenderError::EmptyGraph);
        }
        // A literal "</" would end the script element early.
        let figure = serde_json::to_string(&self.figure(data, title))?.replace("</", "<\\/");

        let page = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{src}"></script>
</head>
<body>
<div id="chart"></div>
<script>
const figure = {figure};
Plotly.newPlot("chart", figure.data, figure.layout);
</script>
</body>
</html>
"#,
            title = escape_markup(title),
            src = PLOTLY_CDN,
        );
        Ok(page.into_bytes())
    }
}
