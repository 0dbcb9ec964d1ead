//! Interactive UpSet plot generation using D3.js.
//!
//! UpSet plots visualize the intersections of multiple sets. The generator
//! assembles a self-contained HTML document by hand:
//! - CSS scoped to a per-plot DOM id (so plots can coexist in one page)
//! - The aggregation data embedded as a JSON literal
//! - A D3 v7 script drawing intersection-size bars, the set membership
//!   dot matrix with connection lines, per-set size bars, and tooltips

use crate::parser::schema::UpsetData;
use crate::utils::config::{
    DEFAULT_BAR_COLOR, DEFAULT_HIGHLIGHT_COLOR, DEFAULT_PLOT_HEIGHT, DEFAULT_PLOT_TITLE,
    DEFAULT_PLOT_WIDTH,
};
use crate::utils::error::PlotError;
use log::info;
use std::sync::atomic::{AtomicU64, Ordering};

// Per-process counter for plot DOM ids
static NEXT_PLOT_ID: AtomicU64 = AtomicU64::new(1);

/// Plot configuration
#[derive(Debug, Clone)]
pub struct PlotConfig {
    pub title: String,
    pub width: usize,
    pub height: usize,
    pub bar_color: String,
    pub highlight_color: String,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_PLOT_TITLE.to_string(),
            width: DEFAULT_PLOT_WIDTH,
            height: DEFAULT_PLOT_HEIGHT,
            bar_color: DEFAULT_BAR_COLOR.to_string(),
            highlight_color: DEFAULT_HIGHLIGHT_COLOR.to_string(),
        }
    }
}

impl PlotConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_bar_color(mut self, color: impl Into<String>) -> Self {
        self.bar_color = color.into();
        self
    }

    pub fn with_highlight_color(mut self, color: impl Into<String>) -> Self {
        self.highlight_color = color.into();
        self
    }
}

/// An UpSet plot over aggregated trace data
///
/// **Public** - constructed by the profiler wrapper or directly from
/// `UpsetData`, then rendered to HTML
#[derive(Debug, Clone)]
pub struct UpSetPlot {
    data: UpsetData,
    config: PlotConfig,
    plot_id: String,
}

impl UpSetPlot {
    /// Create a plot with a process-unique DOM id
    ///
    /// **Public** - constructor
    pub fn new(data: UpsetData, config: PlotConfig) -> Self {
        let n = NEXT_PLOT_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            data,
            config,
            plot_id: format!("upset-plot-{}", n),
        }
    }

    /// DOM id of this plot's container element
    pub fn plot_id(&self) -> &str {
        &self.plot_id
    }

    /// Render a complete standalone HTML document
    ///
    /// **Public** - main entry point for plot generation
    ///
    /// An empty dataset renders a valid (empty) chart, not an error.
    ///
    /// # Errors
    /// * `PlotError::SerializationFailed` - embedding the data JSON failed
    pub fn render(&self) -> Result<String, PlotError> {
        info!(
            "Generating UpSet plot with {} intersections over {} sets",
            self.data.intersections.len(),
            self.data.sets.len()
        );

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>{title}</title>
    <script src="https://d3js.org/d3.v7.min.js"></script>
    <style>
{css}
    </style>
</head>
<body>
    <div id="{plot_id}" class="upset-container"></div>
    <script>
{script}
    </script>
</body>
</html>
"#,
            title = html_escape(&self.config.title),
            css = self.render_css(),
            plot_id = self.plot_id,
            script = self.render_script()?,
        );

        info!("UpSet plot generated successfully ({} bytes)", html.len());
        Ok(html)
    }

    /// Instantiate the CSS template for this plot
    ///
    /// **Private** - internal helper for render
    fn render_css(&self) -> String {
        CSS_TEMPLATE
            .replace("__PLOT_ID__", &self.plot_id)
            .replace("__BAR_COLOR__", &self.config.bar_color)
            .replace("__HIGHLIGHT_COLOR__", &self.config.highlight_color)
    }

    /// Instantiate the D3 script template for this plot
    ///
    /// **Private** - internal helper for render
    fn render_script(&self) -> Result<String, PlotError> {
        let data_json = serde_json::to_string(&self.data)?;
        let title_json = serde_json::to_string(&self.config.title)?;

        Ok(SCRIPT_TEMPLATE
            .replace("__DATA__", &data_json)
            .replace("__TITLE__", &title_json)
            .replace("__PLOT_ID__", &self.plot_id)
            .replace("__WIDTH__", &self.config.width.to_string())
            .replace("__HEIGHT__", &self.config.height.to_string()))
    }
}

/// Minimal HTML escaping for text nodes
///
/// **Private** - internal utility
fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

// CSS scoped to the plot container. Tokens: __PLOT_ID__, __BAR_COLOR__,
// __HIGHLIGHT_COLOR__.
const CSS_TEMPLATE: &str = r#"
        #__PLOT_ID__ {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            margin: 20px;
        }
        #__PLOT_ID__ .upset-title {
            font-size: 18px;
            font-weight: 600;
            margin-bottom: 10px;
            color: #333;
        }
        #__PLOT_ID__ .upset-subtitle {
            font-size: 12px;
            color: #666;
            margin-bottom: 20px;
        }
        #__PLOT_ID__ .bar {
            fill: __BAR_COLOR__;
            transition: fill 0.2s ease;
        }
        #__PLOT_ID__ .bar:hover {
            fill: __HIGHLIGHT_COLOR__;
        }
        #__PLOT_ID__ .matrix-dot {
            transition: fill 0.2s ease;
        }
        #__PLOT_ID__ .matrix-dot.active {
            fill: #333;
        }
        #__PLOT_ID__ .matrix-dot.inactive {
            fill: #e0e0e0;
        }
        #__PLOT_ID__ .matrix-dot:hover {
            stroke: __HIGHLIGHT_COLOR__;
            stroke-width: 2;
        }
        #__PLOT_ID__ .set-label {
            font-size: 12px;
            fill: #333;
        }
        #__PLOT_ID__ .axis-label {
            font-size: 11px;
            fill: #666;
        }
        #__PLOT_ID__ .bar-label {
            font-size: 10px;
            fill: #333;
        }
        #__PLOT_ID__ .connection-line {
            stroke: #333;
            stroke-width: 2;
        }
        #__PLOT_ID__ .tooltip {
            position: absolute;
            background: rgba(0, 0, 0, 0.8);
            color: white;
            padding: 8px 12px;
            border-radius: 4px;
            font-size: 12px;
            pointer-events: none;
            z-index: 1000;
        }
        #__PLOT_ID__ .set-size-bar {
            fill: #999;
        }
        #__PLOT_ID__ .grid-line {
            stroke: #eee;
            stroke-width: 1;
        }
"#;

// D3 drawing script. Tokens: __DATA__, __TITLE__, __PLOT_ID__, __WIDTH__,
// __HEIGHT__. The configured width/height act as minimum canvas dimensions;
// the chart grows with the number of intersections and sets.
const SCRIPT_TEMPLATE: &str = r##"
        (function() {
            const data = __DATA__;
            const containerId = "__PLOT_ID__";
            const minWidth = __WIDTH__;
            const minHeight = __HEIGHT__;

            const container = d3.select("#" + containerId);
            container.html("");

            container.append("div")
                .attr("class", "upset-title")
                .text(__TITLE__);

            container.append("div")
                .attr("class", "upset-subtitle")
                .text("Total traces: " + data.total_traces + " | Unique tools: " + data.sets.length);

            const margin = {top: 60, right: 40, bottom: 20, left: 150};
            const matrixWidth = data.intersections.length * 25;
            const barHeight = 200;
            const matrixHeight = data.sets.length * 25;
            const setSizeWidth = 100;

            const svgWidth = Math.max(minWidth, margin.left + setSizeWidth + matrixWidth + margin.right);
            const svgHeight = Math.max(minHeight, margin.top + barHeight + matrixHeight + margin.bottom);

            const svg = container.append("svg")
                .attr("width", svgWidth)
                .attr("height", svgHeight);

            const tooltip = container.append("div")
                .attr("class", "tooltip")
                .style("opacity", 0);

            const xScale = d3.scaleBand()
                .domain(d3.range(data.intersections.length))
                .range([margin.left + setSizeWidth, margin.left + setSizeWidth + matrixWidth])
                .padding(0.2);

            const yBarScale = d3.scaleLinear()
                .domain([0, d3.max(data.intersections, d => d.size) || 1])
                .range([margin.top + barHeight, margin.top]);

            const yMatrixScale = d3.scaleBand()
                .domain(data.sets)
                .range([margin.top + barHeight, margin.top + barHeight + matrixHeight])
                .padding(0.2);

            const setSizes = {};
            data.sets.forEach(s => setSizes[s] = 0);
            data.intersections.forEach(inter => {
                inter.sets.forEach(s => {
                    setSizes[s] += inter.size;
                });
            });

            const setSizeScale = d3.scaleLinear()
                .domain([0, d3.max(Object.values(setSizes)) || 1])
                .range([0, setSizeWidth - 10]);

            svg.selectAll(".bar")
                .data(data.intersections)
                .enter()
                .append("rect")
                .attr("class", "bar")
                .attr("x", (d, i) => xScale(i))
                .attr("y", d => yBarScale(d.size))
                .attr("width", xScale.bandwidth())
                .attr("height", d => margin.top + barHeight - yBarScale(d.size))
                .on("mouseover", function(event, d) {
                    tooltip.transition()
                        .duration(200)
                        .style("opacity", 0.9);
                    tooltip.html("Tools: " + d.sets.join(", ") + "<br/>Count: " + d.size)
                        .style("left", (event.pageX + 10) + "px")
                        .style("top", (event.pageY - 28) + "px");
                })
                .on("mouseout", function() {
                    tooltip.transition()
                        .duration(500)
                        .style("opacity", 0);
                });

            svg.selectAll(".bar-label")
                .data(data.intersections)
                .enter()
                .append("text")
                .attr("class", "bar-label")
                .attr("x", (d, i) => xScale(i) + xScale.bandwidth() / 2)
                .attr("y", d => yBarScale(d.size) - 5)
                .attr("text-anchor", "middle")
                .text(d => d.size);

            svg.append("g")
                .attr("class", "axis-label")
                .attr("transform", "translate(" + (margin.left + setSizeWidth - 5) + ", 0)")
                .call(d3.axisLeft(yBarScale).ticks(5));

            svg.selectAll(".set-label")
                .data(data.sets)
                .enter()
                .append("text")
                .attr("class", "set-label")
                .attr("x", margin.left + setSizeWidth - 10)
                .attr("y", d => yMatrixScale(d) + yMatrixScale.bandwidth() / 2)
                .attr("dy", "0.35em")
                .attr("text-anchor", "end")
                .text(d => d);

            svg.selectAll(".set-size-bar")
                .data(data.sets)
                .enter()
                .append("rect")
                .attr("class", "set-size-bar")
                .attr("x", d => margin.left + setSizeWidth - setSizeScale(setSizes[d]) - 10)
                .attr("y", d => yMatrixScale(d) + yMatrixScale.bandwidth() * 0.2)
                .attr("width", d => setSizeScale(setSizes[d]))
                .attr("height", yMatrixScale.bandwidth() * 0.6)
                .on("mouseover", function(event, d) {
                    tooltip.transition()
                        .duration(200)
                        .style("opacity", 0.9);
                    tooltip.html("Tool: " + d + "<br/>Used in: " + setSizes[d] + " traces")
                        .style("left", (event.pageX + 10) + "px")
                        .style("top", (event.pageY - 28) + "px");
                })
                .on("mouseout", function() {
                    tooltip.transition()
                        .duration(500)
                        .style("opacity", 0);
                });

            data.intersections.forEach((inter, i) => {
                const activeSets = new Set(inter.sets);

                const activeIndices = data.sets
                    .map((s, idx) => activeSets.has(s) ? idx : -1)
                    .filter(idx => idx >= 0);

                if (activeIndices.length > 1) {
                    const minIdx = Math.min(...activeIndices);
                    const maxIdx = Math.max(...activeIndices);
                    svg.append("line")
                        .attr("class", "connection-line")
                        .attr("x1", xScale(i) + xScale.bandwidth() / 2)
                        .attr("y1", yMatrixScale(data.sets[minIdx]) + yMatrixScale.bandwidth() / 2)
                        .attr("x2", xScale(i) + xScale.bandwidth() / 2)
                        .attr("y2", yMatrixScale(data.sets[maxIdx]) + yMatrixScale.bandwidth() / 2);
                }

                data.sets.forEach((set, j) => {
                    const isActive = activeSets.has(set);
                    svg.append("circle")
                        .attr("class", "matrix-dot " + (isActive ? "active" : "inactive"))
                        .attr("cx", xScale(i) + xScale.bandwidth() / 2)
                        .attr("cy", yMatrixScale(set) + yMatrixScale.bandwidth() / 2)
                        .attr("r", 6);
                });
            });

            svg.append("text")
                .attr("class", "axis-label")
                .attr("x", margin.left + setSizeWidth + matrixWidth / 2)
                .attr("y", margin.top - 30)
                .attr("text-anchor", "middle")
                .text("Intersection Size");

            svg.append("text")
                .attr("class", "axis-label")
                .attr("x", margin.left)
                .attr("y", margin.top + barHeight + matrixHeight / 2)
                .attr("text-anchor", "middle")
                .attr("transform", "rotate(-90, " + margin.left + ", " + (margin.top + barHeight + matrixHeight / 2) + ")")
                .text("Set Size");
        })();
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::schema::Intersection;

    fn sample_data() -> UpsetData {
        UpsetData {
            sets: vec!["read".to_string(), "search".to_string()],
            intersections: vec![Intersection {
                sets: vec!["read".to_string(), "search".to_string()],
                size: 2,
            }],
            total_traces: 2,
        }
    }

    #[test]
    fn test_render_embeds_id_data_and_config() {
        let plot = UpSetPlot::new(
            sample_data(),
            PlotConfig::new()
                .with_title("My Plot")
                .with_size(640, 480)
                .with_bar_color("#112233"),
        );

        let html = plot.render().unwrap();

        assert!(html.contains(plot.plot_id()));
        assert!(html.contains(r#""total_traces":2"#));
        assert!(html.contains("\"My Plot\""));
        assert!(html.contains("const minWidth = 640;"));
        assert!(html.contains("const minHeight = 480;"));
        assert!(html.contains("#112233"));
        assert!(html.contains("d3.v7.min.js"));
    }

    #[test]
    fn test_plot_ids_are_distinct() {
        let a = UpSetPlot::new(sample_data(), PlotConfig::default());
        let b = UpSetPlot::new(sample_data(), PlotConfig::default());
        assert_ne!(a.plot_id(), b.plot_id());
    }

    #[test]
    fn test_render_empty_data_is_valid() {
        let plot = UpSetPlot::new(UpsetData::default(), PlotConfig::default());
        let html = plot.render().unwrap();
        assert!(html.contains("<!DOCTYPE html>"));
        assert!(html.contains(r#""sets":[]"#));
    }

    #[test]
    fn test_title_is_escaped_in_head() {
        let plot = UpSetPlot::new(
            UpsetData::default(),
            PlotConfig::new().with_title("<script>"),
        );
        let html = plot.render().unwrap();
        assert!(html.contains("<title>&lt;script&gt;</title>"));
    }
}
