//! Interactive HTML bitrate report.
//!
//! Produces a single self-contained HTML page with a zoomable Chart.js
//! line chart of the series, an optional target line, and a statistics
//! panel. The page pulls Chart.js from a CDN; the data is embedded.

use std::{fs, path::Path};

use serde_json::json;

use crate::aggregate::BitrateSeries;
use crate::configuration::ChartOptions;
use crate::error::BitrateError;
use crate::statistics::BitrateStatistics;

/// Build the HTML report as a string.
pub fn render_html(
    series: &BitrateSeries,
    statistics: &BitrateStatistics,
    options: &ChartOptions,
) -> Result<String, BitrateError> {
    let points: Vec<_> = series
        .points()
        .iter()
        .map(|point| json!({ "x": point.time_sec, "y": point.rate_kbps }))
        .collect();

    let mut datasets = vec![json!({
        "label": "bitrate (kbps)",
        "data": points,
        "borderColor": "#1f77b4",
        "borderWidth": 1,
        "pointRadius": 0,
        "tension": 0,
    })];

    if let Some(target) = options.target_bitrate_kbps {
        let (x_max, _) = crate::chart::axis_bounds(series, Some(target));
        datasets.push(json!({
            "label": format!("target ({target} kbps)"),
            "data": [{ "x": 0.0, "y": target }, { "x": x_max, "y": target }],
            "borderColor": "#d62728",
            "borderWidth": 2,
            "borderDash": [6, 4],
            "pointRadius": 0,
        }));
    }

    let datasets = serde_json::to_string(&datasets)?;
    let title = escape_html(&options.title());
    let stats_panel = if statistics.has_data() {
        format!(
            r#"<div class="stat"><span>min</span>{:.1} kbps</div>
            <div class="stat"><span>max</span>{:.1} kbps</div>
            <div class="stat"><span>avg</span>{:.1} kbps</div>
            <div class="stat"><span>buckets</span>{} × {} s</div>"#,
            statistics.min_kbps,
            statistics.max_kbps,
            statistics.avg_kbps,
            statistics.point_count,
            series.window_sec(),
        )
    } else {
        r#"<div class="stat">No packets in the selected stream.</div>"#.to_string()
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <script src="https://cdn.jsdelivr.net/npm/chart.js@4.4.0/dist/chart.umd.min.js"></script>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            padding: 20px;
            background: #f5f5f5;
        }}
        .container {{
            max-width: {width}px;
            margin: 0 auto;
            background: white;
            padding: 24px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        .stats {{
            display: flex;
            gap: 16px;
            margin: 16px 0;
        }}
        .stat {{
            background: #f8f9fa;
            padding: 10px 14px;
            border-left: 4px solid #1f77b4;
            border-radius: 4px;
        }}
        .stat span {{
            display: block;
            font-size: 12px;
            color: #666;
        }}
        .chart-container {{
            position: relative;
            height: {height}px;
        }}
    </style>
</head>
<body>
    <div class="container">
        <h1>{title}</h1>
        <div class="stats">
            {stats_panel}
        </div>
        <div class="chart-container">
            <canvas id="bitrate"></canvas>
        </div>
    </div>
    <script>
        new Chart(document.getElementById('bitrate'), {{
            type: 'line',
            data: {{ datasets: {datasets} }},
            options: {{
                responsive: true,
                maintainAspectRatio: false,
                parsing: false,
                interaction: {{ mode: 'nearest', axis: 'x', intersect: false }},
                scales: {{
                    x: {{ type: 'linear', min: 0, title: {{ display: true, text: 'Time (s)' }} }},
                    y: {{ beginAtZero: true, title: {{ display: true, text: 'Bitrate (kbps)' }} }}
                }}
            }}
        }});
    </script>
</body>
</html>
"#,
        width = options.width,
        height = options.height,
    ))
}

/// Build the HTML report and write it to `path`.
pub fn save_html<P: AsRef<Path>>(
    series: &BitrateSeries,
    statistics: &BitrateStatistics,
    options: &ChartOptions,
    path: P,
) -> Result<(), BitrateError> {
    log::debug!("Writing HTML report to {}", path.as_ref().display());
    fs::write(path, render_html(series, statistics, options)?)?;
    Ok(())
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
