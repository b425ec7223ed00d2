//! Turns chart models into ECharts-style option documents and pushes them
//! through an explicit handle. No chart state lives outside the handle, so
//! any number of charts can be driven side by side.

use serde_json::{Value, json};

use crate::model::charts::{HeatmapChartModel, RadialChartModel, Ring, RingKind, SeriesPoint};
use crate::model::palette::YL_OR_RD;

const CENTER: [&str; 2] = ["50%", "60%"];

/// A render target: a browser chart, an off-screen canvas, or a plain buffer.
pub trait ChartSurface {
    fn set_option(&mut self, option: &Value, not_merge: bool);
    fn resize(&mut self, width: u32, height: u32);
    fn dispose(&mut self);
}

/// Owns one surface across repeated updates.
#[derive(Debug)]
pub struct ChartHandle<S: ChartSurface> {
    surface: S,
    updates: usize,
}

impl<S: ChartSurface> ChartHandle<S> {
    pub fn new(surface: S) -> Self {
        Self {
            surface,
            updates: 0,
        }
    }

    pub fn update(&mut self, option: &Value) {
        self.surface.set_option(option, true);
        self.updates += 1;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.surface.resize(width, height);
    }

    pub fn updates(&self) -> usize {
        self.updates
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Releases the surface and hands it back.
    pub fn dispose(mut self) -> S {
        self.surface.dispose();
        self.surface
    }
}

/// In-memory surface that keeps the last option it was given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonSurface {
    pub option: Option<Value>,
    pub size: Option<(u32, u32)>,
    pub disposed: bool,
}

impl ChartSurface for JsonSurface {
    fn set_option(&mut self, option: &Value, not_merge: bool) {
        if !not_merge {
            if let (Some(Value::Object(current)), Value::Object(next)) =
                (self.option.as_mut(), option)
            {
                for (k, v) in next {
                    current.insert(k.clone(), v.clone());
                }
                return;
            }
        }
        self.option = Some(option.clone());
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.size = Some((width, height));
    }

    fn dispose(&mut self) {
        self.option = None;
        self.disposed = true;
    }
}

pub fn render_radial<S: ChartSurface>(handle: &mut ChartHandle<S>, model: &RadialChartModel) {
    handle.update(&radial_option(model));
}

pub fn render_heatmap<S: ChartSurface>(handle: &mut ChartHandle<S>, model: &HeatmapChartModel) {
    handle.update(&heatmap_option(model));
}

pub fn radial_option(model: &RadialChartModel) -> Value {
    let gauge = SeriesPoint::Gauge(model.gauge.clone());
    let mut series = vec![json!({
        "type": "gauge",
        "startAngle": 220,
        "endAngle": -40,
        "center": CENTER,
        "radius": "22%",
        "min": model.gauge.min,
        "max": model.gauge.max,
        "axisLine": { "lineStyle": { "width": 6, "color": [[1, "#f39c12"]] } },
        "axisLabel": { "show": false },
        "axisTick": { "show": false },
        "splitLine": { "show": false },
        "pointer": { "width": 2, "length": "55%" },
        "progress": { "show": true, "width": 6 },
        "detail": { "formatter": model.gauge.display, "fontSize": 12, "offsetCenter": [0, "0%"] },
        "data": [{ "value": model.gauge.value, "tooltip": gauge.tooltip(), "meta": gauge }],
    })];
    series.extend(model.rings.iter().map(ring_series));

    let mut option = json!({
        "backgroundColor": "rgba(0,0,0,0)",
        "legend": {
            "type": "scroll",
            "top": 2,
            "left": "center",
            "orient": "horizontal",
            "itemWidth": 10,
            "itemHeight": 10,
        },
        "tooltip": { "trigger": "item" },
        "series": series,
    });
    attach_notice(&mut option, model.notice.as_deref());
    option
}

fn ring_series(ring: &Ring) -> Value {
    let data: Vec<Value> = ring
        .segments
        .iter()
        .map(|s| {
            let point = SeriesPoint::Segment(s.clone());
            json!({
                "name": s.name,
                "value": s.value,
                "itemStyle": { "color": s.color },
                "tooltip": point.tooltip(),
                "meta": point,
            })
        })
        .collect();
    let mut series = json!({
        "type": "pie",
        "center": CENTER,
        "radius": [percent(ring.radius.0), percent(ring.radius.1)],
        "label": { "show": false },
        "itemStyle": { "borderColor": "#fff", "borderWidth": 1 },
        "avoidLabelOverlap": false,
        "data": data,
    });
    if matches!(
        ring.kind,
        RingKind::RiskLevels | RingKind::Contribution | RingKind::CohortQuantiles
    ) {
        series["silent"] = Value::Bool(true);
    }
    series
}

pub fn heatmap_option(model: &HeatmapChartModel) -> Value {
    let data: Vec<Value> = model
        .cells
        .iter()
        .map(|c| {
            let point = SeriesPoint::Cell(c.clone());
            json!({
                "value": [c.x, c.y, c.value],
                "tooltip": point.tooltip(),
                "meta": point,
            })
        })
        .collect();
    let mut option = json!({
        "backgroundColor": "rgba(0,0,0,0)",
        "tooltip": { "confine": true },
        "grid": { "top": 10, "left": "12%", "right": "12%", "bottom": 36, "containLabel": true },
        "xAxis": { "type": "category", "data": model.column_labels, "axisTick": { "show": false } },
        "yAxis": { "type": "category", "data": model.row_labels, "axisTick": { "show": false } },
        "visualMap": [{
            "min": 0,
            "max": 1,
            "calculable": false,
            "orient": "horizontal",
            "left": "center",
            "bottom": 12,
            "inRange": { "color": YL_OR_RD },
        }],
        "series": [{
            "type": "heatmap",
            "data": data,
            "itemStyle": { "borderColor": "#fff", "borderWidth": 2, "borderType": "solid" },
        }],
    });
    attach_notice(&mut option, model.notice.as_deref());
    option
}

fn attach_notice(option: &mut Value, notice: Option<&str>) {
    if let Some(text) = notice {
        option["title"] = json!({
            "text": text,
            "left": "center",
            "bottom": 0,
            "textStyle": { "fontSize": 11, "fontWeight": "normal" },
        });
    }
}

fn percent(share: f64) -> String {
    format!("{}%", (share * 100.0).round())
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage7_render.rs"]
mod tests;
