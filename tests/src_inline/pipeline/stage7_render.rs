use super::*;
use crate::input::Cohort;
use crate::pipeline::stage5_radial::build_radial_model;
use crate::pipeline::stage6_heatmap::build_heatmap_model;

fn empty() -> Cohort {
    Cohort::from_samples("c1", Vec::new())
}

#[test]
fn test_radial_option_layout() {
    let model = build_radial_model(&empty(), None);
    let option = radial_option(&model);
    let series = option["series"].as_array().unwrap();
    assert_eq!(series.len(), 6);
    assert_eq!(series[0]["type"], "gauge");
    assert_eq!(series[0]["detail"]["formatter"], "Risk 67%");
    assert_eq!(series[1]["type"], "pie");
    assert_eq!(series[1]["radius"], json!(["30%", "36%"]));
    assert_eq!(series[5]["radius"], json!(["82%", "86%"]));
    assert_eq!(series[1]["data"][0]["itemStyle"]["color"], "#d73027");
    assert_eq!(series[1]["data"][0]["meta"]["series"], "segment");
    assert_eq!(series[1]["silent"], true);
    assert!(series[4].get("silent").is_none());
    assert!(option["title"]["text"].is_string());
}

#[test]
fn test_heatmap_option_layout() {
    let model = build_heatmap_model(&empty(), None);
    let option = heatmap_option(&model);
    assert_eq!(option["xAxis"]["data"].as_array().unwrap().len(), 14);
    assert_eq!(option["yAxis"]["data"].as_array().unwrap().len(), 14);
    assert_eq!(option["visualMap"][0]["inRange"]["color"][0], "#fff7bc");
    let data = option["series"][0]["data"].as_array().unwrap();
    assert_eq!(data.len(), 196);
    assert_eq!(data[0]["meta"]["series"], "cell");
    assert_eq!(data[0]["value"][0], 0);
    assert_eq!(data[0]["value"][1], 0);
    let tooltip = data[0]["tooltip"].as_str().unwrap();
    assert!(tooltip.starts_with("Positive cell ratio · Normalized: "));
}

#[test]
fn test_handles_are_independent() {
    let model = build_radial_model(&empty(), None);
    let mut a = ChartHandle::new(JsonSurface::default());
    let mut b = ChartHandle::new(JsonSurface::default());
    render_radial(&mut a, &model);
    render_radial(&mut a, &model);
    assert_eq!(a.updates(), 2);
    assert_eq!(b.updates(), 0);
    assert!(b.surface().option.is_none());

    let heat = build_heatmap_model(&empty(), None);
    render_heatmap(&mut b, &heat);
    assert_eq!(b.surface().option.as_ref().unwrap()["series"][0]["type"], "heatmap");
    assert_eq!(a.surface().option.as_ref().unwrap()["series"][0]["type"], "gauge");
}

#[test]
fn test_handle_resize_and_dispose() {
    let mut handle = ChartHandle::new(JsonSurface::default());
    handle.resize(640, 480);
    handle.update(&json!({ "a": 1 }));
    let surface = handle.dispose();
    assert!(surface.disposed);
    assert_eq!(surface.size, Some((640, 480)));
    assert!(surface.option.is_none());
}

#[test]
fn test_merge_keeps_untouched_keys() {
    let mut surface = JsonSurface::default();
    surface.set_option(&json!({ "a": 1, "b": 2 }), true);
    surface.set_option(&json!({ "b": 3 }), false);
    assert_eq!(surface.option, Some(json!({ "a": 1, "b": 3 })));
    surface.set_option(&json!({ "c": 4 }), true);
    assert_eq!(surface.option, Some(json!({ "c": 4 })));
}
