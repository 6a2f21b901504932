//! Vega-Lite export of session plot specifications.

use cohort_core::{IdentitySampler, Session, SessionOptions};
use cohort_model::{PlotType, SelectionUpdate};
use cohort_output::{VEGA_LITE_SCHEMA, VegaLiteWriter, cohort_to_csv_string};
use serde_json::Value;

fn session() -> Session {
    let options = SessionOptions::new().with_seed(11).with_initial_rows(120);
    Session::start(Box::new(IdentitySampler), options).unwrap()
}

fn without_data(mut vl: Value) -> Value {
    vl.as_object_mut().unwrap().remove("data");
    vl
}

#[test]
fn bar_chart_with_color() {
    let mut session = session();
    session
        .on_selection_change(
            &SelectionUpdate::default()
                .plot_type(PlotType::BarChart)
                .x("SmokingStatus")
                .color(Some("DiabetesRisk".to_string())),
        )
        .unwrap();
    let spec = session.current_plot_spec().unwrap();
    let vl = VegaLiteWriter::new().write(&spec).unwrap();

    let values = vl["data"]["values"].as_array().unwrap();
    assert_eq!(values.len(), 120);
    assert_eq!(values[0].as_object().unwrap().len(), 2);

    insta::with_settings!({sort_maps => true}, {
        insta::assert_json_snapshot!(without_data(vl), @r#"
        {
          "$schema": "https://vega.github.io/schema/vega-lite/v6.json",
          "encoding": {
            "color": {
              "field": "DiabetesRisk",
              "type": "nominal"
            },
            "x": {
              "field": "SmokingStatus",
              "type": "nominal"
            },
            "y": {
              "aggregate": "count",
              "type": "quantitative"
            }
          },
          "mark": {
            "clip": true,
            "type": "bar"
          }
        }
        "#);
    });
}

#[test]
fn scatter_plot_of_filtered_cohort() {
    let mut session = session();
    session
        .on_filter_change("Age", cohort_model::FilterValue::range(50.0, 100.0))
        .unwrap();
    session
        .on_selection_change(
            &SelectionUpdate::default()
                .plot_type(PlotType::Scatter)
                .x("Age")
                .y(Some("Cholesterol".to_string())),
        )
        .unwrap();
    let spec = session.current_plot_spec().unwrap();
    let vl = VegaLiteWriter::new().with_title("Age vs cholesterol").write(&spec).unwrap();

    assert_eq!(vl["$schema"], VEGA_LITE_SCHEMA);
    assert_eq!(vl["mark"]["type"], "point");
    assert_eq!(vl["encoding"]["y"]["field"], "Cholesterol");
    let values = vl["data"]["values"].as_array().unwrap();
    assert_eq!(values.len(), spec.data.row_count());
    assert!(values.iter().all(|row| row["Age"].as_f64().is_some_and(|age| age >= 50.0)));
}

#[test]
fn csv_matches_current_cohort() {
    let session = session();
    let csv = cohort_to_csv_string(session.current_cohort().unwrap()).unwrap();
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("Age,BMI,BloodPressure,A1C,Cholesterol,SmokingStatus,DiabetesRisk")
    );
    assert_eq!(lines.count(), 120);
}
