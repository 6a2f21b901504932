//! Tests for cohort-model types.

use cohort_model::{
    ColorPolicy, ColumnDefinition, ColumnKind, FilterValue, PlotType, Schema, SchemaError,
    SchemaRegistry, Selection, SelectionError, SelectionUpdate,
};

#[test]
fn column_definitions_parse_from_toml() {
    #[derive(serde::Deserialize)]
    struct Doc {
        columns: Vec<ColumnDefinition>,
    }

    let doc: Doc = toml::from_str(
        r#"
        [[columns]]
        name = "HbA1cTrend"
        kind = "numeric"
        min = -2.0
        max = 2.0
        decimals = 2

        [[columns]]
        name = "Site"
        kind = "categorical"
        categories = ["North", "South"]
        "#,
    )
    .expect("parse columns");

    assert_eq!(doc.columns.len(), 2);
    assert_eq!(
        doc.columns[0].kind,
        ColumnKind::Numeric {
            min: -2.0,
            max: 2.0,
            decimals: Some(2)
        }
    );
    assert_eq!(doc.columns[1].categories().map(<[String]>::len), Some(2));
}

#[test]
fn filter_value_serializes_tagged() {
    let json = serde_json::to_string(&FilterValue::range(20.0, 30.0)).expect("serialize filter");
    assert_eq!(json, r#"{"type":"range","low":20.0,"high":30.0}"#);
}

#[test]
fn empty_category_list_is_invalid() {
    let mut registry = SchemaRegistry::new();
    let err = registry
        .add_column(ColumnDefinition::categorical("Site", Vec::<String>::new()))
        .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidDefinition { .. }));
    assert!(registry.schema().custom().is_empty());
}

#[test]
fn lowercase_collision_reports_existing_name() {
    let mut registry = SchemaRegistry::new();
    let err = registry
        .add_column(ColumnDefinition::numeric("bmi", 0.0, 1.0))
        .unwrap_err();
    assert_eq!(err, SchemaError::DuplicateName("BMI".to_string()));
}

#[test]
fn custom_order_is_preserved_after_removal() {
    let mut registry = SchemaRegistry::new();
    for name in ["A", "B", "C"] {
        registry
            .add_column(ColumnDefinition::numeric(name, 0.0, 1.0))
            .unwrap();
    }
    registry.remove_column("B").unwrap();
    let custom: Vec<&str> = registry
        .schema()
        .custom()
        .iter()
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(custom, vec!["A", "C"]);
}

#[test]
fn scatter_without_y_is_missing_required_variable() {
    let schema = Schema::new();
    let err = Selection::new(PlotType::Scatter, "Age")
        .encodings(&schema, ColorPolicy::Ignore)
        .unwrap_err();
    assert_eq!(
        err,
        SelectionError::MissingRequiredVariable {
            plot: "Scatter",
            variable: "y"
        }
    );
}

#[test]
fn unknown_x_is_rejected() {
    let schema = Schema::new();
    let err = Selection::new(PlotType::Histogram, "Weight")
        .encodings(&schema, ColorPolicy::Ignore)
        .unwrap_err();
    assert_eq!(err, SelectionError::UnknownColumn("Weight".to_string()));
}

#[test]
fn color_policy_controls_inapplicable_color() {
    let schema = Schema::new();
    let selection = Selection::new(PlotType::Density, "BMI").with_color("SmokingStatus");

    let ignored = selection.encodings(&schema, ColorPolicy::Ignore).unwrap();
    assert_eq!(ignored.color, None);

    let err = selection.encodings(&schema, ColorPolicy::Reject).unwrap_err();
    assert!(matches!(err, SelectionError::InapplicableColorVariable { .. }));
}

#[test]
fn bar_chart_keeps_color() {
    let schema = Schema::new();
    let encodings = Selection::new(PlotType::BarChart, "SmokingStatus")
        .with_color("DiabetesRisk")
        .encodings(&schema, ColorPolicy::Reject)
        .unwrap();
    assert_eq!(encodings.color.as_deref(), Some("DiabetesRisk"));
}

#[test]
fn repair_resets_dangling_bindings() {
    let mut registry = SchemaRegistry::new();
    registry
        .add_column(ColumnDefinition::numeric("HbA1cTrend", -2.0, 2.0))
        .unwrap();
    let mut selection = Selection::new(PlotType::Scatter, "HbA1cTrend")
        .with_y("HbA1cTrend")
        .with_color("HbA1cTrend");
    registry.remove_column("HbA1cTrend").unwrap();

    assert!(selection.repair(registry.schema()));
    assert_eq!(selection.x_var, "Age");
    assert_eq!(selection.y_var.as_deref(), Some("BMI"));
    assert_eq!(selection.color_var, None);
    assert!(!selection.repair(registry.schema()));
}

#[test]
fn update_switches_plot_type() {
    let selection = Selection::default();
    let next = selection.updated(
        &SelectionUpdate::default()
            .plot_type(PlotType::Scatter)
            .x("BMI")
            .y(Some("A1C".to_string())),
    );
    assert_eq!(next.plot_type, PlotType::Scatter);
    assert_eq!(next.x_var, "BMI");
    assert_eq!(next.y_var.as_deref(), Some("A1C"));
}
