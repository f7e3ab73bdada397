use shared::protocol::{Confidence, PredictionResult};

use crate::view::{render, RenderContent};
use crate::*;

#[test]
fn showing_one_panel_replaces_the_other() {
    let mut view = HeadlessView::new();
    let result = PredictionResult::new("Diabetic", Confidence::Text("82%".into()));

    render(&mut view, RenderContent::Error("boom"));
    assert!(view.panel().is_visible(Panel::Error));
    assert!(!view.panel().is_visible(Panel::Result));

    render(&mut view, RenderContent::Result(&result));
    assert!(view.panel().is_visible(Panel::Result));
    assert!(!view.panel().is_visible(Panel::Error));
    assert_eq!(view.scrolled_to(), Some(Panel::Result));

    view.hide_panels();
    assert_eq!(view.panel(), &PanelState::Hidden);
}

#[test]
fn rendered_result_formats_numeric_confidence() {
    let result = PredictionResult::new("Not Diabetic", Confidence::Number(0.71));
    let rendered = RenderedResult::from(&result);
    assert_eq!(rendered.prediction, "Not Diabetic");
    assert_eq!(rendered.confidence, "0.71");
    assert_eq!(rendered.category, "not-diabetic");
}

#[test]
fn headless_view_tracks_flags_and_submitting_state() {
    let mut view = HeadlessView::new();
    view.set_field_error("age", true);
    view.set_field_error("bmi", true);
    view.set_field_error("age", false);
    assert_eq!(view.flagged_fields(), vec!["bmi"]);

    view.set_submitting(true);
    assert!(!view.submit_enabled());
    assert!(view.loading_visible());
    view.set_submitting(false);
    assert!(view.submit_enabled());
    assert_eq!(view.submitting_history(), &[true, false]);
}

#[test]
fn clearing_fields_empties_every_value() {
    let mut view = HeadlessView::new();
    view.type_value("age", "45");
    view.type_value("bmi", "31");
    view.clear_fields();
    assert!(view.field_values().is_empty());
}

#[test]
fn error_policy_maps_validation_to_fixed_message() {
    let error = WorkflowError::MissingFields {
        fields: vec!["age".into()],
    };
    assert_eq!(
        ErrorDisplayPolicy::ServiceDetail.user_message(&error),
        shared::error::VALIDATION_MESSAGE
    );
    assert_eq!(
        ErrorDisplayPolicy::from_show_service_errors(false),
        ErrorDisplayPolicy::Generic
    );
}
