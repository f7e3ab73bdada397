//! Validate -> submit -> render for one prediction form.

use client_core::PredictionService;
use shared::{
    domain::{FormSchema, FormState},
    protocol::PredictionRequest,
};
use tracing::{debug, error, info, warn};

use super::{
    events::{FormEvent, Key, WorkflowOutcome},
    state::{InFlight, WorkflowPhase},
};
use crate::{
    error::{ErrorDisplayPolicy, WorkflowError},
    view::{render, FormView, RenderContent},
};

/// Parses every non-empty schema field as a finite `f64`, in document order.
///
/// Blank values are left out of the request; presence of required fields is
/// `validate`'s job. Values under names outside the schema are not sent.
/// Anything that does not parse, including `NaN` and `inf`, is rejected and
/// every such field is reported.
pub fn serialize(
    schema: &FormSchema,
    state: &FormState,
) -> Result<PredictionRequest, WorkflowError> {
    let mut request = PredictionRequest::default();
    let mut invalid = Vec::new();
    for field in &schema.fields {
        let Some(raw) = state.get(&field.name) else {
            continue;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => request.insert(field.name.as_str(), value),
            _ => invalid.push(field.name.clone()),
        }
    }
    if invalid.is_empty() {
        Ok(request)
    } else {
        Err(WorkflowError::InvalidNumbers { fields: invalid })
    }
}

pub fn missing_required_fields(schema: &FormSchema, state: &FormState) -> Vec<String> {
    schema
        .fields
        .iter()
        .filter(|field| field.required && !state.is_filled(&field.name))
        .map(|field| field.name.clone())
        .collect()
}

pub struct FormController<V, S> {
    schema: FormSchema,
    view: V,
    service: S,
    policy: ErrorDisplayPolicy,
    phase: WorkflowPhase,
}

impl<V: FormView, S: PredictionService> FormController<V, S> {
    pub fn new(schema: FormSchema, view: V, service: S) -> Self {
        Self {
            schema,
            view,
            service,
            policy: ErrorDisplayPolicy::default(),
            phase: WorkflowPhase::Idle,
        }
    }

    pub fn with_error_policy(mut self, policy: ErrorDisplayPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn phase(&self) -> WorkflowPhase {
        self.phase
    }

    pub fn into_view(self) -> V {
        self.view
    }

    pub async fn handle_event(&mut self, event: FormEvent) -> WorkflowOutcome {
        debug!(event = event.name(), phase = ?self.phase, "form event");
        match event {
            FormEvent::Input { field } => self.input(&field),
            FormEvent::Blur { field } => self.blur(&field),
            FormEvent::KeyDown { field, key } => self.key_down(&field, key).await,
            FormEvent::Submit => self.submit().await,
            FormEvent::Clear => self.clear(),
        }
    }

    /// Flags every required field that is blank and unflags the rest.
    pub fn validate(&mut self, state: &FormState) -> bool {
        let mut valid = true;
        for field in &self.schema.fields {
            let failing = field.required && !state.is_filled(&field.name);
            self.view.set_field_error(&field.name, failing);
            valid &= !failing;
        }
        valid
    }

    pub async fn submit(&mut self) -> WorkflowOutcome {
        if self.phase == WorkflowPhase::Submitting {
            warn!("submit ignored while a prediction is in flight");
            return WorkflowOutcome::Ignored;
        }

        self.phase = WorkflowPhase::Validating;
        let state = self.view.field_values();
        if !self.validate(&state) {
            let fields = missing_required_fields(&self.schema, &state);
            return self.reject(WorkflowError::MissingFields { fields });
        }
        let request = match serialize(&self.schema, &state) {
            Ok(request) => request,
            Err(error) => {
                if let WorkflowError::InvalidNumbers { fields } = &error {
                    for field in fields {
                        self.view.set_field_error(field, true);
                    }
                }
                return self.reject(error);
            }
        };

        let mut in_flight = InFlight::begin(&mut self.view, &mut self.phase);
        let response = self.service.predict(&request).await;
        match response {
            Ok(result) => {
                info!(
                    prediction = %result.prediction,
                    confidence = %result.confidence,
                    "prediction received"
                );
                render(in_flight.view(), RenderContent::Result(&result));
                WorkflowOutcome::Predicted(result)
            }
            Err(error) => {
                error!(
                    %error,
                    code = ?error.code(),
                    status = ?error.status(),
                    "prediction error"
                );
                let error = WorkflowError::from(error);
                let message = self.policy.user_message(&error);
                render(in_flight.view(), RenderContent::Error(&message));
                WorkflowOutcome::Failed(error)
            }
        }
    }

    /// Enter moves to the next field, or submits from the terminal field.
    pub async fn key_down(&mut self, field: &str, key: Key) -> WorkflowOutcome {
        if !key.is_activation() {
            return WorkflowOutcome::Ignored;
        }
        if self.schema.is_terminal(field) {
            return self.submit().await;
        }
        match self.schema.next_field(field) {
            Some(next) => {
                let next = next.name.clone();
                self.view.focus_field(&next);
                WorkflowOutcome::FocusMoved { field: next }
            }
            None => {
                debug!(field, "activation key on a field outside the schema");
                WorkflowOutcome::Ignored
            }
        }
    }

    pub fn blur(&mut self, field: &str) -> WorkflowOutcome {
        let required = self
            .schema
            .field(field)
            .is_some_and(|spec| spec.required);
        let filled = self.view.field_values().is_filled(field);
        self.view.set_field_error(field, required && !filled);
        WorkflowOutcome::FieldChecked
    }

    /// Typing only ever removes a flag.
    pub fn input(&mut self, field: &str) -> WorkflowOutcome {
        if self.view.field_values().is_filled(field) {
            self.view.set_field_error(field, false);
        }
        WorkflowOutcome::FieldChecked
    }

    pub fn clear(&mut self) -> WorkflowOutcome {
        self.view.clear_fields();
        self.view.hide_panels();
        self.view.clear_field_errors();
        info!("form cleared");
        WorkflowOutcome::Cleared
    }

    fn reject(&mut self, error: WorkflowError) -> WorkflowOutcome {
        warn!(%error, "form rejected before submission");
        let message = self.policy.user_message(&error);
        render(&mut self.view, RenderContent::Error(&message));
        self.phase = WorkflowPhase::Idle;
        WorkflowOutcome::Invalid(error)
    }
}
