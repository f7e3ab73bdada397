//! Prompt-per-field session: Enter moves to the next field and submits from the last one.

use std::io::Write;

use client_core::PredictionService;
use form_controller::{FormController, FormEvent, FormView, Key, WorkflowOutcome};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::terminal::TerminalView;

const QUIT_COMMAND: &str = ":quit";
const CLEAR_COMMAND: &str = ":clear";
const SUBMIT_COMMAND: &str = ":submit";

/// Runs until `:quit` or end of input; returns the number of completed submissions.
pub async fn run_interactive<R, W, S>(
    controller: &mut FormController<TerminalView<W>, S>,
    input: R,
) -> anyhow::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    S: PredictionService,
{
    let Some(first) = controller.schema().fields.first().map(|f| f.name.clone()) else {
        anyhow::bail!("form has no fields to prompt for");
    };
    controller.view_mut().focus_field(&first);

    let mut lines = input.lines();
    let mut submissions = 0;
    loop {
        let field = controller
            .view()
            .focused()
            .map(str::to_string)
            .unwrap_or_else(|| first.clone());
        let Some(spec) = controller.schema().field(&field).cloned() else {
            anyhow::bail!("focused field '{field}' is not part of the form");
        };
        controller.view_mut().prompt(&spec);

        let Some(line) = lines.next_line().await? else {
            debug!("input closed");
            break;
        };
        let entry = line.trim();

        let outcome = match entry {
            QUIT_COMMAND => break,
            CLEAR_COMMAND => {
                let outcome = controller.handle_event(FormEvent::Clear).await;
                controller.view_mut().focus_field(&first);
                outcome
            }
            SUBMIT_COMMAND => controller.handle_event(FormEvent::Submit).await,
            _ => {
                if !entry.is_empty() {
                    controller.view_mut().set_value(&field, entry);
                    controller
                        .handle_event(FormEvent::Input {
                            field: field.clone(),
                        })
                        .await;
                }
                controller
                    .handle_event(FormEvent::Blur {
                        field: field.clone(),
                    })
                    .await;
                controller
                    .handle_event(FormEvent::KeyDown {
                        field,
                        key: Key::Enter,
                    })
                    .await
            }
        };

        match outcome {
            WorkflowOutcome::Predicted(_) | WorkflowOutcome::Failed(_) => {
                submissions += 1;
                controller.view_mut().focus_field(&first);
            }
            WorkflowOutcome::Invalid(_) => {
                let next = controller
                    .schema()
                    .names()
                    .find(|name| controller.view().is_flagged(name))
                    .map(str::to_string)
                    .unwrap_or_else(|| first.clone());
                controller.view_mut().focus_field(&next);
            }
            _ => {}
        }
    }

    Ok(submissions)
}

#[cfg(test)]
#[path = "tests/interactive_tests.rs"]
mod tests;
