//! 聯絡表單狀態機：Idle → Validating → (Invalid | Submitting) → Idle
//!
//! `reduce` 是純函式，只產生新狀態與 DOM patch；實際等待與套用由
//! [`ContactFormDriver`] 負責。送出沒有真正的網路請求，以計時器模擬。

use crate::core::dom::{Document, DomPatch, NodeTarget};
use crate::core::renderer::{CONTACT_FORM_ID, FORM_STATUS_ID};
use crate::domain::model::{ContactFormValues, FormField, FormFieldState};
use crate::utils::error::Result;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::time::Duration;

pub const DEFAULT_SUBMISSION_DELAY: Duration = Duration::from_millis(1000);

pub const NAME_REQUIRED: &str = "Name is required.";
pub const EMAIL_REQUIRED: &str = "Email is required.";
pub const EMAIL_INVALID: &str = "Please enter a valid email address.";
pub const MESSAGE_REQUIRED: &str = "Message is required.";
pub const STATUS_SENDING: &str = "Sending...";
pub const STATUS_SUCCESS: &str = "Thank you! Your message has been sent.";

const INVALID_CLASS: &str = "invalid";

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// 逐欄檢查，所有錯誤一次回報
pub fn validate_fields(values: &ContactFormValues) -> BTreeMap<FormField, FormFieldState> {
    FormField::ALL
        .iter()
        .map(|&field| {
            let value = values.get(field).trim();
            let state = match field {
                FormField::Name if value.is_empty() => FormFieldState::invalid(NAME_REQUIRED),
                FormField::Email if value.is_empty() => FormFieldState::invalid(EMAIL_REQUIRED),
                FormField::Email if !is_valid_email(value) => FormFieldState::invalid(EMAIL_INVALID),
                FormField::Message if value.is_empty() => FormFieldState::invalid(MESSAGE_REQUIRED),
                _ => FormFieldState::valid(),
            };
            (field, state)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Idle,
    Validating,
    Invalid,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormStatus {
    Sending,
    Success,
}

impl FormStatus {
    pub fn message(self) -> &'static str {
        match self {
            FormStatus::Sending => STATUS_SENDING,
            FormStatus::Success => STATUS_SUCCESS,
        }
    }

    fn class(self) -> &'static str {
        match self {
            FormStatus::Sending => "sending",
            FormStatus::Success => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub phase: FormPhase,
    pub values: ContactFormValues,
    pub fields: BTreeMap<FormField, FormFieldState>,
    pub submit_disabled: bool,
    pub status: Option<FormStatus>,
    pub submission_delay: Duration,
}

impl FormState {
    pub fn new(submission_delay: Duration) -> Self {
        Self {
            phase: FormPhase::Idle,
            values: ContactFormValues::default(),
            fields: FormField::ALL
                .iter()
                .map(|&field| (field, FormFieldState::valid()))
                .collect(),
            submit_disabled: false,
            status: None,
            submission_delay,
        }
    }

    pub fn errors(&self) -> Vec<(FormField, String)> {
        self.fields
            .iter()
            .filter_map(|(field, state)| state.message.clone().map(|message| (*field, message)))
            .collect()
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMISSION_DELAY)
    }
}

#[derive(Debug, Clone)]
pub enum FormEvent {
    Input { field: FormField, value: String },
    Submit,
    SubmissionElapsed,
}

#[derive(Debug, Clone)]
pub struct FormTransition {
    pub state: FormState,
    pub patches: Vec<DomPatch>,
    /// 需要等待後再送入 `SubmissionElapsed`
    pub timer: Option<Duration>,
    /// 本次事件經過的狀態
    pub visited: Vec<FormPhase>,
}

pub fn reduce(state: &FormState, event: FormEvent) -> FormTransition {
    let mut next = state.clone();
    let mut patches = Vec::new();
    let mut timer = None;
    let mut visited = Vec::new();

    match event {
        FormEvent::Input { field, value } => {
            patches.push(DomPatch::SetValue {
                target: NodeTarget::id(field.element_id()),
                value: value.clone(),
            });
            next.values.set(field, value);
        }
        // 送出鈕停用中，瀏覽器不會觸發 submit
        FormEvent::Submit if state.phase == FormPhase::Submitting => {}
        FormEvent::Submit => {
            next.phase = FormPhase::Validating;
            visited.push(FormPhase::Validating);
            patches.extend(clear_annotations());
            patches.extend(status_patches(next.status.take(), None));

            next.fields = validate_fields(&next.values);
            let failing: Vec<(FormField, String)> = next.errors();

            if failing.is_empty() {
                next.phase = FormPhase::Submitting;
                next.submit_disabled = true;
                next.status = Some(FormStatus::Sending);
                patches.push(DomPatch::SetAttribute {
                    target: submit_button(),
                    name: "disabled".to_string(),
                    value: "disabled".to_string(),
                });
                patches.extend(status_patches(None, Some(FormStatus::Sending)));
                timer = Some(next.submission_delay);
            } else {
                next.phase = FormPhase::Invalid;
                for (field, message) in failing {
                    patches.push(DomPatch::SetText {
                        target: NodeTarget::id(field.error_element_id()),
                        text: message,
                    });
                    patches.push(DomPatch::AddClass {
                        target: NodeTarget::id(field.element_id()),
                        class: INVALID_CLASS.to_string(),
                    });
                }
            }
            visited.push(next.phase);
        }
        FormEvent::SubmissionElapsed if state.phase == FormPhase::Submitting => {
            patches.extend(status_patches(next.status.take(), Some(FormStatus::Success)));
            next.status = Some(FormStatus::Success);

            next.values = ContactFormValues::default();
            for field in FormField::ALL {
                patches.push(DomPatch::SetValue {
                    target: NodeTarget::id(field.element_id()),
                    value: String::new(),
                });
                next.fields.insert(field, FormFieldState::valid());
            }
            patches.extend(clear_annotations());

            next.submit_disabled = false;
            patches.push(DomPatch::RemoveAttribute {
                target: submit_button(),
                name: "disabled".to_string(),
            });

            next.phase = FormPhase::Idle;
            visited.push(FormPhase::Idle);
        }
        FormEvent::SubmissionElapsed => {
            tracing::debug!("Ignoring submission timer in phase {:?}", state.phase);
        }
    }

    FormTransition {
        state: next,
        patches,
        timer,
        visited,
    }
}

fn submit_button() -> NodeTarget {
    NodeTarget::SubmitButton(CONTACT_FORM_ID.to_string())
}

fn clear_annotations() -> Vec<DomPatch> {
    FormField::ALL
        .iter()
        .flat_map(|field| {
            [
                DomPatch::SetText {
                    target: NodeTarget::id(field.error_element_id()),
                    text: String::new(),
                },
                DomPatch::RemoveClass {
                    target: NodeTarget::id(field.element_id()),
                    class: INVALID_CLASS.to_string(),
                },
            ]
        })
        .collect()
}

fn status_patches(previous: Option<FormStatus>, next: Option<FormStatus>) -> Vec<DomPatch> {
    let target = NodeTarget::id(FORM_STATUS_ID);
    let mut patches = Vec::new();
    if let Some(previous) = previous {
        patches.push(DomPatch::RemoveClass {
            target: target.clone(),
            class: previous.class().to_string(),
        });
    }
    patches.push(DomPatch::SetText {
        target: target.clone(),
        text: next.map(FormStatus::message).unwrap_or_default().to_string(),
    });
    if let Some(next) = next {
        patches.push(DomPatch::AddClass {
            target,
            class: next.class().to_string(),
        });
    }
    patches
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Sent,
    Rejected(Vec<(FormField, String)>),
    Ignored,
}

/// 持有文件與表單狀態，套用 patch 並以 tokio 計時器模擬送出
pub struct ContactFormDriver {
    document: Document,
    state: FormState,
}

impl ContactFormDriver {
    pub fn new(document: Document, submission_delay: Duration) -> Result<Self> {
        document.require(CONTACT_FORM_ID)?;
        document.require(FORM_STATUS_ID)?;
        for field in FormField::ALL {
            document.require(field.element_id())?;
            document.require(field.error_element_id())?;
        }

        Ok(Self {
            document,
            state: FormState::new(submission_delay),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn dispatch(&mut self, event: FormEvent) -> Result<FormTransition> {
        let transition = reduce(&self.state, event);
        self.document.apply_all(&transition.patches)?;
        self.state = transition.state.clone();
        Ok(transition)
    }

    pub fn input(&mut self, field: FormField, value: impl Into<String>) -> Result<()> {
        self.dispatch(FormEvent::Input {
            field,
            value: value.into(),
        })?;
        Ok(())
    }

    pub async fn submit(&mut self) -> Result<SubmitOutcome> {
        let transition = self.dispatch(FormEvent::Submit)?;

        match (transition.timer, transition.state.phase) {
            (Some(delay), _) => {
                tracing::info!("📨 Simulating contact form submission ({:?})", delay);
                tokio::time::sleep(delay).await;
                self.dispatch(FormEvent::SubmissionElapsed)?;
                tracing::info!("✅ Contact form submitted");
                Ok(SubmitOutcome::Sent)
            }
            (None, FormPhase::Invalid) => {
                let errors = transition.state.errors();
                tracing::warn!("Contact form rejected with {} invalid field(s)", errors.len());
                Ok(SubmitOutcome::Rejected(errors))
            }
            (None, _) => Ok(SubmitOutcome::Ignored),
        }
    }
}
