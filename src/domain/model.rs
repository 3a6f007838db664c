use serde::{Deserialize, Serialize};

/// 目錄中的一項服務。title 同時作為頁面卡片的查找鍵。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    pub title: &'static str,
    pub prompt: &'static str,
    pub icon: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub tagline: String,
    pub service_descriptions: Vec<ServiceDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescription {
    pub title: String,
    pub description: String,
}

/// 送往生成服務的請求：自然語言提示加上輸出 JSON schema。
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FormField {
    Name,
    Email,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Email, FormField::Message];

    pub fn element_id(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Message => "message",
        }
    }

    pub fn error_element_id(self) -> &'static str {
        match self {
            FormField::Name => "name-error",
            FormField::Email => "email-error",
            FormField::Message => "message-error",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFieldState {
    pub valid: bool,
    pub message: Option<String>,
}

impl FormFieldState {
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormValues {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactFormValues {
    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Message => &self.message,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Message => self.message = value,
        }
    }
}
