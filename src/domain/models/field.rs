use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// The supported input types of the form builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Date,
    Textarea,
    Radio,
    Checkbox,
    Select,
    File,
    Phone,
}

impl FieldType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(FieldType::Text),
            "email" => Some(FieldType::Email),
            "number" => Some(FieldType::Number),
            "date" => Some(FieldType::Date),
            "textarea" => Some(FieldType::Textarea),
            "radio" => Some(FieldType::Radio),
            "checkbox" => Some(FieldType::Checkbox),
            "select" => Some(FieldType::Select),
            "file" => Some(FieldType::File),
            "phone" => Some(FieldType::Phone),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Textarea => "textarea",
            FieldType::Radio => "radio",
            FieldType::Checkbox => "checkbox",
            FieldType::Select => "select",
            FieldType::File => "file",
            FieldType::Phone => "phone",
        }
    }

    /// Radio, select and checkbox fields carry a configured choice set.
    pub fn has_choices(&self) -> bool {
        matches!(self, FieldType::Radio | FieldType::Checkbox | FieldType::Select)
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct EventField {
    pub id: String,
    pub event_id: String,
    pub field_name: String,
    pub field_type: String,
    pub is_required: bool,
    pub order_index: i32,
    pub choices: String,
    pub placeholder: String,
    pub help_text: String,
    pub is_participant_name: bool,
    pub is_participant_email: bool,
    pub is_participant_phone: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewFieldParams {
    pub event_id: String,
    pub field_name: String,
    pub field_type: FieldType,
    pub is_required: bool,
    pub order_index: i32,
    pub choices: String,
    pub placeholder: String,
    pub help_text: String,
    pub is_participant_name: bool,
    pub is_participant_email: bool,
    pub is_participant_phone: bool,
}

impl EventField {
    pub fn new(params: NewFieldParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id: params.event_id,
            field_name: params.field_name,
            field_type: params.field_type.as_str().to_string(),
            is_required: params.is_required,
            order_index: params.order_index,
            choices: params.choices,
            placeholder: params.placeholder,
            help_text: params.help_text,
            is_participant_name: params.is_participant_name,
            is_participant_email: params.is_participant_email,
            is_participant_phone: params.is_participant_phone,
            created_at: Utc::now(),
        }
    }

    /// Rows written before a type was retired keep working as plain text.
    pub fn kind(&self) -> FieldType {
        FieldType::parse(&self.field_type).unwrap_or(FieldType::Text)
    }

    /// Parses the newline-delimited choice text into trimmed non-empty
    /// entries, source order preserved. Malformed text yields fewer
    /// entries, never an error.
    pub fn choice_list(&self) -> Vec<String> {
        self.choices
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn input_name(&self) -> String {
        format!("field_{}", self.id)
    }
}
