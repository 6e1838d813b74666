//! Row assembly for participant exports: fixed identity/status columns
//! followed by one column per custom field in schema order. Spreadsheet
//! or CSV serialization happens outside the core.

use crate::domain::models::field::EventField;
use crate::domain::models::registration::{Answer, Registration};
use crate::domain::services::codec;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ExportTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

const FIXED_COLUMNS: [&str; 6] = ["Name", "Email", "Phone", "Status", "Registered At", "Attended At"];

pub fn export_rows(
    fields: &[EventField],
    registrations: &[(Registration, Vec<Answer>)],
) -> ExportTable {
    let mut columns: Vec<String> = FIXED_COLUMNS.iter().map(|c| c.to_string()).collect();
    columns.extend(fields.iter().map(|f| f.field_name.clone()));

    let rows = registrations
        .iter()
        .map(|(registration, answers)| {
            let mut row = vec![
                registration.participant_name.clone(),
                registration.participant_email.clone(),
                registration.participant_phone.clone(),
                registration.status.clone(),
                registration.registered_at.format("%Y-%m-%d %H:%M").to_string(),
                registration
                    .attended_at
                    .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default(),
            ];

            for field in fields {
                let value = answers
                    .iter()
                    .find(|a| a.field_id == field.id)
                    .map(|a| codec::display_value(field.kind(), &a.field_value))
                    .unwrap_or_default();
                row.push(value);
            }
            row
        })
        .collect();

    ExportTable { columns, rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::field::{FieldType, NewFieldParams};

    fn make_field(name: &str, field_type: FieldType, order: i32) -> EventField {
        EventField::new(NewFieldParams {
            event_id: "ev".to_string(),
            field_name: name.to_string(),
            field_type,
            is_required: false,
            order_index: order,
            choices: String::new(),
            placeholder: String::new(),
            help_text: String::new(),
            is_participant_name: false,
            is_participant_email: false,
            is_participant_phone: false,
        })
    }

    #[test]
    fn test_custom_columns_follow_fixed_columns_in_schema_order() {
        let company = make_field("Company", FieldType::Text, 0);
        let interests = make_field("Interests", FieldType::Checkbox, 1);

        let mut registration = Registration::new("ev".to_string(), "tok".to_string(), String::new());
        registration.participant_name = "Ada".to_string();
        let answers = vec![
            Answer::new(registration.id.clone(), interests.id.clone(), "[\"AI\",\"Cloud\"]".to_string()),
            Answer::new(registration.id.clone(), company.id.clone(), "Initech".to_string()),
        ];

        let table = export_rows(&[company, interests], &[(registration, answers)]);

        assert_eq!(table.columns[..6].join(","), "Name,Email,Phone,Status,Registered At,Attended At");
        assert_eq!(table.columns[6..], ["Company".to_string(), "Interests".to_string()]);
        assert_eq!(table.rows[0][0], "Ada");
        assert_eq!(table.rows[0][6], "Initech");
        // Checkbox answers are display-decoded.
        assert_eq!(table.rows[0][7], "AI, Cloud");
    }

    #[test]
    fn test_missing_answer_yields_empty_cell() {
        let company = make_field("Company", FieldType::Text, 0);
        let registration = Registration::new("ev".to_string(), "tok".to_string(), String::new());

        let table = export_rows(std::slice::from_ref(&company), &[(registration, vec![])]);
        assert_eq!(table.rows[0][6], "");
    }
}
