//! Create/edit form for a certificate.

use std::path::PathBuf;

use chrono::NaiveDate;
use folio_core::models::{Certificate, CertificateUpdate, NewCertificate};

/// Longest value accepted in any form field
const MAX_FIELD_LENGTH: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Issuer,
    IssueDate,
    ExpiryDate,
    CredentialId,
    VerifyUrl,
    Tags,
    File,
}

impl FormField {
    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Issuer => "Issuer",
            FormField::IssueDate => "Issue date",
            FormField::ExpiryDate => "Expiry date",
            FormField::CredentialId => "Credential ID",
            FormField::VerifyUrl => "Verify URL",
            FormField::Tags => "Tags",
            FormField::File => "File",
        }
    }

    pub fn required(&self, mode: FormMode) -> bool {
        match self {
            FormField::Title | FormField::Issuer | FormField::IssueDate => true,
            FormField::File => mode == FormMode::Create,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

/// Field values plus focus. Edit mode never shows the file field; files
/// are swapped with the separate replace-file prompt.
#[derive(Debug, Clone)]
pub struct CertificateForm {
    pub mode: FormMode,
    pub focus: usize,
    pub error: Option<String>,
    values: Vec<(FormField, String)>,
    original: Option<Certificate>,
}

impl CertificateForm {
    pub fn create() -> Self {
        let values = [
            FormField::Title,
            FormField::Issuer,
            FormField::IssueDate,
            FormField::ExpiryDate,
            FormField::CredentialId,
            FormField::VerifyUrl,
            FormField::Tags,
            FormField::File,
        ]
        .into_iter()
        .map(|f| (f, String::new()))
        .collect();

        Self {
            mode: FormMode::Create,
            focus: 0,
            error: None,
            values,
            original: None,
        }
    }

    pub fn edit(cert: &Certificate) -> Self {
        let text = |v: &Option<String>| v.clone().unwrap_or_default();
        let values = vec![
            (FormField::Title, text(&cert.title)),
            (FormField::Issuer, text(&cert.issuer)),
            (FormField::IssueDate, date_part(&text(&cert.issue_date))),
            (FormField::ExpiryDate, date_part(&text(&cert.expiry_date))),
            (FormField::CredentialId, text(&cert.credential_id)),
            (FormField::VerifyUrl, text(&cert.verify_url)),
            (FormField::Tags, text(&cert.tags)),
        ];

        Self {
            mode: FormMode::Edit(cert.id),
            focus: 0,
            error: None,
            values,
            original: Some(cert.clone()),
        }
    }

    pub fn title(&self) -> &'static str {
        match self.mode {
            FormMode::Create => " New certificate ",
            FormMode::Edit(_) => " Edit certificate ",
        }
    }

    pub fn fields(&self) -> &[(FormField, String)] {
        &self.values
    }

    pub fn focused_field(&self) -> FormField {
        self.values[self.focus].0
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.values.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + self.values.len() - 1) % self.values.len();
    }

    pub fn push_char(&mut self, c: char) {
        let value = &mut self.values[self.focus].1;
        if !c.is_control() && value.chars().count() < MAX_FIELD_LENGTH {
            value.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        self.values[self.focus].1.pop();
    }

    fn value(&self, field: FormField) -> &str {
        self.values
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v.trim())
            .unwrap_or("")
    }

    fn optional(&self, field: FormField) -> Option<String> {
        Some(self.value(field).to_string()).filter(|v| !v.is_empty())
    }

    fn validate(&self) -> Result<(), String> {
        for (field, _) in &self.values {
            if field.required(self.mode) && self.value(*field).is_empty() {
                return Err(format!("{} is required", field.label()));
            }
        }
        for field in [FormField::IssueDate, FormField::ExpiryDate] {
            let value = self.value(field);
            if !value.is_empty() && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
                return Err(format!("{} must be YYYY-MM-DD", field.label()));
            }
        }
        Ok(())
    }

    /// Build the create request, or describe the first invalid field
    pub fn to_new(&self) -> Result<NewCertificate, String> {
        self.validate()?;
        Ok(NewCertificate {
            title: self.value(FormField::Title).to_string(),
            issuer: self.value(FormField::Issuer).to_string(),
            issue_date: self.value(FormField::IssueDate).to_string(),
            expiry_date: self.optional(FormField::ExpiryDate),
            credential_id: self.optional(FormField::CredentialId),
            verify_url: self.optional(FormField::VerifyUrl),
            tags: self.optional(FormField::Tags),
            file: PathBuf::from(self.value(FormField::File)),
        })
    }

    /// Build a patch holding only the fields that differ from the record
    /// being edited.
    pub fn to_update(&self) -> Result<CertificateUpdate, String> {
        self.validate()?;
        let Some(original) = self.original.as_ref() else {
            return Err("Nothing to update".to_string());
        };

        let changed = |field: FormField, before: &Option<String>, dates: bool| {
            let now = self.value(field);
            let before = before.as_deref().unwrap_or("");
            let before = if dates { date_part(before) } else { before.to_string() };
            (now != before).then(|| now.to_string())
        };

        Ok(CertificateUpdate {
            title: changed(FormField::Title, &original.title, false),
            issuer: changed(FormField::Issuer, &original.issuer, false),
            issue_date: changed(FormField::IssueDate, &original.issue_date, true),
            expiry_date: changed(FormField::ExpiryDate, &original.expiry_date, true),
            credential_id: changed(FormField::CredentialId, &original.credential_id, false),
            verify_url: changed(FormField::VerifyUrl, &original.verify_url, false),
            tags: changed(FormField::Tags, &original.tags, false),
        })
    }
}

/// `YYYY-MM-DD` prefix of an ISO date or datetime
fn date_part(value: &str) -> String {
    value.chars().take(10).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(form: &mut CertificateForm, text: &str) {
        for c in text.chars() {
            form.push_char(c);
        }
    }

    fn cert() -> Certificate {
        Certificate {
            id: 4,
            title: Some("CKA".to_string()),
            issuer: Some("CNCF".to_string()),
            issue_date: Some("2023-06-01T00:00:00".to_string()),
            expiry_date: None,
            credential_id: None,
            verify_url: None,
            tags: Some("Kubernetes".to_string()),
            image_path: None,
            created_at: None,
        }
    }

    #[test]
    fn test_create_requires_fields_in_order() {
        let mut form = CertificateForm::create();
        assert_eq!(form.to_new().unwrap_err(), "Title is required");

        type_into(&mut form, "AWS SAA");
        form.next_field();
        type_into(&mut form, "Amazon");
        form.next_field();
        type_into(&mut form, "2024-13-01");
        assert_eq!(form.to_new().unwrap_err(), "File is required");

        form.focus = 7;
        type_into(&mut form, "/tmp/aws.pdf");
        assert_eq!(form.to_new().unwrap_err(), "Issue date must be YYYY-MM-DD");
    }

    #[test]
    fn test_create_builds_request() {
        let mut form = CertificateForm::create();
        for (i, value) in ["AWS SAA", "Amazon", "2024-01-15", "", "ABC-1", "", " AWS, Cloud "]
            .iter()
            .enumerate()
        {
            form.focus = i;
            type_into(&mut form, value);
        }
        form.focus = 7;
        type_into(&mut form, "/tmp/aws.pdf");

        let new = form.to_new().unwrap();
        assert_eq!(new.title, "AWS SAA");
        assert_eq!(new.expiry_date, None);
        assert_eq!(new.credential_id.as_deref(), Some("ABC-1"));
        assert_eq!(new.tags.as_deref(), Some("AWS, Cloud"));
        assert_eq!(new.file, PathBuf::from("/tmp/aws.pdf"));
    }

    #[test]
    fn test_edit_prefills_and_diffs() {
        let mut form = CertificateForm::edit(&cert());
        assert_eq!(form.mode, FormMode::Edit(4));
        assert_eq!(form.fields().len(), 7);
        assert_eq!(form.fields()[2].1, "2023-06-01");

        // Untouched form produces an empty patch
        assert!(form.to_update().unwrap().is_empty());

        form.focus = 6;
        type_into(&mut form, ", CNCF");
        let update = form.to_update().unwrap();
        assert_eq!(update.tags.as_deref(), Some("Kubernetes, CNCF"));
        assert_eq!(update.title, None);
        assert_eq!(update.issue_date, None);
    }

    #[test]
    fn test_edit_does_not_require_file() {
        let form = CertificateForm::edit(&cert());
        assert!(form.to_update().is_ok());
    }

    #[test]
    fn test_field_navigation_wraps() {
        let mut form = CertificateForm::create();
        form.prev_field();
        assert_eq!(form.focused_field(), FormField::File);
        form.next_field();
        assert_eq!(form.focused_field(), FormField::Title);
    }

    #[test]
    fn test_control_chars_rejected() {
        let mut form = CertificateForm::create();
        form.push_char('\n');
        form.push_char('a');
        assert_eq!(form.fields()[0].1, "a");
        form.pop_char();
        assert_eq!(form.fields()[0].1, "");
    }
}
