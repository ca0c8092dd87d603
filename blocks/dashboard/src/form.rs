use crewdesk_atoms::fields::{FieldKind, FieldSpec, FieldValue, FieldValues, FormDraft};
use chrono::NaiveDate;
use std::marker::PhantomData;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("form has no field named `{0}`")]
    Unknown(String),

    #[error("field `{0}` does not take this kind of value")]
    WrongKind(&'static str),

    #[error("`{value}` is not an option of field `{field}`")]
    NotAnOption { field: &'static str, value: String },
}

/// Editable field set for one record kind, driven by its field descriptors.
#[derive(Debug, Clone)]
pub struct EntityForm<D: FormDraft> {
    mode: FormMode,
    values: FieldValues,
    /// Stored choice values outside a field's option list, accepted in edit
    /// mode so an existing record stays submittable.
    retained: Vec<(&'static str, String)>,
    _draft: PhantomData<D>,
}

impl<D: FormDraft> Default for EntityForm<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: FormDraft> EntityForm<D> {
    /// Empty form for a new record.
    pub fn new() -> Self {
        Self {
            mode: FormMode::Create,
            values: FieldValues::defaults(D::FIELDS),
            retained: Vec::new(),
            _draft: PhantomData,
        }
    }

    /// Form pre-filled from an existing record's fields.
    pub fn editing(initial: &D) -> Self {
        let initial = initial.to_values();
        let mut values = FieldValues::defaults(D::FIELDS);
        let mut retained = Vec::new();
        for spec in D::FIELDS {
            let Some(v) = initial.get(spec.name) else {
                continue;
            };
            if let (FieldKind::Choice(options), FieldValue::Text(raw)) = (spec.kind, v) {
                if !raw.is_empty() && !options.contains(&raw.as_str()) {
                    retained.push((spec.name, raw.clone()));
                }
            }
            values.insert(spec.name, v.clone());
        }
        Self {
            mode: FormMode::Edit,
            values,
            retained,
            _draft: PhantomData,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn fields(&self) -> &'static [FieldSpec] {
        D::FIELDS
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Create => "Add Task",
            FormMode::Edit => "Update Task",
        }
    }

    /// Selectable values of a choice field, the record's stored value last
    /// when it is not one of the options.
    pub fn choices(&self, name: &str) -> Vec<&str> {
        let Ok(FieldSpec {
            kind: FieldKind::Choice(options),
            ..
        }) = self.spec(name)
        else {
            return Vec::new();
        };
        let mut choices = options.to_vec();
        choices.extend(
            self.retained
                .iter()
                .filter(|(field, _)| *field == name)
                .map(|(_, value)| value.as_str()),
        );
        choices
    }

    fn is_option(&self, spec: &FieldSpec, options: &[&str], value: &str) -> bool {
        options.contains(&value)
            || self
                .retained
                .iter()
                .any(|(field, kept)| *field == spec.name && kept == value)
    }

    fn spec(&self, name: &str) -> Result<&'static FieldSpec, FieldError> {
        D::FIELDS
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| FieldError::Unknown(name.to_string()))
    }

    /// Sets a text, number or choice field.
    pub fn set_text(&mut self, name: &str, value: impl Into<String>) -> Result<(), FieldError> {
        let spec = self.spec(name)?;
        let value = value.into();
        match spec.kind {
            FieldKind::Date | FieldKind::Flag => return Err(FieldError::WrongKind(spec.name)),
            FieldKind::Choice(options)
                if !value.is_empty() && !self.is_option(spec, options, &value) =>
            {
                return Err(FieldError::NotAnOption {
                    field: spec.name,
                    value,
                });
            }
            _ => {}
        }
        self.values.insert(spec.name, FieldValue::Text(value));
        Ok(())
    }

    /// Selects or clears a date field.
    pub fn set_date(&mut self, name: &str, date: Option<NaiveDate>) -> Result<(), FieldError> {
        let spec = self.spec(name)?;
        if spec.kind != FieldKind::Date {
            return Err(FieldError::WrongKind(spec.name));
        }
        self.values.insert(spec.name, FieldValue::Date(date));
        Ok(())
    }

    pub fn set_flag(&mut self, name: &str, on: bool) -> Result<(), FieldError> {
        let spec = self.spec(name)?;
        if spec.kind != FieldKind::Flag {
            return Err(FieldError::WrongKind(spec.name));
        }
        self.values.insert(spec.name, FieldValue::Flag(on));
        Ok(())
    }

    /// Names of fields whose current value would block submission.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        D::FIELDS
            .iter()
            .filter(|spec| !self.field_is_valid(spec))
            .map(|spec| spec.name)
            .collect()
    }

    /// Validates and assembles the draft. In create mode a successful submit
    /// resets every field; an invalid submit changes nothing and yields
    /// `None`.
    pub fn submit(&mut self) -> Option<D> {
        if !self.missing_fields().is_empty() {
            tracing::debug!("form submit ignored, required fields missing");
            return None;
        }
        let draft = D::from_values(&self.values)?;
        if self.mode == FormMode::Create {
            self.reset();
        }
        Some(draft)
    }

    pub fn reset(&mut self) {
        self.values = FieldValues::defaults(D::FIELDS);
    }

    fn field_is_valid(&self, spec: &FieldSpec) -> bool {
        match (spec.kind, self.values.get(spec.name)) {
            (FieldKind::Choice(options), Some(FieldValue::Text(raw))) if !raw.is_empty() => {
                self.is_option(spec, options, raw)
            }
            (_, value) => value_is_valid(spec, value),
        }
    }
}

fn value_is_valid(spec: &FieldSpec, value: Option<&FieldValue>) -> bool {
    match (spec.kind, value) {
        (FieldKind::Date, Some(FieldValue::Date(date))) => date.is_some() || !spec.required,
        (FieldKind::Date, None) => !spec.required,
        (FieldKind::Flag, _) => true,
        (FieldKind::PositiveInt, Some(FieldValue::Text(raw))) => {
            if raw.is_empty() {
                !spec.required
            } else {
                raw.trim().parse::<u32>().map(|n| n > 0).unwrap_or(false)
            }
        }
        (_, Some(FieldValue::Text(raw))) => !raw.is_empty() || !spec.required,
        (_, None) => !spec.required,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crewdesk_atoms::celebrities::{self, CelebrityScheduleDraft, CelebrityStatus};
    use crewdesk_atoms::deliveries::{self, ProductDeliveryDraft};
    use crewdesk_atoms::social::{self, SocialMediaCheckDraft};
    use crewdesk_atoms::videos::{self, VideoStatus, VideoTaskDraft};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn create_form_starts_from_defaults() {
        let form = EntityForm::<VideoTaskDraft>::new();
        assert_eq!(form.mode(), FormMode::Create);
        assert_eq!(form.values().text(videos::TITLE), "");
        assert_eq!(form.values().date(videos::DUE_DATE), None);
        assert_eq!(form.values().text(videos::STATUS), "pending");

        let social = EntityForm::<SocialMediaCheckDraft>::new();
        assert_eq!(social.values().text(social::STATUS), "not-posted");
    }

    #[test]
    fn valid_create_submit_yields_draft_and_resets() {
        let mut form = EntityForm::<VideoTaskDraft>::new();
        form.set_text(videos::TITLE, "Intro Cut").unwrap();
        form.set_date(videos::DUE_DATE, Some(day(10))).unwrap();

        let draft = form.submit().unwrap();
        assert_eq!(
            draft,
            VideoTaskDraft {
                title: "Intro Cut".into(),
                description: String::new(),
                due_date: day(10),
                status: VideoStatus::Pending,
            }
        );
        assert_eq!(form.values(), &FieldValues::defaults(VideoTaskDraft::FIELDS));
    }

    #[test]
    fn missing_required_field_is_silently_ignored() {
        let mut form = EntityForm::<VideoTaskDraft>::new();
        form.set_text(videos::TITLE, "Intro Cut").unwrap();
        let before = form.values().clone();

        assert_eq!(form.submit(), None);
        assert_eq!(form.values(), &before);
        assert_eq!(form.missing_fields(), vec![videos::DUE_DATE]);
    }

    #[test]
    fn optional_text_may_stay_empty() {
        let mut form = EntityForm::<ProductDeliveryDraft>::new();
        form.set_text(deliveries::PRODUCT_NAME, "Serum").unwrap();
        form.set_text(deliveries::CELEBRITY_NAME, "Ada").unwrap();
        form.set_date(deliveries::DELIVERY_DATE, Some(day(4))).unwrap();

        let draft = form.submit().unwrap();
        assert!(!draft.delivered);
        assert_eq!(draft.notes, "");
    }

    #[test]
    fn video_count_must_be_positive_integer() {
        let mut form = EntityForm::<CelebrityScheduleDraft>::new();
        form.set_text(celebrities::NAME, "Ada").unwrap();
        form.set_date(celebrities::SCHEDULED_DATE, Some(day(2))).unwrap();

        form.set_text(celebrities::VIDEO_COUNT, "zero").unwrap();
        assert_eq!(form.submit(), None);
        form.set_text(celebrities::VIDEO_COUNT, "0").unwrap();
        assert_eq!(form.submit(), None);

        form.set_text(celebrities::VIDEO_COUNT, "3").unwrap();
        let draft = form.submit().unwrap();
        assert_eq!(draft.video_count, 3);
        assert_eq!(draft.status, CelebrityStatus::Scheduled);
    }

    #[test]
    fn edit_form_is_prefilled_and_kept_after_submit() {
        let initial = SocialMediaCheckDraft {
            platform: "Instagram".into(),
            post_date: day(5),
            designer_name: "Noor".into(),
            status: social::PostStatus::Posted,
            notes: "reel".into(),
        };
        let mut form = EntityForm::editing(&initial);
        assert_eq!(form.mode(), FormMode::Edit);
        assert_eq!(form.submit_label(), "Update Task");

        form.set_text(social::DESIGNER_NAME, "Sam").unwrap();
        let draft = form.submit().unwrap();
        assert_eq!(draft.designer_name, "Sam");
        assert_eq!(form.values().text(social::DESIGNER_NAME), "Sam");
    }

    #[test]
    fn field_addressing_errors() {
        let mut form = EntityForm::<SocialMediaCheckDraft>::new();
        assert_eq!(
            form.set_text("colour", "red"),
            Err(FieldError::Unknown("colour".into()))
        );
        assert_eq!(
            form.set_flag(social::PLATFORM, true),
            Err(FieldError::WrongKind(social::PLATFORM))
        );
        assert!(matches!(
            form.set_text(social::PLATFORM, "MySpace"),
            Err(FieldError::NotAnOption { .. })
        ));
        assert!(form.set_text(social::PLATFORM, "TikTok").is_ok());
    }

    #[test]
    fn edit_form_keeps_a_stored_platform_outside_the_list() {
        let initial = SocialMediaCheckDraft {
            platform: "Threads".into(),
            post_date: day(5),
            designer_name: "Noor".into(),
            status: social::PostStatus::NotPosted,
            notes: String::new(),
        };
        let mut form = EntityForm::editing(&initial);
        assert!(form.missing_fields().is_empty());
        assert_eq!(form.choices(social::PLATFORM).last(), Some(&"Threads"));

        form.set_text(social::PLATFORM, "TikTok").unwrap();
        form.set_text(social::PLATFORM, "Threads").unwrap();
        assert!(matches!(
            form.set_text(social::PLATFORM, "MySpace"),
            Err(FieldError::NotAnOption { .. })
        ));

        form.set_text(social::DESIGNER_NAME, "Lea").unwrap();
        let draft = form.submit().unwrap();
        assert_eq!(draft.platform, "Threads");
        assert_eq!(draft.designer_name, "Lea");

        let fresh = EntityForm::<SocialMediaCheckDraft>::new();
        assert!(!fresh.choices(social::PLATFORM).contains(&"Threads"));
    }
}
