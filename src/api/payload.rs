use reqwest::multipart::{Form, Part};

use crate::domain::Attachment;

pub const TEXT_FIELD: &str = "text";
pub const FILE_FIELD: &str = "file";
pub const GEN_REPLY_FIELD: &str = "gen_reply";
pub const DETAILED_ANALYSIS_FIELD: &str = "detailed_analysis";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadPart {
    Text(String),
    File(Attachment),
}

#[derive(Debug, Clone, Default)]
pub struct ClassificationPayload {
    parts: Vec<(&'static str, PayloadPart)>,
}

impl ClassificationPayload {
    pub fn parts(&self) -> &[(&'static str, PayloadPart)] {
        &self.parts
    }

    pub fn text_field(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|(field, part)| match part {
            PayloadPart::Text(value) if *field == name => Some(value.as_str()),
            _ => None,
        })
    }

    pub fn file(&self) -> Option<&Attachment> {
        self.parts.iter().find_map(|(_, part)| match part {
            PayloadPart::File(file) => Some(file),
            _ => None,
        })
    }

    pub fn into_form(self) -> Form {
        self.parts
            .into_iter()
            .fold(Form::new(), |form, (name, part)| match part {
                PayloadPart::Text(value) => form.text(name, value),
                PayloadPart::File(file) => {
                    form.part(name, Part::bytes(file.bytes).file_name(file.name))
                }
            })
    }
}

/// Both flags are always sent, as `"true"`/`"false"`.
pub fn build_payload(
    text: Option<&str>,
    file: Option<Attachment>,
    generate_reply: bool,
    detailed_analysis: bool,
) -> ClassificationPayload {
    let mut parts = Vec::with_capacity(4);
    if let Some(text) = text.filter(|text| !text.is_empty()) {
        parts.push((TEXT_FIELD, PayloadPart::Text(text.to_string())));
    }
    if let Some(file) = file {
        parts.push((FILE_FIELD, PayloadPart::File(file)));
    }
    parts.push((GEN_REPLY_FIELD, PayloadPart::Text(generate_reply.to_string())));
    parts.push((
        DETAILED_ANALYSIS_FIELD,
        PayloadPart::Text(detailed_analysis.to_string()),
    ));
    ClassificationPayload { parts }
}
