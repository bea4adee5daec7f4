//! Form state of the registration screen.
//!
//! Holds the patient record and the attachment slots. Fields are merged one at a
//! time as the user types. Nothing is validated here: a missing mandatory field
//! or attachment is sent as is and rejected by the backend.

use crate::attachment::{Attachment, AttachmentSlot, AttachmentSlots};
use crate::masks;

/// Fields of the patient record, in screen order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatientField {
    Name,
    Cpf,
    SusCard,
    Phone,
    Street,
    Number,
    Complement,
    Reference,
    Neighborhood,
}

impl PatientField {
    pub const ALL: [PatientField; 9] = [
        PatientField::Name,
        PatientField::Cpf,
        PatientField::SusCard,
        PatientField::Phone,
        PatientField::Street,
        PatientField::Number,
        PatientField::Complement,
        PatientField::Reference,
        PatientField::Neighborhood,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PatientField::Name => "Nome Completo",
            PatientField::Cpf => "CPF",
            PatientField::SusCard => "Nº Cartão SUS",
            PatientField::Phone => "Telefone para Contato",
            PatientField::Street => "Rua",
            PatientField::Number => "Número",
            PatientField::Complement => "Complemento",
            PatientField::Reference => "Referência",
            PatientField::Neighborhood => "Bairro",
        }
    }

    /// Whether the screen marks the field with an asterisk. Display only.
    pub fn is_marked_mandatory(self) -> bool {
        !matches!(self, PatientField::SusCard | PatientField::Complement)
    }

    /// Applies the keystroke mask of this field.
    pub fn mask(self, raw: &str) -> String {
        match self {
            PatientField::Cpf => masks::cpf_mask(raw),
            PatientField::SusCard => masks::sus_card_mask(raw),
            PatientField::Phone => masks::phone_mask(raw),
            _ => raw.to_string(),
        }
    }
}

/// Patient record as typed on the screen.
///
/// Fields marked mandatory on the screen are plain strings that start empty;
/// optional ones are `Option`s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientRecord {
    pub name: String,
    pub cpf: String,
    pub phone: String,
    pub street: String,
    pub number: String,
    pub reference: String,
    pub neighborhood: String,
    pub sus_card: Option<String>,
    pub complement: Option<String>,
}

impl PatientRecord {
    /// Merges one already-masked value into the record.
    pub fn set(&mut self, field: PatientField, value: String) {
        match field {
            PatientField::Name => self.name = value,
            PatientField::Cpf => self.cpf = value,
            PatientField::Phone => self.phone = value,
            PatientField::Street => self.street = value,
            PatientField::Number => self.number = value,
            PatientField::Reference => self.reference = value,
            PatientField::Neighborhood => self.neighborhood = value,
            PatientField::SusCard => self.sus_card = Some(value),
            PatientField::Complement => self.complement = Some(value),
        }
    }

    pub fn get(&self, field: PatientField) -> &str {
        match field {
            PatientField::Name => &self.name,
            PatientField::Cpf => &self.cpf,
            PatientField::Phone => &self.phone,
            PatientField::Street => &self.street,
            PatientField::Number => &self.number,
            PatientField::Reference => &self.reference,
            PatientField::Neighborhood => &self.neighborhood,
            PatientField::SusCard => self.sus_card.as_deref().unwrap_or(""),
            PatientField::Complement => self.complement.as_deref().unwrap_or(""),
        }
    }

    /// Strips the mask punctuation from CPF, phone and SUS card.
    ///
    /// An empty SUS card is dropped. Every other field is kept as entered.
    pub fn normalized(&self) -> NormalizedPatient {
        NormalizedPatient {
            name: self.name.clone(),
            cpf: masks::number_mask(&self.cpf),
            sus_card: self
                .sus_card
                .as_deref()
                .map(masks::number_mask)
                .filter(|s| !s.is_empty()),
            phone: masks::number_mask(&self.phone),
            street: self.street.clone(),
            number: self.number.clone(),
            complement: self.complement.clone(),
            reference: self.reference.clone(),
            neighborhood: self.neighborhood.clone(),
        }
    }
}

/// Patient record ready for transmission.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedPatient {
    pub name: String,
    pub cpf: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sus_card: Option<String>,
    pub phone: String,
    pub street: String,
    pub number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub complement: Option<String>,
    pub reference: String,
    pub neighborhood: String,
}

impl NormalizedPatient {
    /// `(name, value)` pairs for form encoding; absent optional fields are skipped.
    pub fn text_fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("name", self.name.as_str()),
            ("cpf", self.cpf.as_str()),
        ];
        if let Some(sus_card) = &self.sus_card {
            fields.push(("susCard", sus_card.as_str()));
        }
        fields.push(("phone", self.phone.as_str()));
        fields.push(("street", self.street.as_str()));
        fields.push(("number", self.number.as_str()));
        if let Some(complement) = &self.complement {
            fields.push(("complement", complement.as_str()));
        }
        fields.push(("reference", self.reference.as_str()));
        fields.push(("neighborhood", self.neighborhood.as_str()));
        fields
    }
}

/// Patient record plus attachment slots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    record: PatientRecord,
    attachments: AttachmentSlots,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Masks `raw` for `field` and merges it into the record. Returns the stored value.
    pub fn set_field(&mut self, field: PatientField, raw: &str) -> &str {
        let value = field.mask(raw);
        tracing::debug!(?field, "field changed");
        self.record.set(field, value);
        self.record.get(field)
    }

    pub fn field(&self, field: PatientField) -> &str {
        self.record.get(field)
    }

    pub fn record(&self) -> &PatientRecord {
        &self.record
    }

    pub fn set_attachment(&mut self, slot: AttachmentSlot, attachment: Attachment) {
        tracing::debug!(?slot, name = %attachment.name, "attachment stored");
        self.attachments.set(slot, attachment);
    }

    pub fn clear_attachment(&mut self, slot: AttachmentSlot) -> Option<Attachment> {
        self.attachments.clear(slot)
    }

    pub fn attachment(&self, slot: AttachmentSlot) -> Option<&Attachment> {
        self.attachments.get(slot)
    }

    pub fn attachments(&self) -> &AttachmentSlots {
        &self.attachments
    }

    pub fn normalized(&self) -> NormalizedPatient {
        self.record.normalized()
    }

    /// Drops the record and every attachment.
    pub fn reset(&mut self) {
        self.record = PatientRecord::default();
        self.attachments.clear_all();
    }
}
