//! Typed view of an information request.
//!
//! On the wire a request is four fields: subject, patient id, practitioner
//! id, and the address the reply should be sent to.

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoRequest {
    /// What is being asked for, e.g. `"BloodTest"`.
    pub subject: String,
    pub patient_id: u64,
    pub practitioner_id: u64,
    /// Where the requested file should be delivered.
    pub reply_to: String,
}

impl InfoRequest {
    pub fn to_fields(&self) -> Vec<String> {
        vec![
            self.subject.clone(),
            self.patient_id.to_string(),
            self.practitioner_id.to_string(),
            self.reply_to.clone(),
        ]
    }

    pub fn from_fields(fields: &[String]) -> Result<Self> {
        let [subject, patient_id, practitioner_id, reply_to] = fields else {
            return Err(CodecError::Framing(format!(
                "info request has {} fields, expected 4",
                fields.len()
            )));
        };

        Ok(Self {
            subject: subject.clone(),
            patient_id: parse_id("patient_id", patient_id)?,
            practitioner_id: parse_id("practitioner_id", practitioner_id)?,
            reply_to: reply_to.clone(),
        })
    }
}

fn parse_id(name: &str, text: &str) -> Result<u64> {
    text.parse()
        .map_err(|_| CodecError::Framing(format!("{} is not an unsigned integer: {:?}", name, text)))
}
