//! Transport-neutral MIME header list for SOAP messages.
//!
//! The one concrete data structure the contract layer implements itself:
//! providers and transports exchange message metadata through this ordered,
//! case-insensitively keyed header list instead of any transport-specific
//! representation.

use serde::{Deserialize, Serialize};

use crate::error::SoapError;

/// A single name/value header pair.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MimeHeader {
    name: String,
    value: String,
}

impl MimeHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        MimeHeader {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// Ordered collection of MIME headers with case-insensitive name matching.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MimeHeaders {
    headers: Vec<MimeHeader>,
}

impl MimeHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// All values carried under `name`, in insertion order.
    pub fn header(&self, name: &str) -> Vec<&str> {
        self.headers
            .iter()
            .filter(|header| header.name.eq_ignore_ascii_case(name))
            .map(|header| header.value.as_str())
            .collect()
    }

    /// Add a header, keeping it adjacent to existing headers of the same
    /// name so repeated fields stay grouped.
    pub fn add_header(&mut self, name: &str, value: &str) -> Result<(), SoapError> {
        if name.trim().is_empty() {
            return Err(SoapError::InvalidArgument(
                "header name must not be empty".to_string(),
            ));
        }
        let insert_at = self
            .headers
            .iter()
            .rposition(|header| header.name.eq_ignore_ascii_case(name))
            .map(|idx| idx + 1)
            .unwrap_or(self.headers.len());
        self.headers
            .insert(insert_at, MimeHeader::new(name, value));
        Ok(())
    }

    /// Replace the first header matching `name` with `value`, dropping any
    /// later duplicates; adds the header when no match exists.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), SoapError> {
        if name.trim().is_empty() {
            return Err(SoapError::InvalidArgument(
                "header name must not be empty".to_string(),
            ));
        }
        let mut replaced = false;
        self.headers.retain_mut(|header| {
            if !header.name.eq_ignore_ascii_case(name) {
                return true;
            }
            if replaced {
                return false;
            }
            header.value = value.to_string();
            replaced = true;
            true
        });
        if !replaced {
            self.add_header(name, value)?;
        }
        Ok(())
    }

    /// Remove every header matching `name`; unknown names are a no-op.
    pub fn remove_header(&mut self, name: &str) {
        self.headers
            .retain(|header| !header.name.eq_ignore_ascii_case(name));
    }

    pub fn remove_all_headers(&mut self) {
        self.headers.clear();
    }

    pub fn all_headers(&self) -> impl Iterator<Item = &MimeHeader> {
        self.headers.iter()
    }

    /// Headers whose name appears in `names` (case-insensitive).
    pub fn matching_headers<'a>(
        &'a self,
        names: &'a [&'a str],
    ) -> impl Iterator<Item = &'a MimeHeader> {
        self.headers.iter().filter(move |header| {
            names
                .iter()
                .any(|name| header.name.eq_ignore_ascii_case(name))
        })
    }

    /// Headers whose name does not appear in `names` (case-insensitive).
    pub fn non_matching_headers<'a>(
        &'a self,
        names: &'a [&'a str],
    ) -> impl Iterator<Item = &'a MimeHeader> {
        self.headers.iter().filter(move |header| {
            !names
                .iter()
                .any(|name| header.name.eq_ignore_ascii_case(name))
        })
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}
