//! Single-value attribute responses: `<attributeName><value>..</value></attributeName>`.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use crate::domain::InstanceInitiatedShutdownBehavior;
use crate::xml::{non_empty, parse_bool, required, ElementPath, SaxHandler, XmlError};

/// The first `<value>` in the document, if it has text.
#[derive(Debug, Default)]
pub struct StringValueHandler {
    value: Option<Option<String>>,
}

impl SaxHandler for StringValueHandler {
    type Output = Option<String>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if path.current() == "value" && self.value.is_none() {
            self.value = Some(non_empty(text));
        }
        Ok(())
    }

    fn finish(self) -> Result<Option<String>, XmlError> {
        Ok(self.value.flatten())
    }
}

/// A required boolean `<value>`.
#[derive(Debug, Default)]
pub struct BooleanValueHandler {
    value: Option<bool>,
}

impl SaxHandler for BooleanValueHandler {
    type Output = bool;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if path.current() == "value" && self.value.is_none() {
            self.value = Some(parse_bool("value", text)?);
        }
        Ok(())
    }

    fn finish(self) -> Result<bool, XmlError> {
        required(self.value, "value")
    }
}

/// A base64 `<value>`, decoded. Used for `userData`.
#[derive(Debug, Default)]
pub struct UnencodeStringValueHandler(StringValueHandler);

impl SaxHandler for UnencodeStringValueHandler {
    type Output = Option<Vec<u8>>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        self.0.end_element(path, text)
    }

    fn finish(self) -> Result<Option<Vec<u8>>, XmlError> {
        self.0
            .finish()?
            .map(|encoded| decode_base64("value", &encoded))
            .transpose()
    }
}

/// `instanceInitiatedShutdownBehavior`.
#[derive(Debug, Default)]
pub struct ShutdownBehaviorHandler(StringValueHandler);

impl SaxHandler for ShutdownBehaviorHandler {
    type Output = InstanceInitiatedShutdownBehavior;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        self.0.end_element(path, text)
    }

    fn finish(self) -> Result<Self::Output, XmlError> {
        let value = required(self.0.finish()?, "value")?;
        Ok(InstanceInitiatedShutdownBehavior::from_wire(&value))
    }
}

/// GetConsoleOutput: the decoded `<output>` text.
#[derive(Debug, Default)]
pub struct ConsoleOutputHandler {
    output: Option<String>,
}

impl SaxHandler for ConsoleOutputHandler {
    type Output = String;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        if path.current() == "output" {
            self.output = Some(text.to_string());
        }
        Ok(())
    }

    fn finish(self) -> Result<String, XmlError> {
        let encoded = required(self.output, "output")?;
        let decoded = decode_base64("output", &encoded)?;
        Ok(String::from_utf8_lossy(&decoded).into_owned())
    }
}

/// EC2 wraps long base64 values across lines.
fn decode_base64(element: &str, encoded: &str) -> Result<Vec<u8>, XmlError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64_STANDARD
        .decode(compact.as_bytes())
        .map_err(|_| XmlError::InvalidValue {
            element: element.to_string(),
            value: encoded.to_string(),
        })
}
