//! AWS error documents.
//!
//! ```xml
//! <Response>
//!   <Errors>
//!     <Error><Code>InvalidAMIID.NotFound</Code><Message>...</Message></Error>
//!   </Errors>
//!   <RequestID>ea966190-f9aa-478e-9ede-example</RequestID>
//! </Response>
//! ```

use crate::xml::{parse_sax, ElementPath, SaxHandler, XmlError};

/// The first `<Error>` of an error document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorDocument {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}

#[derive(Debug, Default)]
pub struct ErrorHandler {
    code: Option<String>,
    message: Option<String>,
    request_id: Option<String>,
}

impl SaxHandler for ErrorHandler {
    type Output = Option<ErrorDocument>;

    fn end_element(&mut self, path: &ElementPath, text: &str) -> Result<(), XmlError> {
        match path.current() {
            // Only the first error is reported.
            "Code" if self.code.is_none() => self.code = Some(text.to_string()),
            "Message" if self.message.is_none() => self.message = Some(text.to_string()),
            "RequestID" | "RequestId" | "requestId" => self.request_id = Some(text.to_string()),
            _ => {}
        }
        Ok(())
    }

    fn finish(self) -> Result<Self::Output, XmlError> {
        Ok(self.code.map(|code| ErrorDocument {
            code,
            message: self.message.unwrap_or_default(),
            request_id: self.request_id,
        }))
    }
}

/// Parse an error body; `Ok(None)` when it is XML without an error code.
pub fn parse_error_document(body: &[u8]) -> Result<Option<ErrorDocument>, XmlError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    parse_sax(body, ErrorHandler::default())
}
