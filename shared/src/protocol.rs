use crate::{DocumentRecord, LoginResponse};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// Describes one backend endpoint: its path, method, auth requirement and
/// the payload it answers with.
pub trait ApiEndpoint {
    /// The decoded success payload.
    type Response;
    /// The URL path (relative to the configured base URL).
    const PATH: &'static str;
    /// The HTTP method.
    const METHOD: HttpMethod;
    /// Whether the bearer credential must be attached.
    const AUTHENTICATED: bool;
}

// =========================================================
// Auth endpoints
// =========================================================

/// Create a new account. Success body is a plain status line.
pub struct Register;

impl ApiEndpoint for Register {
    type Response = String;
    const PATH: &'static str = "/api/auth/register";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;
}

/// Exchange credentials for a bearer token.
pub struct Login;

impl ApiEndpoint for Login {
    type Response = LoginResponse;
    const PATH: &'static str = "/api/auth/login";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = false;
}

// =========================================================
// Document endpoints
// =========================================================

/// Multipart PDF upload. Success body is a preformatted status/summary text.
pub struct UploadDocument;

impl ApiEndpoint for UploadDocument {
    type Response = String;
    const PATH: &'static str = "/api/documents/upload";
    const METHOD: HttpMethod = HttpMethod::Post;
    const AUTHENTICATED: bool = true;
}

/// All documents owned by the authenticated user.
pub struct ListUserDocuments;

impl ApiEndpoint for ListUserDocuments {
    type Response = Vec<DocumentRecord>;
    const PATH: &'static str = "/api/documents/user";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = true;
}

/// A single document. `PATH` is the prefix; the id is appended as one
/// percent-encoded path segment.
pub struct GetDocument;

impl ApiEndpoint for GetDocument {
    type Response = DocumentRecord;
    const PATH: &'static str = "/api/documents";
    const METHOD: HttpMethod = HttpMethod::Get;
    const AUTHENTICATED: bool = true;
}

impl GetDocument {
    pub fn path_for(id: &str) -> String {
        format!("{}/{}", Self::PATH, encode_path_segment(id))
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
pub fn encode_path_segment(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Reverses [`encode_path_segment`]. Returns `None` for malformed escapes or
/// bytes that are not UTF-8.
pub fn decode_path_segment(segment: &str) -> Option<String> {
    let bytes = segment.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let hex = segment
                .get(i + 1..i + 3)
                .filter(|h| h.bytes().all(|b| b.is_ascii_hexdigit()))?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_path_plain_id() {
        assert_eq!(GetDocument::path_for("65f0c1"), "/api/documents/65f0c1");
    }

    #[test]
    fn test_document_path_escapes_separators() {
        assert_eq!(GetDocument::path_for("a/b c"), "/api/documents/a%2Fb%20c");
    }

    #[test]
    fn test_endpoint_auth_flags() {
        assert!(!Login::AUTHENTICATED);
        assert!(!Register::AUTHENTICATED);
        assert!(UploadDocument::AUTHENTICATED);
        assert!(ListUserDocuments::AUTHENTICATED);
        assert_eq!(ListUserDocuments::METHOD.as_str(), "GET");
    }

    #[test]
    fn test_segment_decoding_reverses_encoding() {
        for id in ["plain", "a b", "100%", "a/b", "résumé"] {
            assert_eq!(decode_path_segment(&encode_path_segment(id)).as_deref(), Some(id));
        }
    }

    #[test]
    fn test_segment_decoding_rejects_bad_escapes() {
        assert_eq!(decode_path_segment("a%2"), None);
        assert_eq!(decode_path_segment("a%zz"), None);
        assert_eq!(decode_path_segment("%+1"), None);
        assert_eq!(decode_path_segment("%FF"), None);
    }
}
