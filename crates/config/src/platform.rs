//! Platform context
//!
//! Producer identifiers for the two delivery platforms (mobile app and
//! web portal). The context is published as a JSON document in blob
//! storage and fetched at run start, then passed explicitly into each
//! extractor - it is not ambient state.

use serde::Deserialize;

use crate::error::Result;

/// Blob-relative path of the platform context document
pub const PLATFORM_CONTEXT_PATH: &str = "config/platform_context.json";

/// Producer identifiers for the app and portal delivery platforms
///
/// Play events carry a `pdata` id naming the platform they originated
/// from; these two values are what per-platform columns are keyed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformContext {
    /// Producer id of the mobile app (e.g. "prod.example.app")
    pub app: String,
    /// Producer id of the web portal (e.g. "prod.example.portal")
    pub portal: String,
}

impl PlatformContext {
    /// Parse the platform context from its published JSON document
    ///
    /// Document shape:
    ///
    /// ```json
    /// { "context": { "pdata": { "id": { "app": "...", "portal": "..." } } } }
    /// ```
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let doc: ContextDocument = serde_json::from_slice(bytes)?;
        Ok(Self {
            app: doc.context.pdata.id.app,
            portal: doc.context.pdata.id.portal,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ContextDocument {
    context: Context,
}

#[derive(Debug, Deserialize)]
struct Context {
    pdata: Pdata,
}

#[derive(Debug, Deserialize)]
struct Pdata {
    id: PdataId,
}

#[derive(Debug, Deserialize)]
struct PdataId {
    app: String,
    portal: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let doc = br#"{"context":{"pdata":{"id":{"app":"prod.ed.app","portal":"prod.ed.portal"}}}}"#;
        let ctx = PlatformContext::from_json(doc).unwrap();
        assert_eq!(ctx.app, "prod.ed.app");
        assert_eq!(ctx.portal, "prod.ed.portal");
    }

    #[test]
    fn test_parse_rejects_missing_portal() {
        let doc = br#"{"context":{"pdata":{"id":{"app":"prod.ed.app"}}}}"#;
        assert!(PlatformContext::from_json(doc).is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(PlatformContext::from_json(b"not json").is_err());
    }
}
