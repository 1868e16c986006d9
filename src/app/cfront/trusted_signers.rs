//! AWS accounts allowed to create signed URLs for a cache behavior.

use serde::Serialize;
use serde_json::Value;

use super::error::{MapResult, MappingError};
use super::fields::parse_bool;
use super::item_list::StringListItems;
use super::{canonical_entity, ExternalForm};

/// `Enabled` is derived from whether any signer is listed.
///
/// CloudFormation passes a bare list of account ids; the API uses
/// `{Enabled, Quantity, Items}`. Both are accepted.
#[derive(Debug, Clone, Serialize)]
pub struct TrustedSigners {
    #[serde(rename = "Enabled")]
    enabled: bool,
    #[serde(flatten)]
    signers: StringListItems,
}

impl TrustedSigners {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            signers: StringListItems::empty(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn signers(&self) -> &[String] {
        self.signers.items()
    }
}

impl ExternalForm for TrustedSigners {
    fn from_external_form(value: &Value) -> MapResult<Self> {
        let signers = StringListItems::from_external_form(value)?;
        let enabled = !signers.is_empty();

        if let Some(stated) = value.get("Enabled").filter(|v| !v.is_null()) {
            if parse_bool("Enabled", stated)? != enabled {
                return Err(MappingError::invalid(
                    "Enabled",
                    format!(
                        "must be {} when {} signers are listed",
                        enabled,
                        signers.quantity()
                    ),
                ));
            }
        }

        Ok(Self { enabled, signers })
    }
}

canonical_entity!(TrustedSigners);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::cfront::error::ErrorKind;
    use crate::app::cfront::CanonicalForm;
    use serde_json::json;

    #[test]
    fn test_empty_list_is_disabled() {
        let signers = TrustedSigners::from_external_form(&json!([])).unwrap();
        assert_eq!(
            signers.to_canonical_form(),
            json!({"Enabled": false, "Quantity": 0})
        );
        assert_eq!(signers, TrustedSigners::disabled());
    }

    #[test]
    fn test_listed_signers_enable() {
        let signers = TrustedSigners::from_external_form(&json!(["self", "123456789012"])).unwrap();
        assert!(signers.enabled());
        assert_eq!(
            signers.to_canonical_form(),
            json!({"Enabled": true, "Quantity": 2, "Items": ["self", "123456789012"]})
        );
    }

    #[test]
    fn test_api_shape_must_agree_with_items() {
        let err = TrustedSigners::from_external_form(&json!({
            "Enabled": true,
            "Quantity": 0
        }))
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);

        let err = TrustedSigners::from_external_form(&json!("self")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }
}
