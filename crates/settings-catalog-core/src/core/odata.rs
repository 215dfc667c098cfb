// crates/settings-catalog-core/src/core/odata.rs
// ============================================================================
// Module: Settings Catalog Discriminators
// Description: `@odata.type` discriminator table for Settings Catalog trees.
// Purpose: Provide one lookup table for setting instance and value variants.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Settings Catalog policies are trees of typed setting instances. Each node
//! names its variant through the `@odata.type` member. Secret detection
//! resolves discriminators through [`SettingsCatalogType`]; only the secret
//! setting value variant changes traversal behavior.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// SECTION: Keys
// ============================================================================

/// Member carrying the variant discriminator.
pub const ODATA_TYPE_KEY: &str = "@odata.type";
/// Secret payload member of a secret setting value.
pub const SECRET_VALUE_KEY: &str = "value";
/// Encryption state member of a secret setting value.
pub const SECRET_VALUE_STATE_KEY: &str = "valueState";
/// Discriminator of the secret setting value variant.
pub const SECRET_SETTING_VALUE_TYPE: &str =
    "#microsoft.graph.deviceManagementConfigurationSecretSettingValue";

// ============================================================================
// SECTION: Discriminator Table
// ============================================================================

/// Known Settings Catalog `@odata.type` variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsCatalogType {
    /// Top-level setting wrapper inside `settingsDetails`.
    Setting,
    /// Single choice setting instance.
    ChoiceSettingInstance,
    /// Choice collection setting instance.
    ChoiceSettingCollectionInstance,
    /// Single simple setting instance.
    SimpleSettingInstance,
    /// Simple collection setting instance.
    SimpleSettingCollectionInstance,
    /// Single group setting instance.
    GroupSettingInstance,
    /// Group collection setting instance.
    GroupSettingCollectionInstance,
    /// Choice setting value.
    ChoiceSettingValue,
    /// Group setting value.
    GroupSettingValue,
    /// String setting value.
    StringSettingValue,
    /// Integer setting value.
    IntegerSettingValue,
    /// Secret setting value (redacted by the service on read).
    SecretSettingValue,
    /// Reference setting value.
    ReferenceSettingValue,
    /// Setting instance template reference.
    SettingInstanceTemplateReference,
    /// Setting value template reference.
    SettingValueTemplateReference,
}

impl SettingsCatalogType {
    /// Every known variant, in table order.
    pub const ALL: [Self; 15] = [
        Self::Setting,
        Self::ChoiceSettingInstance,
        Self::ChoiceSettingCollectionInstance,
        Self::SimpleSettingInstance,
        Self::SimpleSettingCollectionInstance,
        Self::GroupSettingInstance,
        Self::GroupSettingCollectionInstance,
        Self::ChoiceSettingValue,
        Self::GroupSettingValue,
        Self::StringSettingValue,
        Self::IntegerSettingValue,
        Self::SecretSettingValue,
        Self::ReferenceSettingValue,
        Self::SettingInstanceTemplateReference,
        Self::SettingValueTemplateReference,
    ];

    /// Returns the `@odata.type` string for this variant.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Setting => "#microsoft.graph.deviceManagementConfigurationSetting",
            Self::ChoiceSettingInstance => {
                "#microsoft.graph.deviceManagementConfigurationChoiceSettingInstance"
            }
            Self::ChoiceSettingCollectionInstance => {
                "#microsoft.graph.deviceManagementConfigurationChoiceSettingCollectionInstance"
            }
            Self::SimpleSettingInstance => {
                "#microsoft.graph.deviceManagementConfigurationSimpleSettingInstance"
            }
            Self::SimpleSettingCollectionInstance => {
                "#microsoft.graph.deviceManagementConfigurationSimpleSettingCollectionInstance"
            }
            Self::GroupSettingInstance => {
                "#microsoft.graph.deviceManagementConfigurationGroupSettingInstance"
            }
            Self::GroupSettingCollectionInstance => {
                "#microsoft.graph.deviceManagementConfigurationGroupSettingCollectionInstance"
            }
            Self::ChoiceSettingValue => {
                "#microsoft.graph.deviceManagementConfigurationChoiceSettingValue"
            }
            Self::GroupSettingValue => {
                "#microsoft.graph.deviceManagementConfigurationGroupSettingValue"
            }
            Self::StringSettingValue => {
                "#microsoft.graph.deviceManagementConfigurationStringSettingValue"
            }
            Self::IntegerSettingValue => {
                "#microsoft.graph.deviceManagementConfigurationIntegerSettingValue"
            }
            Self::SecretSettingValue => SECRET_SETTING_VALUE_TYPE,
            Self::ReferenceSettingValue => {
                "#microsoft.graph.deviceManagementConfigurationReferenceSettingValue"
            }
            Self::SettingInstanceTemplateReference => {
                "#microsoft.graph.deviceManagementConfigurationSettingInstanceTemplateReference"
            }
            Self::SettingValueTemplateReference => {
                "#microsoft.graph.deviceManagementConfigurationSettingValueTemplateReference"
            }
        }
    }

    /// Resolves a discriminator string to a known variant.
    #[must_use]
    pub fn from_discriminator(discriminator: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|variant| variant.as_str() == discriminator)
    }

    /// Resolves the discriminator carried by a tree node, if any.
    #[must_use]
    pub fn of(node: &Value) -> Option<Self> {
        discriminator(node).and_then(Self::from_discriminator)
    }

    /// Returns true for setting instance variants.
    #[must_use]
    pub const fn is_setting_instance(self) -> bool {
        matches!(
            self,
            Self::ChoiceSettingInstance
                | Self::ChoiceSettingCollectionInstance
                | Self::SimpleSettingInstance
                | Self::SimpleSettingCollectionInstance
                | Self::GroupSettingInstance
                | Self::GroupSettingCollectionInstance
        )
    }
}

/// Returns the raw `@odata.type` string of an object node.
#[must_use]
pub fn discriminator(node: &Value) -> Option<&str> {
    node.as_object()?.get(ODATA_TYPE_KEY)?.as_str()
}

/// Returns true when the node is a secret setting value.
#[must_use]
pub fn is_secret_setting_value(node: &Value) -> bool {
    SettingsCatalogType::of(node) == Some(SettingsCatalogType::SecretSettingValue)
}

// ============================================================================
// SECTION: Secret Value State
// ============================================================================

/// Encryption state of a secret setting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecretValueState {
    /// State is not valid.
    Invalid,
    /// `value` holds cleartext.
    NotEncrypted,
    /// `value` holds an opaque service-issued token.
    EncryptedValueToken,
}

impl SecretValueState {
    /// Returns the wire label of this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::NotEncrypted => "notEncrypted",
            Self::EncryptedValueToken => "encryptedValueToken",
        }
    }

    /// Parses a wire label.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "invalid" => Some(Self::Invalid),
            "notEncrypted" => Some(Self::NotEncrypted),
            "encryptedValueToken" => Some(Self::EncryptedValueToken),
            _ => None,
        }
    }
}
