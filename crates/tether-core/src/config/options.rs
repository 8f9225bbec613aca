//! Per-platform build options
//!
//! Unlike the rest of [`Config`](super::Config) these bags are meant to be
//! patched after loading, typically from command-line flags.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

macro_rules! string_enum {
    ($ty:ident, $field:literal, { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = ConfigError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)+
                    _ => Err(ConfigError::InvalidValue {
                        field: $field.to_string(),
                        message: format!(
                            "'{}' must be one of: {}",
                            s,
                            [$($name),+].join(", ")
                        ),
                    }),
                }
            }
        }
    };
}

/// Android release artifact type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AndroidReleaseType {
    #[serde(rename = "AAB")]
    Aab,
    #[serde(rename = "APK")]
    Apk,
}

string_enum!(AndroidReleaseType, "android.buildOptions.releaseType", {
    Aab => "AAB",
    Apk => "APK",
});

/// Tool used to sign Android release artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AndroidSigningType {
    Apksigner,
    Jarsigner,
}

string_enum!(AndroidSigningType, "android.buildOptions.signingType", {
    Apksigner => "apksigner",
    Jarsigner => "jarsigner",
});

/// Xcode archive export method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum XcodeExportMethod {
    AppStoreConnect,
    ReleaseTesting,
    Enterprise,
    Debugging,
    #[serde(rename = "developer-id")]
    DeveloperId,
    MacApplication,
    Validation,
}

string_enum!(XcodeExportMethod, "ios.buildOptions.exportMethod", {
    AppStoreConnect => "app-store-connect",
    ReleaseTesting => "release-testing",
    Enterprise => "enterprise",
    Debugging => "debugging",
    DeveloperId => "developer-id",
    MacApplication => "mac-application",
    Validation => "validation",
});

/// Xcode code signing style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XcodeSigningStyle {
    Automatic,
    Manual,
}

string_enum!(XcodeSigningStyle, "ios.buildOptions.xcodeSigningStyle", {
    Automatic => "automatic",
    Manual => "manual",
});

/// Android build options. Every field is optional; absent means "not
/// configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AndroidBuildOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keystore_alias_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_type: Option<AndroidReleaseType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_type: Option<AndroidSigningType>,
}

/// Placeholder for secrets in printed configuration
pub const REDACTED: &str = "********";

/// Keystore settings needed to sign a release build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeystoreSigning<'a> {
    pub path: &'a std::path::Path,
    pub password: Option<&'a str>,
    pub alias: &'a str,
    pub alias_password: Option<&'a str>,
    pub signing_type: AndroidSigningType,
}

impl AndroidBuildOptions {
    /// Whether nothing is configured
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay `overrides`: fields set there replace fields set here
    pub fn merge(&mut self, overrides: &AndroidBuildOptions) {
        merge_field(&mut self.keystore_path, &overrides.keystore_path);
        merge_field(&mut self.keystore_password, &overrides.keystore_password);
        merge_field(&mut self.keystore_alias, &overrides.keystore_alias);
        merge_field(
            &mut self.keystore_alias_password,
            &overrides.keystore_alias_password,
        );
        merge_field(&mut self.release_type, &overrides.release_type);
        merge_field(&mut self.signing_type, &overrides.signing_type);
    }

    /// Keystore signing settings, when a keystore and alias are both configured.
    /// The signing tool defaults to `apksigner`.
    pub fn keystore_signing(&self) -> Option<KeystoreSigning<'_>> {
        Some(KeystoreSigning {
            path: self.keystore_path.as_deref()?,
            password: self.keystore_password.as_deref(),
            alias: self.keystore_alias.as_deref()?,
            alias_password: self.keystore_alias_password.as_deref(),
            signing_type: self.signing_type.unwrap_or(AndroidSigningType::Apksigner),
        })
    }

    /// Copy with both keystore passwords masked, for display
    pub fn redacted(&self) -> Self {
        let mask = |secret: &Option<String>| secret.as_ref().map(|_| REDACTED.to_string());
        Self {
            keystore_password: mask(&self.keystore_password),
            keystore_alias_password: mask(&self.keystore_alias_password),
            ..self.clone()
        }
    }

    /// Release artifact type, `AAB` unless configured
    pub fn release_type_or_default(&self) -> AndroidReleaseType {
        self.release_type.unwrap_or(AndroidReleaseType::Aab)
    }
}

/// iOS build options. Every field is optional; absent means "not configured".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IosBuildOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_method: Option<XcodeExportMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xcode_signing_style: Option<XcodeSigningStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signing_certificate: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provisioning_profile: Option<String>,
}

impl IosBuildOptions {
    /// Whether nothing is configured
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay `overrides`: fields set there replace fields set here
    pub fn merge(&mut self, overrides: &IosBuildOptions) {
        merge_field(&mut self.team_id, &overrides.team_id);
        merge_field(&mut self.export_method, &overrides.export_method);
        merge_field(&mut self.xcode_signing_style, &overrides.xcode_signing_style);
        merge_field(&mut self.signing_certificate, &overrides.signing_certificate);
        merge_field(&mut self.provisioning_profile, &overrides.provisioning_profile);
    }

    /// Export method, `app-store-connect` unless configured
    pub fn export_method_or_default(&self) -> XcodeExportMethod {
        self.export_method.unwrap_or(XcodeExportMethod::AppStoreConnect)
    }
}

fn merge_field<T: Clone>(base: &mut Option<T>, overlay: &Option<T>) {
    if overlay.is_some() {
        base.clone_from(overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_empty() {
        assert!(AndroidBuildOptions::default().is_empty());
        assert!(IosBuildOptions::default().is_empty());
    }

    #[test]
    fn test_enum_names() {
        assert_eq!(
            serde_json::to_string(&AndroidReleaseType::Aab).unwrap(),
            "\"AAB\""
        );
        assert_eq!(
            serde_json::to_string(&XcodeExportMethod::DeveloperId).unwrap(),
            "\"developer-id\""
        );
        assert_eq!(
            serde_json::to_string(&XcodeExportMethod::AppStoreConnect).unwrap(),
            "\"app-store-connect\""
        );
        assert_eq!(
            "mac-application".parse::<XcodeExportMethod>().unwrap(),
            XcodeExportMethod::MacApplication
        );
        assert_eq!(
            "jarsigner".parse::<AndroidSigningType>().unwrap(),
            AndroidSigningType::Jarsigner
        );
        assert!("ad-hoc".parse::<XcodeExportMethod>().is_err());
        assert!("apk".parse::<AndroidReleaseType>().is_err());
    }

    #[test]
    fn test_every_export_method_round_trips() {
        let methods = [
            XcodeExportMethod::AppStoreConnect,
            XcodeExportMethod::ReleaseTesting,
            XcodeExportMethod::Enterprise,
            XcodeExportMethod::Debugging,
            XcodeExportMethod::DeveloperId,
            XcodeExportMethod::MacApplication,
            XcodeExportMethod::Validation,
        ];
        for method in methods {
            let json = serde_json::to_string(&method).unwrap();
            assert_eq!(json, format!("\"{}\"", method));
            assert_eq!(method.as_str().parse::<XcodeExportMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_merge_overrides_only_set_fields() {
        let mut base = AndroidBuildOptions {
            keystore_path: Some(PathBuf::from("release.jks")),
            keystore_alias: Some("upload".to_string()),
            ..Default::default()
        };
        let flags = AndroidBuildOptions {
            keystore_alias: Some("release".to_string()),
            release_type: Some(AndroidReleaseType::Apk),
            ..Default::default()
        };

        base.merge(&flags);
        assert_eq!(base.keystore_path, Some(PathBuf::from("release.jks")));
        assert_eq!(base.keystore_alias.as_deref(), Some("release"));
        assert_eq!(base.release_type_or_default(), AndroidReleaseType::Apk);
    }

    #[test]
    fn test_keystore_signing_requires_path_and_alias() {
        let mut opts = AndroidBuildOptions {
            keystore_path: Some(PathBuf::from("release.jks")),
            ..Default::default()
        };
        assert!(opts.keystore_signing().is_none());

        opts.keystore_alias = Some("upload".to_string());
        let signing = opts.keystore_signing().unwrap();
        assert_eq!(signing.alias, "upload");
        assert_eq!(signing.signing_type, AndroidSigningType::Apksigner);
        assert!(signing.password.is_none());
    }

    #[test]
    fn test_passwords_serialized_unless_redacted() {
        let opts = AndroidBuildOptions {
            keystore_alias: Some("upload".to_string()),
            keystore_password: Some("hunter2".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&opts).unwrap();
        assert_eq!(json["keystorePassword"], "hunter2");
        assert!(json.get("keystoreAliasPassword").is_none());

        let redacted = opts.redacted();
        assert_eq!(redacted.keystore_password.as_deref(), Some(REDACTED));
        assert!(redacted.keystore_alias_password.is_none());
        assert_eq!(redacted.keystore_alias, opts.keystore_alias);
        assert!(!serde_json::to_string(&redacted).unwrap().contains("hunter"));
    }

    #[test]
    fn test_ios_options_from_json() {
        let opts: IosBuildOptions = serde_json::from_str(
            r#"{"teamId": "ABC123", "exportMethod": "enterprise", "xcodeSigningStyle": "manual"}"#,
        )
        .unwrap();
        assert_eq!(opts.team_id.as_deref(), Some("ABC123"));
        assert_eq!(opts.export_method_or_default(), XcodeExportMethod::Enterprise);
        assert_eq!(opts.xcode_signing_style, Some(XcodeSigningStyle::Manual));
        assert!(IosBuildOptions::default().export_method_or_default() == XcodeExportMethod::AppStoreConnect);
    }
}
