use std::sync::LazyLock;

use regex::Regex;

use crate::config::{Format, PrefixRegistry, PrefixRule};
use crate::error::Error;
use crate::prefix;
use crate::reference;
use crate::types::{PrefixMatch, Reference};

/// `config2:<setting>` / `config3:<setting>`.
#[allow(clippy::expect_used, reason = "pattern is a compile-time constant")]
static CONFIG_SETTING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| return Regex::new(r"^config[23]:(.+)").expect("valid regex"));

/// Build a config-settings URL: `{base}{lowercased setting}`.
///
/// # Errors
///
/// Returns `Error::MalformedConfigLink` if the link isn't `config2:`/`config3:`.
fn config_setting_url(link: &str, base: &str) -> Result<String, Error> {
    let setting = CONFIG_SETTING_PATTERN
        .captures(link)
        .and_then(|cap| return cap.get(1))
        .ok_or_else(|| return Error::MalformedConfigLink { link: link.to_string() })?;

    return Ok(format!("{base}{}", setting.as_str().to_lowercase()));
}

/// URL into the project's own class reference.
/// Members map to `method-`/`property-` anchors; `EVENT_*` constants
/// keep their name as the anchor.
fn internal_url(base: &str, reference: &Reference) -> String {
    let url = format!("{base}{}.html", slugify(&reference.class_name));

    let hash = match &reference.subject {
        None => reference.hash.clone().unwrap_or_default(),
        Some(subject) => {
            let kind = if reference.is_method {
                "method-"
            } else if subject.starts_with("EVENT_") {
                ""
            } else {
                "property-"
            };
            format!("{kind}{}", subject.replace('_', "-").to_lowercase())
        },
    };

    return with_hash(url, &hash);
}

/// Resolve a raw link against the registry.
///
/// Returns the rewritten URL, or `None` when the link should be left alone:
/// no registered prefix, no usable format, or a reference that doesn't parse.
/// A malformed config link is logged and skipped.
pub fn replace_prefix(link: &str, registry: &PrefixRegistry) -> Option<String> {
    let found = prefix::extract_prefix(link, registry)?;

    return match synthesize(&found) {
        Err(e) => {
            tracing::warn!(prefix = found.prefix, "skipping link: {e}");
            None
        },
        Ok(None) => None,
        Ok(Some(url)) => {
            tracing::debug!(link = %found.decoded, url = %url, "rewrote prefixed link");
            Some(url)
        },
    };
}

/// Convert a class path to its URL form: backslashes become hyphens,
/// then everything is lowercased.
pub fn slugify(class_name: &str) -> String {
    return class_name.replace('\\', "-").to_lowercase();
}

/// Produce the final URL for a link whose prefix is registered.
///
/// `Ok(None)` means no rewrite: the rule has no recognized format, or the
/// format needs a class reference and the link doesn't parse as one.
///
/// # Errors
///
/// Returns `Error::MalformedConfigLink` when a `config` rule gets a link
/// that isn't `config2:`/`config3:`.
pub fn synthesize(found: &PrefixMatch<'_>) -> Result<Option<String>, Error> {
    let PrefixMatch { decoded, prefix: registered, rule } = found;
    let Some(format) = rule.dialect() else {
        return Ok(None);
    };

    return match format {
        Format::Config => config_setting_url(decoded, &rule.base).map(Some),
        Format::Generic => Ok(Some(decoded.replacen(&format!("{registered}:"), &rule.base, 1))),
        Format::Internal => {
            Ok(reference::parse_reference(&prefix::remove_prefix(decoded))
                .map(|r| return internal_url(&rule.base, &r)))
        },
        Format::Yii => {
            Ok(reference::parse_reference(&prefix::remove_prefix(decoded))
                .map(|r| return yii_url(rule, &r)))
        },
    };
}

/// Append `#hash` unless the hash is empty.
fn with_hash(url: String, hash: &str) -> String {
    if hash.is_empty() {
        return url;
    }
    return format!("{url}#{hash}");
}

/// URL into Yii API docs. A base containing `1.1` selects the legacy
/// generation: class names kept verbatim, method anchors without `()`.
fn yii_url(rule: &PrefixRule, reference: &Reference) -> String {
    let legacy = rule.base.contains("1.1");
    let class_part = if legacy {
        reference.class_name.clone()
    } else {
        slugify(&reference.class_name)
    };
    let url = format!("{}{class_part}", rule.base);

    let hash = match &reference.subject {
        None => reference.hash.clone().unwrap_or_default(),
        Some(subject) if reference.is_method => {
            let parens = if legacy { "" } else { "()" };
            format!("{subject}{parens}-detail")
        },
        Some(subject) => format!("${subject}-detail"),
    };

    return with_hash(url, &hash);
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;

    fn registry_with(prefix: &str, base: &str, format: Format) -> PrefixRegistry {
        return [(prefix.to_string(), PrefixRule::new(base, format))].into_iter().collect();
    }

    #[test]
    fn no_colon_is_no_rewrite() {
        let registry = registry_with("foo", "/docs/", Format::Internal);
        assert_eq!(replace_prefix("MyClass", &registry), None);
    }

    #[test]
    #[traced_test]
    fn registered_legacy_prefix_resolves_after_warning() {
        let registry = registry_with("api", "/api/", Format::Internal);
        assert_eq!(
            replace_prefix("api:craft\\base\\Model", &registry).as_deref(),
            Some("/api/craft-base-model.html")
        );
        assert!(logs_contain("broken legacy 'api' link: \"api:craft\\base\\Model\""));
    }

    #[test]
    fn unregistered_prefix_is_idempotent() {
        let registry = registry_with("foo", "/docs/", Format::Internal);
        assert_eq!(replace_prefix("bar:MyClass", &registry), None);
        assert_eq!(replace_prefix("bar:MyClass", &registry), None);
    }

    #[test]
    fn internal_method() {
        let registry = registry_with("foo", "/docs/", Format::Internal);
        assert_eq!(
            replace_prefix("foo:\\Ns\\MyClass::bar()", &registry).as_deref(),
            Some("/docs/ns-myclass.html#method-bar")
        );
    }

    #[test]
    fn internal_event_constant_has_no_kind_prefix() {
        let registry = registry_with("foo", "/docs/", Format::Internal);
        assert_eq!(
            replace_prefix("foo:MyClass::EVENT_CLICK", &registry).as_deref(),
            Some("/docs/myclass.html#event-click")
        );
    }

    #[test]
    fn internal_property() {
        let registry = registry_with("foo", "/docs/", Format::Internal);
        assert_eq!(
            replace_prefix("foo:craft\\web\\View::$registeredJs", &registry).as_deref(),
            Some("/docs/craft-web-view.html#property-registeredjs")
        );
    }

    #[test]
    fn internal_subject_overrides_explicit_hash() {
        let registry = registry_with("foo", "/docs/", Format::Internal);
        assert_eq!(
            replace_prefix("foo:MyClass::some_prop#ignored", &registry).as_deref(),
            Some("/docs/myclass.html#property-some-prop")
        );
    }

    #[test]
    fn internal_class_with_hash() {
        let registry = registry_with("foo", "/docs/", Format::Internal);
        assert_eq!(
            replace_prefix("foo:MyClass#public-methods", &registry).as_deref(),
            Some("/docs/myclass.html#public-methods")
        );
        assert_eq!(
            replace_prefix("foo:MyClass", &registry).as_deref(),
            Some("/docs/myclass.html")
        );
    }

    #[test]
    fn internal_unparseable_reference_is_no_rewrite() {
        let registry = registry_with("foo", "/docs/", Format::Internal);
        assert_eq!(replace_prefix("foo:not a class", &registry), None);
    }

    #[test]
    fn yii_modern_property() {
        let registry = registry_with("yii", "/doc/2.0/", Format::Yii);
        assert_eq!(
            replace_prefix("yii:CModel::$attributes", &registry).as_deref(),
            Some("/doc/2.0/cmodel#$attributes-detail")
        );
    }

    #[test]
    fn yii_modern_method_keeps_parens() {
        let registry = registry_with("yii", "/doc/2.0/", Format::Yii);
        assert_eq!(
            replace_prefix("yii:yii\\base\\Model::validate()", &registry).as_deref(),
            Some("/doc/2.0/yii-base-model#validate()-detail")
        );
    }

    #[test]
    fn yii_legacy_class_with_hash() {
        let registry = registry_with("yii", "/doc/1.1/", Format::Yii);
        assert_eq!(
            replace_prefix("yii:CActiveRecord#overview", &registry).as_deref(),
            Some("/doc/1.1/CActiveRecord#overview")
        );
    }

    #[test]
    fn yii_legacy_method_drops_parens() {
        let registry = registry_with("yii", "/doc/1.1/", Format::Yii);
        assert_eq!(
            replace_prefix("yii:CActiveRecord::find()#ignored", &registry).as_deref(),
            Some("/doc/1.1/CActiveRecord#find-detail")
        );
    }

    #[test]
    fn generic_substitutes_base() {
        let registry = registry_with("ext", "https://example.com/", Format::Generic);
        assert_eq!(
            replace_prefix("ext:some/path", &registry).as_deref(),
            Some("https://example.com/some/path")
        );
    }

    #[test]
    fn generic_decodes_first() {
        let registry = registry_with("ext", "https://example.com/", Format::Generic);
        assert_eq!(
            replace_prefix("ext:some%20page", &registry).as_deref(),
            Some("https://example.com/some page")
        );
    }

    #[test]
    fn config_setting_is_lowercased() {
        let registry = registry_with("config2", "/config/", Format::Config);
        assert_eq!(
            replace_prefix("config2:someSetting", &registry).as_deref(),
            Some("/config/somesetting")
        );
    }

    #[test]
    #[traced_test]
    fn config_rule_on_other_prefix_is_skipped() {
        let registry = registry_with("settings", "/config/", Format::Config);
        assert_eq!(replace_prefix("settings:devMode", &registry), None);
        assert!(logs_contain("malformed config link"));
    }

    #[test]
    fn malformed_config_link_is_a_typed_error() {
        let registry = registry_with("settings", "/config/", Format::Config);
        let found = prefix::extract_prefix("settings:devMode", &registry).unwrap();
        assert!(matches!(synthesize(&found), Err(Error::MalformedConfigLink { .. })));
    }

    #[test]
    fn unknown_format_is_no_rewrite() {
        let registry: PrefixRegistry = [(
            "foo".to_string(),
            PrefixRule {
                base: "/docs/".to_string(),
                format: Some("wiki".to_string()),
            },
        )]
        .into_iter()
        .collect();
        assert_eq!(replace_prefix("foo:MyClass", &registry), None);
    }

    #[test]
    fn slugify_class_paths() {
        assert_eq!(slugify("craft\\elements\\Entry"), "craft-elements-entry");
        assert_eq!(slugify("CActiveRecord"), "cactiverecord");
    }
}
