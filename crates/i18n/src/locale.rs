use std::collections::HashMap;

/// String lookup for everything shown to users.
///
/// Placeholders are written `${name}` and filled from `args`.
pub trait Translator: Send + Sync {
    fn translate(&self, key: &str, args: &[(&str, &str)]) -> String;

    fn tr(&self, key: &str) -> String {
        self.translate(key, &[])
    }
}

/// A static table of translations. Unknown keys render as the key itself.
pub struct Locale {
    code: &'static str,
    entries: HashMap<&'static str, &'static str>,
}

impl Locale {
    pub fn new(code: &'static str, entries: &[(&'static str, &'static str)]) -> Self {
        Self {
            code,
            entries: entries.iter().copied().collect(),
        }
    }

    pub fn english() -> Self {
        Self::new("en", super::en::ENTRIES)
    }

    pub fn code(&self) -> &str {
        self.code
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::english()
    }
}

impl Translator for Locale {
    fn translate(&self, key: &str, args: &[(&str, &str)]) -> String {
        let Some(template) = self.entries.get(key) else {
            tracing::debug!("Missing translation for '{}' in locale {}", key, self.code);
            return key.to_string();
        };

        args.iter().fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("${{{}}}", name), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_known_keys() {
        let locale = Locale::english();
        assert_eq!(locale.tr("UPLOAD_FAILED"), "Upload failed");
        assert_eq!(locale.tr("PICBED_ALICLOUD_OPTIONS"), "Set URL Suffix");
    }

    #[test]
    fn fills_placeholders() {
        let locale = Locale::english();
        let text = locale.translate("PLUGIN_NOT_FOUND", &[("name", "smms")]);
        assert_eq!(text, "Picture bed smms is not registered");
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        let locale = Locale::new("test", &[]);
        assert_eq!(locale.tr("NOPE"), "NOPE");
        assert_eq!(locale.code(), "test");
    }
}
