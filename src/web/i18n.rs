use std::{collections::HashMap, fmt, str::FromStr, sync::Arc};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use super::store::KeyValueStore;

pub const LOCALE_STORAGE_KEY: &str = "locale";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Ru,
    No,
}

pub const DEFAULT_LOCALE: Locale = Locale::En;
pub const SUPPORTED_LOCALES: [Locale; 3] = [Locale::En, Locale::Ru, Locale::No];

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
            Locale::No => "no",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SUPPORTED_LOCALES
            .into_iter()
            .find(|l| l.code() == s)
            .ok_or_else(|| anyhow::anyhow!("unsupported locale {s:?}"))
    }
}

lazy_static! {
    static ref AUTH_DICTIONARIES: HashMap<Locale, Value> = {
        let raw = [
            (Locale::En, include_str!("../../locales/en/auth.json")),
            (Locale::Ru, include_str!("../../locales/ru/auth.json")),
            (Locale::No, include_str!("../../locales/no/auth.json")),
        ];
        raw.into_iter()
            .map(|(locale, json)| {
                let dict = serde_json::from_str(json).unwrap_or_else(|e| {
                    warn!(%locale, error = %e, "broken locale file; using an empty dictionary");
                    Value::Null
                });
                (locale, dict)
            })
            .collect()
    };
}

fn lookup<'a>(dict: &'a Value, key: &str) -> Option<&'a str> {
    key.split('.')
        .try_fold(dict, |node, part| node.get(part))
        .and_then(Value::as_str)
}

/// Translates a dotted `auth` key, falling back to English and then to the key itself.
pub fn translate(locale: Locale, key: &str) -> String {
    [locale, DEFAULT_LOCALE]
        .into_iter()
        .filter_map(|l| AUTH_DICTIONARIES.get(&l))
        .find_map(|dict| lookup(dict, key))
        .unwrap_or(key)
        .to_string()
}

/// Current locale plus its persistence.
pub struct LocaleContext {
    locale: Locale,
    store: Arc<dyn KeyValueStore>,
}

impl LocaleContext {
    /// Restores the saved locale; a missing or unknown value yields [`DEFAULT_LOCALE`].
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let locale = store
            .get(LOCALE_STORAGE_KEY)
            .and_then(|saved| saved.parse().ok())
            .unwrap_or(DEFAULT_LOCALE);
        Self { locale, store }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) -> anyhow::Result<()> {
        self.store.set(LOCALE_STORAGE_KEY, locale.code())?;
        self.locale = locale;
        Ok(())
    }

    pub fn t(&self, key: &str) -> String {
        translate(self.locale, key)
    }
}
