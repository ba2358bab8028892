//! Built-in localized messages and caller-supplied catalogs
//!
//! Each built-in table is indexed by `ErrorCode::index`, so every language
//! covers all nine codes by construction.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::errors::{ErrorCode, FormError, FormResult};

/// Built-in message languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pt,
    Es,
    Fr,
    De,
    It,
    Zh,
    Ja,
}

impl Language {
    pub const ALL: [Language; 8] = [
        Language::En,
        Language::Pt,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::It,
        Language::Zh,
        Language::Ja,
    ];

    /// Language tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Pt => "pt",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::It => "it",
            Language::Zh => "zh",
            Language::Ja => "ja",
        }
    }

    /// Name of the language in that language
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Pt => "Português",
            Language::Es => "Español",
            Language::Fr => "Français",
            Language::De => "Deutsch",
            Language::It => "Italiano",
            Language::Zh => "中文",
            Language::Ja => "日本語",
        }
    }

    /// Built-in message for `code`.
    pub fn message(&self, code: ErrorCode) -> &'static str {
        self.table()[code.index()]
    }

    fn table(&self) -> &'static [&'static str; 9] {
        match self {
            Language::En => &EN,
            Language::Pt => &PT,
            Language::Es => &ES,
            Language::Fr => &FR,
            Language::De => &DE,
            Language::It => &IT,
            Language::Zh => &ZH,
            Language::Ja => &JA,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| FormError::UnknownLanguage(s.to_string()))
    }
}

// Order: required, min, max, minLength, maxLength, equal, regexp, test, checked

const EN: [&str; 9] = [
    "This field is required.",
    "The value is below the allowed minimum.",
    "The value exceeds the allowed maximum.",
    "The value is too short.",
    "The value is too long.",
    "The values do not match.",
    "The format is invalid.",
    "The value did not pass the validation.",
    "This field is required.",
];

const PT: [&str; 9] = [
    "O campo é obrigatório.",
    "O valor é menor que o mínimo permitido.",
    "O valor é maior que o máximo permitido.",
    "O valor é muito curto.",
    "O valor é muito longo.",
    "Os valores não coincidem.",
    "O formato é inválido.",
    "O valor não passou na validação.",
    "Este campo é obrigatório.",
];

const ES: [&str; 9] = [
    "Este campo es obligatorio.",
    "El valor es menor que el mínimo permitido.",
    "El valor supera el máximo permitido.",
    "El valor es demasiado corto.",
    "El valor es demasiado largo.",
    "Los valores no coinciden.",
    "El formato no es válido.",
    "El valor no pasó la validación.",
    "Este campo es obligatorio.",
];

const FR: [&str; 9] = [
    "Ce champ est obligatoire.",
    "La valeur est inférieure au minimum autorisé.",
    "La valeur dépasse le maximum autorisé.",
    "La valeur est trop courte.",
    "La valeur est trop longue.",
    "Les valeurs ne correspondent pas.",
    "Le format est invalide.",
    "La valeur n’a pas passé la validation.",
    "Ce champ est obligatoire.",
];

const DE: [&str; 9] = [
    "Dieses Feld ist erforderlich.",
    "Der Wert liegt unter dem erlaubten Minimum.",
    "Der Wert überschreitet das erlaubte Maximum.",
    "Der Wert ist zu kurz.",
    "Der Wert ist zu lang.",
    "Die Werte stimmen nicht überein.",
    "Das Format ist ungültig.",
    "Der Wert hat die Validierung nicht bestanden.",
    "Dieses Feld ist erforderlich.",
];

const IT: [&str; 9] = [
    "Questo campo è obbligatorio.",
    "Il valore è inferiore al minimo consentito.",
    "Il valore supera il massimo consentito.",
    "Il valore è troppo corto.",
    "Il valore è troppo lungo.",
    "I valori non corrispondono.",
    "Il formato non è valido.",
    "Il valore non ha superato la convalida.",
    "Questo campo è obbligatorio.",
];

const ZH: [&str; 9] = [
    "该字段为必填项。",
    "值低于允许的最小值。",
    "值超过了允许的最大值。",
    "值太短。",
    "值太长。",
    "两个值不匹配。",
    "格式无效。",
    "值未通过验证。",
    "该字段为必填项。",
];

const JA: [&str; 9] = [
    "この項目は必須です。",
    "値が許容される最小値を下回っています。",
    "値が許容される最大値を超えています。",
    "値が短すぎます。",
    "値が長すぎます。",
    "値が一致しません。",
    "形式が無効です。",
    "値が検証に合格しませんでした。",
    "この項目は必須です。",
];

/// A complete error-code to message mapping supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: BTreeMap<ErrorCode, String>,
}

impl Catalog {
    /// Builds a catalog, failing if any of the nine codes is missing.
    pub fn new(entries: BTreeMap<ErrorCode, String>) -> FormResult<Self> {
        if let Some(missing) = ErrorCode::ALL.iter().find(|code| !entries.contains_key(*code)) {
            return Err(FormError::MissingCatalogEntry(*missing));
        }
        Ok(Self { entries })
    }

    /// Builds a catalog keyed by wire code names (`"minLength"`, ...).
    pub fn from_names(entries: BTreeMap<String, String>) -> FormResult<Self> {
        let entries = entries
            .into_iter()
            .map(|(code, message)| Ok((code.parse::<ErrorCode>()?, message)))
            .collect::<FormResult<BTreeMap<_, _>>>()?;
        Self::new(entries)
    }

    /// Copies a built-in table.
    pub fn builtin(language: Language) -> Self {
        let entries = ErrorCode::ALL
            .iter()
            .map(|code| (*code, language.message(*code).to_string()))
            .collect();
        Self { entries }
    }

    pub fn get(&self, code: ErrorCode) -> FormResult<&str> {
        self.entries
            .get(&code)
            .map(String::as_str)
            .ok_or(FormError::MissingCatalogEntry(code))
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorCode, &str)> {
        self.entries.iter().map(|(code, message)| (*code, message.as_str()))
    }
}

/// Where default messages come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageSource {
    Language(Language),
    Catalog(Catalog),
}

impl Default for MessageSource {
    fn default() -> Self {
        MessageSource::Language(Language::default())
    }
}

impl From<Language> for MessageSource {
    fn from(language: Language) -> Self {
        MessageSource::Language(language)
    }
}

impl From<Catalog> for MessageSource {
    fn from(catalog: Catalog) -> Self {
        MessageSource::Catalog(catalog)
    }
}

impl MessageSource {
    /// Selects a built-in language by tag.
    pub fn from_tag(tag: &str) -> FormResult<Self> {
        Ok(MessageSource::Language(tag.parse()?))
    }

    /// Default message for `code` from this source.
    pub fn lookup(&self, code: ErrorCode) -> FormResult<&str> {
        match self {
            MessageSource::Language(language) => Ok(language.message(code)),
            MessageSource::Catalog(catalog) => catalog.get(code),
        }
    }
}
