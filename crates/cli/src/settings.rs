use crate::error::CliError;
use model::pagination::{
    codec::{CursorCodec, LooseTyping, TypeCodec},
    request::{BaseOrder, PaginationKeys},
};
use serde::Deserialize;
use std::path::Path;

/// Optional JSON settings file; every field falls back to the built-in
/// request defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub default_limit: Option<usize>,
    /// `asc`/`ascending` or `desc`/`descending`.
    pub default_order: Option<String>,
    /// Key spec such as `created_at:date,id:number`.
    pub default_keys: Option<String>,
    /// Present to enable loose typing for `unknown` key columns.
    pub loose_typing: Option<LooseTypingSettings>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LooseTypingSettings {
    pub min_epoch_millis: Option<i64>,
    pub max_epoch_millis: Option<i64>,
}

impl Settings {
    pub async fn load(path: Option<&Path>) -> Result<Self, CliError> {
        match path {
            Some(path) => {
                let source = tokio::fs::read_to_string(path).await?;
                Self::from_json(&source)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_json(source: &str) -> Result<Self, CliError> {
        let settings = serde_json::from_str(source)?;
        Ok(settings)
    }

    pub fn order(&self, flag: Option<&str>) -> Result<Option<BaseOrder>, CliError> {
        flag.or(self.default_order.as_deref())
            .map(|raw| raw.parse::<BaseOrder>().map_err(CliError::Config))
            .transpose()
    }

    pub fn keys(&self, flag: Option<&str>) -> Result<Option<PaginationKeys>, CliError> {
        let keys = flag
            .or(self.default_keys.as_deref())
            .map(PaginationKeys::parse)
            .transpose()?;
        Ok(keys)
    }

    pub fn limit(&self, flag: Option<usize>) -> Option<usize> {
        flag.or(self.default_limit)
    }

    /// Loose typing is on when the flag is set or the settings carry a
    /// `loose_typing` section.
    pub fn cursor_codec(&self, loose_flag: bool) -> Result<CursorCodec, CliError> {
        let window = match (&self.loose_typing, loose_flag) {
            (Some(section), _) => Some(section),
            (None, true) => None,
            (None, false) => return Ok(CursorCodec::default()),
        };

        let defaults = LooseTyping::default();
        let loose = LooseTyping::new(
            window
                .and_then(|w| w.min_epoch_millis)
                .unwrap_or(defaults.min_epoch_millis),
            window
                .and_then(|w| w.max_epoch_millis)
                .unwrap_or(defaults.max_epoch_millis),
        );
        if loose.min_epoch_millis >= loose.max_epoch_millis {
            return Err(CliError::Config(format!(
                "loose typing window is empty: {}..{}",
                loose.min_epoch_millis, loose.max_epoch_millis
            )));
        }

        Ok(CursorCodec::new(TypeCodec::with_loose_typing(loose)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{core::type_tag::TypeTag, pagination::request::KeyColumn};

    #[test]
    fn test_parse_settings() {
        let settings = Settings::from_json(
            r#"{"default_limit": 25, "default_order": "asc", "default_keys": "name:string,id", "loose_typing": {"min_epoch_millis": 0}}"#,
        )
        .unwrap();

        assert_eq!(settings.limit(None), Some(25));
        assert_eq!(settings.limit(Some(5)), Some(5));
        assert_eq!(settings.order(None).unwrap(), Some(BaseOrder::Ascending));
        assert_eq!(settings.order(Some("desc")).unwrap(), Some(BaseOrder::Descending));
        assert_eq!(
            settings.keys(None).unwrap().unwrap().columns(),
            &[
                KeyColumn::new("name", TypeTag::String),
                KeyColumn::new("id", TypeTag::Number)
            ]
        );

        let codec = settings.cursor_codec(false).unwrap();
        let loose = codec.type_codec().loose_typing().unwrap();
        assert_eq!(loose.min_epoch_millis, 0);
        assert_eq!(loose.max_epoch_millis, LooseTyping::default().max_epoch_millis);
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(matches!(
            Settings::from_json(r#"{"limit": 3}"#),
            Err(CliError::SettingsParse(_))
        ));
    }

    #[test]
    fn test_loose_typing_is_opt_in() {
        let settings = Settings::default();
        assert!(settings.cursor_codec(false).unwrap().type_codec().loose_typing().is_none());
        assert_eq!(
            settings.cursor_codec(true).unwrap().type_codec().loose_typing(),
            Some(&LooseTyping::default())
        );
    }

    #[test]
    fn test_bad_order_is_a_config_error() {
        let settings = Settings::default();
        assert!(matches!(settings.order(Some("sideways")), Err(CliError::Config(_))));
    }
}
