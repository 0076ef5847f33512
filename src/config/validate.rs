// src/config/validate.rs

use crate::config::model::{ConfigFile, PrefixerConfig, RawConfigFile};
use crate::errors::{JanitorError, Result};
use crate::types::HeaderAlign;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = JanitorError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_tagger(&raw)?;
        validate_versioner(&raw)?;
        let prefixer = validate_prefixer(&raw)?;
        Ok(ConfigFile::new_unchecked(
            raw.blacklist,
            raw.tagger,
            prefixer,
            raw.versioner,
        ))
    }
}

fn validate_tagger(raw: &RawConfigFile) -> Result<()> {
    if raw.tagger.words.iter().any(|w| w.trim().is_empty()) {
        return Err(JanitorError::ConfigError(
            "[tagger].words must not contain empty entries".to_string(),
        ));
    }
    if raw.tagger.marks.keys().any(|m| m.is_empty()) {
        return Err(JanitorError::ConfigError(
            "[tagger].marks must not contain an empty mark".to_string(),
        ));
    }
    Ok(())
}

fn validate_prefixer(raw: &RawConfigFile) -> Result<PrefixerConfig> {
    let section = &raw.prefixer;

    let align: HeaderAlign = section
        .align
        .parse()
        .map_err(|e: String| JanitorError::ConfigError(format!("[prefixer].align: {e}")))?;

    // The header line must at least fit the tag, one space either side of it
    // and the block markers on both ends.
    let minimum = section.tag.chars().count() + 2 + 2 * section.block.chars().count();
    if section.width < minimum {
        return Err(JanitorError::ConfigError(format!(
            "[prefixer].width = {} is too small for tag {:?} and block {:?} (minimum {})",
            section.width, section.tag, section.block, minimum
        )));
    }

    Ok(PrefixerConfig {
        options: section.options.clone(),
        tag: section.tag.clone(),
        align,
        width: section.width,
        block: section.block.clone(),
    })
}

fn validate_versioner(raw: &RawConfigFile) -> Result<()> {
    let section = &raw.versioner;
    for (name, base) in [
        ("major_base", section.major_base),
        ("minor_base", section.minor_base),
        ("maintenance_base", section.maintenance_base),
        ("build_base", section.build_base),
    ] {
        if !(2..=16).contains(&base) {
            return Err(JanitorError::ConfigError(format!(
                "[versioner].{name} = {base} is out of range (expected 2..=16)"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_defaults_validate() {
        let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();
        assert!(cfg.tagger.options.enabled);
        assert_eq!(cfg.prefixer.align, HeaderAlign::Center);
    }

    #[test]
    fn bad_align_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.prefixer.align = "justified".to_string();
        assert!(matches!(
            ConfigFile::try_from(raw),
            Err(JanitorError::ConfigError(_))
        ));
    }

    #[test]
    fn too_narrow_header_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.prefixer.width = 3;
        assert!(ConfigFile::try_from(raw).is_err());
    }

    #[test]
    fn out_of_range_base_is_rejected() {
        let mut raw = RawConfigFile::default();
        raw.versioner.build_base = 40;
        assert!(ConfigFile::try_from(raw).is_err());
    }
}
