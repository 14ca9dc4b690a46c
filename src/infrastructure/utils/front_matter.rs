use derive_more::Display;
use serde_json::Value;

use crate::entities::work::RawRecord;

const OPENING_DELIMITER: &str = "---";
const CLOSING_DELIMITERS: [&str; 2] = ["---", "..."];

#[derive(Debug, Display, PartialEq)]
pub enum FrontMatterError {
    #[display("Front matter block is never closed")]
    Unterminated,

    #[display("Invalid YAML: {_0}")]
    Yaml(String),

    #[display("Front matter must be a mapping, found {_0}")]
    NotAMapping(&'static str),
}

/// Splits a content file into its YAML front matter and Markdown body.
///
/// The front matter must start on the first line (after an optional BOM)
/// with `---` and end with a `---` or `...` line. Files without an opening
/// delimiter have no front matter and the whole text is the body.
pub fn split_front_matter(source: &str) -> Result<(Option<&str>, &str), FrontMatterError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let (first_line, rest) = match source.find('\n') {
        Some(idx) => (&source[..idx], &source[idx + 1..]),
        None => (source, ""),
    };
    if first_line.trim_end() != OPENING_DELIMITER {
        return Ok((None, source));
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if CLOSING_DELIMITERS.contains(&line.trim_end()) {
            return Ok((Some(&rest[..offset]), &rest[offset + line.len()..]));
        }
        offset += line.len();
    }

    Err(FrontMatterError::Unterminated)
}

/// Parses a content file into a raw record and its body.
pub fn parse_front_matter(source: &str) -> Result<(RawRecord, &str), FrontMatterError> {
    let (yaml, body) = split_front_matter(source)?;
    let record = match yaml {
        Some(yaml) => yaml_to_record(yaml)?,
        None => RawRecord::new(),
    };
    Ok((record, body))
}

fn yaml_to_record(yaml: &str) -> Result<RawRecord, FrontMatterError> {
    if yaml.trim().is_empty() {
        return Ok(RawRecord::new());
    }

    let parsed: serde_yaml::Value = serde_yaml::from_str(yaml)
        .map_err(|e| FrontMatterError::Yaml(e.to_string()))?;
    let json = serde_json::to_value(&parsed)
        .map_err(|e| FrontMatterError::Yaml(e.to_string()))?;

    match json {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(RawRecord::new()),
        Value::Array(_) => Err(FrontMatterError::NotAMapping("a sequence")),
        _ => Err(FrontMatterError::NotAMapping("a scalar")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn splits_yaml_from_body() {
        let source = "---\ntitle: Portfolio\n---\n# Body\n";
        let (yaml, body) = split_front_matter(source).unwrap();
        assert_eq!(yaml, Some("title: Portfolio\n"));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn handles_bom_crlf_and_dot_terminator() {
        let source = "\u{feff}---\r\ntitle: Portfolio\r\n...\r\nbody";
        let (yaml, body) = split_front_matter(source).unwrap();
        assert_eq!(yaml, Some("title: Portfolio\r\n"));
        assert_eq!(body, "body");
    }

    #[test]
    fn files_without_front_matter_are_all_body() {
        let (yaml, body) = split_front_matter("# Just markdown\n").unwrap();
        assert!(yaml.is_none());
        assert_eq!(body, "# Just markdown\n");
    }

    #[test]
    fn unterminated_block_is_an_error() {
        assert_eq!(
            split_front_matter("---\ntitle: x\n"),
            Err(FrontMatterError::Unterminated)
        );
    }

    #[test]
    fn yaml_dates_stay_strings() {
        let (record, _) = parse_front_matter(
            "---\ntitle: Portfolio\npublishDate: 2024-01-15\ntags: [web, rust]\n---\n",
        )
        .unwrap();
        assert_eq!(record["publishDate"], json!("2024-01-15"));
        assert_eq!(record["tags"], json!(["web", "rust"]));
    }

    #[test]
    fn empty_front_matter_is_an_empty_record() {
        let (record, body) = parse_front_matter("---\n---\nbody").unwrap();
        assert!(record.is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn non_mapping_front_matter_is_rejected() {
        assert_eq!(
            parse_front_matter("---\n- a\n- b\n---\n").unwrap_err(),
            FrontMatterError::NotAMapping("a sequence")
        );
        assert!(matches!(
            parse_front_matter("---\ntitle: [unclosed\n---\n").unwrap_err(),
            FrontMatterError::Yaml(_)
        ));
    }
}
