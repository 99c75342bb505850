use crate::persist::PersistError;

const MAX_NAME_LEN: usize = 255;

/// Names come straight from the project page, so each one must be a single
/// plain path component before it touches the filesystem.
pub fn validate_artifact_name(name: &str) -> Result<&str, PersistError> {
    let invalid = |reason| PersistError::InvalidName {
        name: name.to_string(),
        reason,
    };
    if name.is_empty() {
        return Err(invalid("empty name"));
    }
    if name == "." || name == ".." {
        return Err(invalid("relative path component"));
    }
    if name.chars().any(is_forbidden) {
        return Err(invalid("forbidden character"));
    }
    if name != name.trim() {
        return Err(invalid("surrounding whitespace"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid("name too long"));
    }
    Ok(name)
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}
