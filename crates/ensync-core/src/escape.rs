//! Escaping for LDAP filter values (RFC 4515) and DN attribute values (RFC 4514).

/// Escape a value embedded in an LDAP search filter.
pub fn filter_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\5c"),
            '*' => out.push_str("\\2a"),
            '(' => out.push_str("\\28"),
            ')' => out.push_str("\\29"),
            '\0' => out.push_str("\\00"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape an attribute value used as a DN component.
///
/// DN escaping differs from filter escaping: `, + " \ < > ; =` always take a
/// backslash prefix, NUL is hex-escaped, and space/`#` are escaped only in the
/// positions where they are significant (leading/trailing space, leading `#`).
pub fn dn_value(value: &str) -> String {
    let last = value.chars().count().saturating_sub(1);
    let mut out = String::with_capacity(value.len());
    for (i, ch) in value.chars().enumerate() {
        match ch {
            ',' | '+' | '"' | '\\' | '<' | '>' | ';' | '=' => {
                out.push('\\');
                out.push(ch);
            }
            '\0' => out.push_str("\\00"),
            ' ' if i == 0 || i == last => out.push_str("\\20"),
            '#' if i == 0 => out.push_str("\\23"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_value_escapes_metacharacters() {
        assert_eq!(filter_value("a*b"), "a\\2ab");
        assert_eq!(filter_value("(admin)"), "\\28admin\\29");
        assert_eq!(filter_value("back\\slash"), "back\\5cslash");
        assert_eq!(filter_value("nul\0"), "nul\\00");
    }

    #[test]
    fn filter_value_passes_plain_strings_through() {
        assert_eq!(filter_value("SSH_USER"), "SSH_USER");
        assert_eq!(filter_value("jdoe"), "jdoe");
    }

    #[test]
    fn dn_value_escapes_special_characters() {
        assert_eq!(dn_value("Doe, John"), "Doe\\, John");
        assert_eq!(dn_value("a=b"), "a\\=b");
        assert_eq!(dn_value("x<y>z"), "x\\<y\\>z");
    }

    #[test]
    fn dn_value_escapes_positional_characters() {
        assert_eq!(dn_value(" lead"), "\\20lead");
        assert_eq!(dn_value("trail "), "trail\\20");
        assert_eq!(dn_value("#tag"), "\\23tag");
        assert_eq!(dn_value("in#side"), "in#side");
        assert_eq!(dn_value("in side"), "in side");
    }

    #[test]
    fn dn_value_empty_is_empty() {
        assert_eq!(dn_value(""), "");
    }
}
