//! Field name validation.

/// Check that `name` is a Unicode identifier (UAX#31).
///
/// Unlike path components, purely numeric names are rejected: a field name
/// has to be usable as an identifier on its own.
pub(crate) fn validate_field_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err("empty name".to_string());
    };

    // First char: XID_Start or underscore followed by XID_Continue
    let valid_start = unicode_ident::is_xid_start(first)
        || (first == '_'
            && chars
                .clone()
                .next()
                .is_some_and(unicode_ident::is_xid_continue));

    if !valid_start {
        return Err("must start with a letter or underscore followed by letter/digit".to_string());
    }

    for c in chars {
        if !unicode_ident::is_xid_continue(c) {
            return Err(format!("invalid character '{}' in identifier", c));
        }
    }

    Ok(())
}
