/// True for the optional-whitespace bytes tolerated around header values.
pub(crate) fn is_ows(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

/// Slice with leading and trailing optional whitespace removed.
pub(crate) fn trimmed(mut data: &[u8]) -> &[u8] {
    while let Some((&first, rest)) = data.split_first() {
        if !is_ows(first) {
            break;
        }
        data = rest;
    }
    while let Some((&last, rest)) = data.split_last() {
        if !is_ows(last) {
            break;
        }
        data = rest;
    }
    data
}
