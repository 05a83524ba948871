/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

/// Parsed attributes of a `Content-Disposition` part header value,
/// e.g. `form-data; name="image"; filename="cat.jpg"`.
pub struct ContentDisposition<'a> {
    pub name: Option<&'a str>,
    pub filename: Option<&'a str>,
}

impl<'a> ContentDisposition<'a> {
    pub fn parse(value: &'a str) -> ContentDisposition<'a> {
        let mut name = None;
        let mut filename = None;

        // the leading disposition type token carries no '=' and is skipped
        for param in value.split(';') {
            let param = param.trim();
            let Some(p) = memchr::memchr(b'=', param.as_bytes()) else {
                continue;
            };
            let key = param[0..p].trim();
            let v = param[p + 1..].trim().trim_matches('"');
            if key.eq_ignore_ascii_case("name") {
                if name.is_none() {
                    name = Some(v);
                }
            } else if key.eq_ignore_ascii_case("filename") && filename.is_none() {
                filename = Some(v);
            }
        }

        ContentDisposition { name, filename }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_only() {
        let cd = ContentDisposition::parse("form-data; name=\"note\"");
        assert_eq!(cd.name, Some("note"));
        assert_eq!(cd.filename, None);
    }

    #[test]
    fn name_and_filename() {
        let cd = ContentDisposition::parse("form-data; name=\"image\"; filename=\"cat.jpg\"");
        assert_eq!(cd.name, Some("image"));
        assert_eq!(cd.filename, Some("cat.jpg"));
    }

    #[test]
    fn unquoted_and_spaced() {
        let cd = ContentDisposition::parse("form-data;  name = image ; filename= photo.png");
        assert_eq!(cd.name, Some("image"));
        assert_eq!(cd.filename, Some("photo.png"));
    }

    #[test]
    fn no_attributes() {
        let cd = ContentDisposition::parse("inline");
        assert_eq!(cd.name, None);
        assert_eq!(cd.filename, None);
    }

    #[test]
    fn name_is_case_sensitive_value() {
        let cd = ContentDisposition::parse("form-data; name=\"Image\"");
        assert_eq!(cd.name, Some("Image"));
    }
}
