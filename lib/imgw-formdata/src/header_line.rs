/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

use super::FormDataError;

pub struct PartHeaderLine<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> PartHeaderLine<'a> {
    pub fn parse(buf: &'a [u8]) -> Result<PartHeaderLine<'a>, FormDataError> {
        let line = std::str::from_utf8(buf)
            .map_err(|_| FormDataError::MalformedBody("part header is not valid utf-8"))?;
        let Some(p) = memchr::memchr(b':', line.as_bytes()) else {
            return Err(FormDataError::MalformedBody("no ':' in part header"));
        };

        let name = line[0..p].trim();
        let value = line[p + 1..].trim();
        if name.is_empty() {
            return Err(FormDataError::MalformedBody("empty part header name"));
        }

        Ok(PartHeaderLine { name, value })
    }
}
