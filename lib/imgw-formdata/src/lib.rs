/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2025 imgw Project Authors
 */

mod error;
pub use error::FormDataError;

mod boundary;
pub use boundary::Boundary;

mod header_line;
pub use header_line::PartHeaderLine;

mod disposition;
pub use disposition::ContentDisposition;

mod part;
pub use part::FormDataPart;

mod mime_ext;
pub use mime_ext::MimeExtMap;

mod extract;
pub use extract::{ExtractedField, extract};
