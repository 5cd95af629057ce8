// Copyright Rivulet, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Transformations of identifiers and property values into their canonical
//! forms.

use rivulet_repr::ColumnName;

use crate::ast::Ident;

/// Normalizes an identifier to its canonical upper-case form.
pub fn ident(ident: &Ident) -> String {
    ident.as_str().to_uppercase()
}

/// Normalizes a column declaration's identifier into a [`ColumnName`].
pub fn column_name(id: &Ident) -> ColumnName {
    ColumnName::from(ident(id))
}

/// Strips one matching pair of surrounding single or double quotes from a
/// property value, if present.
pub fn unquote(s: &str) -> &str {
    if s.len() >= 2 {
        for quote in ['\'', '"'] {
            if s.starts_with(quote) && s.ends_with(quote) {
                return &s[1..s.len() - 1];
            }
        }
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ident_uppercases() {
        assert_eq!(ident(&Ident::new("pageviews")), "PAGEVIEWS");
        assert_eq!(ident(&Ident::new("PageViews")), "PAGEVIEWS");
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("'USERID'"), "USERID");
        assert_eq!(unquote("\"USERID\""), "USERID");
        assert_eq!(unquote("USERID"), "USERID");
        assert_eq!(unquote("'USERID"), "'USERID");
        assert_eq!(unquote("'"), "'");
        assert_eq!(unquote(""), "");
    }
}
