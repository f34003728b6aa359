//! String concatenation

use crate::aggregator::Aggregator;
use crate::error::Result;

/// Concatenates string-like elements with a separator, prefix and suffix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Joining {
    separator: String,
    prefix: String,
    suffix: String,
}

/// Concatenate elements with no separator
pub fn joining() -> Joining {
    Joining::default()
}

/// Concatenate elements separated by `separator`
pub fn joining_with(separator: impl Into<String>) -> Joining {
    joining().separator(separator)
}

impl Joining {
    /// Text placed between adjacent elements
    #[must_use]
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Text placed before the first element
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Text placed after the last element
    #[must_use]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }
}

impl<T: AsRef<str>> Aggregator<T> for Joining {
    // None until the first element, so no separator is emitted ahead of it
    type Acc = Option<String>;
    type Output = String;

    fn seed(&self) -> Option<String> {
        None
    }

    fn fold(&self, acc: &mut Option<String>, item: T) -> Result<()> {
        match acc {
            Some(joined) => {
                joined.push_str(&self.separator);
                joined.push_str(item.as_ref());
            }
            None => *acc = Some(item.as_ref().to_owned()),
        }
        Ok(())
    }

    fn merge(&self, left: Option<String>, right: Option<String>) -> Result<Option<String>> {
        Ok(match (left, right) {
            (Some(mut l), Some(r)) => {
                l.push_str(&self.separator);
                l.push_str(&r);
                Some(l)
            }
            (l, r) => l.or(r),
        })
    }

    fn finish(&self, acc: Option<String>) -> Result<String> {
        let body = acc.unwrap_or_default();
        let mut out = String::with_capacity(self.prefix.len() + body.len() + self.suffix.len());
        out.push_str(&self.prefix);
        out.push_str(&body);
        out.push_str(&self.suffix);
        Ok(out)
    }
}
