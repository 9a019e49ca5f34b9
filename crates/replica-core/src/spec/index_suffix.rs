use crate::spec::{CloneIndex, SpecError, UpdateSpecification};
use serde::{Deserialize, Serialize};

/// Values holding several names are `;`-delimited; each part is indexed on its own.
const LIST_DELIMITER: char = ';';

///
/// IndexOrder
///
/// Where a new index lands relative to indices already on the value.
///
/// `Append` puts the newest index last (`S_I1_I2`).
/// `Insert` puts it directly after the base name (`S_I2_I1`), which is the
/// order produced when an outer entity is indexed after its inner ones.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexOrder {
    #[default]
    Append,
    Insert,
}

///
/// IndexSuffix
///
/// Built-in spec for `String` fields: `name` becomes `name{separator}{index}`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct IndexSuffix {
    separator: String,
    order: IndexOrder,
}

impl IndexSuffix {
    pub const DEFAULT_SEPARATOR: &'static str = "_INDEX_";

    pub fn new(separator: impl Into<String>, order: IndexOrder) -> Result<Self, SpecError> {
        let separator = separator.into();

        if separator.is_empty() {
            return Err(SpecError::invalid_argument("index separator must not be empty"));
        }
        if separator.contains(LIST_DELIMITER) {
            return Err(SpecError::invalid_argument(format!(
                "index separator must not contain '{LIST_DELIMITER}'"
            )));
        }

        Ok(Self { separator, order })
    }

    #[must_use]
    pub fn separator(&self) -> &str {
        &self.separator
    }

    #[must_use]
    pub const fn order(&self) -> IndexOrder {
        self.order
    }

    // splits `part` into its base and the trailing run of `{sep}{digits}` segments
    fn split_indices<'a>(&self, part: &'a str) -> (&'a str, &'a str) {
        let sep = self.separator.as_str();
        let mut base = part;

        loop {
            let digits = base.trim_end_matches(|c: char| c.is_ascii_digit());
            if digits.len() == base.len() {
                break;
            }
            match digits.strip_suffix(sep) {
                Some(rest) => base = rest,
                None => break,
            }
        }

        part.split_at(base.len())
    }

    fn index_part(&self, part: &str, index: CloneIndex) -> String {
        let sep = self.separator.as_str();

        match self.order {
            IndexOrder::Append => format!("{part}{sep}{index}"),
            IndexOrder::Insert => {
                let (base, run) = self.split_indices(part);
                format!("{base}{sep}{index}{run}")
            }
        }
    }

    fn reset_part(&self, part: &str) -> Result<String, SpecError> {
        let (base, run) = self.split_indices(part);
        if run.is_empty() {
            return Err(SpecError::invalid_argument(format!(
                "'{part}' was never indexed with '{}'",
                self.separator
            )));
        }

        Ok(base.to_string())
    }
}

impl Default for IndexSuffix {
    fn default() -> Self {
        Self {
            separator: Self::DEFAULT_SEPARATOR.to_string(),
            order: IndexOrder::default(),
        }
    }
}

impl UpdateSpecification for IndexSuffix {
    type Value = String;

    fn update(&self, original: &String, index: CloneIndex) -> Result<String, SpecError> {
        each_part(original, |part| Ok(self.index_part(part, index)))
    }

    fn reset(&self, updated: &String) -> Result<String, SpecError> {
        each_part(updated, |part| self.reset_part(part))
    }
}

fn each_part(
    value: &str,
    apply: impl Fn(&str) -> Result<String, SpecError>,
) -> Result<String, SpecError> {
    if !value.contains(LIST_DELIMITER) {
        return apply(value);
    }

    let parts = value
        .split(LIST_DELIMITER)
        .map(apply)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(parts.join(";"))
}

///
/// TESTS
///
