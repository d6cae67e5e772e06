use serde::Deserialize;

use crate::{error::AppError, validate};

#[derive(Debug, Clone, Deserialize)]
pub struct NewSource {
    pub name: String,
    pub description: Option<String>,
}

impl NewSource {
    pub fn validate(&mut self) -> Result<(), AppError> {
        validate::required_text("name", &mut self.name)?;
        validate::optional_text(&mut self.description);
        Ok(())
    }
}

/// Partial update; absent fields keep their stored value, a blank
/// description clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcePatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl SourcePatch {
    pub fn validate(&mut self) -> Result<(), AppError> {
        if let Some(name) = self.name.as_mut() {
            validate::required_text("name", name)?;
        }
        validate::patch_text(&mut self.description);
        Ok(())
    }
}
