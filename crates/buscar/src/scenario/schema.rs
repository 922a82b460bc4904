//! Scenario YAML schema.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::result::{BuscarError, BuscarResult};
use crate::steps::Step;

/// A named, ordered list of steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name
    #[serde(default)]
    pub name: String,
    /// Scenario description
    #[serde(default)]
    pub description: String,
    /// Steps, run in order
    pub steps: Vec<Step>,
}

impl Scenario {
    /// Create a scenario from step texts
    #[must_use]
    pub fn new<I, S>(name: impl Into<String>, steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Step>,
    {
        Self {
            name: name.into(),
            description: String::new(),
            steps: steps.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a scenario from a YAML string.
    ///
    /// # Errors
    /// Returns error if YAML is invalid or a step has no text.
    pub fn from_yaml(yaml: &str) -> BuscarResult<Self> {
        let scenario: Self = serde_yaml_ng::from_str(yaml)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Load a scenario from a YAML file
    pub fn from_path(path: &Path) -> BuscarResult<Self> {
        Self::from_yaml(&fs::read_to_string(path)?)
    }

    fn validate(&self) -> BuscarResult<()> {
        if self.steps.is_empty() {
            return Err(BuscarError::config(format!(
                "scenario {:?} has no steps",
                self.name
            )));
        }
        if let Some(index) = self.steps.iter().position(|s| s.text().trim().is_empty()) {
            return Err(BuscarError::config(format!(
                "scenario {:?}: step {} is empty",
                self.name,
                index + 1
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIGNUP: &str = r#"
name: signup
steps:
  - When I find input by label text "Email"
  - step: When I find element by role "button"
    table:
      - [timeout, "4000"]
      - [pseudoSelector, hidden]
  - Then I see value "a@b.com"
"#;

    #[test]
    fn test_parse_mixed_steps() {
        let scenario = Scenario::from_yaml(SIGNUP).unwrap();
        assert_eq!(scenario.name, "signup");
        assert_eq!(scenario.steps.len(), 3);
        assert_eq!(scenario.steps[0].table(), None);
        assert_eq!(scenario.steps[1].text(), "When I find element by role \"button\"");
        assert_eq!(
            scenario.steps[1].table().unwrap()[1],
            vec!["pseudoSelector".to_string(), "hidden".to_string()]
        );
    }

    #[test]
    fn test_empty_steps_rejected() {
        let err = Scenario::from_yaml("name: nothing\nsteps: []").unwrap_err();
        assert!(matches!(err, BuscarError::Config { .. }));
    }

    #[test]
    fn test_blank_step_rejected() {
        let err = Scenario::from_yaml("steps:\n  - \"  \"").unwrap_err();
        assert!(err.to_string().contains("step 1 is empty"));
    }

    #[test]
    fn test_missing_steps_is_yaml_error() {
        assert!(matches!(
            Scenario::from_yaml("name: x").unwrap_err(),
            BuscarError::Yaml(_)
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("signup.yaml");
        fs::write(&path, SIGNUP).unwrap();
        assert_eq!(Scenario::from_path(&path).unwrap().steps.len(), 3);
    }

    #[test]
    fn test_new_from_texts() {
        let scenario = Scenario::new("quick", ["I get children", "I get first element"]);
        assert_eq!(scenario.steps[1], Step::Plain("I get first element".into()));
    }
}
