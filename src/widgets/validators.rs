use crate::widgets::traits::WidgetError;
use regex::Regex;

pub type Validator = Box<dyn Fn(&str) -> Result<(), WidgetError> + Send + Sync>;

/// Run a list of validators against `value`, returning the first error.
pub fn run_validators(validators: &[Validator], value: &str) -> Result<(), WidgetError> {
    for validator in validators {
        validator(value)?;
    }
    Ok(())
}

/// Accepts only the listed values. An empty list accepts everything.
pub fn one_of(allowed: Vec<String>) -> Validator {
    Box::new(move |value: &str| {
        if allowed.is_empty() || allowed.iter().any(|option| option == value) {
            Ok(())
        } else {
            Err(WidgetError::NotAllowed {
                input: value.to_string(),
            })
        }
    })
}

/// Accepts values fully matched by `pattern`; `reject` builds the error.
pub fn matches(pattern: Regex, reject: fn(String) -> WidgetError) -> Validator {
    Box::new(move |value: &str| {
        if pattern.is_match(value) {
            Ok(())
        } else {
            Err(reject(value.to_string()))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{Validator, matches, one_of, run_validators};
    use crate::widgets::traits::WidgetError;
    use regex::Regex;

    #[test]
    fn first_failing_validator_wins() {
        let validators: Vec<Validator> = vec![
            one_of(vec!["A".into(), "B".into()]),
            matches(Regex::new("^B$").expect("pattern"), |input| {
                WidgetError::NotHex { input }
            }),
        ];
        assert_eq!(
            run_validators(&validators, "C"),
            Err(WidgetError::NotAllowed { input: "C".into() })
        );
        assert_eq!(
            run_validators(&validators, "A"),
            Err(WidgetError::NotHex { input: "A".into() })
        );
        assert!(run_validators(&validators, "B").is_ok());
    }

    #[test]
    fn empty_option_list_accepts_anything() {
        assert!(one_of(Vec::new())("anything").is_ok());
    }
}
