//! Request parameter checks run before any cryptographic work.

use error_stack::Report;

use crate::error::QuestionError;
use crate::settings::RequestRules;

/// Check the caller-supplied fields against the configured rules.
///
/// Rules are applied in order: question type range, firm ID length, then
/// private key length. The first violation is returned.
///
/// # Errors
///
/// Returns [`QuestionError::InvalidCategory`], [`QuestionError::InvalidFirmId`]
/// or [`QuestionError::InvalidPrivateKey`].
pub fn check_params(
    rules: &RequestRules,
    question_type: i64,
    firm_id: &str,
    private_key: &str,
) -> Result<(), Report<QuestionError>> {
    if question_type < rules.question_type_min || question_type > rules.question_type_max {
        return Err(Report::new(QuestionError::InvalidCategory {
            question_type,
            min: rules.question_type_min,
            max: rules.question_type_max,
        }));
    }

    if firm_id.len() > rules.firm_id_max_length {
        return Err(Report::new(QuestionError::InvalidFirmId {
            firm_id: firm_id.to_string(),
            max_length: rules.firm_id_max_length,
        }));
    }

    if private_key.len() != rules.private_key_length {
        return Err(Report::new(QuestionError::InvalidPrivateKey {
            actual: private_key.len(),
            expected: rules.private_key_length,
        }));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::tests::create_test_settings;

    fn key_of_len(len: usize) -> String {
        "k".repeat(len)
    }

    #[test]
    fn test_accepts_valid_params() {
        let rules = create_test_settings().request;
        let key = key_of_len(rules.private_key_length);

        assert!(check_params(&rules, 3, "ACME", &key).is_ok());
        assert!(check_params(&rules, 3, "", &key).is_ok());
    }

    #[test]
    fn test_question_type_boundaries() {
        let rules = create_test_settings().request;
        let key = key_of_len(rules.private_key_length);

        assert!(check_params(&rules, rules.question_type_min, "ACME", &key).is_ok());
        assert!(check_params(&rules, rules.question_type_max, "ACME", &key).is_ok());

        let err = check_params(&rules, rules.question_type_max + 1, "ACME", &key).unwrap_err();
        assert!(matches!(
            err.current_context(),
            QuestionError::InvalidCategory { question_type: 8, .. }
        ));
        assert!(err.current_context().to_string().contains("questionType=8"));

        let err = check_params(&rules, rules.question_type_min - 1, "ACME", &key).unwrap_err();
        assert!(matches!(
            err.current_context(),
            QuestionError::InvalidCategory { .. }
        ));
    }

    #[test]
    fn test_enterprise_question_type_is_rejected() {
        let rules = create_test_settings().request;
        let key = key_of_len(rules.private_key_length);

        let err = check_params(&rules, 1001, "ACME", &key).unwrap_err();
        assert!(matches!(
            err.current_context(),
            QuestionError::InvalidCategory { .. }
        ));
    }

    #[test]
    fn test_firm_id_length() {
        let rules = create_test_settings().request;
        let key = key_of_len(rules.private_key_length);

        let at_limit = "F".repeat(rules.firm_id_max_length);
        assert!(check_params(&rules, 1, &at_limit, &key).is_ok());

        let too_long = "F".repeat(rules.firm_id_max_length + 1);
        let err = check_params(&rules, 1, &too_long, &key).unwrap_err();
        assert!(matches!(
            err.current_context(),
            QuestionError::InvalidFirmId { .. }
        ));
    }

    #[test]
    fn test_private_key_one_short_is_rejected() {
        let rules = create_test_settings().request;
        assert_eq!(rules.private_key_length, 229);

        let key = key_of_len(228);
        let err = check_params(&rules, 1, "ACME", &key).unwrap_err();
        match err.current_context() {
            QuestionError::InvalidPrivateKey { actual, expected } => {
                assert_eq!(*actual, 228);
                assert_eq!(*expected, 229);
            }
            other => panic!("Expected InvalidPrivateKey, got {other:?}"),
        }
    }

    #[test]
    fn test_private_key_not_echoed() {
        let rules = create_test_settings().request;
        let key = format!("SECRET{}", "s".repeat(10));

        let err = check_params(&rules, 1, "ACME", &key).unwrap_err();
        assert!(!format!("{err:?}").contains("SECRET"));
        assert!(!err.current_context().to_string().contains("SECRET"));
    }

    #[test]
    fn test_category_checked_before_key() {
        let rules = create_test_settings().request;

        let err = check_params(&rules, 99, "ACME", "short").unwrap_err();
        assert!(matches!(
            err.current_context(),
            QuestionError::InvalidCategory { .. }
        ));
    }
}
