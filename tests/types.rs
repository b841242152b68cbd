// ABOUTME: Integration tests for type-safe identifiers and validated types.
// ABOUTME: Tests stack name validation, derivation, and identifier serialization.

use stackpilot::types::*;

mod stack_name_tests {
    use super::*;

    #[test]
    fn accepts_letters_digits_and_hyphens() {
        let name = StackName::new("web-2024").unwrap();
        assert_eq!(name.as_str(), "web-2024");
        assert_eq!(name.to_string(), "web-2024");
    }

    #[test]
    fn rejects_empty() {
        assert!(matches!(StackName::new(""), Err(StackNameError::Empty)));
    }

    #[test]
    fn rejects_leading_digit() {
        assert!(matches!(
            StackName::new("1web"),
            Err(StackNameError::InvalidStart)
        ));
    }

    #[test]
    fn rejects_underscores() {
        assert!(matches!(
            StackName::new("my_stack"),
            Err(StackNameError::InvalidChar('_'))
        ));
    }

    #[test]
    fn rejects_overlong_names() {
        let long = format!("a{}", "b".repeat(128));
        assert!(matches!(
            StackName::new(&long),
            Err(StackNameError::TooLong)
        ));
        assert!(StackName::new(&long[..128]).is_ok());
    }

    #[test]
    fn derives_from_file_stem() {
        let name = StackName::from_source_id("deploy/templates/api-gateway.json").unwrap();
        assert_eq!(name.as_str(), "api-gateway");
    }

    #[test]
    fn deserialize_validates() {
        let ok: StackName = serde_json::from_str(r#""network""#).unwrap();
        assert_eq!(ok.as_str(), "network");
        assert!(serde_json::from_str::<StackName>(r#""bad name""#).is_err());
    }
}

mod id_tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = StackId::new("arn:stack/web/1");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""arn:stack/web/1""#);

        let back: StackId = serde_json::from_str(r#""arn:stack/web/1""#).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn id_display_is_the_raw_value() {
        let id = StackId::new("arn:stack/web/1");
        assert_eq!(id.to_string(), "arn:stack/web/1");
        assert_eq!(id.as_str(), "arn:stack/web/1");
    }

    #[test]
    fn id_is_read_from_a_described_stack() {
        let state: stackpilot::remote::StackState = serde_json::from_str(
            r#"{"StackId":"arn:stack/web/2","StackName":"web","StackStatus":"CREATE_COMPLETE"}"#,
        )
        .unwrap();
        assert_eq!(state.stack_id, StackId::new("arn:stack/web/2"));
    }
}
