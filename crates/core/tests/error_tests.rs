// ═══════════════════════════════════════════════════════════════════
// Error Tests — CoreError variants, Display formatting, From impls
// ═══════════════════════════════════════════════════════════════════

use smartfinance_core::errors::CoreError;

// ── Display formatting ──────────────────────────────────────────────

mod display {
    use super::*;

    #[test]
    fn invalid_file_format() {
        let err = CoreError::InvalidFileFormat("bad header".into());
        assert_eq!(err.to_string(), "Invalid backup format: bad header");
    }

    #[test]
    fn unsupported_version() {
        let err = CoreError::UnsupportedVersion(7);
        assert_eq!(err.to_string(), "Unsupported backup version: 7");
    }

    #[test]
    fn decryption() {
        assert_eq!(
            CoreError::Decryption.to_string(),
            "Decryption failed — wrong password or corrupted backup"
        );
    }

    #[test]
    fn api_names_provider() {
        let err = CoreError::Api {
            provider: "Firestore".into(),
            message: "HTTP 403 Forbidden".into(),
        };
        assert_eq!(err.to_string(), "API error (Firestore): HTTP 403 Forbidden");
    }

    #[test]
    fn validation() {
        let err = CoreError::ValidationError("Transaction amount must be positive".into());
        assert_eq!(
            err.to_string(),
            "Validation failed: Transaction amount must be positive"
        );
    }

    #[test]
    fn not_found_variants() {
        assert_eq!(
            CoreError::AccountNotFound("9".into()).to_string(),
            "Account not found: 9"
        );
        assert_eq!(
            CoreError::DreamNotFound("d9".into()).to_string(),
            "Savings goal not found: d9"
        );
    }

    #[test]
    fn not_authenticated() {
        assert_eq!(CoreError::NotAuthenticated.to_string(), "No user is signed in");
    }

    #[test]
    fn sync_and_config() {
        assert_eq!(
            CoreError::Sync("listener closed".into()).to_string(),
            "Sync error: listener closed"
        );
        assert_eq!(
            CoreError::Config("bad json".into()).to_string(),
            "Configuration error: bad json"
        );
    }
}

// ── From conversions ────────────────────────────────────────────────

mod conversions {
    use super::*;

    #[test]
    fn from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: CoreError = io.into();
        assert!(matches!(err, CoreError::FileIO(ref m) if m.contains("no such file")));
    }

    #[test]
    fn from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CoreError = json_err.into();
        assert!(matches!(err, CoreError::Deserialization(_)));
    }

    #[test]
    fn from_aes_gcm_error() {
        let err: CoreError = aes_gcm::Error.into();
        assert!(matches!(err, CoreError::Decryption));
    }

    #[test]
    fn question_mark_propagates() {
        fn read_missing() -> Result<String, CoreError> {
            Ok(std::fs::read_to_string("/definitely/not/here/settings.json")?)
        }
        assert!(matches!(read_missing(), Err(CoreError::FileIO(_))));
    }
}

// ── Trait bounds ────────────────────────────────────────────────────

mod traits {
    use super::*;

    #[test]
    fn is_std_error_and_send_sync() {
        fn assert_bounds<T: std::error::Error + Send + Sync + 'static>() {}
        assert_bounds::<CoreError>();
    }

    #[test]
    fn debug_shows_variant() {
        let err = CoreError::DreamNotFound("d1".into());
        assert!(format!("{err:?}").contains("DreamNotFound"));
    }
}
