//! # Compatibility Gate Unit Tests / 兼容性检查单元测试
//!
//! Tests for runtime version parsing, the gate's classification and the
//! host-side enforcement of its verdicts.
//!
//! 运行时版本解析、分类以及宿主端处理的测试。

use release_matrix::cli::commands::check_runtime::enforce;
use release_matrix::core::compat::{
    CompatibilityGate, CompatibilityThresholds, RuntimeVersion, Verdict,
};
use release_matrix::core::error::{CompatibilityError, ConfigError};

fn thresholds() -> CompatibilityThresholds {
    CompatibilityThresholds {
        unsupported: RuntimeVersion::new(3, 6, 0),
        deprecated: RuntimeVersion::new(3, 7, 0),
    }
}

#[cfg(test)]
mod runtime_version_tests {
    use super::*;

    #[test]
    fn test_parse_components() {
        assert_eq!("3".parse::<RuntimeVersion>().unwrap(), RuntimeVersion::new(3, 0, 0));
        assert_eq!("3.7".parse::<RuntimeVersion>().unwrap(), RuntimeVersion::new(3, 7, 0));
        assert_eq!("3.7.2".parse::<RuntimeVersion>().unwrap(), RuntimeVersion::new(3, 7, 2));
    }

    #[test]
    fn test_parse_probe_output() {
        assert_eq!(
            "Python 3.12.1\n".parse::<RuntimeVersion>().unwrap(),
            RuntimeVersion::new(3, 12, 1)
        );
        assert_eq!(
            "3.11.4.final".parse::<RuntimeVersion>().unwrap(),
            RuntimeVersion::new(3, 11, 4)
        );
    }

    #[test]
    fn test_config_array_needs_two_or_three_components() {
        assert_eq!(RuntimeVersion::try_from(vec![3, 6]).unwrap(), RuntimeVersion::new(3, 6, 0));
        assert_eq!(RuntimeVersion::try_from(vec![3, 6, 1]).unwrap(), RuntimeVersion::new(3, 6, 1));
        assert!(matches!(
            RuntimeVersion::try_from(vec![3]),
            Err(ConfigError::InvalidRuntimeVersion(_))
        ));
        assert!(RuntimeVersion::try_from(vec![3, 6, 0, 1]).is_err());
    }

    #[test]
    fn test_parse_rejects_text_without_digits() {
        assert!(matches!(
            "python".parse::<RuntimeVersion>(),
            Err(ConfigError::InvalidRuntimeVersion(_))
        ));
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(RuntimeVersion::new(3, 10, 0) > RuntimeVersion::new(3, 9, 9));
        assert!(RuntimeVersion::new(4, 0, 0) > RuntimeVersion::new(3, 99, 99));
        assert_eq!(RuntimeVersion::new(3, 6, 0).to_string(), "3.6.0");
    }
}

#[cfg(test)]
mod gate_tests {
    use super::*;

    #[test]
    fn test_unsupported_threshold_itself_is_not_fatal() {
        let gate = CompatibilityGate::new(thresholds());
        assert_ne!(gate.evaluate(RuntimeVersion::new(3, 6, 0)), Verdict::Fatal);
        assert_eq!(gate.evaluate(RuntimeVersion::new(3, 6, 0)), Verdict::Deprecated);
    }

    #[test]
    fn test_predecessor_of_unsupported_is_fatal() {
        let gate = CompatibilityGate::new(CompatibilityThresholds {
            unsupported: RuntimeVersion::new(3, 6, 1),
            deprecated: RuntimeVersion::new(3, 7, 0),
        });
        assert_eq!(gate.evaluate(RuntimeVersion::new(3, 6, 0)), Verdict::Fatal);

        let gate = CompatibilityGate::new(thresholds());
        assert_eq!(gate.evaluate(RuntimeVersion::new(3, 5, 99)), Verdict::Fatal);
        assert_eq!(gate.evaluate(RuntimeVersion::new(2, 7, 18)), Verdict::Fatal);
    }

    #[test]
    fn test_deprecated_threshold_itself_is_ok() {
        let gate = CompatibilityGate::new(thresholds());
        assert_eq!(gate.evaluate(RuntimeVersion::new(3, 6, 9)), Verdict::Deprecated);
        assert_eq!(gate.evaluate(RuntimeVersion::new(3, 7, 0)), Verdict::Ok);
        assert_eq!(gate.evaluate(RuntimeVersion::new(3, 13, 0)), Verdict::Ok);
    }
}

#[cfg(test)]
mod enforce_tests {
    use super::*;

    #[test]
    fn test_fatal_becomes_error() {
        let found = RuntimeVersion::new(3, 5, 0);
        let err = enforce(Verdict::Fatal, found, &thresholds(), false, "en").unwrap_err();

        let CompatibilityError::Unsupported { found: f, minimum } = err;
        assert_eq!(f, found);
        assert_eq!(minimum, RuntimeVersion::new(3, 6, 0));
    }

    #[test]
    fn test_fatal_error_message() {
        let err = enforce(Verdict::Fatal, RuntimeVersion::new(3, 5, 0), &thresholds(), true, "en")
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "runtime 3.5.0 is no longer supported; 3.6.0 or later is required"
        );
    }

    #[test]
    fn test_deprecated_continues() {
        let verdict = enforce(
            Verdict::Deprecated,
            RuntimeVersion::new(3, 6, 0),
            &thresholds(),
            true,
            "en",
        )
        .unwrap();
        assert_eq!(verdict, Verdict::Deprecated);
    }

    #[test]
    fn test_ok_continues() {
        let verdict = enforce(Verdict::Ok, RuntimeVersion::new(3, 12, 0), &thresholds(), false, "en")
            .unwrap();
        assert_eq!(verdict, Verdict::Ok);
    }
}
