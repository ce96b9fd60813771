//! Convenience macros for configuration-time error handling

/// Equivalent to `anyhow::bail!` but produces a configuration `MsgBindError`
///
/// # Examples
///
/// ```rust
/// use msgbind_common::bail;
/// use msgbind_common::Result;
///
/// fn check_kind(kind: &str) -> Result<()> {
///     if kind.is_empty() {
///         bail!("annotation kind must not be empty");
///     }
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! bail {
    ($msg:literal $(,)?) => {
        return Err($crate::MsgBindError::configuration(format!($msg)))
    };
    ($err:expr $(,)?) => {
        return Err($crate::MsgBindError::configuration($err))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::MsgBindError::configuration(format!($fmt, $($arg)*)))
    };
}

/// Equivalent to `anyhow::ensure!` but produces a configuration `MsgBindError`
///
/// # Examples
///
/// ```rust
/// use msgbind_common::ensure;
/// use msgbind_common::Result;
///
/// fn validate_scope(scope: &str) -> Result<()> {
///     ensure!(!scope.ends_with('.'), "scope '{}' must not end with '.'", scope);
///     Ok(())
/// }
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $msg:literal $(,)?) => {
        if !$cond {
            return Err($crate::MsgBindError::configuration(format!($msg)));
        }
    };
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($crate::MsgBindError::configuration($err));
        }
    };
    ($cond:expr, $fmt:expr, $($arg:tt)*) => {
        if !$cond {
            return Err($crate::MsgBindError::configuration(format!($fmt, $($arg)*)));
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{MsgBindError, Result};

    fn bail_on_negative(value: i32) -> Result<i32> {
        if value < 0 {
            bail!("value cannot be negative: {}", value);
        }
        Ok(value)
    }

    fn ensure_non_empty(kind: &str) -> Result<()> {
        ensure!(!kind.is_empty(), "annotation kind must not be empty");
        Ok(())
    }

    #[test]
    fn test_bail_macro() {
        assert_eq!(bail_on_negative(3).unwrap(), 3);

        let error = bail_on_negative(-1).unwrap_err();
        assert!(matches!(error, MsgBindError::Configuration { .. }));
        assert!(error.to_string().contains("value cannot be negative: -1"));
    }

    #[test]
    fn test_ensure_macro() {
        assert!(ensure_non_empty("En").is_ok());

        let error = ensure_non_empty("").unwrap_err();
        assert!(error.is_configuration());
    }
}
