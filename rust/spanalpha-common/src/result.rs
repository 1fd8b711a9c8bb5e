pub type Result<T> = std::result::Result<T, crate::error::Error>;

#[macro_export]
macro_rules! verify_arg {
    ($name:expr, $expr:expr) => {{
        let result = $expr;
        $crate::result::verify_arg(result, stringify!($name), stringify!($expr))?;
    }};
}

#[inline]
pub fn verify_arg(predicate: bool, name: &str, condition: &str) -> Result<()> {
    if predicate {
        Ok(())
    } else {
        invalid_arg(name, condition)
    }
}

#[cold]
pub fn invalid_arg(name: &str, condition: &str) -> Result<()> {
    Err(crate::error::ErrorKind::InvalidArgument {
        name: name.to_string(),
        message: condition.to_string(),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use crate::error::ErrorKind;

    fn check_min_raters(min_raters: usize) -> super::Result<()> {
        verify_arg!(min_raters, min_raters >= 2);
        Ok(())
    }

    #[test]
    fn test_verify_arg() {
        assert!(check_min_raters(2).is_ok());
        let err = check_min_raters(1).unwrap_err();
        match err.kind() {
            ErrorKind::InvalidArgument { name, message } => {
                assert_eq!(name, "min_raters");
                assert_eq!(message, "min_raters >= 2");
            }
            other => panic!("unexpected error kind: {other:?}"),
        }
    }
}
