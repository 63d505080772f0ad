//! Call-site capturing macros
//!
//! `file!()` and `line!()` resolve to the outermost macro invocation, so the
//! metadata always points at the line that called `log_info!` and friends.
//! The enclosing function name comes from the type name of a nested item.

/// Name of the function a `function_name!()` expansion sits in
#[doc(hidden)]
pub fn enclosing_function(item_path: &'static str) -> &'static str {
    let path = item_path.strip_suffix("::__here").unwrap_or(item_path);
    path.rsplit("::")
        .find(|segment| *segment != "{{closure}}")
        .unwrap_or(path)
}

#[doc(hidden)]
pub fn type_name_of<T>(_: T) -> &'static str {
    std::any::type_name::<T>()
}

/// Expands to the name of the enclosing function
#[doc(hidden)]
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __here() {}
        $crate::logging::macros::enclosing_function($crate::logging::macros::type_name_of(__here))
    }};
}

/// Expands to a `CallSite` for the current location
#[macro_export]
macro_rules! call_site {
    () => {
        $crate::logging::CallSite::new(file!(), line!(), $crate::function_name!())
    };
}

/// `logger.log` with the call site filled in; takes `format!` arguments
///
/// ```ignore
/// log_info!(logger, "loaded {} assets", count)?;
/// log_info!(logger, title: ("Loader", Color::WHITE), "done")?;
/// ```
#[macro_export]
macro_rules! log_info {
    ($logger:expr, title: $title:expr, $($arg:tt)+) => {
        $logger.log(
            &::std::format!($($arg)+),
            Some(&$crate::logging::Title::from($title)),
            &$crate::call_site!(),
        )
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.log(&::std::format!($($arg)+), None, &$crate::call_site!())
    };
}

/// `logger.log_warning` with the call site filled in
#[macro_export]
macro_rules! log_warning {
    ($logger:expr, title: $title:expr, $($arg:tt)+) => {
        $logger.log_warning(
            &::std::format!($($arg)+),
            Some(&$crate::logging::Title::from($title)),
            &$crate::call_site!(),
        )
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_warning(&::std::format!($($arg)+), None, &$crate::call_site!())
    };
}

/// `logger.log_error` with the call site filled in
#[macro_export]
macro_rules! log_error {
    ($logger:expr, title: $title:expr, $($arg:tt)+) => {
        $logger.log_error(
            &::std::format!($($arg)+),
            Some(&$crate::logging::Title::from($title)),
            &$crate::call_site!(),
        )
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_error(&::std::format!($($arg)+), None, &$crate::call_site!())
    };
}

/// `logger.log_exception`; the error is anything `ErrorReport: From<_>`
///
/// That covers references to `anyhow::Error`, `std::io::Error`, `LogError`,
/// `ErrorReport` and `dyn Error`. For any other error type build the report
/// with `ErrorReport::from_error(&err)` and pass a reference to it.
///
/// ```ignore
/// log_exception!(logger, &err)?;
/// log_exception!(logger, &err, "failed to load {}", path.display())?;
/// log_exception!(logger, &ErrorReport::from_error(&save_err))?;
/// ```
#[macro_export]
macro_rules! log_exception {
    ($logger:expr, title: $title:expr, $error:expr) => {
        $logger.log_exception(
            &$crate::logging::ErrorReport::from($error),
            Some(&$crate::logging::Title::from($title)),
            None,
            &$crate::call_site!(),
        )
    };
    ($logger:expr, title: $title:expr, $error:expr, $($arg:tt)+) => {
        $logger.log_exception(
            &$crate::logging::ErrorReport::from($error),
            Some(&$crate::logging::Title::from($title)),
            Some(&::std::format!($($arg)+)),
            &$crate::call_site!(),
        )
    };
    ($logger:expr, $error:expr) => {
        $logger.log_exception(
            &$crate::logging::ErrorReport::from($error),
            None,
            None,
            &$crate::call_site!(),
        )
    };
    ($logger:expr, $error:expr, $($arg:tt)+) => {
        $logger.log_exception(
            &$crate::logging::ErrorReport::from($error),
            None,
            Some(&::std::format!($($arg)+)),
            &$crate::call_site!(),
        )
    };
}

/// `logger.log_to_file`, optionally with a custom label
#[macro_export]
macro_rules! log_to_file {
    ($logger:expr, label: $label:expr, $($arg:tt)+) => {
        $logger.log_to_file(&::std::format!($($arg)+), Some($label), &$crate::call_site!())
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.log_to_file(&::std::format!($($arg)+), None, &$crate::call_site!())
    };
}

/// `logger.log_error_to_file`, optionally with a custom label
#[macro_export]
macro_rules! log_error_to_file {
    ($logger:expr, label: $label:expr, $error:expr) => {
        $logger.log_error_to_file(
            &$crate::logging::ErrorReport::from($error),
            Some($label),
            &$crate::call_site!(),
        )
    };
    ($logger:expr, $error:expr) => {
        $logger.log_error_to_file(
            &$crate::logging::ErrorReport::from($error),
            None,
            &$crate::call_site!(),
        )
    };
}
