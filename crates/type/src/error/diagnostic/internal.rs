// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (c) 2025 ReifyDB

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::diagnostic::Diagnostic;

/// Creates an internal error diagnostic with source location and context
pub fn internal_with_context(
	reason: impl Into<String>,
	file: &str,
	line: u32,
	column: u32,
	function: &str,
	module_path: &str,
) -> Diagnostic {
	let reason = reason.into();

	let millis = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis()).unwrap_or_default();
	let error_id = format!("ERR-{}-{}:{}", millis, file.split('/').last().unwrap_or(file).replace(".rs", ""), line);

	let detailed_message = format!("Internal error [{}]: {}", error_id, reason);

	let location_info =
		format!("Location: {}:{}:{}\nFunction: {}\nModule: {}", file, line, column, function, module_path);

	let help_message = format!(
		"This is an internal error that should never occur in normal operation.\n\n\
		 Please file a bug report and include the following information:\n\
		 Error ID: {}\n\
		 {}\n\
		 Version: {}\n\
		 Platform: {} {}",
		error_id,
		location_info,
		env!("CARGO_PKG_VERSION"),
		std::env::consts::OS,
		std::env::consts::ARCH
	);

	Diagnostic {
		code: "INTERNAL_ERROR".to_string(),
		message: detailed_message,
		task: None,
		label: Some(format!("Internal invariant violated at {}:{}:{}", file, line, column)),
		help: Some(help_message),
		notes: vec![
			format!("Error occurred in function: {}", function),
			"This error indicates a critical internal inconsistency.".to_string(),
			format!("Error tracking ID: {}", error_id),
		],
		cause: None,
	}
}

/// Internal error without location context
pub fn internal(reason: impl Into<String>) -> Diagnostic {
	internal_with_context(reason, "unknown", 0, 0, "unknown", "unknown")
}

/// Creates an internal error diagnostic capturing the source location
#[macro_export]
macro_rules! internal_error {
    ($reason:expr) => {
        $crate::error::diagnostic::internal::internal_with_context(
            $reason,
            file!(),
            line!(),
            column!(),
            {
                fn f() {}
                fn type_name_of<T>(_: T) -> &'static str {
                    std::any::type_name::<T>()
                }
                let name = type_name_of(f);
                &name[..name.len() - 3]
            },
            module_path!()
        )
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::diagnostic::internal::internal_with_context(
            format!($fmt, $($arg)*),
            file!(),
            line!(),
            column!(),
            {
                fn f() {}
                fn type_name_of<T>(_: T) -> &'static str {
                    std::any::type_name::<T>()
                }
                let name = type_name_of(f);
                &name[..name.len() - 3]
            },
            module_path!()
        )
    };
}

/// Creates an internal error result capturing the source location
#[macro_export]
macro_rules! internal_err {
    ($reason:expr) => {
        Err($crate::error::Error($crate::internal_error!($reason)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        Err($crate::error::Error($crate::internal_error!($fmt, $($arg)*)))
    };
}

/// Returns an internal error capturing the source location
#[macro_export]
macro_rules! return_internal_error {
    ($reason:expr) => {
        return Err($crate::error::Error($crate::internal_error!($reason)))
    };
    ($fmt:expr, $($arg:tt)*) => {
        return Err($crate::error::Error($crate::internal_error!($fmt, $($arg)*)))
    };
}
