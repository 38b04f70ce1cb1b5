//! Logging macros
//!
//! Forward to `defmt` when the `defmt` feature is enabled, print to stdout
//! under unit tests, and expand to nothing otherwise. Format strings must
//! stick to `{}` / `{:?}` so both backends accept them.

#![allow(unused_macros)]

macro_rules! log_error {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::error!($fmt $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        println!(concat!("[ERROR] ", $fmt) $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), not(test)))]
        { $( let _ = &$arg; )* }
    }};
}

macro_rules! log_warn {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::warn!($fmt $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        println!(concat!("[WARN] ", $fmt) $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), not(test)))]
        { $( let _ = &$arg; )* }
    }};
}

macro_rules! log_info {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::info!($fmt $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        println!(concat!("[INFO] ", $fmt) $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), not(test)))]
        { $( let _ = &$arg; )* }
    }};
}

macro_rules! log_debug {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::debug!($fmt $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        println!(concat!("[DEBUG] ", $fmt) $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), not(test)))]
        { $( let _ = &$arg; )* }
    }};
}

macro_rules! log_trace {
    ($fmt:literal $(, $arg:expr)* $(,)?) => {{
        #[cfg(feature = "defmt")]
        ::defmt::trace!($fmt $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), test))]
        println!(concat!("[TRACE] ", $fmt) $(, $arg)*);
        #[cfg(all(not(feature = "defmt"), not(test)))]
        { $( let _ = &$arg; )* }
    }};
}
