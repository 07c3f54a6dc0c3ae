macro_rules! debug {
    ( $($arg:tt)+ ) => (
        #[cfg(feature = "log")]
        ::log::debug!($($arg)+);
    );
}

macro_rules! info {
    ( $($arg:tt)+ ) => (
        #[cfg(feature = "log")]
        ::log::info!($($arg)+);
    );
}

pub(crate) use debug;
pub(crate) use info;
