//===========================================================================//

macro_rules! invalid_data {
    ($e:expr) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         $e))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidData,
                                         format!($fmt, $($arg)+)))
    };
}

macro_rules! invalid_input {
    ($e:expr) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidInput,
                                         $e))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err(::std::io::Error::new(::std::io::ErrorKind::InvalidInput,
                                         format!($fmt, $($arg)+)))
    };
}

macro_rules! render_error {
    ($e:expr) => {
        return Err($crate::error::Error::Render(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::Error::Render(format!($fmt, $($arg)+)))
    };
}

macro_rules! encode_error {
    ($spec:expr, $source:expr) => {
        return Err($crate::error::Error::Encode {
            spec: $spec,
            source: $source,
        })
    };
}

macro_rules! invariant_violation {
    ($e:expr) => {
        return Err($crate::error::Error::InvariantViolation(
            ::std::string::String::from($e),
        ))
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::error::Error::InvariantViolation(
            format!($fmt, $($arg)+),
        ))
    };
}

//===========================================================================//
